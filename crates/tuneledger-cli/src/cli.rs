use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use tuneledger_core::state::{ActivityType, TargetType};
use tuneledger_core::VERSION;

/// TuneLedger - a signed record ledger for music profiles, tracks, playlists and follows
#[derive(Parser)]
#[command(name = "tuneledger")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the ledger database
    #[arg(short, long, global = true, env = "TUNELEDGER_PATH")]
    pub ledger: Option<String>,

    /// Path to the signing key file
    #[arg(short, long, global = true, env = "TUNELEDGER_KEYPAIR")]
    pub keypair: Option<String>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Content kind for search entries and recommendations
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TargetKind {
    Track,
    Playlist,
    User,
}

impl From<TargetKind> for TargetType {
    fn from(kind: TargetKind) -> Self {
        match kind {
            TargetKind::Track => TargetType::Track,
            TargetKind::Playlist => TargetType::Playlist,
            TargetKind::User => TargetType::User,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ActivityKind {
    TrackLiked,
    PlaylistLiked,
    UserFollowed,
    TrackCreated,
    PlaylistCreated,
    TrackPlayed,
}

impl From<ActivityKind> for ActivityType {
    fn from(kind: ActivityKind) -> Self {
        match kind {
            ActivityKind::TrackLiked => ActivityType::TrackLiked,
            ActivityKind::PlaylistLiked => ActivityType::PlaylistLiked,
            ActivityKind::UserFollowed => ActivityType::UserFollowed,
            ActivityKind::TrackCreated => ActivityType::TrackCreated,
            ActivityKind::PlaylistCreated => ActivityType::PlaylistCreated,
            ActivityKind::TrackPlayed => ActivityType::TrackPlayed,
        }
    }
}

/// Arguments for the `init` command
#[derive(Args)]
pub struct InitArgs {
    /// Program id (64 hex chars) the ledger accepts instructions for
    #[arg(long, value_name = "HEX")]
    pub program_id: Option<String>,
}

/// Arguments for the `keygen` command
#[derive(Args)]
pub struct KeygenArgs {
    /// Where to write the key file (defaults to the configured key path)
    #[arg(long, value_name = "PATH")]
    pub out: Option<String>,

    /// Overwrite an existing key file
    #[arg(long)]
    pub force: bool,
}

#[derive(Subcommand)]
pub enum AddressSubcommand {
    /// Profile address of a user
    Profile {
        #[arg(value_name = "USER")]
        user: String,
    },
    /// Stats address of a user
    Stats {
        #[arg(value_name = "USER")]
        user: String,
    },
    /// Track address from title and artist
    Track { title: String, artist: String },
    /// Playlist address from owner and name
    Playlist {
        #[arg(value_name = "OWNER")]
        owner: String,
        name: String,
    },
    /// Follow edge from follower to the followed user
    Follow {
        #[arg(value_name = "FOLLOWER")]
        follower: String,
        #[arg(value_name = "FOLLOWING")]
        following: String,
    },
    /// Insights address of a user
    Insights {
        #[arg(value_name = "USER")]
        user: String,
    },
}

/// Arguments for the `address` command
#[derive(Args)]
pub struct AddressArgs {
    #[command(subcommand)]
    pub command: AddressSubcommand,
}

/// Arguments for `profile create`
#[derive(Args)]
pub struct ProfileCreateArgs {
    /// Unique username
    #[arg(value_name = "USERNAME")]
    pub username: String,

    #[arg(long)]
    pub display_name: Option<String>,

    #[arg(long)]
    pub bio: Option<String>,

    /// Profile image URL
    #[arg(long)]
    pub profile_image: Option<String>,
}

/// Arguments for `profile update`; omitted fields are left unchanged
#[derive(Args)]
pub struct ProfileUpdateArgs {
    #[arg(long)]
    pub display_name: Option<String>,

    #[arg(long)]
    pub bio: Option<String>,

    /// Profile image URL (pass "" to clear)
    #[arg(long)]
    pub profile_image: Option<String>,
}

/// A user, defaulting to the signer
#[derive(Args)]
pub struct UserShowArgs {
    /// User public key (hex); defaults to the signer
    #[arg(value_name = "USER")]
    pub user: Option<String>,
}

#[derive(Subcommand)]
pub enum ProfileSubcommand {
    /// Create the signer's profile
    Create(ProfileCreateArgs),
    /// Update the signer's profile
    Update(ProfileUpdateArgs),
    /// Show a profile and its stats
    Show(UserShowArgs),
}

/// Arguments for the `profile` command
#[derive(Args)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub command: ProfileSubcommand,
}

/// Arguments for `track create`
#[derive(Args)]
pub struct TrackCreateArgs {
    pub title: String,

    pub artist: String,

    /// Duration in seconds
    #[arg(long)]
    pub duration: u64,

    #[arg(long)]
    pub album: Option<String>,

    #[arg(long)]
    pub genre: Option<String>,

    #[arg(long)]
    pub audio_url: Option<String>,

    #[arg(long)]
    pub cover_image: Option<String>,
}

/// A track, identified by title and artist
#[derive(Args)]
pub struct TrackRefArgs {
    pub title: String,

    pub artist: String,
}

/// Arguments for `track play`
#[derive(Args)]
pub struct TrackPlayArgs {
    #[command(flatten)]
    pub track: TrackRefArgs,

    /// Seconds listened
    #[arg(long)]
    pub seconds: u64,

    /// When the play happened (RFC 3339 or unix seconds); defaults to now
    #[arg(long, value_name = "TIME")]
    pub at: Option<String>,
}

#[derive(Subcommand)]
pub enum TrackSubcommand {
    /// Register a track
    Create(TrackCreateArgs),
    /// Show a track
    Show(TrackRefArgs),
    /// Like a track
    Like(TrackRefArgs),
    /// Remove a like
    Unlike(TrackRefArgs),
    /// Record a play
    Play(TrackPlayArgs),
}

/// Arguments for the `track` command
#[derive(Args)]
pub struct TrackArgs {
    #[command(subcommand)]
    pub command: TrackSubcommand,
}

/// Arguments for `playlist create`
#[derive(Args)]
pub struct PlaylistCreateArgs {
    pub name: String,

    #[arg(long)]
    pub description: Option<String>,

    /// Hide the playlist from other users
    #[arg(long)]
    pub private: bool,

    /// Let anyone add tracks
    #[arg(long)]
    pub collaborative: bool,
}

/// A playlist, identified by owner and name
#[derive(Args)]
pub struct PlaylistRefArgs {
    pub name: String,

    /// Owner public key (hex); defaults to the signer
    #[arg(long, value_name = "OWNER")]
    pub owner: Option<String>,
}

/// Arguments for `playlist update`; omitted fields are left unchanged
#[derive(Args)]
pub struct PlaylistUpdateArgs {
    #[command(flatten)]
    pub playlist: PlaylistRefArgs,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long, value_name = "BOOL")]
    pub public: Option<bool>,

    #[arg(long, value_name = "BOOL")]
    pub collaborative: Option<bool>,
}

/// Arguments for `playlist add-track` and `playlist remove-track`
#[derive(Args)]
pub struct PlaylistTrackArgs {
    #[command(flatten)]
    pub playlist: PlaylistRefArgs,

    /// Track title
    #[arg(long)]
    pub title: String,

    /// Track artist
    #[arg(long)]
    pub artist: String,
}

/// Arguments for `playlist add-collaborator`
#[derive(Args)]
pub struct CollaboratorArgs {
    /// Playlist name (owned by the signer)
    pub name: String,

    /// Collaborator public key (hex)
    #[arg(value_name = "USER")]
    pub user: String,

    /// Comma-separated permissions: add, remove, edit, all
    #[arg(long, default_value = "add")]
    pub permissions: String,
}

#[derive(Subcommand)]
pub enum PlaylistSubcommand {
    /// Create a playlist
    Create(PlaylistCreateArgs),
    /// Update description or flags
    Update(PlaylistUpdateArgs),
    /// Show a playlist
    Show(PlaylistRefArgs),
    /// Append a track
    AddTrack(PlaylistTrackArgs),
    /// Remove a track
    RemoveTrack(PlaylistTrackArgs),
    /// Like a playlist
    Like(PlaylistRefArgs),
    /// Remove a like
    Unlike(PlaylistRefArgs),
    /// Grant another user permissions on a playlist
    AddCollaborator(CollaboratorArgs),
}

/// Arguments for the `playlist` command
#[derive(Args)]
pub struct PlaylistArgs {
    #[command(subcommand)]
    pub command: PlaylistSubcommand,
}

/// Arguments for `follow` and `unfollow`
#[derive(Args)]
pub struct FollowArgs {
    /// Public key (hex) of the user to follow
    #[arg(value_name = "USER")]
    pub user: String,
}

/// Arguments for the `activity` command
#[derive(Args)]
pub struct ActivityArgs {
    #[arg(long = "type", value_enum)]
    pub kind: ActivityKind,

    /// Address of what the activity is about
    #[arg(long)]
    pub target: String,

    #[arg(long, default_value = "")]
    pub metadata: String,

    /// RFC 3339 or unix seconds; defaults to now
    #[arg(long, value_name = "TIME")]
    pub at: Option<String>,
}

/// Arguments for the `search-index` command
#[derive(Args)]
pub struct SearchIndexArgs {
    /// Search term (normalized to lowercase)
    pub term: String,

    #[arg(long = "type", value_enum)]
    pub kind: TargetKind,

    /// Address the term points at
    #[arg(long)]
    pub target: String,
}

/// Arguments for `recommend create`
#[derive(Args)]
pub struct RecommendCreateArgs {
    #[arg(long = "type", value_enum)]
    pub kind: TargetKind,

    /// Recommended address
    #[arg(long)]
    pub target: String,

    /// Score between 0 and 1
    #[arg(long)]
    pub score: f32,

    #[arg(long, default_value = "")]
    pub reason: String,
}

/// Arguments for `recommend view`
#[derive(Args)]
pub struct RecommendViewArgs {
    #[arg(long = "type", value_enum)]
    pub kind: TargetKind,

    #[arg(long)]
    pub target: String,
}

#[derive(Subcommand)]
pub enum RecommendSubcommand {
    /// Store a recommendation for the signer
    Create(RecommendCreateArgs),
    /// Mark a recommendation as viewed
    View(RecommendViewArgs),
}

/// Arguments for the `recommend` command
#[derive(Args)]
pub struct RecommendArgs {
    #[command(subcommand)]
    pub command: RecommendSubcommand,
}

/// Arguments for the `record` command
#[derive(Args)]
pub struct RecordArgs {
    /// Record address (hex)
    #[arg(value_name = "ADDRESS")]
    pub address: String,
}

/// Arguments for the `completions` command
#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_name = "SHELL")]
    pub shell: Shell,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the config, a key file and an empty ledger
    Init(InitArgs),

    /// Generate a signing key file
    Keygen(KeygenArgs),

    /// Derive a record address without touching the ledger
    Address(AddressArgs),

    /// Manage user profiles
    Profile(ProfileArgs),

    /// Manage tracks
    Track(TrackArgs),

    /// Manage playlists
    Playlist(PlaylistArgs),

    /// Follow a user
    Follow(FollowArgs),

    /// Stop following a user
    Unfollow(FollowArgs),

    /// Record an activity feed entry
    Activity(ActivityArgs),

    /// Register a search term
    SearchIndex(SearchIndexArgs),

    /// Manage recommendations
    Recommend(RecommendArgs),

    /// Recompute the signer's listening insights
    Insights,

    /// Decode the record stored at an address
    Record(RecordArgs),

    /// Check that every counter matches its relationship records
    Check,

    /// Generate shell completions
    Completions(CompletionsArgs),
}
