//! Pure instruction constructors.
//!
//! Every builder validates its arguments first, then derives each address the
//! mutation touches, then encodes the payload. Builders never read ledger
//! state. Existing entities are passed by address; the keys of their owners
//! are passed where the mutation touches the owner's stats.

use crate::address::AddressBook;
use crate::error::Result;
use crate::instruction::{
    AccountMeta, AddCollaborator, CreateRecommendation, CreateSearchIndex, CreatePlaylist,
    CreateTrack, CreateUserProfile, Instruction, PlayTrack, ProtocolInstruction, RecordActivity,
    UpdatePlaylist, UpdateUserProfile,
};
use crate::pubkey::Pubkey;
use crate::validation;

#[derive(Debug, Clone, Copy, Default)]
pub struct InstructionBuilder {
    book: AddressBook,
}

impl InstructionBuilder {
    pub fn new(book: AddressBook) -> Self {
        Self { book }
    }

    pub fn addresses(&self) -> &AddressBook {
        &self.book
    }

    fn instruction(&self, accounts: Vec<AccountMeta>, payload: ProtocolInstruction) -> Instruction {
        Instruction {
            program_id: *self.book.program_id(),
            accounts,
            data: payload.encode(),
        }
    }

    // --- Profiles ---

    pub fn create_user_profile(
        &self,
        authority: &Pubkey,
        args: CreateUserProfile,
    ) -> Result<Instruction> {
        args.validate()?;
        let accounts = vec![
            AccountMeta::writable(self.book.user_profile(authority)?),
            AccountMeta::writable(self.book.user_stats(authority)?),
            AccountMeta::signer(*authority, true),
        ];
        Ok(self.instruction(accounts, ProtocolInstruction::CreateUserProfile(args)))
    }

    pub fn update_user_profile(
        &self,
        authority: &Pubkey,
        args: UpdateUserProfile,
    ) -> Result<Instruction> {
        args.validate()?;
        let accounts = vec![
            AccountMeta::writable(self.book.user_profile(authority)?),
            AccountMeta::writable(self.book.user_stats(authority)?),
            AccountMeta::signer(*authority, false),
        ];
        Ok(self.instruction(accounts, ProtocolInstruction::UpdateUserProfile(args)))
    }

    // --- Tracks ---

    pub fn create_track(&self, authority: &Pubkey, args: CreateTrack) -> Result<Instruction> {
        args.validate()?;
        let accounts = vec![
            AccountMeta::writable(self.book.track(&args.title, &args.artist)?),
            AccountMeta::writable(self.book.user_stats(authority)?),
            AccountMeta::signer(*authority, true),
        ];
        Ok(self.instruction(accounts, ProtocolInstruction::CreateTrack(args)))
    }

    pub fn play_track(
        &self,
        user: &Pubkey,
        track: &Pubkey,
        track_creator: &Pubkey,
        duration_played: u64,
        played_at: i64,
    ) -> Result<Instruction> {
        let args = PlayTrack {
            duration_played,
            played_at,
        };
        args.validate()?;
        let accounts = vec![
            AccountMeta::writable(*track),
            AccountMeta::writable(self.book.track_play(track, user, played_at)?),
            AccountMeta::writable(self.book.user_stats(user)?),
            AccountMeta::writable(self.book.user_stats(track_creator)?),
            AccountMeta::signer(*user, true),
        ];
        Ok(self.instruction(accounts, ProtocolInstruction::PlayTrack(args)))
    }

    pub fn like_track(&self, user: &Pubkey, track: &Pubkey, track_creator: &Pubkey) -> Result<Instruction> {
        let accounts = self.track_like_accounts(user, track, track_creator)?;
        Ok(self.instruction(accounts, ProtocolInstruction::LikeTrack))
    }

    pub fn unlike_track(
        &self,
        user: &Pubkey,
        track: &Pubkey,
        track_creator: &Pubkey,
    ) -> Result<Instruction> {
        let accounts = self.track_like_accounts(user, track, track_creator)?;
        Ok(self.instruction(accounts, ProtocolInstruction::UnlikeTrack))
    }

    fn track_like_accounts(
        &self,
        user: &Pubkey,
        track: &Pubkey,
        track_creator: &Pubkey,
    ) -> Result<Vec<AccountMeta>> {
        Ok(vec![
            AccountMeta::writable(*track),
            AccountMeta::writable(self.book.track_like(user, track)?),
            AccountMeta::writable(self.book.user_stats(user)?),
            AccountMeta::writable(self.book.user_stats(track_creator)?),
            AccountMeta::signer(*user, true),
        ])
    }

    // --- Playlists ---

    pub fn create_playlist(&self, authority: &Pubkey, args: CreatePlaylist) -> Result<Instruction> {
        args.validate()?;
        let accounts = vec![
            AccountMeta::writable(self.book.playlist(authority, &args.name)?),
            AccountMeta::writable(self.book.user_stats(authority)?),
            AccountMeta::signer(*authority, true),
        ];
        Ok(self.instruction(accounts, ProtocolInstruction::CreatePlaylist(args)))
    }

    /// `authority` is the signer: the playlist owner or a collaborator with
    /// edit permission.
    pub fn update_playlist(
        &self,
        authority: &Pubkey,
        playlist: &Pubkey,
        args: UpdatePlaylist,
    ) -> Result<Instruction> {
        args.validate()?;
        let accounts = vec![
            AccountMeta::writable(*playlist),
            AccountMeta::readonly(self.book.playlist_collaborator(playlist, authority)?),
            AccountMeta::signer(*authority, false),
        ];
        Ok(self.instruction(accounts, ProtocolInstruction::UpdatePlaylist(args)))
    }

    pub fn add_track_to_playlist(
        &self,
        authority: &Pubkey,
        playlist: &Pubkey,
        track: &Pubkey,
    ) -> Result<Instruction> {
        let accounts = self.membership_accounts(authority, playlist, track)?;
        Ok(self.instruction(accounts, ProtocolInstruction::AddTrackToPlaylist))
    }

    pub fn remove_track_from_playlist(
        &self,
        authority: &Pubkey,
        playlist: &Pubkey,
        track: &Pubkey,
    ) -> Result<Instruction> {
        let accounts = self.membership_accounts(authority, playlist, track)?;
        Ok(self.instruction(accounts, ProtocolInstruction::RemoveTrackFromPlaylist))
    }

    fn membership_accounts(
        &self,
        authority: &Pubkey,
        playlist: &Pubkey,
        track: &Pubkey,
    ) -> Result<Vec<AccountMeta>> {
        Ok(vec![
            AccountMeta::writable(*playlist),
            AccountMeta::writable(self.book.playlist_track(playlist, track)?),
            AccountMeta::readonly(*track),
            AccountMeta::readonly(self.book.playlist_collaborator(playlist, authority)?),
            AccountMeta::signer(*authority, true),
        ])
    }

    pub fn add_collaborator(
        &self,
        authority: &Pubkey,
        playlist: &Pubkey,
        collaborator: &Pubkey,
        permissions: u8,
    ) -> Result<Instruction> {
        let args = AddCollaborator { permissions };
        args.validate()?;
        validation::distinct("add as collaborator", authority, collaborator)?;
        let accounts = vec![
            AccountMeta::readonly(*playlist),
            AccountMeta::writable(self.book.playlist_collaborator(playlist, collaborator)?),
            AccountMeta::readonly(*collaborator),
            AccountMeta::signer(*authority, true),
        ];
        Ok(self.instruction(accounts, ProtocolInstruction::AddCollaborator(args)))
    }

    pub fn like_playlist(
        &self,
        user: &Pubkey,
        playlist: &Pubkey,
        playlist_owner: &Pubkey,
    ) -> Result<Instruction> {
        let accounts = self.playlist_like_accounts(user, playlist, playlist_owner)?;
        Ok(self.instruction(accounts, ProtocolInstruction::LikePlaylist))
    }

    pub fn unlike_playlist(
        &self,
        user: &Pubkey,
        playlist: &Pubkey,
        playlist_owner: &Pubkey,
    ) -> Result<Instruction> {
        let accounts = self.playlist_like_accounts(user, playlist, playlist_owner)?;
        Ok(self.instruction(accounts, ProtocolInstruction::UnlikePlaylist))
    }

    fn playlist_like_accounts(
        &self,
        user: &Pubkey,
        playlist: &Pubkey,
        playlist_owner: &Pubkey,
    ) -> Result<Vec<AccountMeta>> {
        Ok(vec![
            AccountMeta::writable(*playlist),
            AccountMeta::writable(self.book.playlist_like(user, playlist)?),
            AccountMeta::writable(self.book.user_stats(user)?),
            AccountMeta::writable(self.book.user_stats(playlist_owner)?),
            AccountMeta::signer(*user, true),
        ])
    }

    // --- Social graph ---

    /// `following` is the followed user's key, not their profile address.
    pub fn follow_user(&self, follower: &Pubkey, following: &Pubkey) -> Result<Instruction> {
        let accounts = self.follow_accounts(follower, following)?;
        Ok(self.instruction(accounts, ProtocolInstruction::FollowUser))
    }

    pub fn unfollow_user(&self, follower: &Pubkey, following: &Pubkey) -> Result<Instruction> {
        let accounts = self.follow_accounts(follower, following)?;
        Ok(self.instruction(accounts, ProtocolInstruction::UnfollowUser))
    }

    fn follow_accounts(&self, follower: &Pubkey, following: &Pubkey) -> Result<Vec<AccountMeta>> {
        validation::distinct("follow", follower, following)?;
        let following_profile = self.book.user_profile(following)?;
        Ok(vec![
            AccountMeta::writable(self.book.user_profile(follower)?),
            AccountMeta::writable(following_profile),
            AccountMeta::writable(self.book.user_follow(follower, &following_profile)?),
            AccountMeta::signer(*follower, true),
        ])
    }

    // --- Secondary records ---

    pub fn record_activity(&self, user: &Pubkey, args: RecordActivity) -> Result<Instruction> {
        args.validate()?;
        let accounts = vec![
            AccountMeta::writable(self.book.activity_feed(user, args.timestamp)?),
            AccountMeta::signer(*user, true),
        ];
        Ok(self.instruction(accounts, ProtocolInstruction::RecordActivity(args)))
    }

    pub fn create_search_index(
        &self,
        authority: &Pubkey,
        args: CreateSearchIndex,
    ) -> Result<Instruction> {
        let term = args.validate()?;
        let accounts = vec![
            AccountMeta::writable(self.book.search_index(&term, args.target_type)?),
            AccountMeta::signer(*authority, true),
        ];
        Ok(self.instruction(accounts, ProtocolInstruction::CreateSearchIndex(args)))
    }

    pub fn create_recommendation(
        &self,
        user: &Pubkey,
        args: CreateRecommendation,
    ) -> Result<Instruction> {
        args.validate()?;
        let accounts = vec![
            AccountMeta::writable(self.book.recommendation(
                user,
                &args.target,
                args.recommendation_type,
            )?),
            AccountMeta::signer(*user, true),
        ];
        Ok(self.instruction(accounts, ProtocolInstruction::CreateRecommendation(args)))
    }

    pub fn mark_recommendation_viewed(
        &self,
        user: &Pubkey,
        target: &Pubkey,
        recommendation_type: u8,
    ) -> Result<Instruction> {
        validation::target_type("recommendation type", recommendation_type)?;
        let accounts = vec![
            AccountMeta::writable(self.book.recommendation(user, target, recommendation_type)?),
            AccountMeta::signer(*user, false),
        ];
        Ok(self.instruction(accounts, ProtocolInstruction::MarkRecommendationViewed))
    }

    /// `plays` are the user's `TrackPlay` addresses to fold; `tracks` are the
    /// tracks those plays reference (used for genre attribution).
    pub fn generate_user_insights(
        &self,
        user: &Pubkey,
        plays: &[Pubkey],
        tracks: &[Pubkey],
    ) -> Result<Instruction> {
        let mut accounts = vec![
            AccountMeta::writable(self.book.user_insights(user)?),
            AccountMeta::writable(self.book.user_stats(user)?),
            AccountMeta::readonly(self.book.user_profile(user)?),
            AccountMeta::signer(*user, true),
        ];
        accounts.extend(plays.iter().copied().map(AccountMeta::readonly));
        accounts.extend(tracks.iter().copied().map(AccountMeta::readonly));
        Ok(self.instruction(accounts, ProtocolInstruction::GenerateUserInsights))
    }
}
