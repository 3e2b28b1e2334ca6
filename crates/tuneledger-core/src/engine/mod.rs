//! Mutation engine.
//!
//! [`Ledger::process`] checks a signed instruction, runs its handler against a
//! staged changeset, and commits the changeset only when the handler
//! succeeds. Handlers keep every counter in step with the relationship
//! records it counts.

mod analytics;
mod context;
mod integrity;
mod playlist;
mod profile;
mod social;
mod track;

pub use analytics::UNKNOWN_GENRE;
pub use integrity::Violation;

use serde::Serialize;
use tracing::debug;

use crate::address::AddressBook;
use crate::clock::{Clock, SystemClock};
use crate::error::{Result, TuneLedgerError};
use crate::instruction::{InstructionKind, ProtocolInstruction};
use crate::pubkey::Pubkey;
use crate::signer::SignedInstruction;
use crate::state::Record;
use crate::store::RecordStore;

use context::Context;

pub(crate) fn increment(value: u64, what: &str) -> Result<u64> {
    value
        .checked_add(1)
        .ok_or_else(|| TuneLedgerError::ArithmeticOverflow(format!("{} overflow", what)))
}

pub(crate) fn decrement(value: u64, what: &str) -> Result<u64> {
    value
        .checked_sub(1)
        .ok_or_else(|| TuneLedgerError::ArithmeticOverflow(format!("{} underflow", what)))
}

/// Outcome of one applied instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Receipt {
    pub sequence: u64,
    pub kind: InstructionKind,
    pub signer: Pubkey,
    /// Addresses created or updated
    pub written: Vec<Pubkey>,
    /// Addresses whose records were removed
    pub closed: Vec<Pubkey>,
}

/// A record store plus the rules for changing it.
pub struct Ledger<S: RecordStore, C: Clock = SystemClock> {
    store: S,
    clock: C,
    book: AddressBook,
}

impl<S: RecordStore> Ledger<S> {
    pub fn new(store: S, program_id: Pubkey) -> Self {
        Self::with_clock(store, program_id, SystemClock)
    }
}

impl<S: RecordStore, C: Clock> Ledger<S, C> {
    pub fn with_clock(store: S, program_id: Pubkey, clock: C) -> Self {
        Self {
            store,
            clock,
            book: AddressBook::new(program_id),
        }
    }

    pub fn addresses(&self) -> &AddressBook {
        &self.book
    }

    pub fn program_id(&self) -> &Pubkey {
        self.book.program_id()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn read(&self, address: &Pubkey) -> Result<Option<Vec<u8>>> {
        self.store.read(address)
    }

    /// Decode the record at `address` as `R`.
    pub fn fetch<R: Record>(&self, address: &Pubkey) -> Result<Option<R>> {
        self.store
            .read(address)?
            .map(|bytes| R::unpack(&bytes))
            .transpose()
    }

    /// Apply one signed instruction.
    ///
    /// # Errors
    ///
    /// Any error leaves the store untouched:
    /// - `InvalidAccount` for a foreign program id or mismatched accounts
    /// - `InvalidSignature` if the signature does not verify
    /// - `Unauthorized` if the signer is not the sole signing account
    /// - codec and `Validation` errors for malformed payloads
    /// - the handler's own state errors (`AlreadyInitialized`, `NotFound`, ...)
    pub fn process(&mut self, tx: &SignedInstruction) -> Result<Receipt> {
        let result = self.apply(tx);
        if let Err(err) = &result {
            debug!(signer = %tx.signer.short(), error = %err, "Instruction rejected");
        }
        result
    }

    fn apply(&mut self, tx: &SignedInstruction) -> Result<Receipt> {
        let instruction = &tx.instruction;
        if &instruction.program_id != self.book.program_id() {
            return Err(TuneLedgerError::InvalidAccount(format!(
                "instruction targets program {}, ledger runs {}",
                instruction.program_id.short(),
                self.book.program_id().short()
            )));
        }
        tx.verify()?;

        let mut signed = false;
        for signer in instruction.signers() {
            if signer != &tx.signer {
                return Err(TuneLedgerError::Unauthorized(format!(
                    "{} is flagged as a signer but did not sign",
                    signer.short()
                )));
            }
            signed = true;
        }
        if !signed {
            return Err(TuneLedgerError::Unauthorized(format!(
                "{} does not appear as a signing account",
                tx.signer.short()
            )));
        }

        let payload = instruction.payload()?;
        payload.validate()?;
        let kind = payload.kind();

        let mut ctx = Context::new(
            &self.store,
            &self.book,
            &instruction.accounts,
            tx.signer,
            self.clock.now(),
        );
        dispatch(&mut ctx, payload)?;
        let changes = ctx.into_changes();

        let written = changes.written();
        let closed = changes.closed();
        let sequence = self.store.commit(changes)?;
        debug!(sequence, kind = kind.name(), "Instruction applied");

        Ok(Receipt {
            sequence,
            kind,
            signer: tx.signer,
            written,
            closed,
        })
    }

    /// Compare every stored counter with the relationship records it counts.
    pub fn check_integrity(&self) -> Result<Vec<Violation>> {
        integrity::check(&self.store, &self.book)
    }
}

fn dispatch(ctx: &mut Context<'_>, payload: ProtocolInstruction) -> Result<()> {
    match payload {
        ProtocolInstruction::CreateUserProfile(args) => profile::create(ctx, args),
        ProtocolInstruction::UpdateUserProfile(args) => profile::update(ctx, args),
        ProtocolInstruction::CreateTrack(args) => track::create(ctx, args),
        ProtocolInstruction::PlayTrack(args) => track::play(ctx, args),
        ProtocolInstruction::LikeTrack => track::like(ctx),
        ProtocolInstruction::UnlikeTrack => track::unlike(ctx),
        ProtocolInstruction::CreatePlaylist(args) => playlist::create(ctx, args),
        ProtocolInstruction::UpdatePlaylist(args) => playlist::update(ctx, args),
        ProtocolInstruction::AddTrackToPlaylist => playlist::add_track(ctx),
        ProtocolInstruction::RemoveTrackFromPlaylist => playlist::remove_track(ctx),
        ProtocolInstruction::AddCollaborator(args) => playlist::add_collaborator(ctx, args),
        ProtocolInstruction::LikePlaylist => playlist::like(ctx),
        ProtocolInstruction::UnlikePlaylist => playlist::unlike(ctx),
        ProtocolInstruction::FollowUser => social::follow(ctx),
        ProtocolInstruction::UnfollowUser => social::unfollow(ctx),
        ProtocolInstruction::RecordActivity(args) => social::record_activity(ctx, args),
        ProtocolInstruction::CreateSearchIndex(args) => analytics::create_search_index(ctx, args),
        ProtocolInstruction::CreateRecommendation(args) => {
            analytics::create_recommendation(ctx, args)
        }
        ProtocolInstruction::MarkRecommendationViewed => {
            analytics::mark_recommendation_viewed(ctx)
        }
        ProtocolInstruction::GenerateUserInsights => analytics::generate_user_insights(ctx),
    }
}
