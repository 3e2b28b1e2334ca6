//! # TuneLedger Core
//!
//! Core library for TuneLedger - a signed, append-and-toggle record ledger for
//! a music social protocol: profiles, tracks, playlists, likes, follows, plays
//! and listening insights.
//!
//! This crate owns addressing, the binary record format, instruction building
//! and the mutation engine, independent of the CLI interface.
//!
//! ## Architecture
//!
//! - **address**: program-derived record addresses
//! - **codec**: little-endian binary layout shared by records and payloads
//! - **state**: the fourteen record schemas and their discriminators
//! - **instruction**: payloads, account lists and the instruction builder
//! - **engine**: the `Ledger`, which applies signed instructions atomically
//! - **store**: record storage (in-memory and SQLite)
//! - **signer** / **client**: Ed25519 signing and submission transports

pub mod address;
pub mod client;
pub mod clock;
pub mod codec;
pub mod discriminator;
pub mod engine;
pub mod error;
pub mod fs;
pub mod instruction;
pub mod pubkey;
pub mod signer;
pub mod state;
pub mod store;
pub mod validation;

pub use address::{AddressBook, SeedTag, DEFAULT_PROGRAM_ID};
pub use client::{Client, Confirmation, LocalTransport, Transport};
pub use clock::{Clock, FixedClock, SystemClock};
pub use engine::{Ledger, Receipt, Violation};
pub use error::{Result, TuneLedgerError};
pub use instruction::{Instruction, InstructionBuilder, InstructionKind};
pub use pubkey::Pubkey;
pub use signer::{Keypair, SignedInstruction, Signer};
pub use state::{AnyRecord, Record, RecordKind};
pub use store::{MemoryStore, RecordStore, SqliteStore};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
