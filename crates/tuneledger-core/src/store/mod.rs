//! Record storage.
//!
//! A store is the single owner of the address → bytes map. The engine never
//! writes to it directly: it stages a [`Changeset`] and asks the store to
//! commit it as one unit.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use std::collections::BTreeMap;

use crate::discriminator::Discriminator;
use crate::error::Result;
use crate::pubkey::Pubkey;

/// Storage backend interface.
///
/// All implementations must ensure:
/// - `commit` applies every write and close in a changeset, or none of them
/// - the sequence number increases by one per committed changeset
/// - `scan` returns records ordered by address
pub trait RecordStore: Send + Sync {
    /// Raw bytes at `address`, or `None` if nothing is stored there.
    fn read(&self, address: &Pubkey) -> Result<Option<Vec<u8>>>;

    /// Apply a changeset atomically.
    ///
    /// # Returns
    ///
    /// Returns the sequence number assigned to the changeset.
    ///
    /// # Errors
    ///
    /// Returns `TuneLedgerError::Storage` if the backend cannot persist the
    /// changes; nothing is applied in that case.
    fn commit(&mut self, changes: Changeset) -> Result<u64>;

    /// Sequence number of the last committed changeset (0 when empty).
    fn sequence(&self) -> Result<u64>;

    /// Every record whose bytes start with `discriminator`.
    fn scan(&self, discriminator: &Discriminator) -> Result<Vec<(Pubkey, Vec<u8>)>>;

    /// Number of stored records.
    fn len(&self) -> Result<usize>;

    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

/// Staged writes for one instruction. `None` closes the record at that
/// address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Changeset {
    entries: BTreeMap<Pubkey, Option<Vec<u8>>>,
}

impl Changeset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write(&mut self, address: Pubkey, bytes: Vec<u8>) {
        self.entries.insert(address, Some(bytes));
    }

    pub fn close(&mut self, address: Pubkey) {
        self.entries.insert(address, None);
    }

    /// Staged state at `address`: `None` if untouched, `Some(None)` if
    /// closed, `Some(Some(bytes))` if written.
    pub fn get(&self, address: &Pubkey) -> Option<Option<&[u8]>> {
        self.entries.get(address).map(|entry| entry.as_deref())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Pubkey, Option<&[u8]>)> {
        self.entries
            .iter()
            .map(|(address, entry)| (address, entry.as_deref()))
    }

    pub fn into_entries(self) -> impl Iterator<Item = (Pubkey, Option<Vec<u8>>)> {
        self.entries.into_iter()
    }

    /// Addresses written (not closed) by this changeset.
    pub fn written(&self) -> Vec<Pubkey> {
        self.entries
            .iter()
            .filter(|(_, entry)| entry.is_some())
            .map(|(address, _)| *address)
            .collect()
    }

    /// Addresses closed by this changeset.
    pub fn closed(&self) -> Vec<Pubkey> {
        self.entries
            .iter()
            .filter(|(_, entry)| entry.is_none())
            .map(|(address, _)| *address)
            .collect()
    }
}
