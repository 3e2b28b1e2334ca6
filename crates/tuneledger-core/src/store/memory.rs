//! In-memory record store.

use std::collections::BTreeMap;

use crate::discriminator::Discriminator;
use crate::error::Result;
use crate::pubkey::Pubkey;
use crate::store::{Changeset, RecordStore};

/// Ordered map store. Nothing survives the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: BTreeMap<Pubkey, Vec<u8>>,
    sequence: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryStore {
    fn read(&self, address: &Pubkey) -> Result<Option<Vec<u8>>> {
        Ok(self.records.get(address).cloned())
    }

    fn commit(&mut self, changes: Changeset) -> Result<u64> {
        for (address, entry) in changes.into_entries() {
            match entry {
                Some(bytes) => {
                    self.records.insert(address, bytes);
                }
                None => {
                    self.records.remove(&address);
                }
            }
        }
        self.sequence += 1;
        Ok(self.sequence)
    }

    fn sequence(&self) -> Result<u64> {
        Ok(self.sequence)
    }

    fn scan(&self, discriminator: &Discriminator) -> Result<Vec<(Pubkey, Vec<u8>)>> {
        Ok(self
            .records
            .iter()
            .filter(|(_, bytes)| bytes.starts_with(discriminator))
            .map(|(address, bytes)| (*address, bytes.clone()))
            .collect())
    }

    fn len(&self) -> Result<usize> {
        Ok(self.records.len())
    }
}
