//! Per-instruction execution context.
//!
//! Handlers read through the staged changeset, so a record written earlier in
//! the same instruction is visible to later reads. Nothing reaches the store
//! until the handler returns `Ok`.

use crate::address::AddressBook;
use crate::error::{Result, TuneLedgerError};
use crate::instruction::AccountMeta;
use crate::pubkey::Pubkey;
use crate::state::{Record, RecordKind, UserStats};
use crate::store::{Changeset, RecordStore};

pub(crate) struct Context<'a> {
    store: &'a dyn RecordStore,
    pub book: &'a AddressBook,
    accounts: &'a [AccountMeta],
    pub signer: Pubkey,
    pub now: i64,
    changes: Changeset,
}

impl<'a> Context<'a> {
    pub fn new(
        store: &'a dyn RecordStore,
        book: &'a AddressBook,
        accounts: &'a [AccountMeta],
        signer: Pubkey,
        now: i64,
    ) -> Self {
        Self {
            store,
            book,
            accounts,
            signer,
            now,
            changes: Changeset::new(),
        }
    }

    pub fn into_changes(self) -> Changeset {
        self.changes
    }

    // --- Account list checks ---

    pub fn accounts(&self) -> &'a [AccountMeta] {
        self.accounts
    }

    /// Require exactly `count` accounts.
    pub fn expect_len(&self, count: usize) -> Result<()> {
        if self.accounts.len() != count {
            return Err(TuneLedgerError::InvalidAccount(format!(
                "expected {} accounts, got {}",
                count,
                self.accounts.len()
            )));
        }
        Ok(())
    }

    pub fn account(&self, index: usize, label: &str) -> Result<&'a AccountMeta> {
        self.accounts.get(index).ok_or_else(|| {
            TuneLedgerError::InvalidAccount(format!("missing {} account at #{}", label, index))
        })
    }

    /// The account at `index` must be `expected`, and writable if `writable`.
    pub fn expect(&self, index: usize, label: &str, expected: &Pubkey, writable: bool) -> Result<Pubkey> {
        let meta = self.account(index, label)?;
        if &meta.pubkey != expected {
            return Err(TuneLedgerError::InvalidAccount(format!(
                "{} account #{} is {}, expected {}",
                label,
                index,
                meta.pubkey.short(),
                expected.short()
            )));
        }
        if writable && !meta.is_writable {
            return Err(TuneLedgerError::InvalidAccount(format!(
                "{} account #{} must be writable",
                label, index
            )));
        }
        Ok(meta.pubkey)
    }

    /// The account at `index` must be the instruction's signer.
    pub fn expect_signer(&self, index: usize, label: &str) -> Result<Pubkey> {
        let meta = self.account(index, label)?;
        if meta.pubkey != self.signer || !meta.is_signer {
            return Err(TuneLedgerError::Unauthorized(format!(
                "{} account #{} must be the signer",
                label, index
            )));
        }
        Ok(meta.pubkey)
    }

    // --- Record access ---

    /// Raw bytes at `address`, staged writes first.
    pub fn raw(&self, address: &Pubkey) -> Result<Option<Vec<u8>>> {
        match self.changes.get(address) {
            Some(staged) => Ok(staged.map(<[u8]>::to_vec)),
            None => self.store.read(address),
        }
    }

    pub fn exists(&self, address: &Pubkey) -> Result<bool> {
        Ok(self.raw(address)?.is_some())
    }

    /// Load a record of kind `R`, failing `InvalidAccount` if the address
    /// holds another kind.
    pub fn load<R: Record>(&self, address: &Pubkey) -> Result<Option<R>> {
        let Some(bytes) = self.raw(address)? else {
            return Ok(None);
        };
        if !bytes.starts_with(&R::KIND.discriminator()) {
            let found = bytes
                .get(..8)
                .and_then(|prefix| <[u8; 8]>::try_from(prefix).ok())
                .and_then(|prefix| RecordKind::from_discriminator(&prefix))
                .map_or("unknown", |kind| kind.name());
            return Err(TuneLedgerError::InvalidAccount(format!(
                "{} holds a {} record, expected {}",
                address.short(),
                found,
                R::KIND.name()
            )));
        }
        R::unpack(&bytes).map(Some)
    }

    pub fn require<R: Record>(&self, address: &Pubkey) -> Result<R> {
        self.load(address)?.ok_or_else(|| {
            TuneLedgerError::NotFound(format!("{} at {}", R::KIND.name(), address.short()))
        })
    }

    /// Create a record, failing `AlreadyInitialized` if the address is taken.
    pub fn init<R: Record>(&mut self, address: &Pubkey, record: &R) -> Result<()> {
        if self.exists(address)? {
            return Err(TuneLedgerError::AlreadyInitialized(format!(
                "{} at {}",
                R::KIND.name(),
                address.short()
            )));
        }
        self.store(address, record)
    }

    pub fn store<R: Record>(&mut self, address: &Pubkey, record: &R) -> Result<()> {
        self.ensure_writable(address)?;
        self.changes.write(*address, record.pack());
        Ok(())
    }

    pub fn close(&mut self, address: &Pubkey) -> Result<()> {
        self.ensure_writable(address)?;
        self.changes.close(*address);
        Ok(())
    }

    fn ensure_writable(&self, address: &Pubkey) -> Result<()> {
        let writable = self
            .accounts
            .iter()
            .any(|meta| &meta.pubkey == address && meta.is_writable);
        if !writable {
            return Err(TuneLedgerError::InvalidAccount(format!(
                "{} is not a writable account",
                address.short()
            )));
        }
        Ok(())
    }

    // --- Stats ---

    /// Stats at `address` for `user`, or a fresh record if none exists yet.
    pub fn stats(&self, address: &Pubkey, user: &Pubkey) -> Result<UserStats> {
        Ok(self
            .load::<UserStats>(address)?
            .unwrap_or_else(|| UserStats::new(*user, self.now)))
    }

    /// Refresh the signer's `last_active`, creating their stats if needed.
    pub fn touch(&mut self, address: &Pubkey) -> Result<()> {
        let signer = self.signer;
        let mut stats = self.stats(address, &signer)?;
        stats.last_active = self.now;
        self.store(address, &stats)
    }
}
