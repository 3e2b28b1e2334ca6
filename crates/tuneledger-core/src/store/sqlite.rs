//! SQLite record store.
//!
//! One file per ledger. Records live in a single table keyed by address;
//! each changeset commits inside one SQLite transaction together with the
//! sequence number bump.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;

use crate::discriminator::{Discriminator, SCHEMA_VERSION};
use crate::error::{Result, TuneLedgerError};
use crate::pubkey::Pubkey;
use crate::store::{Changeset, RecordStore};

const FORMAT_VERSION: &str = "1";

const SCHEMA: &str = r#"
    CREATE TABLE meta (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE records (
        address BLOB PRIMARY KEY,
        discriminator BLOB NOT NULL,
        data BLOB NOT NULL,
        updated_seq INTEGER NOT NULL
    );

    CREATE INDEX records_discriminator ON records (discriminator);
"#;

/// Summary of a store file.
#[derive(Debug, Clone, Serialize)]
pub struct StoreMetadata {
    pub format_version: String,
    pub schema_version: u32,
    pub program_id: Pubkey,
    pub created_at: DateTime<Utc>,
    pub sequence: u64,
    pub record_count: usize,
}

/// SQLite-backed record store.
pub struct SqliteStore {
    path: Option<PathBuf>,
    conn: Mutex<Connection>,
    program_id: Pubkey,
}

impl SqliteStore {
    /// Create a new ledger file at `path`.
    ///
    /// # Errors
    ///
    /// Returns `TuneLedgerError::Storage` if the file already exists or
    /// cannot be written.
    pub fn create(path: &Path, program_id: &Pubkey) -> Result<Self> {
        if path.exists() {
            return Err(TuneLedgerError::Storage(
                "Ledger file already exists".to_string(),
            ));
        }
        let conn = Connection::open(path)?;
        Self::initialize(&conn, program_id)?;
        tracing::debug!(path = %path.display(), program = %program_id.short(), "created ledger");
        Ok(Self {
            path: Some(path.to_path_buf()),
            conn: Mutex::new(conn),
            program_id: *program_id,
        })
    }

    /// Open an existing ledger file.
    ///
    /// # Errors
    ///
    /// Returns `TuneLedgerError::NotFound` if the file does not exist and
    /// `TuneLedgerError::Storage` if it was created for another program id
    /// or a different format.
    pub fn open(path: &Path, program_id: &Pubkey) -> Result<Self> {
        if !path.exists() {
            return Err(TuneLedgerError::NotFound(format!(
                "ledger file {}",
                path.display()
            )));
        }
        let conn = Connection::open(path)?;

        let format_version = Self::meta_value(&conn, "format_version")?;
        if format_version != FORMAT_VERSION {
            return Err(TuneLedgerError::Storage(format!(
                "Unsupported ledger format version {}",
                format_version
            )));
        }
        let stored: Pubkey = Self::meta_value(&conn, "program_id")?.parse().map_err(|_| {
            TuneLedgerError::Storage("Invalid program_id in metadata".to_string())
        })?;
        if &stored != program_id {
            return Err(TuneLedgerError::Storage(format!(
                "Ledger belongs to program {}, not {}",
                stored, program_id
            )));
        }

        Ok(Self {
            path: Some(path.to_path_buf()),
            conn: Mutex::new(conn),
            program_id: stored,
        })
    }

    /// Fresh ledger held entirely in memory.
    pub fn open_in_memory(program_id: &Pubkey) -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::initialize(&conn, program_id)?;
        Ok(Self {
            path: None,
            conn: Mutex::new(conn),
            program_id: *program_id,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn program_id(&self) -> &Pubkey {
        &self.program_id
    }

    pub fn metadata(&self) -> Result<StoreMetadata> {
        let conn = self.lock_conn()?;

        let format_version = Self::meta_value(&conn, "format_version")?;
        let schema_version = Self::meta_value(&conn, "schema_version")?
            .parse()
            .map_err(|_| TuneLedgerError::Storage("Invalid schema_version".to_string()))?;
        let created_at = DateTime::parse_from_rfc3339(&Self::meta_value(&conn, "created_at")?)
            .map_err(|e| TuneLedgerError::Storage(format!("Invalid created_at: {}", e)))?
            .with_timezone(&Utc);
        let sequence = Self::read_sequence(&conn)?;
        let record_count: i64 = conn.query_row("SELECT COUNT(*) FROM records", [], |row| row.get(0))?;

        Ok(StoreMetadata {
            format_version,
            schema_version,
            program_id: self.program_id,
            created_at,
            sequence,
            record_count: record_count as usize,
        })
    }

    /// Lock the database connection, returning an error if the mutex is poisoned.
    fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| TuneLedgerError::Storage("SQLite connection poisoned".to_string()))
    }

    fn initialize(conn: &Connection, program_id: &Pubkey) -> Result<()> {
        conn.execute_batch(SCHEMA)?;

        let created_at = Utc::now().to_rfc3339();
        let schema_version = SCHEMA_VERSION.to_string();
        let program_id = program_id.to_string();
        for (key, value) in [
            ("format_version", FORMAT_VERSION),
            ("schema_version", schema_version.as_str()),
            ("program_id", program_id.as_str()),
            ("created_at", created_at.as_str()),
            ("sequence", "0"),
        ] {
            conn.execute("INSERT INTO meta (key, value) VALUES (?, ?)", [key, value])?;
        }
        Ok(())
    }

    fn meta_value(conn: &Connection, key: &str) -> Result<String> {
        conn.query_row("SELECT value FROM meta WHERE key = ?", [key], |row| row.get(0))
            .optional()?
            .ok_or_else(|| TuneLedgerError::Storage(format!("Metadata missing {}", key)))
    }

    fn read_sequence(conn: &Connection) -> Result<u64> {
        Self::meta_value(conn, "sequence")?
            .parse()
            .map_err(|_| TuneLedgerError::Storage("Invalid sequence in metadata".to_string()))
    }
}

fn address_from_blob(blob: Vec<u8>) -> Result<Pubkey> {
    Pubkey::try_from_slice(&blob)
        .map_err(|_| TuneLedgerError::Storage(format!("Invalid address blob ({} bytes)", blob.len())))
}

impl RecordStore for SqliteStore {
    fn read(&self, address: &Pubkey) -> Result<Option<Vec<u8>>> {
        let conn = self.lock_conn()?;
        let data = conn
            .query_row(
                "SELECT data FROM records WHERE address = ?",
                [address.as_bytes().as_slice()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(data)
    }

    fn commit(&mut self, changes: Changeset) -> Result<u64> {
        let mut conn = self.lock_conn()?;
        let tx = conn.transaction()?;

        let sequence = Self::read_sequence(&tx)?
            .checked_add(1)
            .ok_or_else(|| TuneLedgerError::Storage("Sequence exhausted".to_string()))?;
        let (mut written, mut closed) = (0usize, 0usize);
        for (address, entry) in changes.iter() {
            match entry {
                Some(bytes) => {
                    let discriminator = bytes.get(..8).ok_or_else(|| {
                        TuneLedgerError::Storage("Record shorter than its discriminator".to_string())
                    })?;
                    tx.execute(
                        "INSERT OR REPLACE INTO records (address, discriminator, data, updated_seq)
                         VALUES (?1, ?2, ?3, ?4)",
                        params![address.as_bytes().as_slice(), discriminator, bytes, sequence as i64],
                    )?;
                    written += 1;
                }
                None => {
                    tx.execute(
                        "DELETE FROM records WHERE address = ?",
                        [address.as_bytes().as_slice()],
                    )?;
                    closed += 1;
                }
            }
        }
        tx.execute(
            "UPDATE meta SET value = ? WHERE key = 'sequence'",
            [sequence.to_string()],
        )?;
        tx.commit()?;

        tracing::debug!(sequence, written, closed, "committed changeset");
        Ok(sequence)
    }

    fn sequence(&self) -> Result<u64> {
        let conn = self.lock_conn()?;
        Self::read_sequence(&conn)
    }

    fn scan(&self, discriminator: &Discriminator) -> Result<Vec<(Pubkey, Vec<u8>)>> {
        let conn = self.lock_conn()?;
        let mut stmt = conn.prepare(
            "SELECT address, data FROM records WHERE discriminator = ? ORDER BY address",
        )?;
        let rows = stmt.query_map([discriminator.as_slice()], |row| {
            Ok((row.get::<_, Vec<u8>>(0)?, row.get::<_, Vec<u8>>(1)?))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (address, data) = row?;
            records.push((address_from_blob(address)?, data));
        }
        Ok(records)
    }

    fn len(&self) -> Result<usize> {
        let conn = self.lock_conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM records", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}
