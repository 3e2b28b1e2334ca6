//! Signing client and submission transports.
//!
//! A [`Client`] signs each instruction with its [`Signer`] and hands it to a
//! [`Transport`]. Any result other than a [`Confirmation`] means the mutation
//! did not happen; the client never retries.

use serde::Serialize;

use crate::clock::{Clock, SystemClock};
use crate::engine::Ledger;
use crate::error::{Result, TuneLedgerError};
use crate::instruction::{Instruction, InstructionBuilder};
use crate::pubkey::Pubkey;
use crate::signer::{SignedInstruction, Signer};
use crate::state::{AnyRecord, Record};
use crate::store::RecordStore;

/// Proof that a submission was applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Confirmation {
    /// Hex signature of the applied instruction
    pub signature: String,
    pub sequence: u64,
}

/// Where signed instructions go.
pub trait Transport {
    /// Submit one signed instruction.
    ///
    /// # Errors
    ///
    /// `Rejected`, `Timeout` or `NetworkError`; none of them imply the
    /// mutation was applied.
    fn submit(&mut self, tx: &SignedInstruction) -> Result<Confirmation>;

    /// Raw bytes at `address`, or `None` if absent.
    fn read(&self, address: &Pubkey) -> Result<Option<Vec<u8>>>;
}

/// Applies submissions to an in-process [`Ledger`].
pub struct LocalTransport<S: RecordStore, C: Clock = SystemClock> {
    ledger: Ledger<S, C>,
}

impl<S: RecordStore, C: Clock> LocalTransport<S, C> {
    pub fn new(ledger: Ledger<S, C>) -> Self {
        Self { ledger }
    }

    pub fn ledger(&self) -> &Ledger<S, C> {
        &self.ledger
    }

    pub fn into_ledger(self) -> Ledger<S, C> {
        self.ledger
    }
}

impl<S: RecordStore, C: Clock> Transport for LocalTransport<S, C> {
    fn submit(&mut self, tx: &SignedInstruction) -> Result<Confirmation> {
        let receipt = self
            .ledger
            .process(tx)
            .map_err(|err| TuneLedgerError::Rejected(Box::new(err)))?;
        Ok(Confirmation {
            signature: tx.signature.to_string(),
            sequence: receipt.sequence,
        })
    }

    fn read(&self, address: &Pubkey) -> Result<Option<Vec<u8>>> {
        self.ledger.read(address)
    }
}

/// Signs, submits and reads on behalf of one identity.
pub struct Client<T: Transport, K: Signer> {
    transport: T,
    signer: K,
    builder: InstructionBuilder,
}

impl<T: Transport, K: Signer> Client<T, K> {
    pub fn new(transport: T, signer: K, builder: InstructionBuilder) -> Self {
        Self {
            transport,
            signer,
            builder,
        }
    }

    /// Instruction builder bound to this client's program id.
    pub fn builder(&self) -> &InstructionBuilder {
        &self.builder
    }

    pub fn pubkey(&self) -> Pubkey {
        self.signer.pubkey()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Sign and submit `instruction`.
    pub fn send(&mut self, instruction: Instruction) -> Result<Confirmation> {
        let tx = SignedInstruction::sign(instruction, &self.signer)?;
        self.transport.submit(&tx)
    }

    /// Decode the record at `address` as `R`.
    pub fn fetch<R: Record>(&self, address: &Pubkey) -> Result<Option<R>> {
        self.transport
            .read(address)?
            .map(|bytes| R::unpack(&bytes))
            .transpose()
    }

    /// Decode the record at `address` by its discriminator.
    pub fn fetch_any(&self, address: &Pubkey) -> Result<Option<AnyRecord>> {
        self.transport
            .read(address)?
            .map(|bytes| AnyRecord::decode(&bytes))
            .transpose()
    }
}
