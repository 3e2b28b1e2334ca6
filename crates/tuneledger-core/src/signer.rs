//! Signer seam and the in-process Ed25519 signer.
//!
//! The ledger only needs "given bytes, return a signature or fail". Wallets
//! and hardware signers implement [`Signer`]; [`Keypair`] is the reference
//! implementation used by tests and the CLI.

use std::fmt;

use ed25519_dalek::{Signer as _, SigningKey, Verifier, VerifyingKey};
use zeroize::Zeroizing;

use crate::error::{Result, TuneLedgerError};
use crate::instruction::Instruction;
use crate::pubkey::Pubkey;

pub const SIGNATURE_BYTES: usize = 64;

/// Ed25519 signature bytes.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature([u8; SIGNATURE_BYTES]);

impl Signature {
    pub fn new(bytes: [u8; SIGNATURE_BYTES]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SIGNATURE_BYTES] {
        &self.0
    }

    /// Check this signature over `message` against `signer`.
    pub fn verify(&self, signer: &Pubkey, message: &[u8]) -> Result<()> {
        let key = VerifyingKey::from_bytes(signer.as_bytes())
            .map_err(|_| TuneLedgerError::InvalidSignature)?;
        let signature = ed25519_dalek::Signature::from_bytes(&self.0);
        key.verify(message, &signature)
            .map_err(|_| TuneLedgerError::InvalidSignature)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", hex::encode(&self.0[..8]))
    }
}

/// External signing capability.
pub trait Signer {
    fn pubkey(&self) -> Pubkey;

    /// # Errors
    ///
    /// Returns `SigningDeclined` if the signer refuses.
    fn sign(&self, message: &[u8]) -> Result<Signature>;
}

/// Ed25519 keypair. The signing key is zeroized on drop.
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut rand::thread_rng()),
        }
    }

    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// Parse a hex-encoded 32-byte seed.
    pub fn from_hex(seed: &str) -> Result<Self> {
        let bytes = Zeroizing::new(
            hex::decode(seed.trim())
                .map_err(|e| TuneLedgerError::Validation(format!("Invalid key hex: {}", e)))?,
        );
        let seed: Zeroizing<[u8; 32]> = Zeroizing::new(bytes.as_slice().try_into().map_err(|_| {
            TuneLedgerError::Validation(format!("Key seed must be 32 bytes, got {}", bytes.len()))
        })?);
        Ok(Self::from_seed(&seed))
    }

    pub fn to_seed(&self) -> Zeroizing<[u8; 32]> {
        Zeroizing::new(self.signing_key.to_bytes())
    }

    pub fn to_hex(&self) -> Zeroizing<String> {
        let seed = self.to_seed();
        Zeroizing::new(hex::encode(&*seed))
    }
}

impl Signer for Keypair {
    fn pubkey(&self) -> Pubkey {
        Pubkey::new(self.signing_key.verifying_key().to_bytes())
    }

    fn sign(&self, message: &[u8]) -> Result<Signature> {
        Ok(Signature(self.signing_key.sign(message).to_bytes()))
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Keypair({})", self.pubkey())
    }
}

/// An instruction together with its signer's signature over
/// [`Instruction::message`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedInstruction {
    pub instruction: Instruction,
    pub signer: Pubkey,
    pub signature: Signature,
}

impl SignedInstruction {
    pub fn sign<S: Signer + ?Sized>(instruction: Instruction, signer: &S) -> Result<Self> {
        let signature = signer.sign(&instruction.message())?;
        Ok(Self {
            instruction,
            signer: signer.pubkey(),
            signature,
        })
    }

    pub fn verify(&self) -> Result<()> {
        self.signature
            .verify(&self.signer, &self.instruction.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Declining;

    impl Signer for Declining {
        fn pubkey(&self) -> Pubkey {
            Pubkey::default()
        }

        fn sign(&self, _message: &[u8]) -> Result<Signature> {
            Err(TuneLedgerError::SigningDeclined("user rejected".to_string()))
        }
    }

    fn sample_instruction() -> Instruction {
        Instruction {
            program_id: Pubkey::new([1; 32]),
            accounts: Vec::new(),
            data: vec![1, 2, 3],
        }
    }

    #[test]
    fn test_sign_and_verify() {
        let keypair = Keypair::from_seed(&[7; 32]);
        let signed = SignedInstruction::sign(sample_instruction(), &keypair).unwrap();
        assert_eq!(signed.signer, keypair.pubkey());
        assert!(signed.verify().is_ok());
    }

    #[test]
    fn test_tampered_instruction_fails_verification() {
        let keypair = Keypair::generate();
        let mut signed = SignedInstruction::sign(sample_instruction(), &keypair).unwrap();
        signed.instruction.data.push(4);
        assert!(matches!(signed.verify(), Err(TuneLedgerError::InvalidSignature)));
    }

    #[test]
    fn test_wrong_signer_fails_verification() {
        let keypair = Keypair::from_seed(&[1; 32]);
        let other = Keypair::from_seed(&[2; 32]);
        let mut signed = SignedInstruction::sign(sample_instruction(), &keypair).unwrap();
        signed.signer = other.pubkey();
        assert!(matches!(signed.verify(), Err(TuneLedgerError::InvalidSignature)));
    }

    #[test]
    fn test_declined_signing_propagates() {
        let result = SignedInstruction::sign(sample_instruction(), &Declining);
        assert!(matches!(result, Err(TuneLedgerError::SigningDeclined(_))));
    }

    #[test]
    fn test_hex_seed_round_trip() {
        let keypair = Keypair::from_seed(&[9; 32]);
        let restored = Keypair::from_hex(&keypair.to_hex()).unwrap();
        assert_eq!(restored.pubkey(), keypair.pubkey());
        assert!(Keypair::from_hex("abcd").is_err());
    }
}
