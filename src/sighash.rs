//! Signature hash types and the oracle seam.
//!
//! The consensus signature-hash computation itself lives outside this
//! crate; the validation layer supplies it through [`SignatureHasher`].

use crate::types::{Hash, Transaction};
use serde::{Deserialize, Serialize};

pub const SIG_HASH_ALL: u8 = 0x01;
pub const SIG_HASH_NONE: u8 = 0x02;
pub const SIG_HASH_SINGLE: u8 = 0x04;
pub const SIG_HASH_ANY_ONE_CAN_PAY: u8 = 0x80;

/// The hash-type byte appended to every signature, selecting which parts
/// of the transaction the signature commits to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SigHashType(pub u8);

impl SigHashType {
    pub const ALL: SigHashType = SigHashType(SIG_HASH_ALL);
    pub const NONE: SigHashType = SigHashType(SIG_HASH_NONE);
    pub const SINGLE: SigHashType = SigHashType(SIG_HASH_SINGLE);

    /// Parses a hash-type byte, accepting only the standard combinations.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value & !SIG_HASH_ANY_ONE_CAN_PAY {
            SIG_HASH_ALL | SIG_HASH_NONE | SIG_HASH_SINGLE => Some(Self(value)),
            _ => None,
        }
    }

    pub fn to_u8(self) -> u8 {
        self.0
    }

    pub fn is_anyone_can_pay(self) -> bool {
        self.0 & SIG_HASH_ANY_ONE_CAN_PAY != 0
    }
}

/// External oracle producing the consensus signature hash for a
/// transaction input. Implementations are expected to be pure and cheap to
/// call repeatedly; the engine invokes it once per signature check.
pub trait SignatureHasher {
    fn schnorr_signature_hash(&self, tx: &Transaction, input_index: usize, hash_type: SigHashType) -> Hash;

    fn ecdsa_signature_hash(&self, tx: &Transaction, input_index: usize, hash_type: SigHashType) -> Hash;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_hash_types() {
        for v in [0x01, 0x02, 0x04, 0x81, 0x82, 0x84] {
            assert!(SigHashType::from_u8(v).is_some(), "0x{:02x} should be standard", v);
        }
    }

    #[test]
    fn test_non_standard_hash_types_rejected() {
        for v in [0x00, 0x03, 0x05, 0x08, 0x80, 0x83, 0xff] {
            assert!(SigHashType::from_u8(v).is_none(), "0x{:02x} should be rejected", v);
        }
    }

    #[test]
    fn test_anyone_can_pay_flag() {
        assert!(SigHashType::from_u8(0x81).unwrap().is_anyone_can_pay());
        assert!(!SigHashType::ALL.is_anyone_can_pay());
    }
}
