//! Core transaction and UTXO types shared by the script engine and the
//! diff algebra.

use serde::{Deserialize, Serialize};

/// 256-bit hash
pub type Hash = [u8; 32];

/// Transaction identifier: 256-bit hash of the transaction
pub type TransactionId = [u8; 32];

/// Byte string type
pub type ByteString = Vec<u8>;

/// Reference to a specific output of a specific transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Outpoint {
    pub transaction_id: TransactionId,
    pub index: u32,
}

impl Outpoint {
    pub fn new(transaction_id: TransactionId, index: u32) -> Self {
        Self { transaction_id, index }
    }
}

/// A locking script together with its version.
///
/// Scripts with a version above [`crate::constants::MAX_SCRIPT_PUBLIC_KEY_VERSION`]
/// are treated as anyone-can-spend by this engine version (soft-fork
/// forward compatibility).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScriptPublicKey {
    pub version: u16,
    pub script: ByteString,
}

impl ScriptPublicKey {
    pub fn new(version: u16, script: ByteString) -> Self {
        Self { version, script }
    }

    pub fn script(&self) -> &[u8] {
        &self.script
    }
}

/// A spendable coin record.
///
/// Immutable once created: collections replace entries, they never mutate
/// them in place. The blue score is part of the coin's identity - the same
/// outpoint re-created at a different blue score is a different coin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtxoEntry {
    pub amount: u64,
    pub script_public_key: ScriptPublicKey,
    pub block_blue_score: u64,
    pub is_coinbase: bool,
}

impl UtxoEntry {
    pub fn new(amount: u64, script_public_key: ScriptPublicKey, block_blue_score: u64, is_coinbase: bool) -> Self {
        Self { amount, script_public_key, block_blue_score, is_coinbase }
    }
}

/// Transaction input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionInput {
    pub previous_outpoint: Outpoint,
    pub signature_script: ByteString,
    pub sequence: u64,
    pub sig_op_count: u8,
}

impl TransactionInput {
    pub fn new(previous_outpoint: Outpoint, signature_script: ByteString, sequence: u64, sig_op_count: u8) -> Self {
        Self { previous_outpoint, signature_script, sequence, sig_op_count }
    }
}

/// Transaction output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionOutput {
    pub value: u64,
    pub script_public_key: ScriptPublicKey,
}

impl TransactionOutput {
    pub fn new(value: u64, script_public_key: ScriptPublicKey) -> Self {
        Self { value, script_public_key }
    }
}

/// Transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub version: u16,
    pub inputs: Vec<TransactionInput>,
    pub outputs: Vec<TransactionOutput>,
    pub lock_time: u64,
    pub gas: u64,
    pub payload: ByteString,
}

impl Transaction {
    pub fn new(
        version: u16,
        inputs: Vec<TransactionInput>,
        outputs: Vec<TransactionOutput>,
        lock_time: u64,
        gas: u64,
        payload: ByteString,
    ) -> Self {
        Self { version, inputs, outputs, lock_time, gas, payload }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outpoint_equality_is_byte_exact() {
        let a = Outpoint::new([7; 32], 1);
        let b = Outpoint::new([7; 32], 1);
        let c = Outpoint::new([7; 32], 2);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_utxo_entry_identity_includes_blue_score() {
        let spk = ScriptPublicKey::new(0, vec![0x51]);
        let e1 = UtxoEntry::new(100, spk.clone(), 10, false);
        let e2 = UtxoEntry::new(100, spk, 11, false);
        assert_ne!(e1, e2);
    }
}
