//! # BlockDAG Consensus Core
//!
//! Consensus-critical core of a BlockDAG cryptocurrency node: the
//! transaction script virtual machine and the UTXO-diff algebra. Any
//! deviation from the exact semantics implemented here causes a chain
//! split, which is why this crate is small, dependency-pinned, and free of
//! I/O.
//!
//! ## Subsystems
//!
//! - **Script engine** ([`ScriptEngine`]): a stack-based bytecode
//!   interpreter deciding whether a transaction input's unlocking script
//!   satisfies the referenced output's locking script. Supports Schnorr
//!   and ECDSA signature opcodes, SHA-256 and BLAKE2b hashing, P2SH-style
//!   redemption, and lock-time/sequence verification. Invoked by the
//!   validation layer once per transaction input.
//! - **UTXO diff algebra** ([`UtxoDiff`]): composition (`with_diff`),
//!   derivation (`diff_from`) and consistency checking of additive and
//!   subtractive changes to a UTXO set, used to propagate state through
//!   the DAG without recomputing full UTXO sets per block.
//!
//! Peer-to-peer networking, storage, DAG ordering, mempool policy and the
//! signature-hash computation itself live outside this crate; the latter
//! is supplied through the [`SignatureHasher`] trait.
//!
//! ## Validating an input
//!
//! ```rust
//! use blockdag_consensus::*;
//!
//! struct NullHasher;
//!
//! impl SignatureHasher for NullHasher {
//!     fn schnorr_signature_hash(&self, _: &Transaction, _: usize, _: SigHashType) -> Hash {
//!         [0; 32]
//!     }
//!     fn ecdsa_signature_hash(&self, _: &Transaction, _: usize, _: SigHashType) -> Hash {
//!         [1; 32]
//!     }
//! }
//!
//! let tx = Transaction::new(
//!     0,
//!     vec![TransactionInput::new(Outpoint::new([0; 32], 0), vec![], u64::MAX, 0)],
//!     vec![],
//!     0,
//!     0,
//!     vec![],
//! );
//! let lock_script = ScriptPublicKey::new(0, vec![0x51]); // OP_1
//! let sig_cache = SignatureCache::new(1024);
//!
//! let mut engine = ScriptEngine::new(&lock_script, &tx, 0, ScriptFlags::NONE, &sig_cache, &NullHasher)
//!     .expect("engine construction");
//! assert!(engine.execute().is_ok());
//! ```
//!
//! ## Folding diffs
//!
//! ```rust
//! use blockdag_consensus::*;
//!
//! let mut block_diff = UtxoDiff::default();
//! let coin = UtxoEntry::new(50, ScriptPublicKey::new(0, vec![0x51]), 7, true);
//! block_diff.add_entry(Outpoint::new([9; 32], 0), coin).unwrap();
//!
//! let tip_diff = UtxoDiff::default().with_diff(&block_diff).unwrap();
//! assert_eq!(tip_diff, block_diff);
//! ```

pub mod constants;
pub mod engine;
pub mod error;
pub mod opcodes;
pub mod parser;
pub mod script_builder;
pub mod script_class;
pub mod script_num;
pub mod sig_cache;
pub mod sighash;
pub mod stack;
pub mod standard;
pub mod types;
pub mod utxo_collection;
pub mod utxo_diff;

// Re-export the public surface
pub use constants::*;
pub use engine::{validate_transaction_input, ScriptEngine, ScriptFlags};
pub use error::{ScriptBuilderError, ScriptError, UtxoAlgebraError};
pub use script_builder::ScriptBuilder;
pub use script_class::{get_sig_op_count, is_pay_to_script_hash, is_unspendable, ScriptClass};
pub use sig_cache::{CachedPublicKey, SigCacheKey, SignatureCache};
pub use sighash::{SigHashType, SignatureHasher};
pub use standard::{
    blake2b_256, pay_to_pub_key, pay_to_pub_key_ecdsa, pay_to_script_hash_script,
    pay_to_script_hash_signature_script,
};
pub use types::*;
pub use utxo_collection::{UtxoCollection, UtxoCollectionExtensions};
pub use utxo_diff::UtxoDiff;
