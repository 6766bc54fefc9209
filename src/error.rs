//! Error types for script execution and UTXO diff composition

use thiserror::Error;

/// Closed set of script execution failures.
///
/// A script failure is a normal, expected outcome meaning "this transaction
/// input is invalid"; it is surfaced to the validation layer which rejects
/// the containing transaction. The engine never retries.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    #[error("false stack entry at end of script execution")]
    EvalFalse,

    #[error("stack empty at end of script execution")]
    EmptyStack,

    #[error("stack contains {0} unexpected items")]
    CleanStack(usize),

    #[error("error check when script not finished")]
    ScriptUnfinished,

    #[error("program counter past script {0}:{1}")]
    InvalidProgramCounter(usize, usize),

    #[error("script of size {0} exceeded maximum allowed size of {1}")]
    ScriptSize(usize, usize),

    #[error("element size {0} exceeded max allowed size {1}")]
    ElementTooBig(usize, usize),

    #[error("exceeded max operation limit of {0}")]
    TooManyOperations(i32),

    #[error("combined stack size {0} > max allowed {1}")]
    StackSizeExceeded(usize, usize),

    #[error("end of script reached in conditional execution")]
    UnbalancedConditional,

    #[error("{0} encountered with no matching conditional")]
    NoConditional(String),

    #[error("script returned early")]
    EarlyReturn,

    #[error("script ran, but verification failed")]
    VerifyFailed,

    #[error("attempt to execute disabled opcode {0}")]
    DisabledOpcode(String),

    #[error("attempt to execute reserved opcode {0}")]
    ReservedOpcode(String),

    #[error("attempt to execute invalid opcode {0}")]
    InvalidOpcode(String),

    #[error("opcode requires {0} bytes, but script only has {1} remaining")]
    MalformedPush(usize, usize),

    #[error("push encoding is not minimal: {0}")]
    NotMinimalData(String),

    #[error("conditional argument must be minimally encoded true or false")]
    MinimalIf,

    #[error("opcode requires at least {0} but stack has only {1}")]
    InvalidStackOperation(usize, usize),

    #[error("script number overflow: got {0} bytes, max allowed {1}")]
    NumberTooBig(usize, usize),

    #[error("unsupported public key format")]
    PubKeyFormat,

    #[error("invalid signature length {0}")]
    SigLength(usize),

    #[error("invalid hash type 0x{0:02x}")]
    InvalidSigHashType(u8),

    #[error("signature not empty on failed checksig")]
    NullFail,

    #[error("failed to parse signature: {0}")]
    InvalidSignature(secp256k1::Error),

    #[error("invalid signature count: {0}")]
    InvalidSignatureCount(String),

    #[error("invalid pubkey count: {0}")]
    InvalidPubKeyCount(String),

    #[error("negative lock time: {0}")]
    NegativeLockTime(i64),

    #[error("unsatisfied lock time: {0}")]
    UnsatisfiedLockTime(String),

    #[error("transaction input index {0} >= {1}")]
    InvalidIndex(usize, usize),

    #[error("signature script is not push only")]
    SignatureScriptNotPushOnly,

    #[error("upgradable NOPs are discouraged")]
    DiscourageUpgradableNops,

    #[error("invalid engine state: {0}")]
    InvalidState(String),
}

/// Failures of the UTXO diff algebra.
///
/// Unlike a script failure, an algebra error signals that two diffs provably
/// do not share a base UTXO set or that a composition sequence is malformed.
/// Callers must treat it as a consensus-logic bug and abort the surrounding
/// operation rather than continue with a corrupt UTXO state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UtxoAlgebraError {
    #[error("diff_from: outpoint both in this.to_add and in other.to_remove")]
    DiffFromAddedRemoved,

    #[error("diff_from: outpoint both in this.to_remove and in other.to_add")]
    DiffFromRemovedAdded,

    #[error(
        "diff_from: outpoint in both to_remove collections with different \
         blue scores and no offsetting to_add entry"
    )]
    DiffFromAmbiguousRemoval,

    #[error("with_diff: outpoint both in this.to_add and in diff.to_add")]
    DoubleAddition,

    #[error("with_diff: outpoint both in this.to_remove and in diff.to_remove")]
    DoubleRemoval,

    #[error("cannot add outpoint already being added")]
    DuplicateAddEntry,

    #[error("cannot remove outpoint already being removed")]
    DuplicateRemoveEntry,
}

/// Failures of canonical script construction
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScriptBuilderError {
    #[error("adding opcodes would exceed the maximum allowed script size {0}")]
    OpcodeRejected(usize),

    #[error("adding {0} bytes of data would exceed the maximum allowed script size {1}")]
    ElementExceedsMaxSize(usize, usize),
}

pub type Result<T> = std::result::Result<T, ScriptError>;
