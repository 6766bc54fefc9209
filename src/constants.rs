//! Consensus constants for script execution and lock-time evaluation

/// Highest script public key version this engine knows how to execute.
/// Anything above it validates unconditionally (soft-fork forward
/// compatibility).
pub const MAX_SCRIPT_PUBLIC_KEY_VERSION: u16 = 0;

/// Maximum combined depth of the data stack and the alt stack
pub const MAX_STACK_SIZE: usize = 244;

/// Maximum byte length of a single script
pub const MAX_SCRIPTS_SIZE: usize = 10_000;

/// Maximum byte length of a single pushed stack element
pub const MAX_SCRIPT_ELEMENT_SIZE: usize = 520;

/// Maximum number of counted (non-push) operations per script
pub const MAX_OPS_PER_SCRIPT: i32 = 201;

/// Maximum number of public keys a multisig opcode may consume
pub const MAX_PUB_KEYS_PER_MULTISIG: i32 = 20;

/// Maximum transaction input sequence number. An input carrying this value
/// has lock-time verification disabled.
pub const MAX_TX_IN_SEQUENCE_NUM: u64 = u64::MAX;

/// Lock-time values below this threshold are interpreted as a DAG blue
/// score, values at or above it as a unix timestamp in milliseconds.
pub const LOCK_TIME_THRESHOLD: u64 = 500_000_000_000;

/// Bit in a transaction input sequence that disables relative lock-time
/// constraints for that input.
pub const SEQUENCE_LOCK_TIME_DISABLED: u64 = 1 << 63;

/// Bit discriminating time-based from score-based relative lock-times
pub const SEQUENCE_LOCK_TIME_TYPE_FLAG: u64 = 1 << 22;

/// Mask extracting the consensus-constrained portion of a sequence number
pub const SEQUENCE_LOCK_TIME_MASK: u64 = 0x0000_0000_ffff_ffff;

/// Byte length limit for general-arithmetic script numbers
pub const MAX_SCRIPT_NUM_LEN: usize = 4;

/// Byte length limit for lock-time script numbers
pub const MAX_LOCK_TIME_SCRIPT_NUM_LEN: usize = 5;

/// Last opcode value that does not count toward the per-script operation
/// limit. Note this includes the reserved opcode at 0x50, which parses as a
/// push operation.
pub const NO_COST_OPCODE: u8 = 0x60;
