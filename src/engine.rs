//! The script engine.
//!
//! One engine instance validates exactly one transaction input: it runs the
//! input's signature script, then the referenced output's locking script,
//! and, for P2SH outputs, the redeem script revealed by the signature
//! script. Execution position is the `(script_idx, script_off)` cursor pair;
//! [`ScriptEngine::step`] advances it one opcode at a time and
//! [`ScriptEngine::execute`] drives it to completion.

use crate::constants::*;
use crate::error::ScriptError;
use crate::parser::{is_push_only, parse_script, ParsedOpcode};
use crate::script_class::is_pay_to_script_hash;
use crate::sig_cache::{CachedPublicKey, SigCacheKey, SignatureCache};
use crate::sighash::{SigHashType, SignatureHasher};
use crate::stack::Stack;
use crate::types::{ScriptPublicKey, Transaction, UtxoEntry};
use log::trace;

/// State of one conditional-execution frame. `Skip` marks a branch opened
/// while an enclosing branch was already not executing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpCond {
    True,
    False,
    Skip,
}

/// Execution flag bitmask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScriptFlags(u32);

impl ScriptFlags {
    pub const NONE: ScriptFlags = ScriptFlags(0);

    /// Reject transactions using the upgradable NOP opcodes. Policy-only:
    /// must never be applied to block validation.
    pub const DISCOURAGE_UPGRADABLE_NOPS: ScriptFlags = ScriptFlags(1 << 0);

    pub fn contains(self, other: ScriptFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for ScriptFlags {
    type Output = ScriptFlags;

    fn bitor(self, rhs: ScriptFlags) -> ScriptFlags {
        ScriptFlags(self.0 | rhs.0)
    }
}

/// Checks that a stack lock-time and the transaction's actual lock-time
/// agree in kind (both below or both at-or-above `threshold`) and that the
/// requirement is satisfied.
pub(crate) fn verify_lock_time(tx_lock_time: u64, threshold: u64, lock_time: u64) -> Result<(), ScriptError> {
    if !((tx_lock_time < threshold && lock_time < threshold)
        || (tx_lock_time >= threshold && lock_time >= threshold))
    {
        return Err(ScriptError::UnsatisfiedLockTime(format!(
            "mismatched lock-time types: transaction {}, stack {}",
            tx_lock_time, lock_time
        )));
    }
    if lock_time > tx_lock_time {
        return Err(ScriptError::UnsatisfiedLockTime(format!(
            "lock time requirement not satisfied: {} > {}",
            lock_time, tx_lock_time
        )));
    }
    Ok(())
}

pub struct ScriptEngine<'a> {
    pub(crate) dstack: Stack,
    pub(crate) astack: Stack,
    pub(crate) cond_stack: Vec<OpCond>,
    pub(crate) num_ops: i32,

    scripts: Vec<Vec<ParsedOpcode>>,
    script_idx: usize,
    script_off: usize,
    saved_first_stack: Vec<Vec<u8>>,
    is_p2sh: bool,
    unknown_version: bool,
    flags: ScriptFlags,

    tx: &'a Transaction,
    input_idx: usize,
    sig_cache: &'a SignatureCache,
    hasher: &'a dyn SignatureHasher,
}

impl<'a> ScriptEngine<'a> {
    /// Builds an engine for one transaction input against the locking
    /// script of the output it spends.
    pub fn new(
        script_public_key: &ScriptPublicKey,
        tx: &'a Transaction,
        input_index: usize,
        flags: ScriptFlags,
        sig_cache: &'a SignatureCache,
        hasher: &'a dyn SignatureHasher,
    ) -> Result<Self, ScriptError> {
        if input_index >= tx.inputs.len() {
            return Err(ScriptError::InvalidIndex(input_index, tx.inputs.len()));
        }
        let signature_script = &tx.inputs[input_index].signature_script;

        // Empty against empty can never leave a true value on the stack, so
        // report the eventual outcome up front.
        if signature_script.is_empty() && script_public_key.script.is_empty() {
            return Err(ScriptError::EvalFalse);
        }

        let mut engine = Self {
            dstack: Stack::new(),
            astack: Stack::new(),
            cond_stack: Vec::new(),
            num_ops: 0,
            scripts: Vec::new(),
            script_idx: 0,
            script_off: 0,
            saved_first_stack: Vec::new(),
            is_p2sh: false,
            unknown_version: false,
            flags,
            tx,
            input_idx: input_index,
            sig_cache,
            hasher,
        };

        // Locking scripts from the future validate unconditionally.
        if script_public_key.version > MAX_SCRIPT_PUBLIC_KEY_VERSION {
            engine.unknown_version = true;
            return Ok(engine);
        }

        for script in [signature_script.as_slice(), script_public_key.script()] {
            if script.len() > MAX_SCRIPTS_SIZE {
                return Err(ScriptError::ScriptSize(script.len(), MAX_SCRIPTS_SIZE));
            }
        }

        let sig_ops = parse_script(signature_script)?;
        let pk_ops = parse_script(script_public_key.script())?;
        if !is_push_only(&sig_ops) {
            return Err(ScriptError::SignatureScriptNotPushOnly);
        }

        engine.is_p2sh = is_pay_to_script_hash(script_public_key.script());

        // The cursor starts on the first non-empty script.
        if sig_ops.is_empty() {
            engine.script_idx = 1;
        }
        engine.scripts = vec![sig_ops, pk_ops];
        Ok(engine)
    }

    /// Builds an engine for one input, taking the locking script from the
    /// spent UTXO entry.
    pub fn from_transaction_input(
        tx: &'a Transaction,
        input_index: usize,
        utxo_entry: &'a UtxoEntry,
        flags: ScriptFlags,
        sig_cache: &'a SignatureCache,
        hasher: &'a dyn SignatureHasher,
    ) -> Result<Self, ScriptError> {
        Self::new(&utxo_entry.script_public_key, tx, input_index, flags, sig_cache, hasher)
    }

    /// Whether the current conditional branch is executing.
    #[inline]
    pub fn is_executing(&self) -> bool {
        self.cond_stack.is_empty() || *self.cond_stack.last().expect("checked not empty") == OpCond::True
    }

    pub(crate) fn discourages_upgradable_nops(&self) -> bool {
        self.flags.contains(ScriptFlags::DISCOURAGE_UPGRADABLE_NOPS)
    }

    pub(crate) fn tx_lock_time(&self) -> u64 {
        self.tx.lock_time
    }

    pub(crate) fn input_sequence(&self) -> u64 {
        self.tx.inputs[self.input_idx].sequence
    }

    /// Pops a conditional argument, requiring minimal encoding: empty is
    /// false, the single byte 0x01 is true, anything else is malformed.
    pub(crate) fn pop_if_bool(&mut self) -> Result<bool, ScriptError> {
        let v = self.dstack.pop()?;
        if v.is_empty() {
            Ok(false)
        } else if v == [1] {
            Ok(true)
        } else {
            Err(ScriptError::MinimalIf)
        }
    }

    pub(crate) fn check_pub_key_encoding(pub_key: &[u8]) -> Result<(), ScriptError> {
        match pub_key.len() {
            32 => Ok(()),
            _ => Err(ScriptError::PubKeyFormat),
        }
    }

    pub(crate) fn check_pub_key_encoding_ecdsa(pub_key: &[u8]) -> Result<(), ScriptError> {
        match pub_key.len() {
            33 => Ok(()),
            _ => Err(ScriptError::PubKeyFormat),
        }
    }

    fn execute_opcode(&mut self, op: &ParsedOpcode) -> Result<(), ScriptError> {
        // Disabled and always-illegal opcodes fail on sight, even inside a
        // branch that is not executing.
        if op.is_disabled() {
            return Err(ScriptError::DisabledOpcode(op.name().to_string()));
        }
        if op.always_illegal() {
            return Err(ScriptError::ReservedOpcode(op.name().to_string()));
        }

        if !op.is_push_opcode() {
            self.num_ops += 1;
            if self.num_ops > MAX_OPS_PER_SCRIPT {
                return Err(ScriptError::TooManyOperations(MAX_OPS_PER_SCRIPT));
            }
        } else if op.data.len() > MAX_SCRIPT_ELEMENT_SIZE {
            return Err(ScriptError::ElementTooBig(op.data.len(), MAX_SCRIPT_ELEMENT_SIZE));
        }

        if !self.is_executing() && !op.is_conditional() {
            return Ok(());
        }

        // Executed data pushes must use the smallest possible encoding.
        if self.is_executing() && op.value() > 0 && op.value() <= crate::opcodes::codes::OP_PUSHDATA4 {
            op.check_minimal_data_push()?;
        }

        (op.opcode.handler)(op, self)
    }

    /// Executes the opcode at the cursor and advances it, handling script
    /// boundaries. Returns true once past the last script.
    pub fn step(&mut self) -> Result<bool, ScriptError> {
        if self.unknown_version {
            return Ok(true);
        }
        if self.script_idx >= self.scripts.len() || self.script_off >= self.scripts[self.script_idx].len() {
            return Err(ScriptError::InvalidProgramCounter(self.script_idx, self.script_off));
        }

        let op = self.scripts[self.script_idx][self.script_off].clone();
        self.script_off += 1;
        self.execute_opcode(&op)?;

        let combined = self.dstack.depth() + self.astack.depth();
        if combined > MAX_STACK_SIZE {
            return Err(ScriptError::StackSizeExceeded(combined, MAX_STACK_SIZE));
        }

        if self.script_off >= self.scripts[self.script_idx].len() {
            // A conditional may not straddle two scripts.
            if !self.cond_stack.is_empty() {
                return Err(ScriptError::UnbalancedConditional);
            }
            // The alt stack and the op counter are per-script.
            self.astack.clear();
            self.num_ops = 0;
            self.script_off = 0;

            if self.script_idx == 0 && self.is_p2sh {
                self.script_idx += 1;
                self.saved_first_stack = self.dstack.items().to_vec();
            } else if self.script_idx == 1 && self.is_p2sh {
                // Move past the end so the mid-run error check sees a
                // finished engine, then splice in the revealed redeem
                // script and restore the redeemer's stack beneath it.
                self.script_idx += 1;
                self.check_error_condition(false)?;
                let mut saved = std::mem::take(&mut self.saved_first_stack);
                let redeem_script = saved.pop().ok_or(ScriptError::EmptyStack)?;
                let parsed = parse_script(&redeem_script)?;
                self.scripts.push(parsed);
                self.dstack.set_items(saved);
            } else {
                self.script_idx += 1;
            }

            if self.script_idx < self.scripts.len() && self.scripts[self.script_idx].is_empty() {
                self.script_idx += 1;
            }
            if self.script_idx >= self.scripts.len() {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Checks that a finished run left a true value behind. With
    /// `final_script` the stack must additionally be exactly one item deep.
    pub fn check_error_condition(&mut self, final_script: bool) -> Result<(), ScriptError> {
        if self.script_idx < self.scripts.len() {
            return Err(ScriptError::ScriptUnfinished);
        }
        if final_script {
            if self.dstack.depth() > 1 {
                return Err(ScriptError::CleanStack(self.dstack.depth() - 1));
            } else if self.dstack.is_empty() {
                return Err(ScriptError::EmptyStack);
            }
        }
        if self.dstack.pop_bool()? {
            Ok(())
        } else {
            Err(ScriptError::EvalFalse)
        }
    }

    /// Runs the engine to completion.
    pub fn execute(&mut self) -> Result<(), ScriptError> {
        if self.unknown_version {
            trace!("script public key version is above the known maximum; validating unconditionally");
            return Ok(());
        }
        let mut done = false;
        while !done {
            if log::log_enabled!(log::Level::Trace) {
                match self.disasm_pc() {
                    Ok(line) => trace!("stepping {}", line),
                    Err(err) => trace!("stepping, cursor invalid: {}", err),
                }
            }
            done = self.step()?;
        }
        self.check_error_condition(true)
    }

    /// Disassembles the opcode at the cursor as `"%02x:%04x: %s"`.
    pub fn disasm_pc(&self) -> Result<String, ScriptError> {
        if self.script_idx >= self.scripts.len() || self.script_off >= self.scripts[self.script_idx].len() {
            return Err(ScriptError::InvalidProgramCounter(self.script_idx, self.script_off));
        }
        let op = &self.scripts[self.script_idx][self.script_off];
        Ok(format!("{:02x}:{:04x}: {}", self.script_idx, self.script_off, op.disasm()))
    }

    /// Disassembles an entire loaded script, one opcode per line.
    pub fn disasm_script(&self, idx: usize) -> Result<String, ScriptError> {
        if idx >= self.scripts.len() {
            return Err(ScriptError::InvalidIndex(idx, self.scripts.len()));
        }
        let mut out = String::new();
        for (off, op) in self.scripts[idx].iter().enumerate() {
            out.push_str(&format!("{:02x}:{:04x}: {}\n", idx, off, op.disasm()));
        }
        Ok(out)
    }

    // Signature verification. The cache is consulted before the curve
    // operation and populated after it.

    pub(crate) fn check_schnorr_signature(
        &mut self,
        hash_type: SigHashType,
        pk: &secp256k1::XOnlyPublicKey,
        sig: &secp256k1::schnorr::Signature,
        raw_sig: [u8; 64],
    ) -> Result<bool, ScriptError> {
        let sig_hash = self.hasher.schnorr_signature_hash(self.tx, self.input_idx, hash_type);
        let msg = secp256k1::Message::from_digest_slice(&sig_hash)
            .map_err(|_| ScriptError::InvalidState("signature hash is not a valid message digest".to_string()))?;

        let key = SigCacheKey {
            message: sig_hash,
            signature: raw_sig,
            public_key: CachedPublicKey::Schnorr(pk.serialize()),
        };

        if let Some(valid) = self.sig_cache.get(&key) {
            return Ok(valid);
        }
        let valid = sig.verify(&msg, pk).is_ok();
        self.sig_cache.insert(key, valid);
        Ok(valid)
    }

    pub(crate) fn check_ecdsa_signature(
        &mut self,
        hash_type: SigHashType,
        pk: &secp256k1::PublicKey,
        sig: &secp256k1::ecdsa::Signature,
    ) -> Result<bool, ScriptError> {
        let sig_hash = self.hasher.ecdsa_signature_hash(self.tx, self.input_idx, hash_type);
        let msg = secp256k1::Message::from_digest_slice(&sig_hash)
            .map_err(|_| ScriptError::InvalidState("signature hash is not a valid message digest".to_string()))?;

        let key = SigCacheKey {
            message: sig_hash,
            signature: sig.serialize_compact(),
            public_key: CachedPublicKey::Ecdsa(pk.serialize()),
        };

        if let Some(valid) = self.sig_cache.get(&key) {
            return Ok(valid);
        }
        let valid = sig.verify(&msg, pk).is_ok();
        self.sig_cache.insert(key, valid);
        Ok(valid)
    }
}

/// Validates one transaction input against the locking script of the UTXO
/// it spends. This is the entry point the transaction-validation layer
/// calls once per input.
pub fn validate_transaction_input(
    tx: &Transaction,
    input_index: usize,
    utxo_entry: &UtxoEntry,
    flags: ScriptFlags,
    sig_cache: &SignatureCache,
    hasher: &dyn SignatureHasher,
) -> Result<(), ScriptError> {
    let mut engine = ScriptEngine::from_transaction_input(tx, input_index, utxo_entry, flags, sig_cache, hasher)?;
    engine.execute()
}
