//! Opcode dispatch table and handlers.
//!
//! The table is a static, immutable array of 256 entries indexed by opcode
//! byte. Each entry carries the canonical name, the push-length encoding
//! (1 = no operand, N > 1 = opcode plus N-1 data bytes, negative = a
//! 1/2/4-byte little-endian length prefix follows the opcode) and the
//! handler invoked when the opcode executes.

use crate::constants::*;
use crate::engine::{verify_lock_time, OpCond, ScriptEngine};
use crate::error::ScriptError;
use crate::parser::ParsedOpcode;
use crate::script_num::deserialize_script_num;
use crate::sighash::SigHashType;
use blake2::digest::consts::U32;
use blake2::Blake2b;
use sha2::{Digest, Sha256};

type Blake2b256 = Blake2b<U32>;

/// Opcode byte values
pub mod codes {
    pub const OP_FALSE: u8 = 0x00;
    pub const OP_DATA_1: u8 = 0x01;
    pub const OP_DATA_2: u8 = 0x02;
    pub const OP_DATA_32: u8 = 0x20;
    pub const OP_DATA_33: u8 = 0x21;
    pub const OP_DATA_75: u8 = 0x4b;
    pub const OP_PUSHDATA1: u8 = 0x4c;
    pub const OP_PUSHDATA2: u8 = 0x4d;
    pub const OP_PUSHDATA4: u8 = 0x4e;
    pub const OP_1NEGATE: u8 = 0x4f;
    pub const OP_RESERVED: u8 = 0x50;
    pub const OP_TRUE: u8 = 0x51;
    pub const OP_1: u8 = 0x51;
    pub const OP_2: u8 = 0x52;
    pub const OP_3: u8 = 0x53;
    pub const OP_4: u8 = 0x54;
    pub const OP_5: u8 = 0x55;
    pub const OP_6: u8 = 0x56;
    pub const OP_7: u8 = 0x57;
    pub const OP_8: u8 = 0x58;
    pub const OP_9: u8 = 0x59;
    pub const OP_10: u8 = 0x5a;
    pub const OP_11: u8 = 0x5b;
    pub const OP_12: u8 = 0x5c;
    pub const OP_13: u8 = 0x5d;
    pub const OP_14: u8 = 0x5e;
    pub const OP_15: u8 = 0x5f;
    pub const OP_16: u8 = 0x60;
    pub const OP_NOP: u8 = 0x61;
    pub const OP_VER: u8 = 0x62;
    pub const OP_IF: u8 = 0x63;
    pub const OP_NOTIF: u8 = 0x64;
    pub const OP_VERIF: u8 = 0x65;
    pub const OP_VERNOTIF: u8 = 0x66;
    pub const OP_ELSE: u8 = 0x67;
    pub const OP_ENDIF: u8 = 0x68;
    pub const OP_VERIFY: u8 = 0x69;
    pub const OP_RETURN: u8 = 0x6a;
    pub const OP_TOALTSTACK: u8 = 0x6b;
    pub const OP_FROMALTSTACK: u8 = 0x6c;
    pub const OP_2DROP: u8 = 0x6d;
    pub const OP_2DUP: u8 = 0x6e;
    pub const OP_3DUP: u8 = 0x6f;
    pub const OP_2OVER: u8 = 0x70;
    pub const OP_2ROT: u8 = 0x71;
    pub const OP_2SWAP: u8 = 0x72;
    pub const OP_IFDUP: u8 = 0x73;
    pub const OP_DEPTH: u8 = 0x74;
    pub const OP_DROP: u8 = 0x75;
    pub const OP_DUP: u8 = 0x76;
    pub const OP_NIP: u8 = 0x77;
    pub const OP_OVER: u8 = 0x78;
    pub const OP_PICK: u8 = 0x79;
    pub const OP_ROLL: u8 = 0x7a;
    pub const OP_ROT: u8 = 0x7b;
    pub const OP_SWAP: u8 = 0x7c;
    pub const OP_TUCK: u8 = 0x7d;
    pub const OP_CAT: u8 = 0x7e;
    pub const OP_SUBSTR: u8 = 0x7f;
    pub const OP_LEFT: u8 = 0x80;
    pub const OP_RIGHT: u8 = 0x81;
    pub const OP_SIZE: u8 = 0x82;
    pub const OP_INVERT: u8 = 0x83;
    pub const OP_AND: u8 = 0x84;
    pub const OP_OR: u8 = 0x85;
    pub const OP_XOR: u8 = 0x86;
    pub const OP_EQUAL: u8 = 0x87;
    pub const OP_EQUALVERIFY: u8 = 0x88;
    pub const OP_RESERVED1: u8 = 0x89;
    pub const OP_RESERVED2: u8 = 0x8a;
    pub const OP_1ADD: u8 = 0x8b;
    pub const OP_1SUB: u8 = 0x8c;
    pub const OP_2MUL: u8 = 0x8d;
    pub const OP_2DIV: u8 = 0x8e;
    pub const OP_NEGATE: u8 = 0x8f;
    pub const OP_ABS: u8 = 0x90;
    pub const OP_NOT: u8 = 0x91;
    pub const OP_0NOTEQUAL: u8 = 0x92;
    pub const OP_ADD: u8 = 0x93;
    pub const OP_SUB: u8 = 0x94;
    pub const OP_MUL: u8 = 0x95;
    pub const OP_DIV: u8 = 0x96;
    pub const OP_MOD: u8 = 0x97;
    pub const OP_LSHIFT: u8 = 0x98;
    pub const OP_RSHIFT: u8 = 0x99;
    pub const OP_BOOLAND: u8 = 0x9a;
    pub const OP_BOOLOR: u8 = 0x9b;
    pub const OP_NUMEQUAL: u8 = 0x9c;
    pub const OP_NUMEQUALVERIFY: u8 = 0x9d;
    pub const OP_NUMNOTEQUAL: u8 = 0x9e;
    pub const OP_LESSTHAN: u8 = 0x9f;
    pub const OP_GREATERTHAN: u8 = 0xa0;
    pub const OP_LESSTHANOREQUAL: u8 = 0xa1;
    pub const OP_GREATERTHANOREQUAL: u8 = 0xa2;
    pub const OP_MIN: u8 = 0xa3;
    pub const OP_MAX: u8 = 0xa4;
    pub const OP_WITHIN: u8 = 0xa5;
    pub const OP_SHA256: u8 = 0xa8;
    pub const OP_CHECKMULTISIGECDSA: u8 = 0xa9;
    pub const OP_BLAKE2B: u8 = 0xaa;
    pub const OP_CHECKSIGECDSA: u8 = 0xab;
    pub const OP_CHECKSIG: u8 = 0xac;
    pub const OP_CHECKSIGVERIFY: u8 = 0xad;
    pub const OP_CHECKMULTISIG: u8 = 0xae;
    pub const OP_CHECKMULTISIGVERIFY: u8 = 0xaf;
    pub const OP_NOP1: u8 = 0xb0;
    pub const OP_CHECKLOCKTIMEVERIFY: u8 = 0xb1;
    pub const OP_CHECKSEQUENCEVERIFY: u8 = 0xb2;
    pub const OP_NOP4: u8 = 0xb3;
    pub const OP_NOP5: u8 = 0xb4;
    pub const OP_NOP6: u8 = 0xb5;
    pub const OP_NOP7: u8 = 0xb6;
    pub const OP_NOP8: u8 = 0xb7;
    pub const OP_NOP9: u8 = 0xb8;
    pub const OP_NOP10: u8 = 0xb9;
    pub const OP_SMALLINTEGER: u8 = 0xfa;
    pub const OP_PUBKEYS: u8 = 0xfb;
    pub const OP_PUBKEYHASH: u8 = 0xfd;
    pub const OP_PUBKEY: u8 = 0xfe;
    pub const OP_INVALIDOPCODE: u8 = 0xff;
}

use codes::*;

/// Handler invoked when an opcode executes
pub type OpcodeHandler =
    for<'a, 'b, 'r> fn(&'a ParsedOpcode, &'b mut ScriptEngine<'r>) -> Result<(), ScriptError>;

/// One row of the dispatch table
pub struct OpcodeEntry {
    pub value: u8,
    pub name: &'static str,
    pub length: i32,
    pub handler: OpcodeHandler,
}

impl OpcodeEntry {
    /// Disabled opcodes fail the script even inside a non-executing branch.
    pub fn is_disabled(&self) -> bool {
        matches!(
            self.value,
            OP_CAT | OP_SUBSTR | OP_LEFT | OP_RIGHT | OP_INVERT | OP_AND | OP_OR | OP_XOR | OP_2MUL | OP_2DIV
                | OP_MUL | OP_DIV | OP_MOD | OP_LSHIFT | OP_RSHIFT
        )
    }

    /// Always-illegal opcodes fail the script even inside a non-executing
    /// branch, unlike ordinary reserved opcodes which only fail when run.
    pub fn always_illegal(&self) -> bool {
        matches!(self.value, OP_VERIF | OP_VERNOTIF)
    }

    pub fn is_conditional(&self) -> bool {
        matches!(self.value, OP_IF | OP_NOTIF | OP_ELSE | OP_ENDIF)
    }

    /// Push opcodes do not count toward the per-script operation limit.
    /// The reserved opcode at 0x50 parses as a push operation.
    pub fn is_push_opcode(&self) -> bool {
        self.value <= NO_COST_OPCODE
    }
}

/// Converts a small-integer opcode (`OP_0`, `OP_1`..`OP_16`) to its value.
pub fn to_small_int(opcode: u8) -> u8 {
    if opcode == OP_FALSE {
        return 0;
    }
    debug_assert!((OP_1..=OP_16).contains(&opcode));
    opcode - (OP_1 - 1)
}

// Constant opcodes

fn opcode_false(_op: &ParsedOpcode, vm: &mut ScriptEngine<'_>) -> Result<(), ScriptError> {
    vm.dstack.push(Vec::new());
    Ok(())
}

fn opcode_push_data(op: &ParsedOpcode, vm: &mut ScriptEngine<'_>) -> Result<(), ScriptError> {
    vm.dstack.push(op.data.clone());
    Ok(())
}

fn opcode_1negate(_op: &ParsedOpcode, vm: &mut ScriptEngine<'_>) -> Result<(), ScriptError> {
    vm.dstack.push_num(-1);
    Ok(())
}

fn opcode_n(op: &ParsedOpcode, vm: &mut ScriptEngine<'_>) -> Result<(), ScriptError> {
    vm.dstack.push_num(to_small_int(op.value()) as i64);
    Ok(())
}

fn opcode_nop(op: &ParsedOpcode, vm: &mut ScriptEngine<'_>) -> Result<(), ScriptError> {
    match op.value() {
        OP_NOP1 | OP_NOP4..=OP_NOP10 if vm.discourages_upgradable_nops() => {
            Err(ScriptError::DiscourageUpgradableNops)
        }
        _ => Ok(()),
    }
}

fn opcode_reserved(op: &ParsedOpcode, _vm: &mut ScriptEngine<'_>) -> Result<(), ScriptError> {
    Err(ScriptError::ReservedOpcode(op.name().to_string()))
}

fn opcode_invalid(op: &ParsedOpcode, _vm: &mut ScriptEngine<'_>) -> Result<(), ScriptError> {
    Err(ScriptError::InvalidOpcode(op.name().to_string()))
}

fn opcode_disabled(op: &ParsedOpcode, _vm: &mut ScriptEngine<'_>) -> Result<(), ScriptError> {
    Err(ScriptError::DisabledOpcode(op.name().to_string()))
}

// Flow control

fn opcode_if(_op: &ParsedOpcode, vm: &mut ScriptEngine<'_>) -> Result<(), ScriptError> {
    let cond = if vm.is_executing() {
        if vm.pop_if_bool()? {
            OpCond::True
        } else {
            OpCond::False
        }
    } else {
        OpCond::Skip
    };
    vm.cond_stack.push(cond);
    Ok(())
}

fn opcode_notif(_op: &ParsedOpcode, vm: &mut ScriptEngine<'_>) -> Result<(), ScriptError> {
    let cond = if vm.is_executing() {
        if vm.pop_if_bool()? {
            OpCond::False
        } else {
            OpCond::True
        }
    } else {
        OpCond::Skip
    };
    vm.cond_stack.push(cond);
    Ok(())
}

fn opcode_else(op: &ParsedOpcode, vm: &mut ScriptEngine<'_>) -> Result<(), ScriptError> {
    match vm.cond_stack.last_mut() {
        None => Err(ScriptError::NoConditional(op.name().to_string())),
        Some(cond) => {
            *cond = match cond {
                OpCond::True => OpCond::False,
                OpCond::False => OpCond::True,
                OpCond::Skip => OpCond::Skip,
            };
            Ok(())
        }
    }
}

fn opcode_endif(op: &ParsedOpcode, vm: &mut ScriptEngine<'_>) -> Result<(), ScriptError> {
    match vm.cond_stack.pop() {
        None => Err(ScriptError::NoConditional(op.name().to_string())),
        Some(_) => Ok(()),
    }
}

fn opcode_verify(_op: &ParsedOpcode, vm: &mut ScriptEngine<'_>) -> Result<(), ScriptError> {
    if vm.dstack.pop_bool()? {
        Ok(())
    } else {
        Err(ScriptError::VerifyFailed)
    }
}

fn opcode_return(_op: &ParsedOpcode, _vm: &mut ScriptEngine<'_>) -> Result<(), ScriptError> {
    Err(ScriptError::EarlyReturn)
}

// Stack manipulation

fn opcode_to_alt_stack(_op: &ParsedOpcode, vm: &mut ScriptEngine<'_>) -> Result<(), ScriptError> {
    let item = vm.dstack.pop()?;
    vm.astack.push(item);
    Ok(())
}

fn opcode_from_alt_stack(_op: &ParsedOpcode, vm: &mut ScriptEngine<'_>) -> Result<(), ScriptError> {
    let item = vm.astack.pop()?;
    vm.dstack.push(item);
    Ok(())
}

fn opcode_2drop(_op: &ParsedOpcode, vm: &mut ScriptEngine<'_>) -> Result<(), ScriptError> {
    vm.dstack.drop_n(2)
}

fn opcode_2dup(_op: &ParsedOpcode, vm: &mut ScriptEngine<'_>) -> Result<(), ScriptError> {
    vm.dstack.dup_n(2)
}

fn opcode_3dup(_op: &ParsedOpcode, vm: &mut ScriptEngine<'_>) -> Result<(), ScriptError> {
    vm.dstack.dup_n(3)
}

fn opcode_2over(_op: &ParsedOpcode, vm: &mut ScriptEngine<'_>) -> Result<(), ScriptError> {
    vm.dstack.over_n(2)
}

fn opcode_2rot(_op: &ParsedOpcode, vm: &mut ScriptEngine<'_>) -> Result<(), ScriptError> {
    vm.dstack.rot_n(2)
}

fn opcode_2swap(_op: &ParsedOpcode, vm: &mut ScriptEngine<'_>) -> Result<(), ScriptError> {
    vm.dstack.swap_n(2)
}

fn opcode_ifdup(_op: &ParsedOpcode, vm: &mut ScriptEngine<'_>) -> Result<(), ScriptError> {
    let top = vm.dstack.peek(0)?.to_vec();
    if crate::stack::as_bool(&top) {
        vm.dstack.push(top);
    }
    Ok(())
}

fn opcode_depth(_op: &ParsedOpcode, vm: &mut ScriptEngine<'_>) -> Result<(), ScriptError> {
    let depth = vm.dstack.depth() as i64;
    vm.dstack.push_num(depth);
    Ok(())
}

fn opcode_drop(_op: &ParsedOpcode, vm: &mut ScriptEngine<'_>) -> Result<(), ScriptError> {
    vm.dstack.drop_n(1)
}

fn opcode_dup(_op: &ParsedOpcode, vm: &mut ScriptEngine<'_>) -> Result<(), ScriptError> {
    vm.dstack.dup_n(1)
}

fn opcode_nip(_op: &ParsedOpcode, vm: &mut ScriptEngine<'_>) -> Result<(), ScriptError> {
    vm.dstack.nip_n(1)
}

fn opcode_over(_op: &ParsedOpcode, vm: &mut ScriptEngine<'_>) -> Result<(), ScriptError> {
    vm.dstack.over_n(1)
}

fn opcode_pick(_op: &ParsedOpcode, vm: &mut ScriptEngine<'_>) -> Result<(), ScriptError> {
    let n = vm.dstack.pop_arith_num()?;
    if n < 0 {
        return Err(ScriptError::InvalidStackOperation(0, vm.dstack.depth()));
    }
    vm.dstack.pick_n(n as usize)
}

fn opcode_roll(_op: &ParsedOpcode, vm: &mut ScriptEngine<'_>) -> Result<(), ScriptError> {
    let n = vm.dstack.pop_arith_num()?;
    if n < 0 {
        return Err(ScriptError::InvalidStackOperation(0, vm.dstack.depth()));
    }
    vm.dstack.roll_n(n as usize)
}

fn opcode_rot(_op: &ParsedOpcode, vm: &mut ScriptEngine<'_>) -> Result<(), ScriptError> {
    vm.dstack.rot_n(1)
}

fn opcode_swap(_op: &ParsedOpcode, vm: &mut ScriptEngine<'_>) -> Result<(), ScriptError> {
    vm.dstack.swap_n(1)
}

fn opcode_tuck(_op: &ParsedOpcode, vm: &mut ScriptEngine<'_>) -> Result<(), ScriptError> {
    vm.dstack.tuck()
}

fn opcode_size(_op: &ParsedOpcode, vm: &mut ScriptEngine<'_>) -> Result<(), ScriptError> {
    let size = vm.dstack.peek(0)?.len() as i64;
    vm.dstack.push_num(size);
    Ok(())
}

// Comparison

fn opcode_equal(_op: &ParsedOpcode, vm: &mut ScriptEngine<'_>) -> Result<(), ScriptError> {
    let b = vm.dstack.pop()?;
    let a = vm.dstack.pop()?;
    vm.dstack.push_bool(a == b);
    Ok(())
}

fn opcode_equal_verify(op: &ParsedOpcode, vm: &mut ScriptEngine<'_>) -> Result<(), ScriptError> {
    opcode_equal(op, vm)?;
    opcode_verify(op, vm)
}

// Arithmetic. Operands are limited to 4 bytes, so i64 arithmetic cannot
// overflow; results re-serialize minimally and may exceed 4 bytes.

fn opcode_1add(_op: &ParsedOpcode, vm: &mut ScriptEngine<'_>) -> Result<(), ScriptError> {
    let v = vm.dstack.pop_arith_num()?;
    vm.dstack.push_num(v + 1);
    Ok(())
}

fn opcode_1sub(_op: &ParsedOpcode, vm: &mut ScriptEngine<'_>) -> Result<(), ScriptError> {
    let v = vm.dstack.pop_arith_num()?;
    vm.dstack.push_num(v - 1);
    Ok(())
}

fn opcode_negate(_op: &ParsedOpcode, vm: &mut ScriptEngine<'_>) -> Result<(), ScriptError> {
    let v = vm.dstack.pop_arith_num()?;
    vm.dstack.push_num(-v);
    Ok(())
}

fn opcode_abs(_op: &ParsedOpcode, vm: &mut ScriptEngine<'_>) -> Result<(), ScriptError> {
    let v = vm.dstack.pop_arith_num()?;
    vm.dstack.push_num(v.abs());
    Ok(())
}

fn opcode_not(_op: &ParsedOpcode, vm: &mut ScriptEngine<'_>) -> Result<(), ScriptError> {
    let v = vm.dstack.pop_arith_num()?;
    vm.dstack.push_num((v == 0) as i64);
    Ok(())
}

fn opcode_0notequal(_op: &ParsedOpcode, vm: &mut ScriptEngine<'_>) -> Result<(), ScriptError> {
    let v = vm.dstack.pop_arith_num()?;
    vm.dstack.push_num((v != 0) as i64);
    Ok(())
}

fn opcode_add(_op: &ParsedOpcode, vm: &mut ScriptEngine<'_>) -> Result<(), ScriptError> {
    let b = vm.dstack.pop_arith_num()?;
    let a = vm.dstack.pop_arith_num()?;
    vm.dstack.push_num(a + b);
    Ok(())
}

fn opcode_sub(_op: &ParsedOpcode, vm: &mut ScriptEngine<'_>) -> Result<(), ScriptError> {
    let b = vm.dstack.pop_arith_num()?;
    let a = vm.dstack.pop_arith_num()?;
    vm.dstack.push_num(a - b);
    Ok(())
}

fn opcode_booland(_op: &ParsedOpcode, vm: &mut ScriptEngine<'_>) -> Result<(), ScriptError> {
    let b = vm.dstack.pop_arith_num()?;
    let a = vm.dstack.pop_arith_num()?;
    vm.dstack.push_num((a != 0 && b != 0) as i64);
    Ok(())
}

fn opcode_boolor(_op: &ParsedOpcode, vm: &mut ScriptEngine<'_>) -> Result<(), ScriptError> {
    let b = vm.dstack.pop_arith_num()?;
    let a = vm.dstack.pop_arith_num()?;
    vm.dstack.push_num((a != 0 || b != 0) as i64);
    Ok(())
}

fn opcode_numequal(_op: &ParsedOpcode, vm: &mut ScriptEngine<'_>) -> Result<(), ScriptError> {
    let b = vm.dstack.pop_arith_num()?;
    let a = vm.dstack.pop_arith_num()?;
    vm.dstack.push_num((a == b) as i64);
    Ok(())
}

fn opcode_numequal_verify(op: &ParsedOpcode, vm: &mut ScriptEngine<'_>) -> Result<(), ScriptError> {
    opcode_numequal(op, vm)?;
    opcode_verify(op, vm)
}

fn opcode_numnotequal(_op: &ParsedOpcode, vm: &mut ScriptEngine<'_>) -> Result<(), ScriptError> {
    let b = vm.dstack.pop_arith_num()?;
    let a = vm.dstack.pop_arith_num()?;
    vm.dstack.push_num((a != b) as i64);
    Ok(())
}

fn opcode_lessthan(_op: &ParsedOpcode, vm: &mut ScriptEngine<'_>) -> Result<(), ScriptError> {
    let b = vm.dstack.pop_arith_num()?;
    let a = vm.dstack.pop_arith_num()?;
    vm.dstack.push_num((a < b) as i64);
    Ok(())
}

fn opcode_greaterthan(_op: &ParsedOpcode, vm: &mut ScriptEngine<'_>) -> Result<(), ScriptError> {
    let b = vm.dstack.pop_arith_num()?;
    let a = vm.dstack.pop_arith_num()?;
    vm.dstack.push_num((a > b) as i64);
    Ok(())
}

fn opcode_lessthanorequal(_op: &ParsedOpcode, vm: &mut ScriptEngine<'_>) -> Result<(), ScriptError> {
    let b = vm.dstack.pop_arith_num()?;
    let a = vm.dstack.pop_arith_num()?;
    vm.dstack.push_num((a <= b) as i64);
    Ok(())
}

fn opcode_greaterthanorequal(_op: &ParsedOpcode, vm: &mut ScriptEngine<'_>) -> Result<(), ScriptError> {
    let b = vm.dstack.pop_arith_num()?;
    let a = vm.dstack.pop_arith_num()?;
    vm.dstack.push_num((a >= b) as i64);
    Ok(())
}

fn opcode_min(_op: &ParsedOpcode, vm: &mut ScriptEngine<'_>) -> Result<(), ScriptError> {
    let b = vm.dstack.pop_arith_num()?;
    let a = vm.dstack.pop_arith_num()?;
    vm.dstack.push_num(a.min(b));
    Ok(())
}

fn opcode_max(_op: &ParsedOpcode, vm: &mut ScriptEngine<'_>) -> Result<(), ScriptError> {
    let b = vm.dstack.pop_arith_num()?;
    let a = vm.dstack.pop_arith_num()?;
    vm.dstack.push_num(a.max(b));
    Ok(())
}

fn opcode_within(_op: &ParsedOpcode, vm: &mut ScriptEngine<'_>) -> Result<(), ScriptError> {
    let max_val = vm.dstack.pop_arith_num()?;
    let min_val = vm.dstack.pop_arith_num()?;
    let x = vm.dstack.pop_arith_num()?;
    vm.dstack.push_num((min_val <= x && x < max_val) as i64);
    Ok(())
}

// Hashing

fn opcode_sha256(_op: &ParsedOpcode, vm: &mut ScriptEngine<'_>) -> Result<(), ScriptError> {
    let data = vm.dstack.pop()?;
    vm.dstack.push(Sha256::digest(&data).to_vec());
    Ok(())
}

fn opcode_blake2b(_op: &ParsedOpcode, vm: &mut ScriptEngine<'_>) -> Result<(), ScriptError> {
    let data = vm.dstack.pop()?;
    vm.dstack.push(Blake2b256::digest(&data).to_vec());
    Ok(())
}

// Signature verification

fn opcode_checksig(_op: &ParsedOpcode, vm: &mut ScriptEngine<'_>) -> Result<(), ScriptError> {
    let pk_bytes = vm.dstack.pop()?;
    let full_sig_bytes = vm.dstack.pop()?;

    // An empty signature pushes false rather than failing; failed
    // signatures are required to be literally empty (the null convention).
    if full_sig_bytes.is_empty() {
        vm.dstack.push_bool(false);
        return Ok(());
    }

    let typ = full_sig_bytes[full_sig_bytes.len() - 1];
    let sig_bytes = &full_sig_bytes[..full_sig_bytes.len() - 1];
    let hash_type = SigHashType::from_u8(typ).ok_or(ScriptError::InvalidSigHashType(typ))?;

    if sig_bytes.len() != 64 {
        return Err(ScriptError::SigLength(sig_bytes.len()));
    }
    ScriptEngine::check_pub_key_encoding(&pk_bytes)?;

    let pk = match secp256k1::XOnlyPublicKey::from_slice(&pk_bytes) {
        Ok(pk) => pk,
        Err(_) => {
            vm.dstack.push_bool(false);
            return Ok(());
        }
    };
    let sig = match secp256k1::schnorr::Signature::from_slice(sig_bytes) {
        Ok(sig) => sig,
        Err(_) => {
            vm.dstack.push_bool(false);
            return Ok(());
        }
    };
    let raw_sig: [u8; 64] =
        sig_bytes.try_into().map_err(|_| ScriptError::SigLength(sig_bytes.len()))?;

    let valid = vm.check_schnorr_signature(hash_type, &pk, &sig, raw_sig)?;
    if !valid && !sig_bytes.is_empty() {
        return Err(ScriptError::NullFail);
    }
    vm.dstack.push_bool(valid);
    Ok(())
}

fn opcode_checksig_ecdsa(_op: &ParsedOpcode, vm: &mut ScriptEngine<'_>) -> Result<(), ScriptError> {
    let pk_bytes = vm.dstack.pop()?;
    let full_sig_bytes = vm.dstack.pop()?;

    if full_sig_bytes.is_empty() {
        vm.dstack.push_bool(false);
        return Ok(());
    }

    let typ = full_sig_bytes[full_sig_bytes.len() - 1];
    let sig_bytes = &full_sig_bytes[..full_sig_bytes.len() - 1];
    let hash_type = SigHashType::from_u8(typ).ok_or(ScriptError::InvalidSigHashType(typ))?;

    if sig_bytes.len() != 64 {
        return Err(ScriptError::SigLength(sig_bytes.len()));
    }
    ScriptEngine::check_pub_key_encoding_ecdsa(&pk_bytes)?;

    let pk = match secp256k1::PublicKey::from_slice(&pk_bytes) {
        Ok(pk) => pk,
        Err(_) => {
            vm.dstack.push_bool(false);
            return Ok(());
        }
    };
    let sig = match secp256k1::ecdsa::Signature::from_compact(sig_bytes) {
        Ok(sig) => sig,
        Err(_) => {
            vm.dstack.push_bool(false);
            return Ok(());
        }
    };

    let valid = vm.check_ecdsa_signature(hash_type, &pk, &sig)?;
    if !valid && !sig_bytes.is_empty() {
        return Err(ScriptError::NullFail);
    }
    vm.dstack.push_bool(valid);
    Ok(())
}

fn opcode_checksig_verify(op: &ParsedOpcode, vm: &mut ScriptEngine<'_>) -> Result<(), ScriptError> {
    opcode_checksig(op, vm)?;
    opcode_verify(op, vm)
}

fn opcode_checkmultisig(op: &ParsedOpcode, vm: &mut ScriptEngine<'_>) -> Result<(), ScriptError> {
    check_multisig(op, vm, false)
}

fn opcode_checkmultisig_ecdsa(op: &ParsedOpcode, vm: &mut ScriptEngine<'_>) -> Result<(), ScriptError> {
    check_multisig(op, vm, true)
}

fn opcode_checkmultisig_verify(op: &ParsedOpcode, vm: &mut ScriptEngine<'_>) -> Result<(), ScriptError> {
    check_multisig(op, vm, false)?;
    opcode_verify(op, vm)
}

/// Greedy multisig matching: signatures and public keys are consumed in
/// stack order, the signature cursor advances only on a valid match, and
/// the whole operation fails as soon as the remaining signatures outnumber
/// the remaining public keys. There is no backtracking.
fn check_multisig(_op: &ParsedOpcode, vm: &mut ScriptEngine<'_>, ecdsa: bool) -> Result<(), ScriptError> {
    let num_keys = vm.dstack.pop_arith_num()?;
    if num_keys < 0 {
        return Err(ScriptError::InvalidPubKeyCount(format!("number of pubkeys {} is negative", num_keys)));
    }
    if num_keys > MAX_PUB_KEYS_PER_MULTISIG as i64 {
        return Err(ScriptError::InvalidPubKeyCount(format!(
            "too many pubkeys {} > {}",
            num_keys, MAX_PUB_KEYS_PER_MULTISIG
        )));
    }

    // Every pubkey the operation may consume counts toward the per-script
    // operation limit.
    vm.num_ops += num_keys as i32;
    if vm.num_ops > MAX_OPS_PER_SCRIPT {
        return Err(ScriptError::TooManyOperations(MAX_OPS_PER_SCRIPT));
    }

    let pub_keys = vm.dstack.split_off_top(num_keys as usize)?;

    let num_sigs = vm.dstack.pop_arith_num()?;
    if num_sigs < 0 {
        return Err(ScriptError::InvalidSignatureCount(format!("number of signatures {} is negative", num_sigs)));
    }
    if num_sigs > num_keys {
        return Err(ScriptError::InvalidSignatureCount(format!(
            "more signatures than pubkeys {} > {}",
            num_sigs, num_keys
        )));
    }
    let num_sigs = num_sigs as usize;

    let signatures = vm.dstack.split_off_top(num_sigs)?;

    let mut failed = false;
    let mut pub_key_iter = pub_keys.iter();
    'outer: for (sig_idx, full_sig) in signatures.iter().enumerate() {
        if full_sig.is_empty() {
            failed = true;
            break;
        }

        let typ = full_sig[full_sig.len() - 1];
        let sig_bytes = &full_sig[..full_sig.len() - 1];
        let hash_type = SigHashType::from_u8(typ).ok_or(ScriptError::InvalidSigHashType(typ))?;
        if sig_bytes.len() != 64 {
            return Err(ScriptError::SigLength(sig_bytes.len()));
        }

        // Each signature's encoding is parsed exactly once, before the
        // pubkey-matching walk.
        loop {
            if pub_key_iter.len() < num_sigs - sig_idx {
                // More signatures remain than public keys; no way to
                // succeed, so exit early.
                failed = true;
                break 'outer;
            }
            let pub_key = pub_key_iter.next().ok_or_else(|| {
                ScriptError::InvalidState("pubkey iterator exhausted".to_string())
            })?;

            let valid = if ecdsa {
                ScriptEngine::check_pub_key_encoding_ecdsa(pub_key)?;
                let pk = secp256k1::PublicKey::from_slice(pub_key).map_err(ScriptError::InvalidSignature)?;
                let sig =
                    secp256k1::ecdsa::Signature::from_compact(sig_bytes).map_err(ScriptError::InvalidSignature)?;
                vm.check_ecdsa_signature(hash_type, &pk, &sig)?
            } else {
                ScriptEngine::check_pub_key_encoding(pub_key)?;
                let pk = secp256k1::XOnlyPublicKey::from_slice(pub_key).map_err(ScriptError::InvalidSignature)?;
                let sig =
                    secp256k1::schnorr::Signature::from_slice(sig_bytes).map_err(ScriptError::InvalidSignature)?;
                let raw_sig: [u8; 64] =
                    sig_bytes.try_into().map_err(|_| ScriptError::SigLength(sig_bytes.len()))?;
                vm.check_schnorr_signature(hash_type, &pk, &sig, raw_sig)?
            };

            if valid {
                break;
            }
        }
    }

    if failed && signatures.iter().any(|sig| !sig.is_empty()) {
        return Err(ScriptError::NullFail);
    }

    vm.dstack.push_bool(!failed);
    Ok(())
}

// Lock-time verification. Both opcodes read their operand without removing
// it, so scripts follow them with OP_DROP.

fn opcode_check_lock_time_verify(_op: &ParsedOpcode, vm: &mut ScriptEngine<'_>) -> Result<(), ScriptError> {
    let raw = vm.dstack.peek(0)?.to_vec();
    let lock_time = deserialize_script_num(&raw, true, MAX_LOCK_TIME_SCRIPT_NUM_LEN)?;
    if lock_time < 0 {
        return Err(ScriptError::NegativeLockTime(lock_time));
    }

    verify_lock_time(vm.tx_lock_time(), LOCK_TIME_THRESHOLD, lock_time as u64)?;

    // A final input sequence disables lock-time verification entirely; a
    // transaction that relies on this opcode must leave room to bump the
    // sequence.
    if vm.input_sequence() == MAX_TX_IN_SEQUENCE_NUM {
        return Err(ScriptError::UnsatisfiedLockTime("transaction input is final".to_string()));
    }
    Ok(())
}

fn opcode_check_sequence_verify(_op: &ParsedOpcode, vm: &mut ScriptEngine<'_>) -> Result<(), ScriptError> {
    let raw = vm.dstack.peek(0)?.to_vec();
    let sequence = deserialize_script_num(&raw, true, MAX_LOCK_TIME_SCRIPT_NUM_LEN)?;
    if sequence < 0 {
        return Err(ScriptError::NegativeLockTime(sequence));
    }
    let stack_sequence = sequence as u64;

    // An operand with the disable bit set behaves as a NOP, for soft-fork
    // extensibility.
    if stack_sequence & SEQUENCE_LOCK_TIME_DISABLED != 0 {
        return Ok(());
    }

    let tx_sequence = vm.input_sequence();
    if tx_sequence & SEQUENCE_LOCK_TIME_DISABLED != 0 {
        return Err(ScriptError::UnsatisfiedLockTime(format!(
            "transaction sequence has relative lock-time disabled: {:#x}",
            tx_sequence
        )));
    }

    verify_lock_time(
        tx_sequence & SEQUENCE_LOCK_TIME_MASK,
        SEQUENCE_LOCK_TIME_TYPE_FLAG,
        stack_sequence & SEQUENCE_LOCK_TIME_MASK,
    )
}

macro_rules! op {
    ($value:expr, $name:expr, $length:expr, $handler:expr) => {
        OpcodeEntry { value: $value, name: $name, length: $length, handler: $handler }
    };
}

/// The dispatch table, indexed by opcode byte. Read-only; safe for
/// concurrent access from any number of engines.
pub static OPCODE_TABLE: [OpcodeEntry; 256] = [
    op!(0x00, "OP_0", 1, opcode_false),
    op!(0x01, "OP_DATA_1", 2, opcode_push_data),
    op!(0x02, "OP_DATA_2", 3, opcode_push_data),
    op!(0x03, "OP_DATA_3", 4, opcode_push_data),
    op!(0x04, "OP_DATA_4", 5, opcode_push_data),
    op!(0x05, "OP_DATA_5", 6, opcode_push_data),
    op!(0x06, "OP_DATA_6", 7, opcode_push_data),
    op!(0x07, "OP_DATA_7", 8, opcode_push_data),
    op!(0x08, "OP_DATA_8", 9, opcode_push_data),
    op!(0x09, "OP_DATA_9", 10, opcode_push_data),
    op!(0x0a, "OP_DATA_10", 11, opcode_push_data),
    op!(0x0b, "OP_DATA_11", 12, opcode_push_data),
    op!(0x0c, "OP_DATA_12", 13, opcode_push_data),
    op!(0x0d, "OP_DATA_13", 14, opcode_push_data),
    op!(0x0e, "OP_DATA_14", 15, opcode_push_data),
    op!(0x0f, "OP_DATA_15", 16, opcode_push_data),
    op!(0x10, "OP_DATA_16", 17, opcode_push_data),
    op!(0x11, "OP_DATA_17", 18, opcode_push_data),
    op!(0x12, "OP_DATA_18", 19, opcode_push_data),
    op!(0x13, "OP_DATA_19", 20, opcode_push_data),
    op!(0x14, "OP_DATA_20", 21, opcode_push_data),
    op!(0x15, "OP_DATA_21", 22, opcode_push_data),
    op!(0x16, "OP_DATA_22", 23, opcode_push_data),
    op!(0x17, "OP_DATA_23", 24, opcode_push_data),
    op!(0x18, "OP_DATA_24", 25, opcode_push_data),
    op!(0x19, "OP_DATA_25", 26, opcode_push_data),
    op!(0x1a, "OP_DATA_26", 27, opcode_push_data),
    op!(0x1b, "OP_DATA_27", 28, opcode_push_data),
    op!(0x1c, "OP_DATA_28", 29, opcode_push_data),
    op!(0x1d, "OP_DATA_29", 30, opcode_push_data),
    op!(0x1e, "OP_DATA_30", 31, opcode_push_data),
    op!(0x1f, "OP_DATA_31", 32, opcode_push_data),
    op!(0x20, "OP_DATA_32", 33, opcode_push_data),
    op!(0x21, "OP_DATA_33", 34, opcode_push_data),
    op!(0x22, "OP_DATA_34", 35, opcode_push_data),
    op!(0x23, "OP_DATA_35", 36, opcode_push_data),
    op!(0x24, "OP_DATA_36", 37, opcode_push_data),
    op!(0x25, "OP_DATA_37", 38, opcode_push_data),
    op!(0x26, "OP_DATA_38", 39, opcode_push_data),
    op!(0x27, "OP_DATA_39", 40, opcode_push_data),
    op!(0x28, "OP_DATA_40", 41, opcode_push_data),
    op!(0x29, "OP_DATA_41", 42, opcode_push_data),
    op!(0x2a, "OP_DATA_42", 43, opcode_push_data),
    op!(0x2b, "OP_DATA_43", 44, opcode_push_data),
    op!(0x2c, "OP_DATA_44", 45, opcode_push_data),
    op!(0x2d, "OP_DATA_45", 46, opcode_push_data),
    op!(0x2e, "OP_DATA_46", 47, opcode_push_data),
    op!(0x2f, "OP_DATA_47", 48, opcode_push_data),
    op!(0x30, "OP_DATA_48", 49, opcode_push_data),
    op!(0x31, "OP_DATA_49", 50, opcode_push_data),
    op!(0x32, "OP_DATA_50", 51, opcode_push_data),
    op!(0x33, "OP_DATA_51", 52, opcode_push_data),
    op!(0x34, "OP_DATA_52", 53, opcode_push_data),
    op!(0x35, "OP_DATA_53", 54, opcode_push_data),
    op!(0x36, "OP_DATA_54", 55, opcode_push_data),
    op!(0x37, "OP_DATA_55", 56, opcode_push_data),
    op!(0x38, "OP_DATA_56", 57, opcode_push_data),
    op!(0x39, "OP_DATA_57", 58, opcode_push_data),
    op!(0x3a, "OP_DATA_58", 59, opcode_push_data),
    op!(0x3b, "OP_DATA_59", 60, opcode_push_data),
    op!(0x3c, "OP_DATA_60", 61, opcode_push_data),
    op!(0x3d, "OP_DATA_61", 62, opcode_push_data),
    op!(0x3e, "OP_DATA_62", 63, opcode_push_data),
    op!(0x3f, "OP_DATA_63", 64, opcode_push_data),
    op!(0x40, "OP_DATA_64", 65, opcode_push_data),
    op!(0x41, "OP_DATA_65", 66, opcode_push_data),
    op!(0x42, "OP_DATA_66", 67, opcode_push_data),
    op!(0x43, "OP_DATA_67", 68, opcode_push_data),
    op!(0x44, "OP_DATA_68", 69, opcode_push_data),
    op!(0x45, "OP_DATA_69", 70, opcode_push_data),
    op!(0x46, "OP_DATA_70", 71, opcode_push_data),
    op!(0x47, "OP_DATA_71", 72, opcode_push_data),
    op!(0x48, "OP_DATA_72", 73, opcode_push_data),
    op!(0x49, "OP_DATA_73", 74, opcode_push_data),
    op!(0x4a, "OP_DATA_74", 75, opcode_push_data),
    op!(0x4b, "OP_DATA_75", 76, opcode_push_data),
    op!(0x4c, "OP_PUSHDATA1", -1, opcode_push_data),
    op!(0x4d, "OP_PUSHDATA2", -2, opcode_push_data),
    op!(0x4e, "OP_PUSHDATA4", -4, opcode_push_data),
    op!(0x4f, "OP_1NEGATE", 1, opcode_1negate),
    op!(0x50, "OP_RESERVED", 1, opcode_reserved),
    op!(0x51, "OP_1", 1, opcode_n),
    op!(0x52, "OP_2", 1, opcode_n),
    op!(0x53, "OP_3", 1, opcode_n),
    op!(0x54, "OP_4", 1, opcode_n),
    op!(0x55, "OP_5", 1, opcode_n),
    op!(0x56, "OP_6", 1, opcode_n),
    op!(0x57, "OP_7", 1, opcode_n),
    op!(0x58, "OP_8", 1, opcode_n),
    op!(0x59, "OP_9", 1, opcode_n),
    op!(0x5a, "OP_10", 1, opcode_n),
    op!(0x5b, "OP_11", 1, opcode_n),
    op!(0x5c, "OP_12", 1, opcode_n),
    op!(0x5d, "OP_13", 1, opcode_n),
    op!(0x5e, "OP_14", 1, opcode_n),
    op!(0x5f, "OP_15", 1, opcode_n),
    op!(0x60, "OP_16", 1, opcode_n),
    op!(0x61, "OP_NOP", 1, opcode_nop),
    op!(0x62, "OP_VER", 1, opcode_reserved),
    op!(0x63, "OP_IF", 1, opcode_if),
    op!(0x64, "OP_NOTIF", 1, opcode_notif),
    op!(0x65, "OP_VERIF", 1, opcode_reserved),
    op!(0x66, "OP_VERNOTIF", 1, opcode_reserved),
    op!(0x67, "OP_ELSE", 1, opcode_else),
    op!(0x68, "OP_ENDIF", 1, opcode_endif),
    op!(0x69, "OP_VERIFY", 1, opcode_verify),
    op!(0x6a, "OP_RETURN", 1, opcode_return),
    op!(0x6b, "OP_TOALTSTACK", 1, opcode_to_alt_stack),
    op!(0x6c, "OP_FROMALTSTACK", 1, opcode_from_alt_stack),
    op!(0x6d, "OP_2DROP", 1, opcode_2drop),
    op!(0x6e, "OP_2DUP", 1, opcode_2dup),
    op!(0x6f, "OP_3DUP", 1, opcode_3dup),
    op!(0x70, "OP_2OVER", 1, opcode_2over),
    op!(0x71, "OP_2ROT", 1, opcode_2rot),
    op!(0x72, "OP_2SWAP", 1, opcode_2swap),
    op!(0x73, "OP_IFDUP", 1, opcode_ifdup),
    op!(0x74, "OP_DEPTH", 1, opcode_depth),
    op!(0x75, "OP_DROP", 1, opcode_drop),
    op!(0x76, "OP_DUP", 1, opcode_dup),
    op!(0x77, "OP_NIP", 1, opcode_nip),
    op!(0x78, "OP_OVER", 1, opcode_over),
    op!(0x79, "OP_PICK", 1, opcode_pick),
    op!(0x7a, "OP_ROLL", 1, opcode_roll),
    op!(0x7b, "OP_ROT", 1, opcode_rot),
    op!(0x7c, "OP_SWAP", 1, opcode_swap),
    op!(0x7d, "OP_TUCK", 1, opcode_tuck),
    op!(0x7e, "OP_CAT", 1, opcode_disabled),
    op!(0x7f, "OP_SUBSTR", 1, opcode_disabled),
    op!(0x80, "OP_LEFT", 1, opcode_disabled),
    op!(0x81, "OP_RIGHT", 1, opcode_disabled),
    op!(0x82, "OP_SIZE", 1, opcode_size),
    op!(0x83, "OP_INVERT", 1, opcode_disabled),
    op!(0x84, "OP_AND", 1, opcode_disabled),
    op!(0x85, "OP_OR", 1, opcode_disabled),
    op!(0x86, "OP_XOR", 1, opcode_disabled),
    op!(0x87, "OP_EQUAL", 1, opcode_equal),
    op!(0x88, "OP_EQUALVERIFY", 1, opcode_equal_verify),
    op!(0x89, "OP_RESERVED1", 1, opcode_reserved),
    op!(0x8a, "OP_RESERVED2", 1, opcode_reserved),
    op!(0x8b, "OP_1ADD", 1, opcode_1add),
    op!(0x8c, "OP_1SUB", 1, opcode_1sub),
    op!(0x8d, "OP_2MUL", 1, opcode_disabled),
    op!(0x8e, "OP_2DIV", 1, opcode_disabled),
    op!(0x8f, "OP_NEGATE", 1, opcode_negate),
    op!(0x90, "OP_ABS", 1, opcode_abs),
    op!(0x91, "OP_NOT", 1, opcode_not),
    op!(0x92, "OP_0NOTEQUAL", 1, opcode_0notequal),
    op!(0x93, "OP_ADD", 1, opcode_add),
    op!(0x94, "OP_SUB", 1, opcode_sub),
    op!(0x95, "OP_MUL", 1, opcode_disabled),
    op!(0x96, "OP_DIV", 1, opcode_disabled),
    op!(0x97, "OP_MOD", 1, opcode_disabled),
    op!(0x98, "OP_LSHIFT", 1, opcode_disabled),
    op!(0x99, "OP_RSHIFT", 1, opcode_disabled),
    op!(0x9a, "OP_BOOLAND", 1, opcode_booland),
    op!(0x9b, "OP_BOOLOR", 1, opcode_boolor),
    op!(0x9c, "OP_NUMEQUAL", 1, opcode_numequal),
    op!(0x9d, "OP_NUMEQUALVERIFY", 1, opcode_numequal_verify),
    op!(0x9e, "OP_NUMNOTEQUAL", 1, opcode_numnotequal),
    op!(0x9f, "OP_LESSTHAN", 1, opcode_lessthan),
    op!(0xa0, "OP_GREATERTHAN", 1, opcode_greaterthan),
    op!(0xa1, "OP_LESSTHANOREQUAL", 1, opcode_lessthanorequal),
    op!(0xa2, "OP_GREATERTHANOREQUAL", 1, opcode_greaterthanorequal),
    op!(0xa3, "OP_MIN", 1, opcode_min),
    op!(0xa4, "OP_MAX", 1, opcode_max),
    op!(0xa5, "OP_WITHIN", 1, opcode_within),
    op!(0xa6, "OP_UNKNOWN166", 1, opcode_invalid),
    op!(0xa7, "OP_UNKNOWN167", 1, opcode_invalid),
    op!(0xa8, "OP_SHA256", 1, opcode_sha256),
    op!(0xa9, "OP_CHECKMULTISIGECDSA", 1, opcode_checkmultisig_ecdsa),
    op!(0xaa, "OP_BLAKE2B", 1, opcode_blake2b),
    op!(0xab, "OP_CHECKSIGECDSA", 1, opcode_checksig_ecdsa),
    op!(0xac, "OP_CHECKSIG", 1, opcode_checksig),
    op!(0xad, "OP_CHECKSIGVERIFY", 1, opcode_checksig_verify),
    op!(0xae, "OP_CHECKMULTISIG", 1, opcode_checkmultisig),
    op!(0xaf, "OP_CHECKMULTISIGVERIFY", 1, opcode_checkmultisig_verify),
    op!(0xb0, "OP_NOP1", 1, opcode_nop),
    op!(0xb1, "OP_CHECKLOCKTIMEVERIFY", 1, opcode_check_lock_time_verify),
    op!(0xb2, "OP_CHECKSEQUENCEVERIFY", 1, opcode_check_sequence_verify),
    op!(0xb3, "OP_NOP4", 1, opcode_nop),
    op!(0xb4, "OP_NOP5", 1, opcode_nop),
    op!(0xb5, "OP_NOP6", 1, opcode_nop),
    op!(0xb6, "OP_NOP7", 1, opcode_nop),
    op!(0xb7, "OP_NOP8", 1, opcode_nop),
    op!(0xb8, "OP_NOP9", 1, opcode_nop),
    op!(0xb9, "OP_NOP10", 1, opcode_nop),
    op!(0xba, "OP_UNKNOWN186", 1, opcode_invalid),
    op!(0xbb, "OP_UNKNOWN187", 1, opcode_invalid),
    op!(0xbc, "OP_UNKNOWN188", 1, opcode_invalid),
    op!(0xbd, "OP_UNKNOWN189", 1, opcode_invalid),
    op!(0xbe, "OP_UNKNOWN190", 1, opcode_invalid),
    op!(0xbf, "OP_UNKNOWN191", 1, opcode_invalid),
    op!(0xc0, "OP_UNKNOWN192", 1, opcode_invalid),
    op!(0xc1, "OP_UNKNOWN193", 1, opcode_invalid),
    op!(0xc2, "OP_UNKNOWN194", 1, opcode_invalid),
    op!(0xc3, "OP_UNKNOWN195", 1, opcode_invalid),
    op!(0xc4, "OP_UNKNOWN196", 1, opcode_invalid),
    op!(0xc5, "OP_UNKNOWN197", 1, opcode_invalid),
    op!(0xc6, "OP_UNKNOWN198", 1, opcode_invalid),
    op!(0xc7, "OP_UNKNOWN199", 1, opcode_invalid),
    op!(0xc8, "OP_UNKNOWN200", 1, opcode_invalid),
    op!(0xc9, "OP_UNKNOWN201", 1, opcode_invalid),
    op!(0xca, "OP_UNKNOWN202", 1, opcode_invalid),
    op!(0xcb, "OP_UNKNOWN203", 1, opcode_invalid),
    op!(0xcc, "OP_UNKNOWN204", 1, opcode_invalid),
    op!(0xcd, "OP_UNKNOWN205", 1, opcode_invalid),
    op!(0xce, "OP_UNKNOWN206", 1, opcode_invalid),
    op!(0xcf, "OP_UNKNOWN207", 1, opcode_invalid),
    op!(0xd0, "OP_UNKNOWN208", 1, opcode_invalid),
    op!(0xd1, "OP_UNKNOWN209", 1, opcode_invalid),
    op!(0xd2, "OP_UNKNOWN210", 1, opcode_invalid),
    op!(0xd3, "OP_UNKNOWN211", 1, opcode_invalid),
    op!(0xd4, "OP_UNKNOWN212", 1, opcode_invalid),
    op!(0xd5, "OP_UNKNOWN213", 1, opcode_invalid),
    op!(0xd6, "OP_UNKNOWN214", 1, opcode_invalid),
    op!(0xd7, "OP_UNKNOWN215", 1, opcode_invalid),
    op!(0xd8, "OP_UNKNOWN216", 1, opcode_invalid),
    op!(0xd9, "OP_UNKNOWN217", 1, opcode_invalid),
    op!(0xda, "OP_UNKNOWN218", 1, opcode_invalid),
    op!(0xdb, "OP_UNKNOWN219", 1, opcode_invalid),
    op!(0xdc, "OP_UNKNOWN220", 1, opcode_invalid),
    op!(0xdd, "OP_UNKNOWN221", 1, opcode_invalid),
    op!(0xde, "OP_UNKNOWN222", 1, opcode_invalid),
    op!(0xdf, "OP_UNKNOWN223", 1, opcode_invalid),
    op!(0xe0, "OP_UNKNOWN224", 1, opcode_invalid),
    op!(0xe1, "OP_UNKNOWN225", 1, opcode_invalid),
    op!(0xe2, "OP_UNKNOWN226", 1, opcode_invalid),
    op!(0xe3, "OP_UNKNOWN227", 1, opcode_invalid),
    op!(0xe4, "OP_UNKNOWN228", 1, opcode_invalid),
    op!(0xe5, "OP_UNKNOWN229", 1, opcode_invalid),
    op!(0xe6, "OP_UNKNOWN230", 1, opcode_invalid),
    op!(0xe7, "OP_UNKNOWN231", 1, opcode_invalid),
    op!(0xe8, "OP_UNKNOWN232", 1, opcode_invalid),
    op!(0xe9, "OP_UNKNOWN233", 1, opcode_invalid),
    op!(0xea, "OP_UNKNOWN234", 1, opcode_invalid),
    op!(0xeb, "OP_UNKNOWN235", 1, opcode_invalid),
    op!(0xec, "OP_UNKNOWN236", 1, opcode_invalid),
    op!(0xed, "OP_UNKNOWN237", 1, opcode_invalid),
    op!(0xee, "OP_UNKNOWN238", 1, opcode_invalid),
    op!(0xef, "OP_UNKNOWN239", 1, opcode_invalid),
    op!(0xf0, "OP_UNKNOWN240", 1, opcode_invalid),
    op!(0xf1, "OP_UNKNOWN241", 1, opcode_invalid),
    op!(0xf2, "OP_UNKNOWN242", 1, opcode_invalid),
    op!(0xf3, "OP_UNKNOWN243", 1, opcode_invalid),
    op!(0xf4, "OP_UNKNOWN244", 1, opcode_invalid),
    op!(0xf5, "OP_UNKNOWN245", 1, opcode_invalid),
    op!(0xf6, "OP_UNKNOWN246", 1, opcode_invalid),
    op!(0xf7, "OP_UNKNOWN247", 1, opcode_invalid),
    op!(0xf8, "OP_UNKNOWN248", 1, opcode_invalid),
    op!(0xf9, "OP_UNKNOWN249", 1, opcode_invalid),
    op!(0xfa, "OP_SMALLINTEGER", 1, opcode_invalid),
    op!(0xfb, "OP_PUBKEYS", 1, opcode_invalid),
    op!(0xfc, "OP_UNKNOWN252", 1, opcode_invalid),
    op!(0xfd, "OP_PUBKEYHASH", 1, opcode_invalid),
    op!(0xfe, "OP_PUBKEY", 1, opcode_invalid),
    op!(0xff, "OP_INVALIDOPCODE", 1, opcode_invalid),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_values_match_indices() {
        for (i, entry) in OPCODE_TABLE.iter().enumerate() {
            assert_eq!(entry.value as usize, i, "entry {} carries value {:#x}", i, entry.value);
        }
    }

    #[test]
    fn test_data_push_lengths() {
        // OP_DATA_N occupies the opcode byte plus N data bytes
        for value in OP_DATA_1..=OP_DATA_75 {
            assert_eq!(OPCODE_TABLE[value as usize].length, value as i32 + 1);
        }
        assert_eq!(OPCODE_TABLE[OP_PUSHDATA1 as usize].length, -1);
        assert_eq!(OPCODE_TABLE[OP_PUSHDATA2 as usize].length, -2);
        assert_eq!(OPCODE_TABLE[OP_PUSHDATA4 as usize].length, -4);
    }

    #[test]
    fn test_opcode_classes() {
        assert!(OPCODE_TABLE[OP_CAT as usize].is_disabled());
        assert!(OPCODE_TABLE[OP_MUL as usize].is_disabled());
        assert!(!OPCODE_TABLE[OP_ADD as usize].is_disabled());
        assert!(OPCODE_TABLE[OP_VERIF as usize].always_illegal());
        assert!(OPCODE_TABLE[OP_VERNOTIF as usize].always_illegal());
        assert!(!OPCODE_TABLE[OP_VER as usize].always_illegal());
        assert!(OPCODE_TABLE[OP_IF as usize].is_conditional());
        assert!(OPCODE_TABLE[OP_RESERVED as usize].is_push_opcode());
        assert!(OPCODE_TABLE[OP_16 as usize].is_push_opcode());
        assert!(!OPCODE_TABLE[OP_NOP as usize].is_push_opcode());
    }

    #[test]
    fn test_to_small_int() {
        assert_eq!(to_small_int(OP_FALSE), 0);
        assert_eq!(to_small_int(OP_1), 1);
        assert_eq!(to_small_int(OP_16), 16);
    }
}
