//! Script number codec.
//!
//! Numbers on the stack are signed, little-endian, sign-and-magnitude
//! encoded byte strings: the high bit of the last byte is the sign. The
//! encoding must be minimal when consumed - no trailing zero bytes beyond
//! what the sign bit requires. General arithmetic accepts at most 4 bytes;
//! the lock-time opcodes accept 5.

use crate::error::ScriptError;

/// Decodes a byte string into a signed script number.
///
/// `max_num_len` bounds the accepted input length; results of arithmetic may
/// re-serialize wider than the input bound, which is fine - the limit only
/// constrains operands.
pub fn deserialize_script_num(v: &[u8], require_minimal: bool, max_num_len: usize) -> Result<i64, ScriptError> {
    if v.len() > max_num_len {
        return Err(ScriptError::NumberTooBig(v.len(), max_num_len));
    }

    if require_minimal {
        check_minimal_num_encoding(v)?;
    }

    if v.is_empty() {
        return Ok(0);
    }

    let mut result: i64 = 0;
    for (i, byte) in v.iter().enumerate() {
        result |= (*byte as i64) << (8 * i);
    }

    // The most significant bit of the last byte is the sign bit.
    if v[v.len() - 1] & 0x80 != 0 {
        let mask = !((0x80_i64) << (8 * (v.len() - 1)));
        result = -(result & mask);
    }

    Ok(result)
}

/// Serializes a signed number to its minimal script encoding. Zero encodes
/// to the empty byte string.
pub fn serialize_script_num(val: i64) -> Vec<u8> {
    if val == 0 {
        return Vec::new();
    }

    let is_negative = val < 0;
    let mut abs = val.unsigned_abs();

    let mut result = Vec::with_capacity(9);
    while abs > 0 {
        result.push((abs & 0xff) as u8);
        abs >>= 8;
    }

    // When the high bit of the last magnitude byte is already set, an extra
    // byte is needed to carry the sign; otherwise the sign shares the byte.
    let last = result.len() - 1;
    if result[last] & 0x80 != 0 {
        result.push(if is_negative { 0x80 } else { 0x00 });
    } else if is_negative {
        result[last] |= 0x80;
    }

    result
}

fn check_minimal_num_encoding(v: &[u8]) -> Result<(), ScriptError> {
    if v.is_empty() {
        return Ok(());
    }
    // A trailing byte carrying nothing but a possible sign bit is only
    // allowed when the preceding byte needs it for its own high bit.
    if v[v.len() - 1] & 0x7f == 0 && (v.len() == 1 || v[v.len() - 2] & 0x80 == 0) {
        return Err(ScriptError::NotMinimalData(format!("number is not minimally encoded: {:x?}", v)));
    }
    Ok(())
}
