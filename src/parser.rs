//! Script parsing.
//!
//! Decodes a raw byte script into a sequence of parsed opcodes by walking
//! the dispatch table's push-length rules. A push whose declared length
//! exceeds the remaining buffer (including length prefixes that would
//! overflow) is rejected as malformed.

use crate::opcodes::{codes, OpcodeEntry, OPCODE_TABLE};
use crate::error::ScriptError;

/// An opcode decoded from a script together with its push payload (empty
/// for non-push opcodes). Ephemeral: produced per script per execution.
#[derive(Clone)]
pub struct ParsedOpcode {
    pub opcode: &'static OpcodeEntry,
    pub data: Vec<u8>,
}

impl std::fmt::Debug for ParsedOpcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.disasm())
    }
}

impl ParsedOpcode {
    pub fn value(&self) -> u8 {
        self.opcode.value
    }

    pub fn name(&self) -> &'static str {
        self.opcode.name
    }

    pub fn is_push_opcode(&self) -> bool {
        self.opcode.is_push_opcode()
    }

    pub fn is_conditional(&self) -> bool {
        self.opcode.is_conditional()
    }

    pub fn is_disabled(&self) -> bool {
        self.opcode.is_disabled()
    }

    pub fn always_illegal(&self) -> bool {
        self.opcode.always_illegal()
    }

    /// Checks that the payload uses the smallest possible push opcode.
    pub fn check_minimal_data_push(&self) -> Result<(), ScriptError> {
        let data_len = self.data.len();
        let opcode = self.opcode.value;

        if data_len == 0 {
            if opcode != codes::OP_FALSE {
                return Err(ScriptError::NotMinimalData(format!(
                    "zero length data push is encoded with opcode {} instead of OP_0",
                    self.opcode.name
                )));
            }
        } else if data_len == 1 && (1..=16).contains(&self.data[0]) {
            if opcode != codes::OP_1 + self.data[0] - 1 {
                return Err(ScriptError::NotMinimalData(format!(
                    "data push of the value {} encoded with opcode {} instead of OP_{}",
                    self.data[0], self.opcode.name, self.data[0]
                )));
            }
        } else if data_len == 1 && self.data[0] == 0x81 {
            if opcode != codes::OP_1NEGATE {
                return Err(ScriptError::NotMinimalData(format!(
                    "data push of the value -1 encoded with opcode {} instead of OP_1NEGATE",
                    self.opcode.name
                )));
            }
        } else if data_len <= 75 {
            if opcode as usize != data_len {
                return Err(ScriptError::NotMinimalData(format!(
                    "data push of {} bytes encoded with opcode {} instead of OP_DATA_{}",
                    data_len, self.opcode.name, data_len
                )));
            }
        } else if data_len <= 255 {
            if opcode != codes::OP_PUSHDATA1 {
                return Err(ScriptError::NotMinimalData(format!(
                    "data push of {} bytes encoded with opcode {} instead of OP_PUSHDATA1",
                    data_len, self.opcode.name
                )));
            }
        } else if data_len <= 65535 && opcode != codes::OP_PUSHDATA2 {
            return Err(ScriptError::NotMinimalData(format!(
                "data push of {} bytes encoded with opcode {} instead of OP_PUSHDATA2",
                data_len, self.opcode.name
            )));
        }
        Ok(())
    }

    /// Human-readable rendering for execution traces.
    pub fn disasm(&self) -> String {
        if self.data.is_empty() {
            self.opcode.name.to_string()
        } else {
            let hex: String = self.data.iter().map(|b| format!("{:02x}", b)).collect();
            format!("{} 0x{}", self.opcode.name, hex)
        }
    }
}

/// Iterator decoding one opcode at a time. Stops after yielding the first
/// malformed push, which allows callers like signature-operation counting
/// to use the valid prefix of a partially parseable script.
pub struct ScriptIterator<'s> {
    script: &'s [u8],
    offset: usize,
    failed: bool,
}

impl Iterator for ScriptIterator<'_> {
    type Item = Result<ParsedOpcode, ScriptError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.offset >= self.script.len() {
            return None;
        }
        let script = self.script;
        let i = self.offset;
        let entry = &OPCODE_TABLE[script[i] as usize];
        let result = match entry.length {
            1 => {
                self.offset = i + 1;
                Ok(ParsedOpcode { opcode: entry, data: Vec::new() })
            }
            length if length > 1 => {
                let length = length as usize;
                if script.len() - i < length {
                    Err(ScriptError::MalformedPush(length, script.len() - i))
                } else {
                    self.offset = i + length;
                    Ok(ParsedOpcode { opcode: entry, data: script[i + 1..i + length].to_vec() })
                }
            }
            prefix => {
                // Negative lengths denote a little-endian length prefix of
                // -prefix bytes following the opcode.
                let prefix_len = (-prefix) as usize;
                let off = i + 1;
                if script.len() - off < prefix_len {
                    Err(ScriptError::MalformedPush(prefix_len, script.len() - off))
                } else {
                    let mut data_len = 0usize;
                    for (j, byte) in script[off..off + prefix_len].iter().enumerate() {
                        data_len |= (*byte as usize) << (8 * j);
                    }
                    let data_off = off + prefix_len;
                    if script.len() - data_off < data_len {
                        Err(ScriptError::MalformedPush(data_len, script.len() - data_off))
                    } else {
                        self.offset = data_off + data_len;
                        Ok(ParsedOpcode { opcode: entry, data: script[data_off..data_off + data_len].to_vec() })
                    }
                }
            }
        };
        if result.is_err() {
            self.failed = true;
        }
        Some(result)
    }
}

/// Walks a script opcode by opcode.
pub fn iter_script(script: &[u8]) -> ScriptIterator<'_> {
    ScriptIterator { script, offset: 0, failed: false }
}

/// Decodes a full script into parsed opcodes.
pub fn parse_script(script: &[u8]) -> Result<Vec<ParsedOpcode>, ScriptError> {
    iter_script(script).collect()
}

/// Whether every opcode in the parsed script is a push operation.
pub fn is_push_only(parsed: &[ParsedOpcode]) -> bool {
    parsed.iter().all(|op| op.is_push_opcode())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opcodes::codes::*;

    #[test]
    fn test_parse_simple_opcodes() {
        let parsed = parse_script(&[OP_1, OP_DUP, OP_EQUAL]).unwrap();
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[0].name(), "OP_1");
        assert_eq!(parsed[1].name(), "OP_DUP");
        assert_eq!(parsed[2].name(), "OP_EQUAL");
    }

    #[test]
    fn test_parse_direct_push() {
        let parsed = parse_script(&[0x03, 0xaa, 0xbb, 0xcc]).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].data, vec![0xaa, 0xbb, 0xcc]);
    }

    #[test]
    fn test_parse_pushdata1() {
        let mut script = vec![OP_PUSHDATA1, 76];
        script.extend(std::iter::repeat(0x11).take(76));
        let parsed = parse_script(&script).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].data.len(), 76);
    }

    #[test]
    fn test_parse_pushdata2() {
        let mut script = vec![OP_PUSHDATA2, 0x00, 0x01]; // 256, little endian
        script.extend(std::iter::repeat(0x22).take(256));
        let parsed = parse_script(&script).unwrap();
        assert_eq!(parsed[0].data.len(), 256);
    }

    #[test]
    fn test_truncated_direct_push() {
        assert!(matches!(parse_script(&[0x03, 0xaa]), Err(ScriptError::MalformedPush(3, 2))));
    }

    #[test]
    fn test_truncated_length_prefix() {
        // OP_PUSHDATA2 with only one length byte
        assert!(matches!(parse_script(&[OP_PUSHDATA2, 0x02]), Err(ScriptError::MalformedPush(2, 1))));
    }

    #[test]
    fn test_declared_length_past_buffer() {
        assert!(matches!(parse_script(&[OP_PUSHDATA1, 0x05, 0x01]), Err(ScriptError::MalformedPush(5, 1))));
    }

    #[test]
    fn test_pushdata4_huge_length_rejected() {
        // Length prefix of u32::MAX must not wrap the cursor
        let script = vec![OP_PUSHDATA4, 0xff, 0xff, 0xff, 0xff, 0x00];
        assert!(matches!(parse_script(&script), Err(ScriptError::MalformedPush(_, _))));
    }

    #[test]
    fn test_minimal_push_check() {
        // one byte value 15 pushed with OP_DATA_1 instead of OP_15
        let parsed = parse_script(&[OP_DATA_1, 0x0f]).unwrap();
        assert!(matches!(parsed[0].check_minimal_data_push(), Err(ScriptError::NotMinimalData(_))));

        // 3 arbitrary bytes via OP_DATA_3 is minimal
        let parsed = parse_script(&[0x03, 0xaa, 0xbb, 0xcc]).unwrap();
        assert!(parsed[0].check_minimal_data_push().is_ok());

        // 3 bytes via OP_PUSHDATA1 is not
        let parsed = parse_script(&[OP_PUSHDATA1, 0x03, 0xaa, 0xbb, 0xcc]).unwrap();
        assert!(matches!(parsed[0].check_minimal_data_push(), Err(ScriptError::NotMinimalData(_))));
    }

    #[test]
    fn test_is_push_only() {
        let parsed = parse_script(&[OP_1, OP_DATA_1, 0xab, OP_16]).unwrap();
        assert!(is_push_only(&parsed));
        let parsed = parse_script(&[OP_1, OP_DUP]).unwrap();
        assert!(!is_push_only(&parsed));
    }

    #[test]
    fn test_disasm() {
        let parsed = parse_script(&[OP_DATA_2, 0x12, 0x34]).unwrap();
        assert_eq!(parsed[0].disasm(), "OP_DATA_2 0x1234");
    }
}
