//! Canonical script construction.
//!
//! The builder always emits the smallest possible push for the data it is
//! given, so scripts it produces pass minimal-encoding enforcement when
//! executed.

use crate::constants::{MAX_SCRIPTS_SIZE, MAX_SCRIPT_ELEMENT_SIZE};
use crate::error::ScriptBuilderError;
use crate::opcodes::codes;
use crate::script_num::serialize_script_num;

#[derive(Debug, Default)]
pub struct ScriptBuilder {
    script: Vec<u8>,
}

/// Byte cost of the canonical push of the given data.
fn canonical_data_size(data: &[u8]) -> usize {
    let len = data.len();
    // Values encodable as OP_0, OP_1..OP_16 or OP_1NEGATE are a single opcode.
    if len == 0 || (len == 1 && ((1..=16).contains(&data[0]) || data[0] == 0x81)) {
        return 1;
    }
    if len <= codes::OP_DATA_75 as usize {
        1 + len
    } else if len <= u8::MAX as usize {
        2 + len
    } else if len <= u16::MAX as usize {
        3 + len
    } else {
        5 + len
    }
}

impl ScriptBuilder {
    pub fn new() -> Self {
        Self { script: Vec::new() }
    }

    pub fn script(&self) -> &[u8] {
        &self.script
    }

    /// Consumes the builder, returning the accumulated script.
    pub fn drain(self) -> Vec<u8> {
        self.script
    }

    pub fn add_op(&mut self, opcode: u8) -> Result<&mut Self, ScriptBuilderError> {
        if self.script.len() + 1 > MAX_SCRIPTS_SIZE {
            return Err(ScriptBuilderError::OpcodeRejected(MAX_SCRIPTS_SIZE));
        }
        self.script.push(opcode);
        Ok(self)
    }

    pub fn add_ops(&mut self, opcodes: &[u8]) -> Result<&mut Self, ScriptBuilderError> {
        if self.script.len() + opcodes.len() > MAX_SCRIPTS_SIZE {
            return Err(ScriptBuilderError::OpcodeRejected(MAX_SCRIPTS_SIZE));
        }
        self.script.extend_from_slice(opcodes);
        Ok(self)
    }

    /// Pushes data using its minimal encoding. Single elements above the
    /// 520-byte element limit are rejected since they could never be
    /// pushed at execution time anyway.
    pub fn add_data(&mut self, data: &[u8]) -> Result<&mut Self, ScriptBuilderError> {
        if data.len() > MAX_SCRIPT_ELEMENT_SIZE {
            return Err(ScriptBuilderError::ElementExceedsMaxSize(data.len(), MAX_SCRIPT_ELEMENT_SIZE));
        }
        let size = canonical_data_size(data);
        if self.script.len() + size > MAX_SCRIPTS_SIZE {
            return Err(ScriptBuilderError::ElementExceedsMaxSize(data.len(), MAX_SCRIPTS_SIZE));
        }
        self.push_canonical(data);
        Ok(self)
    }

    pub fn add_i64(&mut self, val: i64) -> Result<&mut Self, ScriptBuilderError> {
        // Small integers and -1 have dedicated opcodes.
        if val == 0 {
            return self.add_op(codes::OP_FALSE);
        }
        if val == -1 {
            return self.add_op(codes::OP_1NEGATE);
        }
        if (1..=16).contains(&val) {
            return self.add_op(codes::OP_1 + (val - 1) as u8);
        }
        let data = serialize_script_num(val);
        self.add_data(&data)
    }

    fn push_canonical(&mut self, data: &[u8]) {
        let len = data.len();
        if len == 0 {
            self.script.push(codes::OP_FALSE);
            return;
        }
        if len == 1 {
            if (1..=16).contains(&data[0]) {
                self.script.push(codes::OP_1 + data[0] - 1);
                return;
            }
            if data[0] == 0x81 {
                self.script.push(codes::OP_1NEGATE);
                return;
            }
        }
        if len <= codes::OP_DATA_75 as usize {
            self.script.push(len as u8);
        } else if len <= u8::MAX as usize {
            self.script.push(codes::OP_PUSHDATA1);
            self.script.push(len as u8);
        } else if len <= u16::MAX as usize {
            self.script.push(codes::OP_PUSHDATA2);
            self.script.extend_from_slice(&(len as u16).to_le_bytes());
        } else {
            self.script.push(codes::OP_PUSHDATA4);
            self.script.extend_from_slice(&(len as u32).to_le_bytes());
        }
        self.script.extend_from_slice(data);
    }
}
