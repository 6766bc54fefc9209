//! Construction of the standard script templates.

use crate::error::ScriptBuilderError;
use crate::opcodes::codes;
use crate::script_builder::ScriptBuilder;
use crate::types::{Hash, ScriptPublicKey};
use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};

/// BLAKE2b-256, the digest committing a P2SH output to its redeem script.
pub fn blake2b_256(data: &[u8]) -> Hash {
    Blake2b::<U32>::digest(data).into()
}

/// Builds the locking script paying to the hash of `redeem_script`:
/// `OP_BLAKE2B OP_DATA_32 <hash> OP_EQUAL`.
pub fn pay_to_script_hash_script(redeem_script: &[u8]) -> ScriptPublicKey {
    let hash = blake2b_256(redeem_script);
    let mut script = Vec::with_capacity(35);
    script.push(codes::OP_BLAKE2B);
    script.push(codes::OP_DATA_32);
    script.extend_from_slice(&hash);
    script.push(codes::OP_EQUAL);
    ScriptPublicKey::new(0, script)
}

/// Builds the signature script redeeming a P2SH output: the unlocking
/// pushes followed by the serialized redeem script itself.
pub fn pay_to_script_hash_signature_script(
    redeem_script: &[u8],
    signature: &[u8],
) -> Result<Vec<u8>, ScriptBuilderError> {
    let mut builder = ScriptBuilder::new();
    builder.add_data(signature)?;
    builder.add_data(redeem_script)?;
    Ok(builder.drain())
}

/// `OP_DATA_32 <schnorr pubkey> OP_CHECKSIG`
pub fn pay_to_pub_key(pub_key: &[u8; 32]) -> ScriptPublicKey {
    let mut script = Vec::with_capacity(34);
    script.push(codes::OP_DATA_32);
    script.extend_from_slice(pub_key);
    script.push(codes::OP_CHECKSIG);
    ScriptPublicKey::new(0, script)
}

/// `OP_DATA_33 <ecdsa pubkey> OP_CHECKSIGECDSA`
pub fn pay_to_pub_key_ecdsa(pub_key: &[u8; 33]) -> ScriptPublicKey {
    let mut script = Vec::with_capacity(35);
    script.push(codes::OP_DATA_33);
    script.extend_from_slice(pub_key);
    script.push(codes::OP_CHECKSIGECDSA);
    ScriptPublicKey::new(0, script)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script_class::{is_pay_to_pub_key, is_pay_to_pub_key_ecdsa, is_pay_to_script_hash};

    #[test]
    fn test_p2sh_script_matches_pattern() {
        let spk = pay_to_script_hash_script(&[codes::OP_TRUE]);
        assert!(is_pay_to_script_hash(spk.script()));
    }

    #[test]
    fn test_p2sh_commits_to_redeem_script() {
        let a = pay_to_script_hash_script(&[codes::OP_TRUE]);
        let b = pay_to_script_hash_script(&[codes::OP_2]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_pay_to_pub_key_templates() {
        assert!(is_pay_to_pub_key(pay_to_pub_key(&[0x11; 32]).script()));
        assert!(is_pay_to_pub_key_ecdsa(pay_to_pub_key_ecdsa(&[0x22; 33]).script()));
    }
}
