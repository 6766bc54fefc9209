//! Standard locking-script classification and static script analysis.

use crate::constants::MAX_PUB_KEYS_PER_MULTISIG;
use crate::opcodes::{codes, to_small_int};
use crate::parser::{iter_script, ParsedOpcode};
use crate::types::ScriptPublicKey;

/// The standard locking-script templates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptClass {
    /// No recognized form
    NonStandard,
    /// Pay to a 32-byte Schnorr public key
    PubKey,
    /// Pay to a 33-byte ECDSA public key
    PubKeyEcdsa,
    /// Pay to a BLAKE2b-256 hash of a redeem script
    ScriptHash,
}

impl ScriptClass {
    pub fn from_script(script: &[u8]) -> ScriptClass {
        if is_pay_to_pub_key(script) {
            ScriptClass::PubKey
        } else if is_pay_to_pub_key_ecdsa(script) {
            ScriptClass::PubKeyEcdsa
        } else if is_pay_to_script_hash(script) {
            ScriptClass::ScriptHash
        } else {
            ScriptClass::NonStandard
        }
    }
}

/// `OP_DATA_32 <32-byte pubkey> OP_CHECKSIG`
pub fn is_pay_to_pub_key(script: &[u8]) -> bool {
    script.len() == 34 && script[0] == codes::OP_DATA_32 && script[33] == codes::OP_CHECKSIG
}

/// `OP_DATA_33 <33-byte pubkey> OP_CHECKSIGECDSA`
pub fn is_pay_to_pub_key_ecdsa(script: &[u8]) -> bool {
    script.len() == 35 && script[0] == codes::OP_DATA_33 && script[34] == codes::OP_CHECKSIGECDSA
}

/// `OP_BLAKE2B OP_DATA_32 <32-byte hash> OP_EQUAL` - the P2SH pattern
pub fn is_pay_to_script_hash(script: &[u8]) -> bool {
    script.len() == 35
        && script[0] == codes::OP_BLAKE2B
        && script[1] == codes::OP_DATA_32
        && script[34] == codes::OP_EQUAL
}

/// Counts the signature operations a script would execute, for the static
/// per-transaction sigop budget. For a P2SH spend the count comes from the
/// embedded redeem script carried by the signature script.
pub fn get_sig_op_count(signature_script: &[u8], prev_script_public_key: &ScriptPublicKey) -> u64 {
    let is_p2sh = is_pay_to_script_hash(prev_script_public_key.script());
    if !is_p2sh {
        let ops: Vec<_> = iter_script(prev_script_public_key.script()).collect();
        return sig_op_count_from_opcodes(&ops);
    }

    let signature_script_ops: Vec<_> = iter_script(signature_script).collect();
    if signature_script_ops.is_empty()
        || signature_script_ops.iter().any(|op| op.is_err() || !op.as_ref().expect("checked err").is_push_opcode())
    {
        return 0;
    }

    let redeem_script = signature_script_ops
        .last()
        .expect("checked non-empty")
        .as_ref()
        .expect("checked err above")
        .data
        .clone();
    let ops: Vec<_> = iter_script(&redeem_script).collect();
    sig_op_count_from_opcodes(&ops)
}

fn sig_op_count_from_opcodes(opcodes: &[Result<ParsedOpcode, crate::error::ScriptError>]) -> u64 {
    let mut num_sigs: u64 = 0;
    for (i, op) in opcodes.iter().enumerate() {
        let op = match op {
            Ok(op) => op,
            // The valid prefix still counts.
            Err(_) => return num_sigs,
        };
        match op.value() {
            codes::OP_CHECKSIG | codes::OP_CHECKSIGVERIFY | codes::OP_CHECKSIGECDSA => num_sigs += 1,
            codes::OP_CHECKMULTISIG | codes::OP_CHECKMULTISIGVERIFY | codes::OP_CHECKMULTISIGECDSA => {
                if i == 0 {
                    num_sigs += MAX_PUB_KEYS_PER_MULTISIG as u64;
                    continue;
                }
                let prev = opcodes[i - 1].as_ref().expect("prior entries were checked");
                if (codes::OP_1..=codes::OP_16).contains(&prev.value()) {
                    num_sigs += to_small_int(prev.value()) as u64;
                } else {
                    num_sigs += MAX_PUB_KEYS_PER_MULTISIG as u64;
                }
            }
            _ => {}
        }
    }
    num_sigs
}

/// Whether a locking script can never be spent, which allows the output to
/// be pruned from the UTXO set immediately.
pub fn is_unspendable(script: &[u8]) -> bool {
    iter_script(script)
        .enumerate()
        .any(|(index, op)| op.is_err() || (index == 0 && op.expect("checked err").value() == codes::OP_RETURN))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opcodes::codes::*;

    fn p2sh_script(hash: [u8; 32]) -> Vec<u8> {
        let mut script = vec![OP_BLAKE2B, OP_DATA_32];
        script.extend_from_slice(&hash);
        script.push(OP_EQUAL);
        script
    }

    #[test]
    fn test_p2sh_pattern() {
        assert!(is_pay_to_script_hash(&p2sh_script([0xab; 32])));
        // wrong terminal opcode
        let mut script = p2sh_script([0xab; 32]);
        *script.last_mut().unwrap() = OP_EQUALVERIFY;
        assert!(!is_pay_to_script_hash(&script));
        // wrong length
        assert!(!is_pay_to_script_hash(&[OP_BLAKE2B, OP_DATA_32, OP_EQUAL]));
    }

    #[test]
    fn test_script_class() {
        let mut pk = vec![OP_DATA_32];
        pk.extend_from_slice(&[0x11; 32]);
        pk.push(OP_CHECKSIG);
        assert_eq!(ScriptClass::from_script(&pk), ScriptClass::PubKey);

        let mut pk_ecdsa = vec![OP_DATA_33];
        pk_ecdsa.extend_from_slice(&[0x22; 33]);
        pk_ecdsa.push(OP_CHECKSIGECDSA);
        assert_eq!(ScriptClass::from_script(&pk_ecdsa), ScriptClass::PubKeyEcdsa);

        assert_eq!(ScriptClass::from_script(&p2sh_script([0x33; 32])), ScriptClass::ScriptHash);
        assert_eq!(ScriptClass::from_script(&[OP_TRUE]), ScriptClass::NonStandard);
    }

    #[test]
    fn test_sig_op_count_plain() {
        let spk = ScriptPublicKey::new(0, vec![OP_CHECKSIG, OP_CHECKSIG, OP_CHECKSIGVERIFY]);
        assert_eq!(get_sig_op_count(&[], &spk), 3);
    }

    #[test]
    fn test_sig_op_count_multisig() {
        // OP_2 ... OP_CHECKMULTISIG counts the announced key count
        let spk = ScriptPublicKey::new(0, vec![OP_2, OP_CHECKMULTISIG]);
        assert_eq!(get_sig_op_count(&[], &spk), 2);
        // leading multisig assumes the maximum
        let spk = ScriptPublicKey::new(0, vec![OP_CHECKMULTISIG]);
        assert_eq!(get_sig_op_count(&[], &spk), MAX_PUB_KEYS_PER_MULTISIG as u64);
    }

    #[test]
    fn test_sig_op_count_partially_parseable() {
        // two sigops before a truncated push
        let spk = ScriptPublicKey::new(0, vec![OP_CHECKSIG, OP_CHECKSIG, OP_DATA_1]);
        assert_eq!(get_sig_op_count(&[], &spk), 2);
    }

    #[test]
    fn test_sig_op_count_p2sh() {
        let spk = ScriptPublicKey::new(0, p2sh_script([0x44; 32]));
        // signature script pushing a redeem script with two checksigs
        let signature_script = vec![OP_DATA_2, OP_CHECKSIG, OP_CHECKSIG];
        assert_eq!(get_sig_op_count(&signature_script, &spk), 2);
        // non-push-only signature script contributes nothing
        assert_eq!(get_sig_op_count(&[OP_TRUE, OP_DUP], &spk), 0);
        // empty signature script contributes nothing
        assert_eq!(get_sig_op_count(&[], &spk), 0);
    }

    #[test]
    fn test_is_unspendable() {
        assert!(is_unspendable(&[OP_RETURN, 0x04, 0x74, 0x65, 0x73, 0x74]));
        assert!(is_unspendable(&[OP_DATA_2, 0x01])); // malformed
        let mut spendable = vec![OP_DATA_32];
        spendable.extend_from_slice(&[0x55; 32]);
        spendable.push(OP_CHECKSIG);
        assert!(!is_unspendable(&spendable));
    }
}
