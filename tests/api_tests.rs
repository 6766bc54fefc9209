//! Public-surface tests: serialization round trips, static script
//! analysis, and consensus test vectors.

use anyhow::Result;
use blockdag_consensus::opcodes::codes::*;
use blockdag_consensus::*;

#[test]
fn test_transaction_serde_round_trip() -> Result<()> {
    let tx = Transaction::new(
        1,
        vec![TransactionInput::new(Outpoint::new([0xaa; 32], 3), vec![0x51], 17, 1)],
        vec![TransactionOutput::new(5_000, ScriptPublicKey::new(0, vec![0x51, 0xac]))],
        99,
        0,
        vec![1, 2, 3],
    );
    let json = serde_json::to_string(&tx)?;
    let decoded: Transaction = serde_json::from_str(&json)?;
    assert_eq!(decoded, tx);
    Ok(())
}

#[test]
fn test_utxo_entry_serde_round_trip() -> Result<()> {
    let entry = UtxoEntry::new(10_000, ScriptPublicKey::new(0, vec![0x51]), 42, false);
    let json = serde_json::to_string(&entry)?;
    let decoded: UtxoEntry = serde_json::from_str(&json)?;
    assert_eq!(decoded, entry);

    let outpoint = Outpoint::new([2; 32], 1);
    let json = serde_json::to_string(&outpoint)?;
    let decoded: Outpoint = serde_json::from_str(&json)?;
    assert_eq!(decoded, outpoint);
    Ok(())
}

#[test]
fn test_get_sig_op_count_vectors() -> Result<()> {
    struct TestVector<'a> {
        name: &'a str,
        signature_script: Vec<u8>,
        prev_script_public_key: ScriptPublicKey,
        expected_sig_ops: u64,
    }

    let script_hash = hex::decode("433ec2ac1ffa1b7b7d027f564529c57197f9ae88433ec2ac1ffa1b7b7d027f56")?;
    let mut p2sh = vec![OP_BLAKE2B, OP_DATA_32];
    p2sh.extend_from_slice(&script_hash);
    p2sh.push(OP_EQUAL);
    let prev_p2sh = ScriptPublicKey::new(0, p2sh);

    let tests = [
        TestVector {
            name: "signature script does not parse",
            signature_script: vec![OP_PUSHDATA1, 0x02],
            prev_script_public_key: prev_p2sh.clone(),
            expected_sig_ops: 0,
        },
        TestVector {
            name: "signature script is not push only",
            signature_script: vec![OP_TRUE, OP_DUP],
            prev_script_public_key: prev_p2sh.clone(),
            expected_sig_ops: 0,
        },
        TestVector {
            name: "empty signature script",
            signature_script: Vec::new(),
            prev_script_public_key: prev_p2sh.clone(),
            expected_sig_ops: 0,
        },
        TestVector {
            name: "embedded script does not parse",
            signature_script: vec![OP_DATA_2, OP_PUSHDATA1, 0x02],
            prev_script_public_key: prev_p2sh.clone(),
            expected_sig_ops: 0,
        },
        TestVector {
            name: "p2sh embedding a 2-of-3 multisig",
            signature_script: {
                // sig pushes followed by the redeem script
                let mut redeem = ScriptBuilder::new();
                redeem.add_op(OP_2).unwrap();
                for seed in [1u8, 2, 3] {
                    redeem.add_data(&[seed; 32]).unwrap();
                }
                redeem.add_op(OP_3).unwrap();
                redeem.add_op(OP_CHECKMULTISIG).unwrap();

                let mut builder = ScriptBuilder::new();
                builder.add_data(&[0xab; 65]).unwrap();
                builder.add_data(redeem.script()).unwrap();
                builder.drain()
            },
            prev_script_public_key: prev_p2sh.clone(),
            expected_sig_ops: 3,
        },
        TestVector {
            name: "partially parseable script public key",
            signature_script: Vec::new(),
            prev_script_public_key: ScriptPublicKey::new(0, vec![OP_CHECKSIG, OP_CHECKSIG, OP_DATA_1]),
            expected_sig_ops: 2,
        },
        TestVector {
            name: "pay to pub key",
            signature_script: {
                let mut builder = ScriptBuilder::new();
                builder.add_data(&[0xcd; 65]).unwrap();
                builder.drain()
            },
            prev_script_public_key: pay_to_pub_key(&[0x8a; 32]),
            expected_sig_ops: 1,
        },
    ];

    for test in tests {
        assert_eq!(
            get_sig_op_count(&test.signature_script, &test.prev_script_public_key),
            test.expected_sig_ops,
            "failed for '{}'",
            test.name
        );
    }
    Ok(())
}

#[test]
fn test_is_unspendable_vectors() {
    // leading OP_RETURN makes the output prunable on arrival
    assert!(is_unspendable(&[0x6a, 0x04, 0x74, 0x65, 0x73, 0x74]));
    // spendable pay-to-pub-key
    assert!(!is_unspendable(pay_to_pub_key(&[0x29; 32]).script()));
    // malformed scripts can never be spent either
    assert!(is_unspendable(&[OP_PUSHDATA1, 0x10]));
}

#[test]
fn test_script_class_of_standard_templates() {
    assert_eq!(ScriptClass::from_script(pay_to_pub_key(&[1; 32]).script()), ScriptClass::PubKey);
    assert_eq!(ScriptClass::from_script(pay_to_pub_key_ecdsa(&[2; 33]).script()), ScriptClass::PubKeyEcdsa);
    assert_eq!(
        ScriptClass::from_script(pay_to_script_hash_script(&[0x51]).script()),
        ScriptClass::ScriptHash
    );
    assert_eq!(ScriptClass::from_script(&[0x51]), ScriptClass::NonStandard);
}

#[test]
fn test_signature_cache_eviction_property() {
    let capacity = 32;
    let cache = SignatureCache::new(capacity);
    for n in 0..capacity as u8 {
        cache.insert(
            SigCacheKey {
                message: [n; 32],
                signature: [n; 64],
                public_key: CachedPublicKey::Schnorr([n; 32]),
            },
            true,
        );
    }
    assert_eq!(cache.len(), capacity);

    let extra = SigCacheKey {
        message: [0xee; 32],
        signature: [0xee; 64],
        public_key: CachedPublicKey::Schnorr([0xee; 32]),
    };
    cache.insert(extra.clone(), false);
    assert_eq!(cache.len(), capacity);
    assert_eq!(cache.get(&extra), Some(false));
}
