//! Behavioral tests for the script engine: termination conditions,
//! conditional execution, limits, and the non-signature opcode families.

use blockdag_consensus::opcodes::codes::*;
use blockdag_consensus::*;
use sha2::{Digest, Sha256};

struct TestHasher;

impl SignatureHasher for TestHasher {
    fn schnorr_signature_hash(&self, tx: &Transaction, input_index: usize, hash_type: SigHashType) -> Hash {
        let mut data = Vec::new();
        data.extend_from_slice(&tx.lock_time.to_le_bytes());
        data.extend_from_slice(&(input_index as u64).to_le_bytes());
        data.push(hash_type.to_u8());
        data.extend_from_slice(&tx.inputs[input_index].previous_outpoint.transaction_id);
        blake2b_256(&data)
    }

    fn ecdsa_signature_hash(&self, tx: &Transaction, input_index: usize, hash_type: SigHashType) -> Hash {
        let mut data = b"ecdsa".to_vec();
        data.extend_from_slice(&self.schnorr_signature_hash(tx, input_index, hash_type));
        blake2b_256(&data)
    }
}

fn transaction_with(signature_script: Vec<u8>, sequence: u64, lock_time: u64) -> Transaction {
    Transaction::new(
        0,
        vec![TransactionInput::new(Outpoint::new([3; 32], 1), signature_script, sequence, 1)],
        vec![TransactionOutput::new(1_000, ScriptPublicKey::new(0, vec![OP_TRUE]))],
        lock_time,
        0,
        Vec::new(),
    )
}

fn run(script_public_key: &[u8]) -> Result<(), ScriptError> {
    run_tx(&transaction_with(Vec::new(), MAX_TX_IN_SEQUENCE_NUM, 0), script_public_key)
}

fn run_tx(tx: &Transaction, script_public_key: &[u8]) -> Result<(), ScriptError> {
    let spk = ScriptPublicKey::new(0, script_public_key.to_vec());
    let sig_cache = SignatureCache::new(128);
    let mut engine = ScriptEngine::new(&spk, tx, 0, ScriptFlags::NONE, &sig_cache, &TestHasher)?;
    engine.execute()
}

#[test]
fn test_termination_behavior_table() {
    // one opcode leaving true
    assert_eq!(run(&[OP_TRUE]), Ok(()));
    // a nop leaves nothing behind
    assert_eq!(run(&[OP_NOP]), Err(ScriptError::EmptyStack));
    // two leftover items violate the clean stack rule
    assert_eq!(run(&[OP_TRUE, OP_TRUE]), Err(ScriptError::CleanStack(1)));
    // a false result is the ordinary failure
    assert_eq!(run(&[OP_FALSE]), Err(ScriptError::EvalFalse));
}

#[test]
fn test_stepwise_execution() {
    let tx = transaction_with(Vec::new(), MAX_TX_IN_SEQUENCE_NUM, 0);
    let spk = ScriptPublicKey::new(0, vec![OP_TRUE]);
    let sig_cache = SignatureCache::new(8);

    // checking before any step reports an unfinished script
    let mut engine = ScriptEngine::new(&spk, &tx, 0, ScriptFlags::NONE, &sig_cache, &TestHasher).unwrap();
    assert_eq!(engine.check_error_condition(true), Err(ScriptError::ScriptUnfinished));

    let mut engine = ScriptEngine::new(&spk, &tx, 0, ScriptFlags::NONE, &sig_cache, &TestHasher).unwrap();
    assert_eq!(engine.step(), Ok(true));
    assert_eq!(engine.check_error_condition(true), Ok(()));
}

#[test]
fn test_minimal_push_enforcement() {
    // 15 pushed via OP_DATA_1 instead of OP_15
    assert!(matches!(run(&[OP_DATA_1, 0x0f]), Err(ScriptError::NotMinimalData(_))));
    assert_eq!(run(&[OP_15]), Ok(()));
    // a zero-length push must use OP_0
    assert!(matches!(run(&[OP_PUSHDATA1, 0x00, OP_TRUE]), Err(ScriptError::NotMinimalData(_))));
}

#[test]
fn test_stack_overflow() {
    let script = vec![OP_TRUE; MAX_STACK_SIZE + 1];
    assert_eq!(run(&script), Err(ScriptError::StackSizeExceeded(MAX_STACK_SIZE + 1, MAX_STACK_SIZE)));
}

#[test]
fn test_combined_stack_limit_includes_alt_stack() {
    let mut script = vec![OP_TRUE; MAX_STACK_SIZE];
    script.push(OP_TOALTSTACK);
    script.push(OP_TRUE);
    assert_eq!(run(&script), Err(ScriptError::StackSizeExceeded(MAX_STACK_SIZE + 1, MAX_STACK_SIZE)));
}

#[test]
fn test_op_count_limit() {
    // the 202nd counted operation crosses the limit; pushes are free
    let mut script = vec![OP_TRUE];
    script.extend(vec![OP_NOP; 202]);
    assert_eq!(run(&script), Err(ScriptError::TooManyOperations(201)));

    // exactly 201 counted operations is fine
    let mut script = vec![OP_TRUE];
    script.extend(vec![OP_NOP; 201]);
    assert_eq!(run(&script), Ok(()));
}

#[test]
fn test_element_size_limit() {
    // a 521-byte push
    let mut script = vec![OP_PUSHDATA2];
    script.extend_from_slice(&521u16.to_le_bytes());
    script.extend(vec![0xab; 521]);
    assert_eq!(run(&script), Err(ScriptError::ElementTooBig(521, MAX_SCRIPT_ELEMENT_SIZE)));
}

#[test]
fn test_conditional_execution() {
    assert_eq!(run(&[OP_TRUE, OP_IF, OP_TRUE, OP_ENDIF]), Ok(()));
    assert_eq!(run(&[OP_FALSE, OP_IF, OP_FALSE, OP_ELSE, OP_TRUE, OP_ENDIF]), Ok(()));
    assert_eq!(run(&[OP_TRUE, OP_NOTIF, OP_TRUE, OP_ELSE, OP_TRUE, OP_DROP, OP_TRUE, OP_ENDIF]), Ok(()));
    // unterminated conditional at script end
    assert_eq!(run(&[OP_TRUE, OP_IF]), Err(ScriptError::UnbalancedConditional));
    // minimal-if: the condition must be empty or exactly 0x01
    assert_eq!(run(&[OP_2, OP_IF, OP_ENDIF]), Err(ScriptError::MinimalIf));
}

#[test]
fn test_disabled_opcodes_fail_even_unexecuted() {
    for opcode in [OP_CAT, OP_SUBSTR, OP_INVERT, OP_AND, OP_OR, OP_XOR, OP_2MUL, OP_2DIV, OP_MUL, OP_DIV, OP_MOD, OP_LSHIFT, OP_RSHIFT]
    {
        assert!(
            matches!(run(&[OP_TRUE, OP_FALSE, OP_IF, opcode, OP_ENDIF]), Err(ScriptError::DisabledOpcode(_))),
            "opcode {:#04x} should be disabled",
            opcode
        );
    }
}

#[test]
fn test_unknown_opcode_skippable_but_fails_when_executed() {
    assert!(matches!(run(&[0xba]), Err(ScriptError::InvalidOpcode(_))));
    assert_eq!(run(&[OP_TRUE, OP_FALSE, OP_IF, 0xba, OP_ENDIF]), Ok(()));
}

#[test]
fn test_arithmetic_opcodes() {
    let mut builder = ScriptBuilder::new();
    builder.add_i64(2).unwrap();
    builder.add_i64(3).unwrap();
    builder.add_op(OP_ADD).unwrap();
    builder.add_i64(5).unwrap();
    builder.add_op(OP_NUMEQUAL).unwrap();
    assert_eq!(run(builder.script()), Ok(()));

    let mut builder = ScriptBuilder::new();
    builder.add_i64(7).unwrap();
    builder.add_i64(3).unwrap();
    builder.add_op(OP_SUB).unwrap();
    builder.add_i64(4).unwrap();
    builder.add_op(OP_NUMEQUAL).unwrap();
    assert_eq!(run(builder.script()), Ok(()));

    let mut builder = ScriptBuilder::new();
    builder.add_i64(3).unwrap();
    builder.add_i64(2).unwrap();
    builder.add_i64(5).unwrap();
    builder.add_op(OP_WITHIN).unwrap(); // 2 <= 3 < 5
    assert_eq!(run(builder.script()), Ok(()));

    let mut builder = ScriptBuilder::new();
    builder.add_i64(-3).unwrap();
    builder.add_op(OP_ABS).unwrap();
    builder.add_i64(3).unwrap();
    builder.add_op(OP_NUMEQUAL).unwrap();
    assert_eq!(run(builder.script()), Ok(()));
}

#[test]
fn test_arithmetic_operand_length_limit() {
    // a 5-byte operand is over the 4-byte arithmetic bound
    let mut script = vec![0x05, 0x01, 0x00, 0x00, 0x00, 0x01];
    script.push(OP_1ADD);
    assert_eq!(run(&script), Err(ScriptError::NumberTooBig(5, 4)));
}

#[test]
fn test_hash_opcodes() {
    let preimage = [0x42u8; 11];

    let mut builder = ScriptBuilder::new();
    builder.add_data(&preimage).unwrap();
    builder.add_op(OP_SHA256).unwrap();
    builder.add_data(&Sha256::digest(preimage)).unwrap();
    builder.add_op(OP_EQUAL).unwrap();
    assert_eq!(run(builder.script()), Ok(()));

    let mut builder = ScriptBuilder::new();
    builder.add_data(&preimage).unwrap();
    builder.add_op(OP_BLAKE2B).unwrap();
    builder.add_data(&blake2b_256(&preimage)).unwrap();
    builder.add_op(OP_EQUAL).unwrap();
    assert_eq!(run(builder.script()), Ok(()));
}

#[test]
fn test_stack_manipulation_opcodes() {
    // swap then drop discards the false on top
    assert_eq!(run(&[OP_FALSE, OP_TRUE, OP_SWAP, OP_DROP]), Ok(()));
    // rot cycles the third item to the top
    assert_eq!(run(&[OP_FALSE, OP_FALSE, OP_TRUE, OP_ROT, OP_DROP, OP_NIP]), Ok(()));
    // depth of two equals 2
    let mut builder = ScriptBuilder::new();
    builder.add_ops(&[OP_TRUE, OP_TRUE, OP_DEPTH]).unwrap();
    builder.add_i64(2).unwrap();
    builder.add_ops(&[OP_NUMEQUALVERIFY, OP_DROP]).unwrap();
    assert_eq!(run(builder.script()), Ok(()));
    // pick copies the indexed item to the top
    assert_eq!(run(&[OP_TRUE, OP_FALSE, OP_TRUE, OP_PICK, OP_NIP, OP_DROP]), Ok(()));
}

#[test]
fn test_alt_stack_round_trip() {
    assert_eq!(run(&[OP_TRUE, OP_TOALTSTACK, OP_FROMALTSTACK]), Ok(()));
    // pulling from an empty alt stack fails
    assert_eq!(run(&[OP_TRUE, OP_FROMALTSTACK]), Err(ScriptError::EmptyStack));
}

#[test]
fn test_signature_script_push_only() {
    let tx = transaction_with(vec![OP_TRUE, OP_DUP], MAX_TX_IN_SEQUENCE_NUM, 0);
    assert_eq!(run_tx(&tx, &[OP_TRUE]), Err(ScriptError::SignatureScriptNotPushOnly));
}

#[test]
fn test_check_lock_time_verify() {
    let mut builder = ScriptBuilder::new();
    builder.add_i64(100).unwrap();
    builder.add_ops(&[OP_CHECKLOCKTIMEVERIFY, OP_DROP, OP_TRUE]).unwrap();
    let script = builder.drain();

    // lock time satisfied (same kind, tx lock time past the requirement)
    let tx = transaction_with(Vec::new(), 0, 150);
    assert_eq!(run_tx(&tx, &script), Ok(()));

    // not yet satisfied
    let tx = transaction_with(Vec::new(), 0, 50);
    assert!(matches!(run_tx(&tx, &script), Err(ScriptError::UnsatisfiedLockTime(_))));

    // mismatched kinds: stack asks for a blue score, tx carries a timestamp
    let tx = transaction_with(Vec::new(), 0, LOCK_TIME_THRESHOLD + 1);
    assert!(matches!(run_tx(&tx, &script), Err(ScriptError::UnsatisfiedLockTime(_))));

    // a final sequence disables the check
    let tx = transaction_with(Vec::new(), MAX_TX_IN_SEQUENCE_NUM, 150);
    assert!(matches!(run_tx(&tx, &script), Err(ScriptError::UnsatisfiedLockTime(_))));
}

#[test]
fn test_check_lock_time_verify_negative() {
    let mut builder = ScriptBuilder::new();
    builder.add_i64(-1).unwrap();
    builder.add_ops(&[OP_CHECKLOCKTIMEVERIFY, OP_DROP, OP_TRUE]).unwrap();
    let tx = transaction_with(Vec::new(), 0, 100);
    assert_eq!(run_tx(&tx, &builder.drain()), Err(ScriptError::NegativeLockTime(-1)));
}

#[test]
fn test_check_sequence_verify() {
    let mut builder = ScriptBuilder::new();
    builder.add_i64(10).unwrap();
    builder.add_ops(&[OP_CHECKSEQUENCEVERIFY, OP_DROP, OP_TRUE]).unwrap();
    let script = builder.drain();

    // relative lock satisfied
    let tx = transaction_with(Vec::new(), 20, 0);
    assert_eq!(run_tx(&tx, &script), Ok(()));

    // not yet satisfied
    let tx = transaction_with(Vec::new(), 5, 0);
    assert!(matches!(run_tx(&tx, &script), Err(ScriptError::UnsatisfiedLockTime(_))));

    // input sequence with the disable bit rejects the check outright
    let tx = transaction_with(Vec::new(), SEQUENCE_LOCK_TIME_DISABLED | 20, 0);
    assert!(matches!(run_tx(&tx, &script), Err(ScriptError::UnsatisfiedLockTime(_))));
}

#[test]
fn test_cltv_csv_operand_stays_on_stack() {
    // without the OP_DROP the operand remains and violates clean stack
    let mut builder = ScriptBuilder::new();
    builder.add_i64(10).unwrap();
    builder.add_ops(&[OP_CHECKSEQUENCEVERIFY, OP_TRUE]).unwrap();
    let tx = transaction_with(Vec::new(), 20, 0);
    assert_eq!(run_tx(&tx, &builder.drain()), Err(ScriptError::CleanStack(1)));
}
