use crate::test_fixtures::{FACTORIAL_CODE, factorial_note, factorial_signature};
use crate::verify::verify;
use crate::{ByteOrder, Signature, ValueType, VerifyError, decode, verify_note};

fn run(code: &[u8], args: usize, externals: &[Signature]) -> Result<usize, VerifyError> {
    let instrs = decode(code, ByteOrder::Little).unwrap();
    verify(&instrs, code.len(), args, externals).map(|r| r.max_stack)
}

#[test]
fn factorial_depths() {
    let report = verify_note(&factorial_note()).unwrap();
    assert_eq!(report.peak, 3);
    assert_eq!(report.max_stack, 2);
    assert_eq!(report.depth_at(0x00), Some(1));
    assert_eq!(report.depth_at(0x03), Some(2));
    assert_eq!(report.depth_at(0x06), Some(1));
    assert_eq!(report.depth_at(0x0a), Some(1));
    assert_eq!(report.depth_at(0x10), Some(3));
    assert_eq!(report.depth_at(0x11), Some(2));
    assert_eq!(report.depths.len(), 12);
}

#[test]
fn declared_max_stack_too_small() {
    let mut note = factorial_note();
    note.code_info.max_stack = 1;
    let err = verify_note(&note).unwrap_err();
    assert_eq!(
        err,
        VerifyError::MaxStackExceeded {
            declared: 1,
            computed: 2
        }
    );
}

#[test]
fn underflow_is_exact() {
    // plus needs two slots
    assert_eq!(run(&[0x31, 0x22], 1, &[]), Ok(1));
    assert_eq!(
        run(&[0x22], 1, &[]),
        Err(VerifyError::Underflow {
            offset: 0,
            needed: 2,
            depth: 1
        })
    );
    // pick 2 needs three slots
    assert_eq!(run(&[0x15, 0x02, 0x13, 0x13], 3, &[]), Ok(1));
    assert!(matches!(
        run(&[0x15, 0x02], 2, &[]),
        Err(VerifyError::Underflow { needed: 3, .. })
    ));
}

#[test]
fn return_point_needs_a_value() {
    assert_eq!(run(&[], 0, &[]), Err(VerifyError::MissingResult));
    assert_eq!(run(&[], 1, &[]), Ok(0));
    // load_external then return
    assert_eq!(
        run(&[0xe0, 0x00, 0x00], 0, &[factorial_signature()]),
        Err(VerifyError::MissingResult)
    );
}

#[test]
fn inconsistent_merge() {
    // bra over a literal: the target sees depth 0 and 1
    let code = [0x30, 0x28, 0x01, 0x00, 0x30, 0x31];
    assert_eq!(
        run(&code, 0, &[]),
        Err(VerifyError::InconsistentStack {
            offset: 5,
            expected: 0,
            found: 1
        })
    );
}

#[test]
fn external_checks() {
    assert_eq!(
        run(&[0xe0, 0x01, 0x00, 0xe1], 1, &[factorial_signature()]),
        Err(VerifyError::ExternalOutOfRange {
            offset: 0,
            index: 1,
            count: 1
        })
    );
    assert_eq!(
        run(&[0x31, 0xe1], 1, &[]),
        Err(VerifyError::NotCallable { offset: 1 })
    );
    // calling with a function reference as the argument
    let nullary = Signature::new("g", ValueType::Int, vec![]);
    let code = [0xe0, 0x00, 0x00, 0xe0, 0x01, 0x00, 0xe1];
    assert_eq!(
        run(&code, 0, &[nullary, factorial_signature()]),
        Err(VerifyError::NotAValue { offset: 6 })
    );
}

#[test]
fn rotation_tracks_function_refs() {
    // [ext, 1, 2] rot -> [2, ext, 1]; plus would add a function reference
    let code = [0xe0, 0x00, 0x00, 0x31, 0x32, 0x17, 0x22];
    assert_eq!(
        run(&code, 0, &[factorial_signature()]),
        Err(VerifyError::NotAValue { offset: 6 })
    );
    // [1, 2, ext] rot -> [ext, 1, 2]; plus is fine, result left on top
    let code = [0x31, 0x32, 0xe0, 0x00, 0x00, 0x17, 0x22];
    assert_eq!(run(&code, 0, &[factorial_signature()]), Ok(3));
}

#[test]
fn corrupt_code_is_a_format_error() {
    let mut note = factorial_note();
    note.code = FACTORIAL_CODE[..4].to_vec();
    assert!(matches!(verify_note(&note), Err(VerifyError::Format(_))));
}
