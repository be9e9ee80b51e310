use std::collections::HashMap;

use indexmap::IndexMap;
use indoc::indoc;
use stacknote_bytecode::{ByteOrder, Note, Signature, verify_note};

use super::EmitError;
use super::emit_function;
use super::emitter::compare_block_depths;
use super::layout::assemble;
use super::lower::lower;
use crate::cfg::{BlockId, Cfg, build};
use crate::check::{CheckResult, check};
use crate::optimize::optimize;
use crate::parser::parse;

use crate::test_utils::{compile_ok, compile_ok_with, listing, listing_with, options};
use crate::{CompileOptions, ErrorKind, compile};

const FACTORIAL: &str = indoc! {"
    define factorial returns int
        argument int x
        dup
        load 1
        bgt recurse
        load 1
        return
    recurse:
        dup
        load 1
        sub
        call factorial
        mul
"};

#[test]
fn factorial_bytes() {
    let notes = compile_ok(FACTORIAL);
    let note = &notes[0];
    assert_eq!(
        note.code,
        [
            0x12, 0x31, 0x2b, 0x28, 0x04, 0x00, 0x31, 0x2f, 0x08, 0x00, 0x12, 0x31, 0x1c, 0xe0,
            0x00, 0x00, 0xe1, 0x1e
        ]
    );
    assert_eq!(note.code_info.max_stack, 2);
    assert_eq!(note.code_info.byte_order, ByteOrder::Little);
    assert_eq!(note.externals, vec![note.signature.clone()]);
}

/// Optimized, checked and emitted first function of `source`.
fn pipeline(source: &str) -> (Cfg, CheckResult, Note) {
    let parsed = parse(source);
    assert!(parsed.diagnostics.is_empty(), "{source}");
    let signatures: IndexMap<String, Signature> = parsed
        .unit
        .functions
        .iter()
        .map(|f| (f.name.clone(), f.signature()))
        .collect();
    let func = &parsed.unit.functions[0];
    let mut cfg = build(func).unwrap();
    optimize(&mut cfg);
    let checked = check(&cfg, func, &signatures).unwrap();
    let note = emit_function(
        &func.signature(),
        &cfg,
        &checked,
        &signatures,
        ByteOrder::Little,
    )
    .unwrap();
    (cfg, checked, note)
}

#[test]
fn block_depths_agree_with_verifier() {
    let countdown = indoc! {"
        define countdown returns int
            load 10
        top:
            dup
            load 0
            ble done
            load 1
            sub
            goto top
        done:
    "};
    for source in [FACTORIAL, countdown] {
        let (cfg, checked, note) = pipeline(source);
        let signatures: IndexMap<String, Signature> =
            [(note.signature.name.clone(), note.signature.clone())].into();
        let lowered = lower(&cfg, &checked, &signatures).unwrap();
        let starts = assemble(&lowered, ByteOrder::Little).unwrap().block_starts;
        let report = verify_note(&note).unwrap();

        let mut compared = 0;
        for (id, state) in &checked.entry_states {
            let offset = starts[id];
            if offset < note.code.len() {
                assert_eq!(report.depth_at(offset), Some(state.depth()), "{id}");
                compared += 1;
            }
        }
        assert!(compared >= 2, "{source}");
        assert_eq!(report.max_stack, usize::from(checked.max_stack));
    }
}

#[test]
fn misplaced_block_is_a_depth_mismatch() {
    let (_, checked, note) = pipeline(FACTORIAL);
    let report = verify_note(&note).unwrap();
    // offset 1 follows `dup`, one slot deeper than any block entry
    let starts: HashMap<BlockId, usize> = checked.entry_states.keys().map(|&id| (id, 1)).collect();

    let err = compare_block_depths(&checked, &starts, &report, note.code.len()).unwrap_err();
    assert!(
        matches!(
            err,
            EmitError::DepthMismatch {
                offset: 1,
                checked: 1,
                verified: Some(2),
                ..
            }
        ),
        "{err}"
    );
}

#[test]
fn factorial_listing() {
    insta::assert_snapshot!(listing(FACTORIAL), @r"
    [factorial]
    signature  factorial(int) -> int
    code-info  max_stack 2, little-endian
    externals  1
      E0  factorial(int) -> int
    code       18 bytes
      0000  dup
      0001  lit1
      0002  gt
      0003  bra 4  ; -> 000a
      0006  lit1
      0007  skip 8  ; -> 0012 (return)
      000a  dup
      000b  lit1
      000c  minus
      000d  load_external 0  ; factorial
      0010  call
      0011  mul
    ");
}

#[test]
fn big_endian_operands() {
    let notes = compile_ok_with(FACTORIAL, &options(ByteOrder::Big, true));
    let note = &notes[0];
    assert_eq!(note.code_info.byte_order, ByteOrder::Big);
    assert_eq!(&note.code[3..6], &[0x28, 0x00, 0x04]);
    assert_eq!(&note.code[7..10], &[0x2f, 0x00, 0x08]);
    assert!(verify_note(note).is_ok());
}

#[test]
fn literals_use_the_shortest_form() {
    let source = indoc! {"
        define f returns int
            load 31
            load 100
            load -1
            load 300
            add
            add
            add
    "};
    let notes = compile_ok(source);
    assert_eq!(
        notes[0].code,
        [0x4f, 0x08, 100, 0x09, 0xff, 0x0a, 0x2c, 0x01, 0x22, 0x22, 0x22]
    );
}

#[test]
fn slot_loads_become_picks() {
    let source = indoc! {"
        define f returns int
            argument int a
            argument int b
            argument int c
            load c
            load c
            load a
            add
            add
    "};
    // `load c` twice: dup then over; `a` is four deep by then
    let notes = compile_ok(source);
    assert_eq!(notes[0].code, [0x12, 0x14, 0x15, 0x04, 0x22, 0x22]);
    assert_eq!(notes[0].code_info.max_stack, 3);
}

#[test]
fn cast_and_name_emit_nothing() {
    let source = indoc! {"
        define f returns ptr
            argument int a
            cast ptr
            name 0, p
            load p
            sub
            cast ptr
    "};
    let notes = compile_ok(source);
    assert_eq!(notes[0].code, [0x12, 0x1c]);
}

#[test]
fn unoptimized_goto_emits_skip() {
    let source = indoc! {"
        define f returns int
            argument int a
            dup
            bgt 0, big
            goto small
        big:
            load 2
            return
        small:
            load 3
    "};
    insta::assert_snapshot!(listing_with(source, &options(ByteOrder::Little, false)), @r"
    [f]
    signature  f(int) -> int
    code-info  max_stack 2, little-endian
    externals  0
    code       14 bytes
      0000  dup
      0001  lit0
      0002  gt
      0003  bra 3  ; -> 0009
      0006  skip 4  ; -> 000d
      0009  lit2
      000a  skip 1  ; -> 000e (return)
      000d  lit3
    ");
}

#[test]
fn goto_to_next_block_is_omitted() {
    let source = indoc! {"
        define f returns int
            load 1
            goto done
        dead:
            load 2
            return
        done:
            load 3
            add
    "};
    let notes = compile_ok_with(source, &options(ByteOrder::Little, false));
    assert_eq!(notes[0].code, [0x31, 0x33, 0x22]);
}

#[test]
fn return_before_last_block_skips_to_end() {
    let source = indoc! {"
        define f returns int
            argument int a
            dup
            blt 0, negative
            goto positive
        negative:
            neg
            return
        positive:
    "};
    insta::assert_snapshot!(listing_with(source, &options(ByteOrder::Little, false)), @r"
    [f]
    signature  f(int) -> int
    code-info  max_stack 2, little-endian
    externals  0
    code       13 bytes
      0000  dup
      0001  lit0
      0002  lt
      0003  bra 3  ; -> 0009
      0006  skip 4  ; -> 000d (return)
      0009  neg
      000a  skip 0  ; -> 000d (return)
    ");
}

#[test]
fn distant_branch_is_reported() {
    let mut source = String::from("define f returns int\n    argument int a\n    dup\n    bgt 0, far\n");
    for _ in 0..9000 {
        source.push_str("    load 1000\n    drop\n");
    }
    source.push_str("far:\n");

    let compilation = compile(&source, &CompileOptions::default());
    assert!(compilation.notes.is_empty());
    let diag = compilation.diagnostics.iter().next().unwrap();
    assert_eq!(diag.kind, ErrorKind::Internal);
    assert!(diag.message.contains("exceeds 16 bits"), "{}", diag.message);
}
