use indoc::indoc;
use stacknote_bytecode::NoteFile;

use crate::test_utils::{compile_err, compile_ok};
use crate::{CompileOptions, Error, ErrorKind, compile};

#[test]
fn forward_calls_resolve() {
    let source = indoc! {"
        define main returns int
            load 5
            call twice
        define twice returns int
            argument int x
            dup
            add
    "};
    let notes = compile_ok(source);
    let names: Vec<_> = notes.iter().map(|n| n.signature.name.as_str()).collect();
    assert_eq!(names, ["main", "twice"]);
    assert_eq!(notes[0].externals, vec![notes[1].signature.clone()]);
    assert!(notes[1].externals.is_empty());
}

#[test]
fn externals_follow_first_use() {
    let source = indoc! {"
        define main returns int
            load 1
            call b
            call a
            call b
        define a returns int
            argument int x
            load x
        define b returns int
            argument int x
            load x
    "};
    let notes = compile_ok(source);
    let externals: Vec<_> = notes[0].externals.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(externals, ["b", "a"]);
}

#[test]
fn folded_operands_compile_like_explicit_loads() {
    let folded = indoc! {"
        define f returns int
            argument int a
            add 3
            mul 2
            dup
            blt 10, small
            return
        small:
            sub 1
    "};
    let explicit = indoc! {"
        define f returns int
            argument int a
            load 3
            add
            load 2
            mul
            dup
            load 10
            blt small
            return
        small:
            load 1
            sub
    "};
    assert_eq!(compile_ok(folded), compile_ok(explicit));
}

#[test]
fn undefined_callee_is_a_name_error() {
    let source = indoc! {"
        define main returns int
            call nowhere
    "};
    insta::assert_snapshot!(compile_err(source), @"name error: `nowhere` is not a slot or function at 2:10");
}

#[test]
fn duplicate_function_is_reported_on_the_later_definition() {
    let source = indoc! {"
        define f returns int
            load 1
        define f returns int
            load 2
    "};
    let compilation = compile(source, &CompileOptions::default());
    assert_eq!(compilation.notes.len(), 1);
    insta::assert_snapshot!(compilation.diagnostics.render_plain(source), @"name error: function `f` is already defined at 3:8");
}

#[test]
fn failing_function_does_not_stop_the_others() {
    let source = indoc! {"
        define bad returns int
            load 1
            add
        define good returns int
            load 2
        define worse returns ptr
            load 3
    "};
    let compilation = compile(source, &CompileOptions::default());
    let names: Vec<_> = compilation
        .notes
        .iter()
        .map(|n| n.signature.name.as_str())
        .collect();
    assert_eq!(names, ["good"]);

    let functions: Vec<_> = compilation
        .diagnostics
        .iter()
        .map(|d| d.function.as_deref())
        .collect();
    assert_eq!(functions, [Some("bad"), Some("worse")]);
    insta::assert_snapshot!(compilation.diagnostics.render_plain(source), @r"
    stack error: `add` needs 2 stack slots, found 1 at 3:5
    type error: return value must be ptr, found int at 7:5
    ");
}

#[test]
fn syntax_errors_keep_signatures_callable() {
    let source = indoc! {"
        define main returns int
            load 1
            call helper
        define helper returns int
            argument int x
            frobnicate
    "};
    let compilation = compile(source, &CompileOptions::default());
    let kinds: Vec<_> = compilation.diagnostics.iter().map(|d| d.kind).collect();
    assert_eq!(kinds, [ErrorKind::Syntax]);
    assert_eq!(compilation.notes.len(), 1);
}

#[test]
fn failed_compilation_has_no_note_file() {
    let compilation = compile("define f returns int\n", &CompileOptions::default());
    let err = compilation.into_note_file().unwrap_err();
    assert!(matches!(err, Error::CompileFailed(ref d) if d.error_count() == 1));
    assert_eq!(err.to_string(), "compilation failed with 1 error(s)");
}

#[test]
fn note_file_round_trips() {
    let source = indoc! {"
        define id returns ptr
            argument ptr p
        define zero returns int
            load 0
    "};
    let compilation = compile(source, &CompileOptions::default());
    let file = compilation.into_note_file().unwrap();
    let bytes = file.to_bytes().unwrap();
    let decoded = NoteFile::from_bytes(&bytes).unwrap();
    assert_eq!(decoded, file);
    assert_eq!(decoded.find("zero").unwrap().code, [0x30]);
    assert!(decoded.find("id").unwrap().code.is_empty());
}

#[test]
fn encoding_reports_oversized_names() {
    let name = "f".repeat(usize::from(u16::MAX) + 1);
    let source = format!("define {name} returns int\n    load 1\n");
    let compilation = compile(&source, &CompileOptions::default());
    assert!(compilation.is_ok());

    let err = compilation.into_bytes().unwrap_err();
    assert!(matches!(err, Error::Format(_)), "{err}");
    assert_eq!(err.to_string(), "signature name too large: 65536 (max 65535)");
}

#[test]
fn encoded_bytes_decode() {
    let compilation = compile("define one returns int\n    load 1\n", &CompileOptions::default());
    let bytes = compilation.into_bytes().unwrap();
    let decoded = NoteFile::from_bytes(&bytes).unwrap();
    assert_eq!(decoded.find("one").unwrap().code, [0x31]);
}
