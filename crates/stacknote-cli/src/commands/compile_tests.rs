use std::fs;
use std::path::Path;

use indoc::indoc;
use stacknote_bytecode::{ByteOrder, NoteFile};
use stacknote_compiler::CompileOptions;

use super::CliError;
use super::compile::{CompileArgs, Output, run};

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

fn args(source: &Path, output: &Path, listing: bool) -> CompileArgs {
    CompileArgs {
        source_path: source.to_path_buf(),
        output: Output::File(output.to_path_buf()),
        listing,
        options: CompileOptions::default(),
        color: false,
        listing_color: false,
    }
}

#[test]
fn writes_note_file() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("fact.sn");
    let output = dir.path().join("fact.note");
    fs::write(&source, FACTORIAL).unwrap();

    run(args(&source, &output, false)).unwrap();

    let file = NoteFile::from_path(&output).unwrap();
    let note = file.find("factorial").unwrap();
    assert_eq!(note.code_info.max_stack, 2);
    assert_eq!(note.code.len(), 18);
}

#[test]
fn writes_big_endian_notes() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("fact.sn");
    let output = dir.path().join("fact.note");
    fs::write(&source, FACTORIAL).unwrap();

    let mut args = args(&source, &output, false);
    args.options.byte_order = ByteOrder::Big;
    run(args).unwrap();

    let file = NoteFile::from_path(&output).unwrap();
    assert_eq!(file.notes[0].code_info.byte_order, ByteOrder::Big);
}

#[test]
fn writes_listing() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("fact.sn");
    let output = dir.path().join("fact.S");
    fs::write(&source, FACTORIAL).unwrap();

    run(args(&source, &output, true)).unwrap();

    let listing = fs::read_to_string(&output).unwrap();
    assert!(listing.starts_with("[factorial]\n"), "{listing}");
    assert!(listing.contains("load_external 0  ; factorial"), "{listing}");
}

#[test]
fn nothing_is_written_on_failure() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("bad.sn");
    let output = dir.path().join("bad.note");
    fs::write(
        &source,
        indoc! {"
            define good returns int
                load 1
            define bad returns int
                add
        "},
    )
    .unwrap();

    let err = run(args(&source, &output, false)).unwrap_err();
    assert!(matches!(err, CliError::Failed { errors: 1, .. }), "{err}");
    assert!(!output.exists());
}

#[test]
fn missing_source_is_a_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("nope.sn");
    let output = dir.path().join("nope.note");

    let err = run(args(&source, &output, false)).unwrap_err();
    assert!(matches!(err, CliError::Read { .. }));
    assert!(err.to_string().starts_with("cannot read `"), "{err}");
}

#[test]
fn oversized_name_is_an_encode_error() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("long.sn");
    let output = dir.path().join("long.note");
    let name = "g".repeat(70_000);
    fs::write(&source, format!("define {name} returns int\n    load 1\n")).unwrap();

    let err = run(args(&source, &output, false)).unwrap_err();
    assert!(matches!(err, CliError::Encode { .. }), "{err}");
    assert!(!output.exists());
}
