//! Pipeline shortcuts for tests.

use stacknote_bytecode::{ByteOrder, Note, NoteFile, dump};
use stacknote_core::Colors;

use crate::{CompileOptions, compile};

pub fn options(byte_order: ByteOrder, optimize: bool) -> CompileOptions {
    CompileOptions {
        byte_order,
        optimize,
    }
}

/// Compile and require success.
pub fn compile_ok(source: &str) -> Vec<Note> {
    compile_ok_with(source, &CompileOptions::default())
}

pub fn compile_ok_with(source: &str, options: &CompileOptions) -> Vec<Note> {
    let compilation = compile(source, options);
    assert!(
        compilation.is_ok(),
        "unexpected errors:\n{}",
        compilation.diagnostics.render_plain(source)
    );
    compilation.notes
}

/// Compile and require failure; returns the plain rendering.
pub fn compile_err(source: &str) -> String {
    let compilation = compile(source, &CompileOptions::default());
    assert!(!compilation.is_ok(), "expected errors:\n{source}");
    compilation.diagnostics.render_plain(source)
}

/// Uncolored dump of the compiled notes.
pub fn listing(source: &str) -> String {
    listing_with(source, &CompileOptions::default())
}

pub fn listing_with(source: &str, options: &CompileOptions) -> String {
    let file = NoteFile::new(compile_ok_with(source, options));
    dump(&file, Colors::OFF)
}
