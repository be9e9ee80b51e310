//! Whole-file driver.
//!
//! Signatures of every function are collected before any body is checked,
//! so calls may refer to functions defined later in the file.

use std::collections::HashSet;

use indexmap::IndexMap;
use log::{debug, info};
use stacknote_bytecode::{ByteOrder, Note, NoteFile, Signature};

use crate::cfg::build;
use crate::check::{CheckResult, check};
use crate::diagnostics::{DiagnosticMessage, Diagnostics, ErrorKind};
use crate::emit::emit_function;
use crate::optimize::{optimize, remove_unreachable};
use crate::parser::{Function, parse};
use crate::{Error, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompileOptions {
    /// Order of multi-byte code operands and the code-info payload.
    pub byte_order: ByteOrder,
    /// Run branch elimination. Unreachable blocks are dropped either way.
    pub optimize: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            byte_order: ByteOrder::Little,
            optimize: true,
        }
    }
}

/// Notes of the functions that compiled, plus every reported error.
#[derive(Debug)]
pub struct Compilation {
    pub notes: Vec<Note>,
    pub diagnostics: Diagnostics,
}

impl Compilation {
    pub fn is_ok(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// The note file, unless any function failed.
    pub fn into_note_file(self) -> Result<NoteFile> {
        if !self.diagnostics.is_empty() {
            return Err(Error::CompileFailed(self.diagnostics));
        }
        Ok(NoteFile::new(self.notes))
    }

    /// The encoded note file. Fails on compile errors and on notes whose
    /// fields overflow the container's length prefixes.
    pub fn into_bytes(self) -> Result<Vec<u8>> {
        let file = self.into_note_file()?;
        Ok(file.to_bytes()?)
    }
}

pub fn compile(source: &str, options: &CompileOptions) -> Compilation {
    let parsed = parse(source);
    let mut diagnostics = parsed.diagnostics;
    let functions = parsed.unit.functions;

    // Headers of broken functions still count, so callers are not blamed
    // for a body error elsewhere.
    let mut signatures: IndexMap<String, Signature> = IndexMap::new();
    let mut duplicates = HashSet::new();
    for (index, func) in functions.iter().enumerate() {
        if signatures.contains_key(&func.name) {
            diagnostics
                .report(ErrorKind::Name, func.name_span)
                .message(format!("function `{}` is already defined", func.name))
                .function(func.name.clone())
                .emit();
            duplicates.insert(index);
            continue;
        }
        signatures.insert(func.name.clone(), func.signature());
    }

    let mut notes = Vec::new();
    for (index, func) in functions.iter().enumerate() {
        if func.broken || duplicates.contains(&index) {
            continue;
        }
        match compile_function(func, &signatures, options) {
            Ok(note) => notes.push(note),
            Err(mut message) => {
                debug!("{}: {message}", func.name);
                message.function = Some(func.name.clone());
                diagnostics.push(message);
            }
        }
    }

    info!(
        "compiled {} of {} function(s), {} error(s)",
        notes.len(),
        functions.len(),
        diagnostics.error_count()
    );
    Compilation { notes, diagnostics }
}

fn internal(func: &Function, message: impl Into<String>) -> DiagnosticMessage {
    DiagnosticMessage::new(ErrorKind::Internal, func.name_span, message)
}

/// Build, check, optimize, re-check and emit one function.
pub fn compile_function(
    func: &Function,
    signatures: &IndexMap<String, Signature>,
    options: &CompileOptions,
) -> std::result::Result<Note, DiagnosticMessage> {
    let mut cfg = build(func)?;
    let first = check(&cfg, func, signatures)?;
    debug!(
        "{}: {} block(s), max_stack {}",
        func.name,
        cfg.len(),
        first.max_stack
    );

    if options.optimize {
        optimize(&mut cfg);
    } else {
        remove_unreachable(&mut cfg);
    }

    let checked: CheckResult = check(&cfg, func, signatures).map_err(|err| {
        internal(
            func,
            format!("optimized code fails re-check: {}: {}", err.kind, err.message),
        )
    })?;

    emit_function(&func.signature(), &cfg, &checked, signatures, options.byte_order)
        .map_err(|err| internal(func, err.to_string()))
}
