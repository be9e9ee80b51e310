//! Human-readable listing of note files.

use std::fmt::{self, Write};

use stacknote_core::Colors;

use crate::chunk::Chunk;
use crate::file::NoteFile;
use crate::instruction::{Instruction, Operand, decode};
use crate::note::Note;
use crate::opcode::Opcode;

/// Render a whole note file.
pub fn dump(file: &NoteFile, colors: Colors) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_file(&mut out, file, colors);
    out
}

/// Render a whole note file into any writer.
pub fn write_file(out: &mut impl Write, file: &NoteFile, colors: Colors) -> fmt::Result {
    for (i, note) in file.notes.iter().enumerate() {
        if i > 0 {
            out.write_char('\n')?;
        }
        write_note(out, note, colors)?;
    }
    if file.skipped > 0 {
        let c = &colors;
        let line = format!("; {} note(s) skipped", file.skipped);
        writeln!(out, "{}", c.paint(c.meta, line))?;
    }
    Ok(())
}

pub fn write_note(out: &mut impl Write, note: &Note, colors: Colors) -> fmt::Result {
    let c = &colors;
    writeln!(out, "[{}]", c.paint(c.name, &note.signature.name))?;
    writeln!(out, "signature  {}", note.signature)?;
    writeln!(
        out,
        "code-info  max_stack {}, {}",
        note.code_info.max_stack, note.code_info.byte_order
    )?;

    writeln!(out, "externals  {}", note.externals.len())?;
    for (i, ext) in note.externals.iter().enumerate() {
        writeln!(out, "  {}  {ext}", c.paint(c.meta, format_args!("E{i}")))?;
    }

    writeln!(out, "code       {} bytes", note.code.len())?;
    match decode(&note.code, note.code_info.byte_order) {
        Ok(code) => {
            for instr in &code {
                write_instruction(out, instr, note, c)?;
            }
        }
        Err(err) => {
            writeln!(out, "  {}", c.paint(c.meta, format_args!("; undecodable: {err}")))?;
            write_hex(out, &note.code, c)?;
        }
    }

    for chunk in &note.unknown {
        if let Chunk::Unknown {
            type_id,
            version,
            payload,
        } = chunk
        {
            let line = format!("unknown    type {type_id} v{version}, {} bytes", payload.len());
            writeln!(out, "{}", c.paint(c.meta, line))?;
        }
    }
    Ok(())
}

fn write_instruction(
    out: &mut impl Write,
    instr: &Instruction,
    note: &Note,
    c: &Colors,
) -> fmt::Result {
    let offset = format!("{:04x}", instr.offset);
    write!(
        out,
        "  {}  {}",
        c.paint(c.meta, offset),
        c.paint(c.opcode, instr.opcode)
    )?;
    let operand = match instr.operand {
        Operand::None => None,
        Operand::Unsigned(v) => Some(v.to_string()),
        Operand::Signed(v) => Some(v.to_string()),
        Operand::Index(i) => Some(i.to_string()),
        Operand::Offset(d) => Some(d.to_string()),
        Operand::External(e) => Some(e.to_string()),
    };
    if let Some(operand) = operand {
        write!(out, " {}", c.paint(c.operand, operand))?;
    }

    let comment = match (instr.opcode, instr.branch_target()) {
        (_, Some(target)) if target as usize == note.code.len() => {
            Some(format!("-> {target:04x} (return)"))
        }
        (_, Some(target)) => Some(format!("-> {target:04x}")),
        (Opcode::LoadExternal, None) => match instr.operand {
            Operand::External(e) => note.externals.get(e as usize).map(|s| s.name.clone()),
            _ => None,
        },
        _ => None,
    };
    if let Some(comment) = comment {
        write!(out, "{}", c.paint(c.meta, format_args!("  ; {comment}")))?;
    }
    out.write_char('\n')
}

fn write_hex(out: &mut impl Write, bytes: &[u8], c: &Colors) -> fmt::Result {
    for (i, row) in bytes.chunks(16).enumerate() {
        write!(out, "  {} ", c.paint(c.meta, format_args!("{:04x}", i * 16)))?;
        for b in row {
            write!(out, " {b:02x}")?;
        }
        out.write_char('\n')?;
    }
    Ok(())
}
