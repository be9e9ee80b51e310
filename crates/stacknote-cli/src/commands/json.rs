//! Serializable view of a decoded note file, for `dump --json`.

use serde::Serialize;
use stacknote_bytecode::{Chunk, Note, NoteFile, Operand, Signature, decode};

#[derive(Debug, Serialize)]
pub struct FileView {
    pub notes: Vec<NoteView>,
    pub skipped: usize,
}

#[derive(Debug, Serialize)]
pub struct SignatureView {
    pub name: String,
    pub returns: &'static str,
    pub params: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct NoteView {
    #[serde(flatten)]
    pub signature: SignatureView,
    pub byte_order: &'static str,
    pub max_stack: u16,
    pub externals: Vec<SignatureView>,
    pub code_size: usize,
    pub code: Vec<InstructionView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub undecodable: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unknown_chunks: Vec<UnknownChunkView>,
}

#[derive(Debug, Serialize)]
pub struct InstructionView {
    pub offset: usize,
    pub op: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operand: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct UnknownChunkView {
    pub type_id: u16,
    pub version: u16,
    pub size: usize,
}

impl From<&Signature> for SignatureView {
    fn from(sig: &Signature) -> Self {
        Self {
            name: sig.name.clone(),
            returns: sig.returns.name(),
            params: sig.params.iter().map(|p| p.name()).collect(),
        }
    }
}

impl From<&NoteFile> for FileView {
    fn from(file: &NoteFile) -> Self {
        Self {
            notes: file.notes.iter().map(NoteView::from).collect(),
            skipped: file.skipped,
        }
    }
}

impl From<&Note> for NoteView {
    fn from(note: &Note) -> Self {
        let (code, undecodable) = match decode(&note.code, note.code_info.byte_order) {
            Ok(instrs) => (
                instrs
                    .iter()
                    .map(|instr| InstructionView {
                        offset: instr.offset,
                        op: instr.opcode.to_string(),
                        operand: operand_value(instr.operand),
                        target: instr.branch_target(),
                    })
                    .collect(),
                None,
            ),
            Err(err) => (Vec::new(), Some(err.to_string())),
        };
        let unknown_chunks = note
            .unknown
            .iter()
            .filter_map(|chunk| match chunk {
                Chunk::Unknown {
                    type_id,
                    version,
                    payload,
                } => Some(UnknownChunkView {
                    type_id: *type_id,
                    version: *version,
                    size: payload.len(),
                }),
                _ => None,
            })
            .collect();

        Self {
            signature: SignatureView::from(&note.signature),
            byte_order: note.code_info.byte_order.name(),
            max_stack: note.code_info.max_stack,
            externals: note.externals.iter().map(SignatureView::from).collect(),
            code_size: note.code.len(),
            code,
            undecodable,
            unknown_chunks,
        }
    }
}

fn operand_value(operand: Operand) -> Option<i64> {
    match operand {
        Operand::None => None,
        Operand::Unsigned(v) => Some(v as i64),
        Operand::Signed(v) => Some(v),
        Operand::Index(i) => Some(i as i64),
        Operand::Offset(d) => Some(d as i64),
        Operand::External(e) => Some(e as i64),
    }
}
