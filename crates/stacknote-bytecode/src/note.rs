//! One function's chunk set.

use log::debug;

use crate::chunk::{
    CHUNK_CODE, CHUNK_CODEINFO, CHUNK_EXTERNALS, CHUNK_SIGNATURE, Chunk, CodeInfo, kind_name,
};
use crate::error::FormatError;
use crate::reader::Reader;
use crate::signature::Signature;

/// Note type of a compiled function.
pub const NOTE_FUNCTION: u16 = 1;
pub const NOTE_VERSION: u16 = 1;

const NOTE_HEADER_SIZE: usize = 8;

/// A compiled function: signature, code-info, externals and code.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Note {
    pub signature: Signature,
    pub code_info: CodeInfo,
    pub externals: Vec<Signature>,
    pub code: Vec<u8>,
    /// Chunks this reader does not understand, kept in file order.
    pub unknown: Vec<Chunk>,
}

impl Note {
    pub fn new(
        signature: Signature,
        code_info: CodeInfo,
        externals: Vec<Signature>,
        code: Vec<u8>,
    ) -> Self {
        Self {
            signature,
            code_info,
            externals,
            code,
            unknown: Vec::new(),
        }
    }

    /// Chunks in emission order.
    pub fn chunks(&self) -> Vec<Chunk> {
        let mut chunks = vec![
            Chunk::Signature(self.signature.clone()),
            Chunk::CodeInfo(self.code_info),
            Chunk::Externals(self.externals.clone()),
            Chunk::Code(self.code.clone()),
        ];
        chunks.extend(self.unknown.iter().cloned());
        chunks
    }

    /// Append the framed note.
    pub fn encode(&self, out: &mut Vec<u8>) -> Result<(), FormatError> {
        let mut body = Vec::new();
        for chunk in self.chunks() {
            chunk.encode(&mut body)?;
        }
        let length = u32::try_from(body.len()).map_err(|_| FormatError::TooLarge {
            what: "note",
            len: body.len(),
            max: u32::MAX as usize,
        })?;
        out.extend_from_slice(&NOTE_FUNCTION.to_le_bytes());
        out.extend_from_slice(&NOTE_VERSION.to_le_bytes());
        out.extend_from_slice(&length.to_le_bytes());
        out.extend_from_slice(&body);
        Ok(())
    }

    /// Assemble a note from decoded chunks.
    pub fn from_chunks(chunks: Vec<Chunk>) -> Result<Self, FormatError> {
        let mut signature = None;
        let mut code_info = None;
        let mut externals = None;
        let mut code = None;
        let mut unknown = Vec::new();

        for chunk in chunks {
            let name = chunk.kind_name();
            let duplicate = match chunk {
                Chunk::Signature(s) => signature.replace(s).is_some(),
                Chunk::CodeInfo(c) => code_info.replace(c).is_some(),
                Chunk::Externals(e) => externals.replace(e).is_some(),
                Chunk::Code(c) => code.replace(c).is_some(),
                other @ Chunk::Unknown { .. } => {
                    unknown.push(other);
                    false
                }
            };
            if duplicate {
                return Err(FormatError::DuplicateChunk(name));
            }
        }

        let missing = |type_id: u16| {
            let chunk = kind_name(type_id);
            match unknown.iter().find(|c| c.type_id() == type_id) {
                Some(c) => FormatError::UnsupportedChunkVersion {
                    chunk,
                    version: c.version(),
                },
                None => FormatError::MissingChunk(chunk),
            }
        };

        let signature = signature.ok_or_else(|| missing(CHUNK_SIGNATURE))?;
        let code_info = code_info.ok_or_else(|| missing(CHUNK_CODEINFO))?;
        let code = code.ok_or_else(|| missing(CHUNK_CODE))?;
        if externals.is_none()
            && let Some(c) = unknown.iter().find(|c| c.type_id() == CHUNK_EXTERNALS)
        {
            return Err(FormatError::UnsupportedChunkVersion {
                chunk: "externals",
                version: c.version(),
            });
        }

        Ok(Self {
            signature,
            code_info,
            externals: externals.unwrap_or_default(),
            code,
            unknown,
        })
    }

    /// Read one framed note. Returns `Ok(None)` for notes of another type or
    /// version, which are skipped by length.
    pub(crate) fn decode(reader: &mut Reader<'_>) -> Result<Option<Self>, FormatError> {
        if reader.remaining() < NOTE_HEADER_SIZE {
            reader.take(NOTE_HEADER_SIZE)?;
        }
        let note_type = reader.u16_le()?;
        let note_version = reader.u16_le()?;
        let length = reader.u32_le()? as usize;
        let body = reader.take(length)?;

        if (note_type, note_version) != (NOTE_FUNCTION, NOTE_VERSION) {
            debug!("skipping note type {note_type} v{note_version} ({length} bytes)");
            return Ok(None);
        }
        let chunks = Chunk::decode_all(body)?;
        Self::from_chunks(chunks).map(Some)
    }
}
