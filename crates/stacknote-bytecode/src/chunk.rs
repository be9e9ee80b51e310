//! Versioned, length-prefixed chunks.
//!
//! Frame: `{type_id: u16, version: u16, length: u32, payload}`, little-endian.
//! Decoding dispatches on `(type_id, version)`; anything unrecognised is kept
//! as [`Chunk::Unknown`] so newer producers stay readable.

use log::trace;

use crate::ByteOrder;
use crate::error::FormatError;
use crate::reader::Reader;
use crate::signature::Signature;

pub const CHUNK_CODE: u16 = 2;
pub const CHUNK_EXTERNALS: u16 = 4;
pub const CHUNK_SIGNATURE: u16 = 5;
pub const CHUNK_CODEINFO: u16 = 6;

/// Combined byte-order mark, `max_stack` and bytecode.
pub const LEGACY_CODE_VERSION: u16 = 1;
pub const CODE_VERSION: u16 = 2;
pub const EXTERNALS_VERSION: u16 = 1;
pub const SIGNATURE_VERSION: u16 = 1;
pub const CODEINFO_VERSION: u16 = 1;

const FRAME_SIZE: usize = 8;

/// Target byte order and stack requirement of a function.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CodeInfo {
    pub byte_order: ByteOrder,
    /// Slots needed above the incoming arguments.
    pub max_stack: u16,
}

impl CodeInfo {
    fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.byte_order.mark());
        self.byte_order.write_uint(out, self.max_stack as u64, 2);
    }

    fn decode(reader: &mut Reader<'_>) -> Result<Self, FormatError> {
        let mark = reader.take(2)?;
        let mark = [mark[0], mark[1]];
        let byte_order = ByteOrder::from_mark(mark)
            .ok_or(FormatError::InvalidByteOrderMark(u16::from_le_bytes(mark)))?;
        let max_stack = reader.uint(byte_order, 2)? as u16;
        Ok(Self {
            byte_order,
            max_stack,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Chunk {
    Signature(Signature),
    CodeInfo(CodeInfo),
    /// Functions referenced by `load_external`, in index order.
    Externals(Vec<Signature>),
    Code(Vec<u8>),
    Unknown {
        type_id: u16,
        version: u16,
        payload: Vec<u8>,
    },
}

impl Chunk {
    pub fn type_id(&self) -> u16 {
        match self {
            Self::Signature(_) => CHUNK_SIGNATURE,
            Self::CodeInfo(_) => CHUNK_CODEINFO,
            Self::Externals(_) => CHUNK_EXTERNALS,
            Self::Code(_) => CHUNK_CODE,
            Self::Unknown { type_id, .. } => *type_id,
        }
    }

    pub fn version(&self) -> u16 {
        match self {
            Self::Signature(_) => SIGNATURE_VERSION,
            Self::CodeInfo(_) => CODEINFO_VERSION,
            Self::Externals(_) => EXTERNALS_VERSION,
            Self::Code(_) => CODE_VERSION,
            Self::Unknown { version, .. } => *version,
        }
    }

    /// Human-readable kind, also used in error messages.
    pub fn kind_name(&self) -> &'static str {
        kind_name(self.type_id())
    }

    /// Append the framed chunk.
    pub fn encode(&self, out: &mut Vec<u8>) -> Result<(), FormatError> {
        let mut payload = Vec::new();
        match self {
            Self::Signature(sig) => sig.encode(&mut payload)?,
            Self::CodeInfo(info) => info.encode(&mut payload),
            Self::Externals(entries) => {
                let count = u16::try_from(entries.len()).map_err(|_| FormatError::TooLarge {
                    what: "externals table",
                    len: entries.len(),
                    max: u16::MAX as usize,
                })?;
                payload.extend_from_slice(&count.to_le_bytes());
                for entry in entries {
                    entry.encode(&mut payload)?;
                }
            }
            Self::Code(code) => payload.extend_from_slice(code),
            Self::Unknown { payload: raw, .. } => payload.extend_from_slice(raw),
        }

        let length = u32::try_from(payload.len()).map_err(|_| FormatError::TooLarge {
            what: "chunk",
            len: payload.len(),
            max: u32::MAX as usize,
        })?;
        out.extend_from_slice(&self.type_id().to_le_bytes());
        out.extend_from_slice(&self.version().to_le_bytes());
        out.extend_from_slice(&length.to_le_bytes());
        out.extend_from_slice(&payload);
        Ok(())
    }

    /// Decode a sequence of framed chunks filling `bytes` exactly.
    ///
    /// A legacy code chunk expands into a code-info chunk followed by a
    /// current code chunk.
    pub fn decode_all(bytes: &[u8]) -> Result<Vec<Chunk>, FormatError> {
        let mut reader = Reader::new(bytes, "chunk header");
        let mut chunks = Vec::new();

        while !reader.is_empty() {
            if reader.remaining() < FRAME_SIZE {
                // Surface the short read through `take`.
                reader.take(FRAME_SIZE)?;
            }
            let type_id = reader.u16_le()?;
            let version = reader.u16_le()?;
            let length = reader.u32_le()? as usize;
            let payload = reader.take(length)?;
            trace!("chunk type {type_id} v{version}, {length} bytes");
            decode_one(type_id, version, payload, &mut chunks)?;
        }

        Ok(chunks)
    }
}

fn decode_one(
    type_id: u16,
    version: u16,
    payload: &[u8],
    chunks: &mut Vec<Chunk>,
) -> Result<(), FormatError> {
    let what = kind_name(type_id);
    let mut r = Reader::new(payload, what);
    match (type_id, version) {
        (CHUNK_SIGNATURE, SIGNATURE_VERSION) => {
            chunks.push(Chunk::Signature(Signature::decode(&mut r)?));
        }
        (CHUNK_CODEINFO, CODEINFO_VERSION) => {
            chunks.push(Chunk::CodeInfo(CodeInfo::decode(&mut r)?));
        }
        (CHUNK_EXTERNALS, EXTERNALS_VERSION) => {
            let count = r.u16_le()? as usize;
            let entries = (0..count)
                .map(|_| Signature::decode(&mut r))
                .collect::<Result<Vec<_>, _>>()?;
            chunks.push(Chunk::Externals(entries));
        }
        (CHUNK_CODE, CODE_VERSION) => {
            chunks.push(Chunk::Code(payload.to_vec()));
            return Ok(());
        }
        (CHUNK_CODE, LEGACY_CODE_VERSION) => {
            let info = CodeInfo::decode(&mut r)?;
            let code = r.take(r.remaining())?.to_vec();
            chunks.push(Chunk::CodeInfo(info));
            chunks.push(Chunk::Code(code));
        }
        _ => {
            chunks.push(Chunk::Unknown {
                type_id,
                version,
                payload: payload.to_vec(),
            });
            return Ok(());
        }
    }
    r.finish()
}

pub(crate) fn kind_name(type_id: u16) -> &'static str {
    match type_id {
        CHUNK_CODE => "code",
        CHUNK_EXTERNALS => "externals",
        CHUNK_SIGNATURE => "signature",
        CHUNK_CODEINFO => "code-info",
        _ => "unknown",
    }
}
