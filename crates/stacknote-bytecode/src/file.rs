//! Note file: a 16-byte header followed by notes.

use std::path::Path;

use log::debug;

use crate::error::FormatError;
use crate::note::Note;
use crate::reader::Reader;

pub const MAGIC: [u8; 4] = *b"SNTE";
pub const VERSION: u32 = 1;
pub const HEADER_SIZE: usize = 16;

/// File header.
///
/// Layout (little-endian):
/// - 0-3: magic `b"SNTE"`
/// - 4-7: format version
/// - 8-11: CRC32 of everything after the header
/// - 12-15: total file size in bytes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Header {
    pub magic: [u8; 4],
    pub version: u32,
    pub checksum: u32,
    pub total_size: u32,
}

impl Default for Header {
    fn default() -> Self {
        Self {
            magic: MAGIC,
            version: VERSION,
            checksum: 0,
            total_size: 0,
        }
    }
}

impl Header {
    pub fn from_bytes(bytes: &[u8; HEADER_SIZE]) -> Self {
        Self {
            magic: [bytes[0], bytes[1], bytes[2], bytes[3]],
            version: u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
            checksum: u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]),
            total_size: u32::from_le_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]),
        }
    }

    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[0..4].copy_from_slice(&self.magic);
        bytes[4..8].copy_from_slice(&self.version.to_le_bytes());
        bytes[8..12].copy_from_slice(&self.checksum.to_le_bytes());
        bytes[12..16].copy_from_slice(&self.total_size.to_le_bytes());
        bytes
    }

    pub fn validate_magic(&self) -> bool {
        self.magic == MAGIC
    }

    pub fn validate_version(&self) -> bool {
        self.version == VERSION
    }
}

/// Decoded note file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NoteFile {
    pub notes: Vec<Note>,
    /// Notes of an unknown type or version that were skipped.
    pub skipped: usize,
}

impl NoteFile {
    pub fn new(notes: Vec<Note>) -> Self {
        Self { notes, skipped: 0 }
    }

    /// Serialize with a filled-in header.
    pub fn to_bytes(&self) -> Result<Vec<u8>, FormatError> {
        let mut body = Vec::new();
        for note in &self.notes {
            note.encode(&mut body)?;
        }
        let total = HEADER_SIZE + body.len();
        let total_size = u32::try_from(total).map_err(|_| FormatError::TooLarge {
            what: "note file",
            len: total,
            max: u32::MAX as usize,
        })?;
        let header = Header {
            checksum: crc32fast::hash(&body),
            total_size,
            ..Header::default()
        };

        let mut out = Vec::with_capacity(total);
        out.extend_from_slice(&header.to_bytes());
        out.extend_from_slice(&body);
        Ok(out)
    }

    /// Validate the header and decode every note.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FormatError> {
        let Some(head) = bytes.first_chunk::<HEADER_SIZE>() else {
            return Err(FormatError::FileTooSmall(bytes.len()));
        };
        let header = Header::from_bytes(head);
        if !header.validate_magic() {
            return Err(FormatError::InvalidMagic);
        }
        if !header.validate_version() {
            return Err(FormatError::UnsupportedVersion(header.version));
        }
        if header.total_size as usize != bytes.len() {
            return Err(FormatError::SizeMismatch {
                header: header.total_size,
                actual: bytes.len(),
            });
        }

        let body = &bytes[HEADER_SIZE..];
        let computed = crc32fast::hash(body);
        if computed != header.checksum {
            return Err(FormatError::ChecksumMismatch {
                header: header.checksum,
                computed,
            });
        }

        let mut reader = Reader::new(body, "note header");
        let mut file = NoteFile::default();
        while !reader.is_empty() {
            match Note::decode(&mut reader)? {
                Some(note) => file.notes.push(note),
                None => file.skipped += 1,
            }
        }
        debug!(
            "decoded {} notes ({} skipped)",
            file.notes.len(),
            file.skipped
        );
        Ok(file)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, FormatError> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    pub fn find(&self, name: &str) -> Option<&Note> {
        self.notes.iter().find(|n| n.signature.name == name)
    }
}
