use crate::test_fixtures::factorial_note;
use crate::{FormatError, HEADER_SIZE, Header, MAGIC, NoteFile, VERSION};

fn factorial_file() -> Vec<u8> {
    NoteFile::new(vec![factorial_note()]).to_bytes().unwrap()
}

#[test]
fn header_round_trip() {
    let header = Header {
        magic: MAGIC,
        version: VERSION,
        checksum: 0xdead_beef,
        total_size: 42,
    };
    let bytes = header.to_bytes();
    assert_eq!(&bytes[0..4], b"SNTE");
    assert_eq!(Header::from_bytes(&bytes), header);
}

#[test]
fn file_round_trip() {
    let bytes = factorial_file();
    let header = Header::from_bytes(bytes.first_chunk::<HEADER_SIZE>().unwrap());
    assert_eq!(header.total_size as usize, bytes.len());
    assert_eq!(header.checksum, crc32fast::hash(&bytes[HEADER_SIZE..]));

    let file = NoteFile::from_bytes(&bytes).unwrap();
    assert_eq!(file.notes, [factorial_note()]);
    assert_eq!(file.skipped, 0);
    assert!(file.find("factorial").is_some());
    assert!(file.find("missing").is_none());
}

#[test]
fn note_framing() {
    let bytes = factorial_file();
    // note_type 1, note_version 1
    assert_eq!(&bytes[16..20], [1, 0, 1, 0]);
    let length = u32::from_le_bytes([bytes[20], bytes[21], bytes[22], bytes[23]]);
    assert_eq!(length as usize, bytes.len() - 24);
}

#[test]
fn unknown_notes_are_skipped() {
    let mut body = Vec::new();
    body.extend_from_slice(&[7, 0, 1, 0, 3, 0, 0, 0, 1, 2, 3]);
    factorial_note().encode(&mut body).unwrap();

    let header = Header {
        checksum: crc32fast::hash(&body),
        total_size: (HEADER_SIZE + body.len()) as u32,
        ..Header::default()
    };
    let mut bytes = header.to_bytes().to_vec();
    bytes.extend(body);

    let file = NoteFile::from_bytes(&bytes).unwrap();
    assert_eq!(file.notes.len(), 1);
    assert_eq!(file.skipped, 1);
}

#[test]
fn rejects_bad_magic() {
    let mut bytes = factorial_file();
    bytes[0] = b'X';
    let err = NoteFile::from_bytes(&bytes).unwrap_err();
    assert!(matches!(err, FormatError::InvalidMagic));
    assert_eq!(err.to_string(), "invalid magic: expected SNTE");
}

#[test]
fn rejects_unsupported_version() {
    let mut bytes = factorial_file();
    bytes[4] = 99;
    let err = NoteFile::from_bytes(&bytes).unwrap_err();
    assert!(matches!(err, FormatError::UnsupportedVersion(99)));
}

#[test]
fn rejects_short_file() {
    let err = NoteFile::from_bytes(b"SNTE").unwrap_err();
    assert!(matches!(err, FormatError::FileTooSmall(4)));
}

#[test]
fn rejects_truncation() {
    let bytes = factorial_file();
    let err = NoteFile::from_bytes(&bytes[..bytes.len() - 3]).unwrap_err();
    assert!(matches!(err, FormatError::SizeMismatch { .. }));
}

#[test]
fn rejects_corruption() {
    let mut bytes = factorial_file();
    let last = bytes.len() - 1;
    bytes[last] ^= 0xff;
    let err = NoteFile::from_bytes(&bytes).unwrap_err();
    assert!(matches!(err, FormatError::ChecksumMismatch { .. }));
}

#[test]
fn from_path_reports_io() {
    let err = NoteFile::from_path("/nonexistent/stacknote/file.note").unwrap_err();
    assert!(matches!(err, FormatError::Io(_)));
}
