use stacknote_core::Colors;

use crate::test_fixtures::factorial_note;
use crate::{Chunk, NoteFile, dump};

#[test]
fn dump_factorial() {
    let file = NoteFile::new(vec![factorial_note()]);
    insta::assert_snapshot!(dump(&file, Colors::OFF), @r"
    [factorial]
    signature  factorial(int) -> int
    code-info  max_stack 2, little-endian
    externals  1
      E0  factorial(int) -> int
    code       18 bytes
      0000  dup
      0001  lit1
      0002  gt
      0003  bra 4  ; -> 000a
      0006  lit1
      0007  skip 8  ; -> 0012 (return)
      000a  dup
      000b  lit1
      000c  minus
      000d  load_external 0  ; factorial
      0010  call
      0011  mul
    ");
}

#[test]
fn dump_unknown_and_undecodable() {
    let mut note = factorial_note();
    note.code = vec![0x12, 0xff];
    note.unknown.push(Chunk::Unknown {
        type_id: 9,
        version: 3,
        payload: vec![0; 4],
    });
    let file = NoteFile {
        notes: vec![note],
        skipped: 1,
    };
    insta::assert_snapshot!(dump(&file, Colors::OFF), @r"
    [factorial]
    signature  factorial(int) -> int
    code-info  max_stack 2, little-endian
    externals  1
      E0  factorial(int) -> int
    code       2 bytes
      ; undecodable: unknown opcode 0xff at offset 1
      0000  12 ff
    unknown    type 9 v3, 4 bytes
    ; 1 note(s) skipped
    ");
}
