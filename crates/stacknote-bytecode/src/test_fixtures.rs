use crate::{ByteOrder, CodeInfo, Note, Signature, ValueType};

/// `factorial(int) -> int`, recursing through its own externals entry.
pub(crate) const FACTORIAL_CODE: [u8; 18] = [
    0x12, 0x31, 0x2b, 0x28, 0x04, 0x00, 0x31, 0x2f, 0x08, 0x00, 0x12, 0x31, 0x1c, 0xe0, 0x00, 0x00,
    0xe1, 0x1e,
];

pub(crate) fn factorial_signature() -> Signature {
    Signature::new("factorial", ValueType::Int, vec![ValueType::Int])
}

pub(crate) fn factorial_note() -> Note {
    Note::new(
        factorial_signature(),
        CodeInfo {
            byte_order: ByteOrder::Little,
            max_stack: 2,
        },
        vec![factorial_signature()],
        FACTORIAL_CODE.to_vec(),
    )
}
