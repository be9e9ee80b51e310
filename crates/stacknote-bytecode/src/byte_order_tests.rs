use crate::ByteOrder;

#[test]
fn mark_identifies_order() {
    assert_eq!(ByteOrder::Little.mark(), [0x34, 0x12]);
    assert_eq!(ByteOrder::Big.mark(), [0x12, 0x34]);
    assert_eq!(ByteOrder::from_mark([0x34, 0x12]), Some(ByteOrder::Little));
    assert_eq!(ByteOrder::from_mark([0x12, 0x34]), Some(ByteOrder::Big));
    assert_eq!(ByteOrder::from_mark([0x00, 0x00]), None);
}

#[test]
fn write_uint_truncates_to_width() {
    let mut out = Vec::new();
    ByteOrder::Little.write_uint(&mut out, 0x0102_0304, 4);
    ByteOrder::Big.write_uint(&mut out, 0x0102_0304, 4);
    ByteOrder::Big.write_uint(&mut out, 0xabcd, 2);
    assert_eq!(
        out,
        [0x04, 0x03, 0x02, 0x01, 0x01, 0x02, 0x03, 0x04, 0xab, 0xcd]
    );
}

#[test]
fn read_int_sign_extends() {
    assert_eq!(ByteOrder::Little.read_int(&[0xfe, 0xff]), -2);
    assert_eq!(ByteOrder::Big.read_int(&[0xff, 0xfe]), -2);
    assert_eq!(ByteOrder::Little.read_int(&[0x80]), -128);
    assert_eq!(ByteOrder::Little.read_uint(&[0x80]), 128);
    assert_eq!(ByteOrder::Big.read_int(&[0x7f, 0xff, 0xff, 0xff]), i32::MAX as i64);
}

#[test]
fn display_names() {
    assert_eq!(ByteOrder::Little.to_string(), "little-endian");
    assert_eq!(ByteOrder::Big.to_string(), "big-endian");
}
