/// Flex 11-byte name field decoding

use crate::error::{FlexError, Result};
use crate::format::constants::{NAME_BASE_LEN, NAME_FIELD_LEN};

/// Check a byte against the Flex name charset
///
/// Allowed: `A-Z`, `0-9`, `-`, `_`, `0xFF` (unused), space (padding), `*`, `.` and NUL.
pub fn is_name_byte(byte: u8) -> bool {
    matches!(byte, b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'_' | 0xFF | b' ' | b'*' | b'.' | 0)
}

/// Decode an 11-byte Flex name field into a string
///
/// NUL bytes are skipped. When `separator` is set, a `.` is inserted between
/// the 8-byte base name and the extension, and any space in the field is
/// rejected. If byte 8 is NUL the field has no extension and decoding stops
/// after the base name (bytes 9 and 10 are not examined).
///
/// ```
/// use flexnet::format::format_name;
///
/// let name = format_name(b"HELLO\0\0\0TXT", true)?;
/// assert_eq!(name, "HELLO.TXT");
///
/// let label = format_name(b"MYDISK\0\0\0\0\0", false)?;
/// assert_eq!(label, "MYDISK");
/// # Ok::<(), flexnet::FlexError>(())
/// ```
pub fn format_name(field: &[u8; NAME_FIELD_LEN], separator: bool) -> Result<String> {
    let mut name = String::with_capacity(NAME_FIELD_LEN + 1);

    for (pos, &byte) in field.iter().enumerate() {
        if !is_name_byte(byte) {
            return Err(FlexError::invalid_name(format!(
                "byte 0x{:02X} at position {}",
                byte, pos
            )));
        }

        if separator && byte == b' ' {
            return Err(FlexError::invalid_name(format!(
                "space at position {} in file name",
                pos
            )));
        }

        if byte != 0 {
            name.push(char::from(byte));
        }

        if pos == NAME_BASE_LEN - 1 {
            if field[NAME_BASE_LEN] == 0 {
                break;
            }
            if separator {
                name.push('.');
            }
        }
    }

    Ok(name)
}
