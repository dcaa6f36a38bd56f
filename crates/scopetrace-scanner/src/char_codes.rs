//! Character classification utilities.

/// `[A-Za-z_$]`
#[inline]
pub const fn is_identifier_start(byte: u8) -> bool {
    byte.is_ascii_alphabetic() || byte == b'_' || byte == b'$'
}

/// `[A-Za-z0-9_$]`
#[inline]
pub const fn is_identifier_part(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'$'
}

/// Line terminators per ECMAScript: LF, CR, LS, PS.
#[inline]
pub const fn is_line_break(ch: char) -> bool {
    matches!(ch, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// Whitespace other than line terminators, including BOM and NBSP.
#[inline]
pub fn is_whitespace(ch: char) -> bool {
    !is_line_break(ch) && (ch.is_whitespace() || ch == '\u{feff}')
}

/// Characters that may follow the digits of a numeric literal.
#[inline]
pub const fn is_numeric_part(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}
