/// A straight (non-premultiplied) sRGB color with 8 bits per channel.
#[repr(C)]
#[derive(Copy, Clone, PartialEq, Eq, Hash, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}
impl Color {
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
    #[must_use]
    pub fn as_array(self) -> [u8; 4] {
        bytemuck::cast(self)
    }
    /// Parse `#rgb`, `#rgba`, `#rrggbb`, or `#rrggbbaa`. The leading `#` is optional.
    pub fn from_hex(hex: &str) -> Result<Self, ColorParseError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if !digits.is_ascii() {
            return Err(ColorParseError::InvalidDigit);
        }
        let nibble = |c: u8| -> Result<u8, ColorParseError> {
            (c as char)
                .to_digit(16)
                // to_digit(16) < 16
                .map(|d| d as u8)
                .ok_or(ColorParseError::InvalidDigit)
        };
        let bytes = digits.as_bytes();
        let channels: Result<Vec<u8>, _> = match bytes.len() {
            3 | 4 => bytes.iter().map(|&c| nibble(c).map(|n| n * 17)).collect(),
            6 | 8 => bytes
                .chunks_exact(2)
                .map(|pair| Ok(nibble(pair[0])? << 4 | nibble(pair[1])?))
                .collect(),
            len => return Err(ColorParseError::BadLength(len)),
        };
        match channels?.as_slice() {
            &[r, g, b] => Ok(Self::rgb(r, g, b)),
            &[r, g, b, a] => Ok(Self::rgba(r, g, b, a)),
            // Lengths checked above.
            _ => Err(ColorParseError::BadLength(bytes.len())),
        }
    }
}
impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}
impl std::str::FromStr for Color {
    type Err = ColorParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s.trim())
    }
}
impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Self { r, g, b, a } = *self;
        if a == 255 {
            write!(f, "#{r:02x}{g:02x}{b:02x}")
        } else {
            write!(f, "#{r:02x}{g:02x}{b:02x}{a:02x}")
        }
    }
}
impl std::fmt::Debug for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Color({self})")
    }
}
impl From<[u8; 4]> for Color {
    fn from(value: [u8; 4]) -> Self {
        bytemuck::cast(value)
    }
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorParseError {
    #[error("expected 3, 4, 6, or 8 hex digits, found {0}")]
    BadLength(usize),
    #[error("invalid hex digit")]
    InvalidDigit,
}

#[cfg(test)]
mod test {
    use super::{Color, ColorParseError};

    #[test]
    fn parse_forms() {
        assert_eq!("#000000".parse(), Ok(Color::BLACK));
        assert_eq!("#fff".parse(), Ok(Color::WHITE));
        assert_eq!("ff000080".parse(), Ok(Color::rgba(255, 0, 0, 128)));
        assert_eq!("#0f08".parse(), Ok(Color::rgba(0, 255, 0, 136)));
    }
    #[test]
    fn parse_errors() {
        assert_eq!(
            "#12345".parse::<Color>(),
            Err(ColorParseError::BadLength(5))
        );
        assert_eq!(
            "#gggggg".parse::<Color>(),
            Err(ColorParseError::InvalidDigit)
        );
        assert_eq!("#ééé".parse::<Color>(), Err(ColorParseError::InvalidDigit));
    }
    #[test]
    fn display() {
        assert_eq!(Color::rgb(0x12, 0xab, 0x00).to_string(), "#12ab00");
        assert_eq!(Color::TRANSPARENT.to_string(), "#00000000");
        assert_eq!(Color::from([1, 2, 3, 4]).as_array(), [1, 2, 3, 4]);
    }
}
