use core::fmt;
use std::str::FromStr;

use super::ChartError;

/// An sRGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const BLUE: Self = Self::rgb(0, 0, 255);
    pub const GOLD: Self = Self::rgb(255, 215, 0);
    pub const GRAY: Self = Self::rgb(128, 128, 128);
    pub const GREEN: Self = Self::rgb(0, 128, 0);
    pub const MAROON: Self = Self::rgb(128, 0, 0);
    pub const ORANGE: Self = Self::rgb(255, 165, 0);
    pub const PURPLE: Self = Self::rgb(128, 0, 128);
    pub const RED: Self = Self::rgb(255, 0, 0);

    /// Colours assigned to series that don't set one, in order.
    pub const CYCLE: [Self; 5] = [
        Self::rgb(0x1f, 0x77, 0xb4),
        Self::rgb(0xff, 0x7f, 0x0e),
        Self::rgb(0x2c, 0xa0, 0x2c),
        Self::rgb(0xd6, 0x27, 0x28),
        Self::rgb(0x94, 0x67, 0xbd),
    ];

    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Default colour for the `index`-th series of a panel.
    #[must_use]
    pub const fn cycle(index: usize) -> Self {
        Self::CYCLE[index % Self::CYCLE.len()]
    }

    /// Parse a colour name (`red`, `maroon`, ...) or a `#rrggbb` literal.
    ///
    /// # Errors
    ///
    /// Returns [`ChartError::UnknownColor`] for anything else.
    pub fn parse(s: &str) -> Result<Self, ChartError> {
        let s = s.trim();
        let named = match s.to_ascii_lowercase().as_str() {
            "black" => Some(Self::BLACK),
            "blue" => Some(Self::BLUE),
            "gold" => Some(Self::GOLD),
            "gray" | "grey" => Some(Self::GRAY),
            "green" => Some(Self::GREEN),
            "maroon" => Some(Self::MAROON),
            "orange" => Some(Self::ORANGE),
            "purple" => Some(Self::PURPLE),
            "red" => Some(Self::RED),
            _ => None,
        };
        if let Some(color) = named {
            return Ok(color);
        }

        let unknown = || ChartError::UnknownColor(s.to_owned());
        let hex = s.strip_prefix('#').ok_or_else(unknown)?;
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(unknown());
        }
        let channel = |range: std::ops::Range<usize>| {
            hex.get(range)
                .and_then(|h| u8::from_str_radix(h, 16).ok())
                .ok_or_else(unknown)
        };
        Ok(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_named_and_hex() {
        assert_eq!(Color::parse("Red").unwrap(), Color::RED);
        assert_eq!(Color::parse("#800000").unwrap(), Color::MAROON);
        assert_eq!(Color::MAROON.to_string(), "#800000");
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert_eq!(
            Color::parse("chartreuse"),
            Err(ChartError::UnknownColor("chartreuse".to_owned()))
        );
        assert!(Color::parse("#12345").is_err());
        assert!(Color::parse("#12345g").is_err());
    }

    #[test]
    fn test_cycle_wraps() {
        assert_eq!(Color::cycle(0), Color::cycle(5));
    }
}
