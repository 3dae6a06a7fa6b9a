//! Overlap classification and its color encoding.

use std::fmt;

use serde::Serialize;

/// Classification of a node by how it participates in groupings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OverlapLevel {
    /// Neither overlapping nor hierarchical
    #[default]
    Base,
    /// Reached through more than one grouping
    OverlapOnly,
    /// Nested grouping with its own members
    HierarchyOnly,
    /// Overlapping and hierarchical
    Both,
}

impl OverlapLevel {
    /// Map a wire code to a level. Unknown codes fall back to `Base`.
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => Self::OverlapOnly,
            2 => Self::HierarchyOnly,
            3 => Self::Both,
            _ => Self::Base,
        }
    }

    pub fn code(self) -> i64 {
        match self {
            Self::Base => 0,
            Self::OverlapOnly => 1,
            Self::HierarchyOnly => 2,
            Self::Both => 3,
        }
    }

    pub fn from_flags(overlapping: bool, hierarchical: bool) -> Self {
        match (overlapping, hierarchical) {
            (true, true) => Self::Both,
            (true, false) => Self::OverlapOnly,
            (false, true) => Self::HierarchyOnly,
            (false, false) => Self::Base,
        }
    }

    pub fn color(self) -> Color {
        match self {
            Self::Base => Color::Gray,
            Self::OverlapOnly => Color::Purple,
            Self::HierarchyOnly => Color::Yellow,
            Self::Both => Color::Red,
        }
    }
}

/// Node color palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Gray,
    Purple,
    Yellow,
    Red,
}

impl Color {
    pub fn name(self) -> &'static str {
        match self {
            Self::Gray => "gray",
            Self::Purple => "purple",
            Self::Yellow => "yellow",
            Self::Red => "red",
        }
    }

    /// sRGB components, matching the CSS named colors.
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            Self::Gray => (0x80, 0x80, 0x80),
            Self::Purple => (0x80, 0x00, 0x80),
            Self::Yellow => (0xff, 0xff, 0x00),
            Self::Red => (0xff, 0x00, 0x00),
        }
    }

    pub fn hex(self) -> String {
        let (r, g, b) = self.rgb();
        format!("#{r:02x}{g:02x}{b:02x}")
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Color for an overlap code. Total over all integers.
pub fn classify(code: i64) -> Color {
    OverlapLevel::from_code(code).color()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, Color::Gray)]
    #[case(1, Color::Purple)]
    #[case(2, Color::Yellow)]
    #[case(3, Color::Red)]
    fn given_known_code_when_classifying_then_returns_palette_color(
        #[case] code: i64,
        #[case] expected: Color,
    ) {
        assert_eq!(classify(code), expected);
    }

    #[rstest]
    #[case(-1)]
    #[case(4)]
    #[case(42)]
    #[case(i64::MIN)]
    #[case(i64::MAX)]
    fn given_unknown_code_when_classifying_then_falls_back_to_gray(#[case] code: i64) {
        assert_eq!(classify(code), Color::Gray);
    }

    #[test]
    fn given_same_code_when_classified_repeatedly_then_same_color() {
        for code in -5..10 {
            assert_eq!(classify(code), classify(code));
        }
    }

    #[test]
    fn given_level_when_round_tripping_code_then_identity() {
        for level in [
            OverlapLevel::Base,
            OverlapLevel::OverlapOnly,
            OverlapLevel::HierarchyOnly,
            OverlapLevel::Both,
        ] {
            assert_eq!(OverlapLevel::from_code(level.code()), level);
        }
    }

    #[test]
    fn given_flags_when_combined_then_maps_to_level() {
        assert_eq!(OverlapLevel::from_flags(true, true), OverlapLevel::Both);
        assert_eq!(OverlapLevel::from_flags(true, false), OverlapLevel::OverlapOnly);
        assert_eq!(OverlapLevel::from_flags(false, true), OverlapLevel::HierarchyOnly);
        assert_eq!(OverlapLevel::from_flags(false, false), OverlapLevel::Base);
    }

    #[test]
    fn given_color_when_formatting_hex_then_css_value() {
        assert_eq!(Color::Purple.hex(), "#800080");
        assert_eq!(Color::Red.to_string(), "red");
    }
}
