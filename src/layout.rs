//! Physical label geometry.
//!
//! All positions are in device dots from the top-left corner of the label.

/// Top-left anchor of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Origin {
    pub x: u32,
    pub y: u32,
}

/// Filled horizontal rule drawn with a graphic box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub origin: Origin,
    pub width: u32,
    pub thickness: u32,
}

/// Text field printed with the scalable built-in font, rotated 90 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextField {
    pub origin: Origin,
    /// Character height in dots.
    pub height: u32,
    /// Character width in dots.
    pub width: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub dots_per_mm: u32,
    /// Print width in dots.
    pub width: u32,
    /// Label length in dots.
    pub length: u32,
    pub symbol_origin: Origin,
    /// Requested symbol side length in dots.
    pub symbol_dots: u32,
    pub separator: Rule,
    pub identifier: TextField,
    pub model: TextField,
    pub manufacturer: TextField,
}

impl Layout {
    /// 76 x 174 mm direct thermal stock at 8 dots/mm (203 dpi).
    pub const STANDARD: Layout = Layout {
        dots_per_mm: 8,
        width: 608,
        length: 1392,
        symbol_origin: Origin { x: 54, y: 40 },
        symbol_dots: 500,
        separator: Rule {
            origin: Origin { x: 30, y: 572 },
            width: 548,
            thickness: 4,
        },
        identifier: TextField {
            origin: Origin { x: 460, y: 610 },
            height: 64,
            width: 36,
        },
        model: TextField {
            origin: Origin { x: 360, y: 610 },
            height: 44,
            width: 30,
        },
        manufacturer: TextField {
            origin: Origin { x: 280, y: 610 },
            height: 44,
            width: 30,
        },
    };
}

impl Default for Layout {
    fn default() -> Self {
        Self::STANDARD
    }
}
