//! QR symbol encoding.
//!
//! This is the only module that touches the `qrcode` crate. Everything
//! downstream works on [`SymbolMatrix`].

use log::debug;
use qrcode::{Color, EcLevel, QrCode};

use crate::error::Error;

/// Error correction level used for every printed label.
pub const ERROR_CORRECTION: Level = Level::M;

/// QR error correction level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// ~7% recovery
    L,
    /// ~15% recovery
    M,
    /// ~25% recovery
    Q,
    /// ~30% recovery
    H,
}

impl From<Level> for EcLevel {
    fn from(level: Level) -> Self {
        match level {
            Level::L => EcLevel::L,
            Level::M => EcLevel::M,
            Level::Q => EcLevel::Q,
            Level::H => EcLevel::H,
        }
    }
}

/// Square grid of symbol modules, `true` is dark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolMatrix {
    width: usize,
    modules: Vec<bool>,
}

impl SymbolMatrix {
    /// Side length in modules.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Module at column `x`, row `y`, or `None` outside the symbol.
    pub fn get(&self, x: usize, y: usize) -> Option<bool> {
        if x < self.width && y < self.width {
            Some(self.is_dark(x, y))
        } else {
            None
        }
    }

    pub(crate) fn is_dark(&self, x: usize, y: usize) -> bool {
        self.modules[y * self.width + x]
    }
}

/// Encode `data` into a symbol matrix.
///
/// The symbol version grows with the payload, so the matrix width is a
/// function of the data length and `level`.
pub fn encode(data: &str, level: Level) -> Result<SymbolMatrix, Error> {
    if data.is_empty() {
        return Err(Error::EmptyData);
    }

    let code = QrCode::with_error_correction_level(data.as_bytes(), level.into())?;
    let width = code.width();
    let modules: Vec<bool> = code
        .to_colors()
        .into_iter()
        .map(|color| color == Color::Dark)
        .collect();

    debug!("Encoded {} bytes into {}x{} modules", data.len(), width, width);

    Ok(SymbolMatrix { width, modules })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_data_is_rejected() {
        assert!(matches!(encode("", ERROR_CORRECTION), Err(Error::EmptyData)));
    }

    #[test]
    fn encoding_is_deterministic() {
        for data in &["a", "https://example.test/m/abc123", "SN-0000000000000000000"] {
            let first = encode(data, ERROR_CORRECTION).unwrap();
            let second = encode(data, ERROR_CORRECTION).unwrap();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn width_follows_symbol_versions() {
        let matrix = encode("https://example.test/m/abc123", ERROR_CORRECTION).unwrap();
        let n = matrix.width();
        assert!(n >= 21);
        assert_eq!(n % 2, 1);
        assert_eq!((n - 17) % 4, 0);
    }

    #[test]
    fn get_outside_symbol_is_none() {
        let matrix = encode("hello", ERROR_CORRECTION).unwrap();
        let n = matrix.width();
        assert_eq!(matrix.get(0, 0), Some(true));
        assert_eq!(matrix.get(n - 1, n - 1), Some(matrix.is_dark(n - 1, n - 1)));
        assert_eq!(matrix.get(n, 0), None);
        assert_eq!(matrix.get(0, n), None);
        assert_eq!(matrix.get(usize::MAX, usize::MAX), None);
    }

    #[test]
    fn finder_pattern_corner_is_dark() {
        let matrix = encode("hello", ERROR_CORRECTION).unwrap();
        let n = matrix.width();
        assert!(matrix.is_dark(0, 0));
        assert!(matrix.is_dark(n - 1, 0));
        assert!(matrix.is_dark(0, n - 1));
        // separator ring around the top-left finder
        assert!(!matrix.is_dark(7, 0));
    }

    #[test]
    fn longer_payload_grows_symbol() {
        let short = encode("abc", ERROR_CORRECTION).unwrap();
        let long = encode(&"x".repeat(300), ERROR_CORRECTION).unwrap();
        assert!(long.width() > short.width());
    }

    #[test]
    fn higher_level_never_shrinks_symbol() {
        let data = "https://example.test/m/abc123";
        let low = encode(data, Level::L).unwrap();
        let high = encode(data, Level::H).unwrap();
        assert!(high.width() >= low.width());
    }

    #[test]
    fn oversized_payload_is_an_encode_error() {
        let data = "x".repeat(4000);
        assert!(matches!(encode(&data, Level::H), Err(Error::Encode(_))));
    }
}
