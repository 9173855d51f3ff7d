//! Scaling a symbol to device dots and packing it into a ZPL graphic field.
//!
//! Each byte carries 8 dots, most significant bit first (leftmost dot),
//! 1 = black. Rows are padded with zero (white) bits to a byte boundary.

use log::debug;

use crate::symbol::SymbolMatrix;

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// A symbol scaled to device dots.
///
/// The grid is logical: it keeps the matrix and the scale factor and answers
/// per-dot queries without expanding every module into a `scale x scale`
/// block in memory.
#[derive(Debug, Clone)]
pub struct PixelGrid<'a> {
    matrix: &'a SymbolMatrix,
    scale: usize,
}

impl<'a> PixelGrid<'a> {
    /// Dots per module along each axis.
    pub fn scale(&self) -> usize {
        self.scale
    }

    /// Side length in dots, always a multiple of the matrix width.
    pub fn size(&self) -> usize {
        self.matrix.width() * self.scale
    }

    /// Dot at column `x`, row `y`, or `None` outside the grid.
    pub fn get(&self, x: usize, y: usize) -> Option<bool> {
        if x < self.size() && y < self.size() {
            Some(self.is_dark(x, y))
        } else {
            None
        }
    }

    pub(crate) fn is_dark(&self, x: usize, y: usize) -> bool {
        self.matrix.is_dark(x / self.scale, y / self.scale)
    }
}

/// Scale `matrix` to at most `target_dots` per side.
///
/// The scale is `target_dots / width`, clamped to 1. Integer rounding may
/// leave the grid smaller than the target; it never exceeds it unless the
/// matrix alone is wider than the target.
pub fn rasterize(matrix: &SymbolMatrix, target_dots: usize) -> PixelGrid<'_> {
    let scale = (target_dots / matrix.width()).max(1);
    PixelGrid { matrix, scale }
}

/// Packed monochrome image rendered as ZPL ASCII hex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitmapBlock {
    bytes_per_row: usize,
    rows: usize,
    hex: String,
}

impl BitmapBlock {
    pub fn bytes_per_row(&self) -> usize {
        self.bytes_per_row
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Total binary byte count of the image, `bytes_per_row * rows`.
    pub fn total_bytes(&self) -> usize {
        self.bytes_per_row * self.rows
    }

    /// Uppercase hex payload, two characters per byte, rows concatenated.
    pub fn hex(&self) -> &str {
        &self.hex
    }
}

/// Pack `grid` into a bitmap block.
///
/// Each symbol row is packed once and the resulting hex row is repeated
/// `scale` times.
pub fn pack(grid: &PixelGrid<'_>) -> BitmapBlock {
    let size = grid.size();
    let bytes_per_row = (size + 7) / 8;
    let mut hex = String::with_capacity(2 * bytes_per_row * size);
    let mut rows = 0;

    for y in 0..grid.matrix.width() {
        let hex_row = pack_row(grid, y * grid.scale, bytes_per_row);
        for _ in 0..grid.scale {
            hex.push_str(&hex_row);
            rows += 1;
        }
    }

    debug!(
        "Packed {}x{} dots (scale {}) into {} bytes, {} per row",
        size,
        size,
        grid.scale,
        bytes_per_row * rows,
        bytes_per_row
    );

    BitmapBlock {
        bytes_per_row,
        rows,
        hex,
    }
}

fn pack_row(grid: &PixelGrid<'_>, y: usize, bytes_per_row: usize) -> String {
    let size = grid.size();
    let mut out = String::with_capacity(bytes_per_row * 2);

    for index in 0..bytes_per_row {
        let mut byte: u8 = 0x00;
        for bit in 0..8 {
            let x = index * 8 + bit;
            if x < size && grid.is_dark(x, y) {
                byte |= 0x80 >> bit;
            }
        }
        out.push(HEX_DIGITS[(byte >> 4) as usize] as char);
        out.push(HEX_DIGITS[(byte & 0x0F) as usize] as char);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::{encode, ERROR_CORRECTION};

    fn matrix() -> SymbolMatrix {
        encode("https://example.test/m/abc123", ERROR_CORRECTION).unwrap()
    }

    #[test]
    fn never_overshoots_target() {
        let matrix = matrix();
        let n = matrix.width();
        for target in (n..=900).step_by(7) {
            let grid = rasterize(&matrix, target);
            assert!(grid.size() <= target, "target {}", target);
            assert_eq!(grid.size() % n, 0);
            assert_eq!(grid.scale(), target / n);
        }
    }

    #[test]
    fn tiny_target_clamps_to_one_dot_per_module() {
        let matrix = matrix();
        for target in &[0, 1, matrix.width() - 1] {
            let grid = rasterize(&matrix, *target);
            assert_eq!(grid.scale(), 1);
            assert_eq!(grid.size(), matrix.width());
        }
    }

    #[test]
    fn module_becomes_uniform_block() {
        let matrix = matrix();
        let grid = rasterize(&matrix, matrix.width() * 3);
        for y in 0..matrix.width() {
            for x in 0..matrix.width() {
                let dark = matrix.is_dark(x, y);
                for dy in 0..3 {
                    for dx in 0..3 {
                        assert_eq!(grid.is_dark(x * 3 + dx, y * 3 + dy), dark);
                    }
                }
            }
        }
    }

    #[test]
    fn get_outside_grid_is_none() {
        let matrix = matrix();
        let grid = rasterize(&matrix, matrix.width() * 4);
        let size = grid.size();
        assert_eq!(grid.get(3, 3), Some(true));
        assert_eq!(grid.get(size, 0), None);
        assert_eq!(grid.get(0, size), None);
    }

    #[test]
    fn hex_length_matches_byte_count() {
        let matrix = matrix();
        let n = matrix.width();
        for scale in 1..=20 {
            let block = pack(&rasterize(&matrix, n * scale));
            assert_eq!(block.rows(), n * scale, "scale {}", scale);
            assert_eq!(block.bytes_per_row(), (n * scale + 7) / 8);
            assert_eq!(block.hex().len(), 2 * block.total_bytes());
            assert_eq!(block.total_bytes(), block.bytes_per_row() * block.rows());
        }
    }

    #[test]
    fn hex_is_uppercase() {
        let matrix = matrix();
        for target in &[29, 100, 500] {
            let block = pack(&rasterize(&matrix, *target));
            assert!(block
                .hex()
                .bytes()
                .all(|c| matches!(c, b'0'..=b'9' | b'A'..=b'F')));
        }
    }

    #[test]
    fn rows_repeat_scale_times() {
        let matrix = matrix();
        let scale = 5;
        let block = pack(&rasterize(&matrix, matrix.width() * scale));
        let row_len = 2 * block.bytes_per_row();
        let rows: Vec<&str> = (0..block.rows())
            .map(|r| &block.hex()[r * row_len..(r + 1) * row_len])
            .collect();

        for chunk in rows.chunks(scale) {
            assert_eq!(chunk.len(), scale);
            assert!(chunk.iter().all(|row| *row == chunk[0]));
        }
    }

    #[test]
    fn first_row_starts_with_finder_pattern() {
        // 7 dark modules, then a light separator, at 1 dot per module
        let matrix = matrix();
        let block = pack(&rasterize(&matrix, matrix.width()));
        assert_eq!(&block.hex()[0..2], "FE");
    }

    #[test]
    fn padding_bits_are_zero() {
        let matrix = matrix();
        let n = matrix.width();
        let block = pack(&rasterize(&matrix, n));
        let row_len = 2 * block.bytes_per_row();
        let pad = block.bytes_per_row() * 8 - n;
        assert!(pad > 0);

        // the top-right finder pattern ends on a dark module in row 0
        let last = &block.hex()[row_len - 2..row_len];
        let byte = u8::from_str_radix(last, 16).unwrap();
        assert_eq!(byte & ((1u8 << pad) - 1), 0);
        assert_ne!(byte, 0);
    }
}
