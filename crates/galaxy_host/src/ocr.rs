//! The glyph-recognition interface.
//!
//! Decoding rendered pictures back into a click coordinate is explicitly
//! out of scope here. Only the seam is declared, so a real decoder can be
//! dropped in as an [`OcrReader`] without touching `galaxy_core` or the
//! interaction loop. No implementation is provided.

/// Reads glyph annotations out of a rendered frame: each result pairs a
/// recognized glyph's name with its bounding box `(x0, y0, x1, y1)`.
pub trait OcrReader {
    fn read_glyphs(&self, pixels: &[u8], width: usize, height: usize) -> Vec<(String, (i64, i64, i64, i64))>;
}
