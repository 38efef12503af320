//! Host-side interfaces for the `galaxy` interaction loop: rendering its
//! `data` output and, conceptually, reading clicks back out of it. Neither
//! owns a window or an image decoder; both are seams, with a minimal
//! text-based implementation of each for use by `galaxy-cli` and tests.

pub mod ocr;
pub mod render;

pub use ocr::OcrReader;
pub use render::{to_layers, RenderError, Renderer, TextRenderer};
