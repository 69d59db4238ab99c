//! Image preprocessing for score extraction.
//!
//! The pipeline, in order:
//!
//! 1. **Resample** (Lanczos3, optional) to a canonical working resolution so
//!    pixel-distance thresholds downstream stay meaningful
//! 2. **Grayscale** via BT.601 luma
//! 3. **Contrast enhancement**: min-max stretch, gamma, adaptive sharpening
//! 4. **Edges**: Sobel magnitude of the enhanced plane, consumed by grid
//!    detection
//!
//! Every stage allocates a fresh plane. Nothing upstream is modified.

mod contrast;
mod edges;
mod grayscale;
mod options;
mod preprocessor;
mod resize;

pub use contrast::{adaptive_threshold, enhance_contrast, gamma_correct, normalize};
pub use edges::sobel_edges;
pub use grayscale::{luma, to_grayscale};
pub use options::PreprocessOptions;
pub use preprocessor::{Prepared, Preprocessor, Scale};
pub use resize::resample;
