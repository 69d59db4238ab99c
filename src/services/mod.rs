pub mod analysis;
pub mod decoder;
pub mod dimensions;

pub use analysis::{AnalysisRequest, AnalysisService};
pub use decoder::{decode_base64, decode_image, DEFAULT_MAX_BYTES};
pub use dimensions::DimensionPolicy;
