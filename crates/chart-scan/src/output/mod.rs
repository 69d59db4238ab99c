//! Result assembly and debug artifacts.

mod overlay;
mod result;

pub use overlay::{Overlay, OverlayColor, OverlayShape};
pub use result::{AnalysisResult, DebugData, DebugPoint, ResultAssembler, TopicScore};
