pub mod analyze;

pub use analyze::{handle_analyze, AnalyzeRequest, AnalyzeResponse, __path_handle_analyze};
