pub mod io;
pub mod llm;
pub mod models;
pub mod normalize;

pub use io::{read_image, read_response_text, write_json, HumanReport};
pub use llm::{extract_response_text, ModelError, VisionClient, VisionConfig, ANALYSIS_PROMPT};
pub use models::NormalizedAnalysis;
pub use normalize::normalize;
