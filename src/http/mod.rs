pub mod error;
pub mod gemini;
pub mod response;

pub use gemini::{GeminiClient, GenerateRequest, GenerativeModel};
pub use response::into_warp_response;
