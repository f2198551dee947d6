pub mod ai;
pub mod context;
pub mod payload;
pub mod prompts;
pub mod response;
pub mod task;

pub use ai::{AiEvent, handle_ai_request};
pub use context::RequestContext;
pub use response::AiResponse;
