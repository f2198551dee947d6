pub mod proxy;
pub mod rejection;
pub mod routes;

pub use proxy::HandlerServer;
pub use rejection::handle_rejection;
