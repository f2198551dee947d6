use crate::config::Environment;
use crate::http::GenerativeModel;

/// Borrowed per-invocation dependencies of the handler.
pub struct RequestContext<'a, M: GenerativeModel> {
    pub environment: &'a Environment,
    pub model: &'a M,
}

impl<M: GenerativeModel> Clone for RequestContext<'_, M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M: GenerativeModel> Copy for RequestContext<'_, M> {}
