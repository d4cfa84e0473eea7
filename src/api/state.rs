//! Application state for the colillas API.

use crate::pipeline::Pipeline;

/// Shared application state.
///
/// Holds the pipeline, whose backend channels are shared by every request.
/// Nothing request-specific lives here.
#[derive(Debug, Clone)]
pub struct AppState {
    pipeline: Pipeline,
}

impl AppState {
    /// Creates a new application state around `pipeline`.
    pub fn new(pipeline: Pipeline) -> Self {
        Self { pipeline }
    }

    /// Returns the pipeline.
    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_clone() {
        fn assert_clone<T: Clone + Send + Sync + 'static>() {}
        assert_clone::<AppState>();
    }
}
