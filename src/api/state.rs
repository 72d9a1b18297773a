use std::sync::Arc;

use crate::domain::registration::ProblemCatalog;
use crate::domain::repositories::RegistrationSink;

/// Shared, read-only state handed to every request
#[derive(Clone)]
pub struct AppState {
    pub sink: Arc<dyn RegistrationSink>,
    pub event_prefix: Arc<str>,
    pub catalog: Arc<ProblemCatalog>,
}

impl AppState {
    /// State with the built-in problem-track catalog
    pub fn new(sink: Arc<dyn RegistrationSink>, event_prefix: impl Into<Arc<str>>) -> Self {
        Self {
            sink,
            event_prefix: event_prefix.into(),
            catalog: Arc::new(ProblemCatalog::default()),
        }
    }

    pub fn with_catalog(mut self, catalog: ProblemCatalog) -> Self {
        self.catalog = Arc::new(catalog);
        self
    }
}
