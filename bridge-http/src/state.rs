//! Shared handler state.

use core_service::CatalogService;

/// State handed to every handler through `State<Arc<AppState>>`.
#[derive(Clone)]
pub struct AppState {
    pub catalog: CatalogService,
}

impl AppState {
    pub fn new(catalog: CatalogService) -> Self {
        Self { catalog }
    }
}
