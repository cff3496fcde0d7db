use codesearch_engines::SearchService;
use std::sync::Arc;

#[derive(Clone)]
pub struct McpContext {
    pub service: Arc<SearchService>,
}

impl McpContext {
    pub fn new(service: SearchService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}
