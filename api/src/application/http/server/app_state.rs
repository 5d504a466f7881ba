use std::sync::Arc;

use dachef_core::application::DachefService;

use crate::args::Args;

#[derive(Clone)]
pub struct AppState {
    pub args: Arc<Args>,
    pub service: DachefService,
}

impl AppState {
    pub fn new(args: Arc<Args>, service: DachefService) -> Self {
        Self { args, service }
    }
}
