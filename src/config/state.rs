// Application state module
// Shared by every connection task for the lifetime of the process

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use super::types::Config;
use crate::kernel::Kernel;

/// Application state
pub struct AppState {
    pub config: Config,
    pub kernel: Arc<Kernel>,

    // Cached config values for fast access without locks
    pub cached_access_log: Arc<AtomicBool>,
}

impl AppState {
    pub fn new(config: &Config, kernel: Kernel) -> Self {
        Self {
            config: config.clone(),
            kernel: Arc::new(kernel),
            cached_access_log: Arc::new(AtomicBool::new(config.logging.access_log)),
        }
    }
}
