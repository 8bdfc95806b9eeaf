use std::sync::Arc;

use log::Logger;
use time::Date;

use crate::store::CaseStore;

/// Resolves the current date. Injected so the handlers never read the
/// system clock themselves.
pub type Clock = dyn Fn() -> Date + Send + Sync;

pub type SafeStore = dyn CaseStore + Send + Sync;

/// Shared server state handed to every route.
#[derive(Clone)]
pub struct Environment {
    pub logger: Arc<Logger>,
    pub store: Arc<SafeStore>,
    pub clock: Arc<Clock>,
    pub config: Config,
}

impl Environment {
    pub fn new(
        logger: Arc<Logger>,
        store: Arc<SafeStore>,
        clock: Arc<Clock>,
        config: Config,
    ) -> Self {
        Self {
            logger,
            store,
            clock,
            config,
        }
    }
}

/// Values read once at startup.
#[derive(Clone, Debug)]
pub struct Config {
    /// Path segment the callback routes live under.
    pub(crate) callback_path: String,
}

impl Config {
    pub fn new(callback_path: String) -> Self {
        Self { callback_path }
    }
}
