use futures::future::BoxFuture;

use crate::case::CaseData;
use crate::errors::BackendError;

/// Persistence boundary for case snapshots. The case-workflow platform
/// owns the system of record; this service only loads and saves
/// through it.
pub trait CaseStore {
    /// Loads the case with the given reference.
    fn load(&self, case_id: i64) -> BoxFuture<Result<Option<CaseData>, BackendError>>;

    /// Saves the given snapshot under its reference.
    fn save(&self, case: CaseData) -> BoxFuture<Result<(), BackendError>>;
}

pub use self::memory::MemoryStore;

mod memory {
    use std::collections::HashMap;
    use std::sync::RwLock;

    use futures::future::{BoxFuture, FutureExt};

    use super::CaseStore;
    use crate::case::CaseData;
    use crate::errors::BackendError;

    /// A store backed by a plain map. Serves the server when no
    /// platform store is configured, and the tests directly.
    #[derive(Default)]
    pub struct MemoryStore {
        cases: RwLock<HashMap<i64, CaseData>>,
    }

    impl MemoryStore {
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl CaseStore for MemoryStore {
        fn load(&self, case_id: i64) -> BoxFuture<Result<Option<CaseData>, BackendError>> {
            let case = self.cases.read().unwrap().get(&case_id).cloned();

            async move { Ok(case) }.boxed()
        }

        fn save(&self, case: CaseData) -> BoxFuture<Result<(), BackendError>> {
            self.cases.write().unwrap().insert(case.case_id, case);

            async move { Ok(()) }.boxed()
        }
    }
}
