use serde::Serialize;
use warp::reject;

use crate::errors::BackendError;

#[derive(Debug)]
pub struct Rejection {
    pub(crate) context: Context,
    pub(crate) error: BackendError,
}

impl Rejection {
    pub fn new(context: Context, error: BackendError) -> Self {
        Rejection { context, error }
    }

    pub fn flatten(&self) -> FlattenedRejection {
        FlattenedRejection {
            context: self.context.clone(),
            message: format!("{}", self.error),
        }
    }
}

impl reject::Reject for Rejection {}

#[derive(Debug, Serialize)]
pub struct FlattenedRejection {
    #[serde(flatten)]
    pub(crate) context: Context,
    pub(crate) message: String,
}

/// Where in the API an error arose.
#[derive(Clone, Debug, Serialize)]
#[serde(untagged)]
pub enum Context {
    Callback { stage: &'static str, case_id: i64 },
    Retrieve { id: String },
}

impl Context {
    pub fn callback(stage: &'static str, case_id: i64) -> Context {
        Context::Callback { stage, case_id }
    }

    pub fn retrieve(id: String) -> Context {
        Context::Retrieve { id }
    }
}
