use std::time::{Duration, Instant};

use log::{debug, warn};
use warp::{
    http::StatusCode,
    reject,
    reply::{json, with_header, with_status, Reply},
};

use crate::callback::{AccessRequestHandler, Callback, CallbackResponse};
use crate::environment::Environment;
use crate::errors::BackendError;
use crate::routes::rejection::{Context, Rejection};

const SERVER_TIMING_HEADER: &str = "server-timing";
type RouteResult = Result<Box<dyn Reply>, reject::Rejection>;

macro_rules! timed {
    ($($expression:stmt);+) => {
        let start = Instant::now();

        let result = { $($expression)+ };

        Ok(Box::new(with_header(
            result,
            SERVER_TIMING_HEADER,
            format_server_timing(start.elapsed()),
        )) as Box<dyn Reply>)
    };
}

pub async fn about_to_start(environment: Environment, callback: Callback) -> RouteResult {
    timed! {
        let case_id = callback.case.case_id;
        let error_handler =
            |e: BackendError| Rejection::new(Context::callback("about-to-start", case_id), e);

        debug!(environment.logger, "Listing recorded hearings..."; "case_id" => case_id);

        let today = (environment.clock)();
        let response = AccessRequestHandler
            .handle(callback, today)
            .map_err(error_handler)?;

        json(&response)
    }
}

pub async fn mid_event(environment: Environment, callback: Callback) -> RouteResult {
    timed! {
        let case_id = callback.case.case_id;
        let error_handler =
            |e: BackendError| Rejection::new(Context::callback("mid-event", case_id), e);

        debug!(environment.logger, "Serving mid-event callback..."; "case_id" => case_id, "page_id" => ?callback.page_id);

        let today = (environment.clock)();
        let response = AccessRequestHandler
            .handle(callback, today)
            .map_err(error_handler)?;

        json(&response)
    }
}

pub async fn about_to_submit(environment: Environment, callback: Callback) -> RouteResult {
    timed! {
        let case_id = callback.case.case_id;
        let error_handler =
            |e: BackendError| Rejection::new(Context::callback("about-to-submit", case_id), e);

        debug!(environment.logger, "Committing access-request decisions..."; "case_id" => case_id);

        let today = (environment.clock)();
        let response = AccessRequestHandler
            .handle(callback, today)
            .map_err(error_handler)?;

        let response = persist_decisions(&environment, response)
            .await
            .map_err(error_handler)?;

        json(&response)
    }
}

pub async fn retrieve_case(environment: Environment, id: String) -> RouteResult {
    timed! {
        let error_handler = |e: BackendError| Rejection::new(Context::retrieve(id.clone()), e);

        let case_id = id
            .parse::<i64>()
            .map_err(|_| BackendError::InvalidCaseId(id.clone()))
            .map_err(error_handler)?;
        debug!(environment.logger, "Retrieving case..."; "case_id" => case_id);

        let option = environment.store.load(case_id).await.map_err(error_handler)?;

        match option {
            Some(case) => with_status(json(&case), StatusCode::OK),
            None => with_status(json(&()), StatusCode::NOT_FOUND),
        }
    }
}

/// Saves the mutated case unless the commit raised blocking errors,
/// logging any decisions the processor dropped on the way.
async fn persist_decisions(
    environment: &Environment,
    response: CallbackResponse,
) -> Result<CallbackResponse, BackendError> {
    for party in &response.skipped {
        warn!(environment.logger, "Dropped a decision for a hearing with no recording record"; "case_id" => response.case.case_id, "party" => ?party);
    }

    if response.errors.is_empty() {
        environment.store.save(response.case.clone()).await?;
    }

    Ok(response)
}

fn format_server_timing(elapsed: Duration) -> String {
    format!("handler;dur={}", elapsed.as_secs_f64() * 1000.0)
}
