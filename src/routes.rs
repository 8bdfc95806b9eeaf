use std::sync::Arc;

use log::{error, Logger};
use warp::http::StatusCode;
use warp::reject;
use warp::reply::{json, with_status, Json, WithStatus};

use crate::errors::BackendError;

pub mod admin;
mod handlers;
mod rejection;
mod response;

pub use internal::*;

/// The maximum callback payload size to accept. The HTTP gateway is
/// expected to enforce a tighter limit.
const MAX_CONTENT_LENGTH: u64 = 16 * 1024 * 1024;

pub async fn format_rejection(
    logger: Arc<Logger>,
    rej: reject::Rejection,
) -> Result<WithStatus<Json>, reject::Rejection> {
    if let Some(r) = rej.find::<rejection::Rejection>() {
        let e = &r.error;
        error!(logger, "Backend error"; "context" => ?r.context, "error" => ?r.error, "status" => %status_code_for(e), "message" => %r.error);
        let flattened = r.flatten();

        return Ok(with_status(json(&flattened), status_code_for(e)));
    }

    Err(rej)
}

fn status_code_for(e: &BackendError) -> StatusCode {
    use BackendError::*;

    match e {
        BadRequest | CannotHandleCallback { .. } | InvalidCaseId(..) => StatusCode::BAD_REQUEST,
        HearingNotFound { .. } | NoRecordedHearings => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

mod internal {
    use warp::filters::BoxedFilter;
    use warp::path::end;
    use warp::path::param as par;
    use warp::Filter;
    use warp::Reply;
    use warp::{body, get as g, path as p, post};

    use super::{handlers, MAX_CONTENT_LENGTH};
    use crate::environment::Environment;

    type Route = BoxedFilter<(Box<dyn Reply>,)>;

    macro_rules! route_filter {
    ($route_variable:ident; $first:expr) => (let $route_variable = $route_variable.and($first););
    ($route_variable:ident; $first:expr, $($rest:expr),+) => (
        let $route_variable = $route_variable.and($first);
        route_filter!($route_variable; $($rest),+);
    )
}

    macro_rules! route {
    ($name:ident => $handler:ident, $route_variable:ident; $($filters:expr),+) => (
        pub fn $name(environment: Environment) -> Route {
            let path = environment.config.callback_path.clone();

            let $route_variable = warp::any()
                .map(move || environment.clone())
                .and(p(path));

            route_filter!($route_variable; $($filters),+);

            $route_variable.and_then(handlers::$handler)
                .boxed()
        }
    );
}

    route!(make_about_to_start_route => about_to_start, rt; p("about-to-start"), end(), post(), body::content_length_limit(MAX_CONTENT_LENGTH), body::json());
    route!(make_mid_event_route => mid_event, rt; p("mid-event"), end(), post(), body::content_length_limit(MAX_CONTENT_LENGTH), body::json());
    route!(make_about_to_submit_route => about_to_submit, rt; p("about-to-submit"), end(), post(), body::content_length_limit(MAX_CONTENT_LENGTH), body::json());
    route!(make_case_route => retrieve_case, rt; p("case"), par::<String>(), end(), g());
}
