use thiserror::Error;

use crate::callback::{CallbackType, EventType};

/// Enumerates high-level errors returned by this library.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Represents an error with the request.
    #[error("Bad request")]
    BadRequest,

    /// Represents a callback routed to a handler that does not serve
    /// its event.
    #[error("cannot handle {callback_type:?} callback for {event:?}")]
    CannotHandleCallback {
        callback_type: CallbackType,
        event: EventType,
    },

    /// Represents a malformed case reference.
    #[error("invalid case ID {0}")]
    InvalidCaseId(String),

    /// Represents a hearing that is not on the case.
    #[error("hearing {id} is not on this case")]
    HearingNotFound { id: String },

    /// Represents a case with no recorded hearing to act on.
    #[error("no hearings with hearing recordings exist on this case")]
    NoRecordedHearings,
}
