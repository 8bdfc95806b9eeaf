use serde::{Deserialize, Serialize};
use time::Date;

use crate::access::apply_batch;
use crate::case::CaseData;
use crate::errors::BackendError;
use crate::form::{build_request_form, hearing_choices, RequestForm, SelectionList};
use crate::party::PartyRef;
use crate::validation;

/// The page of the access-request event that selects the hearing to
/// act on. Mid-event callbacks from it rebuild the form; callbacks
/// from any later page validate the submitted decisions instead.
pub const SELECT_HEARING_PAGE: &str = "select-hearing";

/// The stage of the event lifecycle a callback fires at.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum CallbackType {
    AboutToStart,
    MidEvent,
    AboutToSubmit,
}

/// Case events the platform calls this service back about.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum EventType {
    ActionRecordingRequest,
    UploadRecording,
}

/// One callback from the case-workflow platform.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Callback {
    pub callback_type: CallbackType,

    pub event: EventType,

    /// The form page the callback fired from, for mid-event callbacks.
    pub page_id: Option<String>,

    /// The case snapshot as the platform holds it.
    pub case: CaseData,

    /// The hearing chosen on the select-hearing page.
    pub selected_hearing: Option<String>,

    /// The submitted form, present once the caseworker has filled it in.
    pub form: Option<RequestForm>,
}

/// The mutated snapshot plus the two feedback channels. Warnings ask
/// for caller-side confirmation and never block; errors block
/// persistence of the mutation.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CallbackResponse {
    pub case: CaseData,

    /// The form to render, for select-hearing mid-event callbacks.
    pub form: Option<RequestForm>,

    /// The hearings available to choose from, for about-to-start
    /// callbacks.
    pub hearing_choices: Option<SelectionList>,

    pub warnings: Vec<String>,

    pub errors: Vec<String>,

    /// Parties whose decisions were dropped because the hearing no
    /// longer has a recording record. Logged by the server, never
    /// shown to the caseworker.
    #[serde(skip)]
    pub skipped: Vec<PartyRef>,
}

impl CallbackResponse {
    fn with_case(case: CaseData) -> Self {
        CallbackResponse {
            case,
            form: None,
            hearing_choices: None,
            warnings: Vec::new(),
            errors: Vec::new(),
            skipped: Vec::new(),
        }
    }
}

/// Serves the access-request event across its three callback stages.
pub struct AccessRequestHandler;

impl AccessRequestHandler {
    /// Whether this handler serves the given callback.
    pub fn can_handle(&self, callback: &Callback) -> bool {
        callback.event == EventType::ActionRecordingRequest
    }

    /// Runs the callback. `today` comes from the caller's clock; the
    /// core never reads the system clock itself.
    pub fn handle(
        &self,
        callback: Callback,
        today: Date,
    ) -> Result<CallbackResponse, BackendError> {
        if !self.can_handle(&callback) {
            return Err(BackendError::CannotHandleCallback {
                callback_type: callback.callback_type,
                event: callback.event,
            });
        }

        match callback.callback_type {
            CallbackType::AboutToStart => about_to_start(callback),
            CallbackType::MidEvent => mid_event(callback),
            CallbackType::AboutToSubmit => about_to_submit(callback, today),
        }
    }
}

fn about_to_start(callback: Callback) -> Result<CallbackResponse, BackendError> {
    let choices = hearing_choices(&callback.case)?;

    Ok(CallbackResponse {
        hearing_choices: Some(choices),
        ..CallbackResponse::with_case(callback.case)
    })
}

fn mid_event(callback: Callback) -> Result<CallbackResponse, BackendError> {
    if callback.page_id.as_deref() == Some(SELECT_HEARING_PAGE) {
        let hearing_id = callback
            .selected_hearing
            .as_deref()
            .ok_or(BackendError::BadRequest)?;
        let form = build_request_form(&callback.case, hearing_id)?;

        return Ok(CallbackResponse {
            form: Some(form),
            ..CallbackResponse::with_case(callback.case)
        });
    }

    let form = callback.form.as_ref().ok_or(BackendError::BadRequest)?;
    let review = validation::review(&callback.case, form);

    Ok(CallbackResponse {
        warnings: review.warnings,
        errors: review.errors,
        form: callback.form.clone(),
        ..CallbackResponse::with_case(callback.case)
    })
}

fn about_to_submit(mut callback: Callback, today: Date) -> Result<CallbackResponse, BackendError> {
    // the transient form never persists past the commit
    let form = callback.form.take().ok_or(BackendError::BadRequest)?;

    let outcome = apply_batch(
        &mut callback.case,
        &form.hearing_id,
        &form.submissions(),
        today,
    );

    Ok(CallbackResponse {
        skipped: outcome.skipped,
        ..CallbackResponse::with_case(callback.case)
    })
}
