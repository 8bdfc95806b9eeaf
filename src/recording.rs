use serde::{Deserialize, Serialize};
use time::Date;
use url::Url;

use crate::party::PartyRef;

/// The recording record for one hearing. Owned by the recording
/// platform; this service only references it.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct HearingRecording {
    /// The ID of the hearing this recording belongs to.
    pub hearing_id: String,

    /// Links to the recorded media.
    pub recordings: Vec<Url>,
}

/// One access request by one party for one hearing's recording.
///
/// Born the first time a caseworker decides on a (hearing, party) pair,
/// moved between partitions on later decisions, never deleted.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct RecordingRequest {
    /// The recording record the request is for.
    pub recording: HearingRecording,

    /// The requesting party.
    pub party: PartyRef,

    /// The date the request was made.
    pub date_requested: Date,

    /// The date the request was granted. Unset while the request is
    /// pending or refused.
    pub date_approved: Option<Date>,
}

impl RecordingRequest {
    pub fn hearing_id(&self) -> &str {
        &self.recording.hearing_id
    }

    /// Whether this request belongs to the given (hearing, party) pair.
    pub fn is_for(&self, hearing_id: &str, party: &PartyRef) -> bool {
        self.recording.hearing_id == hearing_id && &self.party == party
    }
}

/// The decided states of a request plus the pending state the system
/// creates implicitly. A pair with no request at all has no status.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum RequestStatus {
    Requested,
    Granted,
    Refused,
}

impl RequestStatus {
    /// The label shown on selection lists.
    pub fn label(self) -> &'static str {
        match self {
            RequestStatus::Requested => "Requested",
            RequestStatus::Granted => "Granted",
            RequestStatus::Refused => "Refused",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Requested" => Some(RequestStatus::Requested),
            "Granted" => Some(RequestStatus::Granted),
            "Refused" => Some(RequestStatus::Refused),
            _ => None,
        }
    }
}

/// Hearing-recording state persisted on the case: the catalog of
/// recorded hearings and the four denormalized request partitions.
///
/// The partitions keep the legacy storage shape. Nothing in the store
/// enforces uniqueness across them; `access::apply_batch` rebuilds all
/// four on every commit to keep a pair from appearing twice.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct RecordingData {
    /// Recording records, at most one per hearing.
    pub recordings: Vec<HearingRecording>,

    /// Requests awaiting a decision.
    pub requested: Vec<RecordingRequest>,

    /// Granted requests from the DWP.
    pub dwp_released: Vec<RecordingRequest>,

    /// Granted requests from any other party.
    pub citizen_released: Vec<RecordingRequest>,

    /// Refused requests.
    pub refused: Vec<RecordingRequest>,

    /// Whether any request is still awaiting a decision.
    pub outstanding_request: bool,
}

impl RecordingData {
    /// The recording record for the given hearing, if one exists.
    pub fn recording(&self, hearing_id: &str) -> Option<&HearingRecording> {
        self.recordings.iter().find(|r| r.hearing_id == hearing_id)
    }

    /// Iterates over every request across the four partitions.
    pub fn all_requests(&self) -> impl Iterator<Item = &RecordingRequest> {
        self.requested
            .iter()
            .chain(self.dwp_released.iter())
            .chain(self.citizen_released.iter())
            .chain(self.refused.iter())
    }
}
