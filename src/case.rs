use serde::{Deserialize, Serialize};
use time::Date;

use crate::recording::RecordingData;

/// A snapshot of one appeal case, as handed over by the case-workflow
/// platform. Only the parts this service reads or writes are modelled;
/// the platform owns the rest of the record.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CaseData {
    /// The numeric case reference.
    pub case_id: i64,

    /// The hearings held so far, in case order.
    pub hearings: Vec<Hearing>,

    /// Whether a joint party is on the case.
    pub has_joint_party: bool,

    /// The appellant's representative, if one has been appointed.
    pub representative: Option<Representative>,

    /// The other parties currently on the case, in case order.
    pub other_parties: Vec<OtherParty>,

    /// The recording catalog and the four request partitions.
    pub recording_data: RecordingData,

    /// Where the case sits in DWP processing.
    pub dwp_state: Option<DwpState>,
}

impl CaseData {
    /// The hearing with the given ID, if it is on the case.
    pub fn hearing(&self, hearing_id: &str) -> Option<&Hearing> {
        self.hearings.iter().find(|h| h.hearing_id == hearing_id)
    }

    /// Whether the appellant has appointed a representative.
    pub fn has_representative(&self) -> bool {
        self.representative.is_some()
    }
}

/// A past sitting of the tribunal. Read-only here.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Hearing {
    /// The ID of the hearing.
    pub hearing_id: String,

    /// The date the hearing was held.
    pub date: Date,

    /// The start time, if known.
    pub time: Option<String>,

    /// The venue name, if known.
    pub venue: Option<String>,
}

/// A party on the case beyond the fixed four.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct OtherParty {
    /// The ID of the other-party entity.
    pub id: String,

    /// The display name.
    pub name: String,

    /// The other party's representative, if any.
    pub representative: Option<Representative>,
}

/// A representative appointed by the appellant or by an other party.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Representative {
    /// The ID of the representative entity.
    pub id: String,

    /// The display name.
    pub name: String,
}

/// DWP processing milestones recorded on the case.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum DwpState {
    HearingRecordingProcessed,
}
