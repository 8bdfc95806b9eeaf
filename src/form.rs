use serde::{Deserialize, Serialize};
use time::format_description::FormatItem;
use time::macros::format_description;
use url::Url;

use crate::access::{status_of, Submission};
use crate::case::{CaseData, Hearing};
use crate::errors::BackendError;
use crate::party::PartyRef;
use crate::recording::RequestStatus;

const DATE_FORMAT: &[FormatItem<'static>] =
    format_description!("[day padding:none] [month repr:short] [year]");

/// One choice on a selection list.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct SelectionItem {
    pub code: String,
    pub label: String,
}

impl SelectionItem {
    fn status(status: RequestStatus) -> Self {
        SelectionItem {
            code: status.label().to_owned(),
            label: status.label().to_owned(),
        }
    }
}

/// A single-choice list as rendered on a form: the pre-selected item
/// (or the caseworker's pick, on the way back in) plus the choices
/// they can move to.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SelectionList {
    pub selected: Option<SelectionItem>,
    pub options: Vec<SelectionItem>,
}

impl SelectionList {
    /// The submitted decision, if the caseworker picked one.
    pub fn submitted_status(&self) -> Option<RequestStatus> {
        self.selected
            .as_ref()
            .and_then(|item| RequestStatus::from_label(&item.code))
    }
}

/// One dynamic other-party row on the form.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct OtherPartyRow {
    /// Display name, with " - Representative" appended for rep rows.
    pub name: String,

    pub party: PartyRef,

    pub status: SelectionList,
}

/// The access-request form for one hearing: a selection list per
/// applicable party, plus the hearing details shown alongside.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct RequestForm {
    pub hearing_id: String,

    /// Display title, by position in the case's hearing list.
    pub hearing_title: String,

    /// Venue, time and date of the chosen hearing.
    pub hearing_information: String,

    /// Media links of the chosen hearing's recording.
    pub recordings: Vec<Url>,

    pub dwp: SelectionList,

    pub appellant: SelectionList,

    /// Absent when the case has no joint party.
    pub joint_party: Option<SelectionList>,

    /// Absent when the appellant has no representative.
    pub representative: Option<SelectionList>,

    pub other_party_rows: Vec<OtherPartyRow>,
}

impl RequestForm {
    /// Flattens the form into one submission per party it carries.
    pub fn submissions(&self) -> Vec<Submission> {
        let mut batch = vec![
            Submission {
                party: PartyRef::Dwp,
                status: self.dwp.submitted_status(),
            },
            Submission {
                party: PartyRef::Appellant,
                status: self.appellant.submitted_status(),
            },
        ];

        if let Some(list) = &self.joint_party {
            batch.push(Submission {
                party: PartyRef::JointParty,
                status: list.submitted_status(),
            });
        }

        if let Some(list) = &self.representative {
            batch.push(Submission {
                party: PartyRef::Representative,
                status: list.submitted_status(),
            });
        }

        for row in &self.other_party_rows {
            batch.push(Submission {
                party: row.party.clone(),
                status: row.status.submitted_status(),
            });
        }

        batch
    }
}

/// Lists the hearings a caseworker can act on: only those with a
/// recording record, in case order. Errors when there are none, so the
/// event never opens on a case with nothing to decide.
pub fn hearing_choices(case: &CaseData) -> Result<SelectionList, BackendError> {
    let options: Vec<SelectionItem> = case
        .hearings
        .iter()
        .filter(|h| case.recording_data.recording(&h.hearing_id).is_some())
        .map(|h| SelectionItem {
            code: h.hearing_id.clone(),
            label: hearing_information(h),
        })
        .collect();

    if options.is_empty() {
        return Err(BackendError::NoRecordedHearings);
    }

    Ok(SelectionList {
        selected: None,
        options,
    })
}

/// Builds the access-request form for the chosen hearing.
pub fn build_request_form(case: &CaseData, hearing_id: &str) -> Result<RequestForm, BackendError> {
    let index = case
        .hearings
        .iter()
        .position(|h| h.hearing_id == hearing_id)
        .ok_or_else(|| BackendError::HearingNotFound {
            id: hearing_id.to_owned(),
        })?;
    let hearing = &case.hearings[index];

    let recordings = case
        .recording_data
        .recording(hearing_id)
        .map(|r| r.recordings.clone())
        .unwrap_or_default();

    let mut other_party_rows = Vec::new();
    for other in &case.other_parties {
        let party = PartyRef::OtherParty(other.id.clone());
        other_party_rows.push(OtherPartyRow {
            name: other.name.clone(),
            status: selection_for(case, hearing_id, &party),
            party,
        });

        if let Some(rep) = &other.representative {
            let party = PartyRef::OtherPartyRepresentative(rep.id.clone());
            other_party_rows.push(OtherPartyRow {
                name: format!("{} - Representative", rep.name),
                status: selection_for(case, hearing_id, &party),
                party,
            });
        }
    }

    Ok(RequestForm {
        hearing_id: hearing_id.to_owned(),
        hearing_title: format!("Hearing {}", index + 1),
        hearing_information: hearing_information(hearing),
        recordings,
        dwp: selection_for(case, hearing_id, &PartyRef::Dwp),
        appellant: selection_for(case, hearing_id, &PartyRef::Appellant),
        joint_party: if case.has_joint_party {
            Some(selection_for(case, hearing_id, &PartyRef::JointParty))
        } else {
            None
        },
        representative: case
            .representative
            .as_ref()
            .map(|_| selection_for(case, hearing_id, &PartyRef::Representative)),
        other_party_rows,
    })
}

fn selection_for(case: &CaseData, hearing_id: &str, party: &PartyRef) -> SelectionList {
    let current = status_of(&case.recording_data, hearing_id, party).map(|(status, _)| status);

    let mut options = vec![
        SelectionItem::status(RequestStatus::Granted),
        SelectionItem::status(RequestStatus::Refused),
    ];

    // "Requested" stays selectable only while the pair is still
    // pending, so the form can keep it as the unchanged default
    if current == Some(RequestStatus::Requested) {
        options.push(SelectionItem::status(RequestStatus::Requested));
    }

    SelectionList {
        selected: current.map(SelectionItem::status),
        options,
    }
}

/// Venue, time and date, as shown under the hearing title and on the
/// hearing-selection list.
fn hearing_information(hearing: &Hearing) -> String {
    let date = hearing
        .date
        .format(&DATE_FORMAT)
        .unwrap_or_else(|_| hearing.date.to_string());

    let mut parts = Vec::new();
    if let Some(venue) = &hearing.venue {
        parts.push(venue.clone());
    }
    if let Some(time) = &hearing.time {
        parts.push(time.clone());
    }
    parts.push(date);

    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use time::macros::date;
    use url::Url;

    use super::{build_request_form, hearing_choices};
    use crate::access::{apply_batch, Submission};
    use crate::case::{CaseData, Hearing, OtherParty, Representative};
    use crate::errors::BackendError;
    use crate::party::PartyRef;
    use crate::recording::{HearingRecording, RecordingData, RequestStatus};

    fn case() -> CaseData {
        CaseData {
            case_id: 1234,
            hearings: vec![
                Hearing {
                    hearing_id: "h1".to_owned(),
                    date: date!(2021 - 03 - 09),
                    time: Some("10:00".to_owned()),
                    venue: Some("Cardiff".to_owned()),
                },
                Hearing {
                    hearing_id: "h2".to_owned(),
                    date: date!(2021 - 05 - 01),
                    time: None,
                    venue: Some("Liverpool".to_owned()),
                },
            ],
            has_joint_party: false,
            representative: None,
            other_parties: vec![],
            recording_data: RecordingData {
                recordings: vec![
                    HearingRecording {
                        hearing_id: "h1".to_owned(),
                        recordings: vec![],
                    },
                    HearingRecording {
                        hearing_id: "h2".to_owned(),
                        recordings: vec![
                            Url::parse("https://media.example/h2.mp3").unwrap()
                        ],
                    },
                ],
                ..RecordingData::default()
            },
            dwp_state: None,
        }
    }

    #[test]
    fn hearings_without_recordings_are_not_offered() {
        let mut case = case();
        case.recording_data.recordings.remove(0);

        let choices = hearing_choices(&case).unwrap();

        assert_eq!(choices.options.len(), 1);
        assert_eq!(choices.options[0].code, "h2");
        assert_eq!(choices.options[0].label, "Liverpool 1 May 2021");
    }

    #[test]
    fn a_case_with_no_recorded_hearings_is_an_error() {
        let mut case = case();
        case.recording_data.recordings.clear();

        match hearing_choices(&case) {
            Err(BackendError::NoRecordedHearings) => {}
            other => panic!("expected NoRecordedHearings, got {:?}", other),
        }
    }

    #[test]
    fn the_title_counts_hearings_from_one() {
        let case = case();

        let form = build_request_form(&case, "h2").unwrap();

        assert_eq!(form.hearing_title, "Hearing 2");
        assert_eq!(form.hearing_information, "Liverpool 1 May 2021");
        assert_eq!(form.recordings.len(), 1);
    }

    #[test]
    fn an_unknown_hearing_is_an_error() {
        match build_request_form(&case(), "h9") {
            Err(BackendError::HearingNotFound { id }) => assert_eq!(id, "h9"),
            other => panic!("expected HearingNotFound, got {:?}", other),
        }
    }

    #[test]
    fn an_undecided_party_gets_the_two_decisions_and_no_preselection() {
        let form = build_request_form(&case(), "h1").unwrap();

        assert_eq!(form.appellant.selected, None);
        let codes: Vec<&str> = form.appellant.options.iter().map(|o| o.code.as_str()).collect();
        assert_eq!(codes, vec!["Granted", "Refused"]);
    }

    #[test]
    fn a_pending_party_keeps_requested_selectable() {
        let mut case = case();
        let recording = case.recording_data.recording("h1").cloned().unwrap();
        case.recording_data.requested.push(crate::recording::RecordingRequest {
            recording,
            party: PartyRef::Appellant,
            date_requested: date!(2021 - 06 - 01),
            date_approved: None,
        });

        let form = build_request_form(&case, "h1").unwrap();

        let codes: Vec<&str> = form.appellant.options.iter().map(|o| o.code.as_str()).collect();
        assert_eq!(codes, vec!["Granted", "Refused", "Requested"]);
        assert_eq!(form.appellant.selected.unwrap().code, "Requested");
    }

    #[test]
    fn a_decided_party_cannot_reselect_requested() {
        let mut case = case();
        apply_batch(
            &mut case,
            "h1",
            &[Submission {
                party: PartyRef::Appellant,
                status: Some(RequestStatus::Granted),
            }],
            date!(2021 - 06 - 15),
        );

        let form = build_request_form(&case, "h1").unwrap();

        let codes: Vec<&str> = form.appellant.options.iter().map(|o| o.code.as_str()).collect();
        assert_eq!(codes, vec!["Granted", "Refused"]);
        assert_eq!(form.appellant.selected.unwrap().code, "Granted");
    }

    #[test]
    fn fixed_party_lists_follow_the_case_shape() {
        let mut case = case();
        assert!(build_request_form(&case, "h1").unwrap().joint_party.is_none());

        case.has_joint_party = true;
        case.representative = Some(Representative {
            id: "rep1".to_owned(),
            name: "Wendy Smith".to_owned(),
        });

        let form = build_request_form(&case, "h1").unwrap();
        assert!(form.joint_party.is_some());
        assert!(form.representative.is_some());
    }

    #[test]
    fn other_party_rows_cover_entities_and_their_representatives() {
        let mut case = case();
        case.other_parties = vec![
            OtherParty {
                id: "op1".to_owned(),
                name: "Henry Smith".to_owned(),
                representative: Some(Representative {
                    id: "op1rep".to_owned(),
                    name: "Oriol Domenech".to_owned(),
                }),
            },
            OtherParty {
                id: "op2".to_owned(),
                name: "Emma Jones".to_owned(),
                representative: None,
            },
        ];

        let form = build_request_form(&case, "h1").unwrap();

        let names: Vec<&str> = form
            .other_party_rows
            .iter()
            .map(|row| row.name.as_str())
            .collect();
        assert_eq!(
            names,
            vec!["Henry Smith", "Oriol Domenech - Representative", "Emma Jones"]
        );
        assert_eq!(
            form.other_party_rows[1].party,
            PartyRef::OtherPartyRepresentative("op1rep".to_owned())
        );
    }

    #[test]
    fn submissions_cover_every_party_on_the_form() {
        let mut case = case();
        case.has_joint_party = true;
        case.other_parties = vec![OtherParty {
            id: "op1".to_owned(),
            name: "Henry Smith".to_owned(),
            representative: None,
        }];

        let mut form = build_request_form(&case, "h1").unwrap();
        form.appellant.selected = Some(super::SelectionItem {
            code: "Granted".to_owned(),
            label: "Granted".to_owned(),
        });

        let batch = form.submissions();

        assert_eq!(batch.len(), 4);
        assert_eq!(batch[1].party, PartyRef::Appellant);
        assert_eq!(batch[1].status, Some(RequestStatus::Granted));
        // untouched lists submit nothing
        assert_eq!(batch[0].status, None);
    }
}
