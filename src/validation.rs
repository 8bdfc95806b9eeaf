use crate::access::status_of;
use crate::case::CaseData;
use crate::form::RequestForm;
use crate::party::applicable_parties;
use crate::recording::RequestStatus;

pub const CHANGE_STATUS_WARNING: &str = "Are you sure you want to change the request status";

pub const REMOVED_ROWS_ERROR: &str =
    "Please do not use the remove buttons within this event. You may need to start again.";

/// The outcome of reviewing a submitted form. Warnings ask the
/// caseworker to confirm and resubmit; errors block the submission.
#[derive(Debug, Default)]
pub struct Review {
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl Review {
    pub fn is_blocked(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Reviews a submitted form against the current case state.
pub fn review(case: &CaseData, form: &RequestForm) -> Review {
    let mut review = Review::default();

    check_reversals(case, form, &mut review);
    check_row_integrity(case, form, &mut review);

    review
}

/// A decision that reverses an earlier one needs confirming. First
/// decisions on pending or untouched pairs go through silently.
fn check_reversals(case: &CaseData, form: &RequestForm, review: &mut Review) {
    for submission in form.submissions() {
        let current = status_of(&case.recording_data, &form.hearing_id, &submission.party)
            .map(|(status, _)| status);

        if let (Some(current), Some(submitted)) = (current, submission.status) {
            if is_reversal(current, submitted) {
                review.warnings.push(CHANGE_STATUS_WARNING.to_owned());
            }
        }
    }
}

fn is_reversal(current: RequestStatus, submitted: RequestStatus) -> bool {
    matches!(
        (current, submitted),
        (RequestStatus::Granted, RequestStatus::Refused)
            | (RequestStatus::Refused, RequestStatus::Granted)
    )
}

/// The dynamic rows must match the case's current other parties one to
/// one. A mismatch means rows were removed through the collection
/// controls instead of the per-row status lists.
fn check_row_integrity(case: &CaseData, form: &RequestForm, review: &mut Review) {
    let expected = applicable_parties(case)
        .into_iter()
        .filter(|party| party.is_other_party())
        .count();

    if form.other_party_rows.len() != expected {
        review.errors.push(REMOVED_ROWS_ERROR.to_owned());
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::{review, CHANGE_STATUS_WARNING, REMOVED_ROWS_ERROR};
    use crate::access::{apply_batch, Submission};
    use crate::case::{CaseData, Hearing, OtherParty, Representative};
    use crate::form::{build_request_form, RequestForm, SelectionItem};
    use crate::party::PartyRef;
    use crate::recording::{HearingRecording, RecordingData, RequestStatus};

    fn case() -> CaseData {
        CaseData {
            case_id: 1234,
            hearings: vec![Hearing {
                hearing_id: "h1".to_owned(),
                date: date!(2021 - 03 - 09),
                time: None,
                venue: Some("Cardiff".to_owned()),
            }],
            has_joint_party: false,
            representative: None,
            other_parties: vec![],
            recording_data: RecordingData {
                recordings: vec![HearingRecording {
                    hearing_id: "h1".to_owned(),
                    recordings: vec![],
                }],
                ..RecordingData::default()
            },
            dwp_state: None,
        }
    }

    fn decide(case: &mut CaseData, party: PartyRef, status: RequestStatus) {
        apply_batch(
            case,
            "h1",
            &[Submission {
                party,
                status: Some(status),
            }],
            date!(2021 - 06 - 15),
        );
    }

    fn pick(form: &mut RequestForm, status: RequestStatus) -> &mut RequestForm {
        form.appellant.selected = Some(SelectionItem {
            code: status.label().to_owned(),
            label: status.label().to_owned(),
        });
        form
    }

    #[test]
    fn a_first_decision_raises_no_warning() {
        let case = case();
        let mut form = build_request_form(&case, "h1").unwrap();
        pick(&mut form, RequestStatus::Granted);

        let review = review(&case, &form);

        assert!(review.warnings.is_empty());
        assert!(review.errors.is_empty());
        assert!(!review.is_blocked());
    }

    #[test]
    fn reversing_a_grant_asks_for_confirmation() {
        let mut case = case();
        decide(&mut case, PartyRef::Appellant, RequestStatus::Granted);

        let mut form = build_request_form(&case, "h1").unwrap();
        pick(&mut form, RequestStatus::Refused);

        let review = review(&case, &form);

        assert_eq!(review.warnings, vec![CHANGE_STATUS_WARNING.to_owned()]);
        assert!(!review.is_blocked());
    }

    #[test]
    fn reversing_a_refusal_asks_for_confirmation() {
        let mut case = case();
        decide(&mut case, PartyRef::Appellant, RequestStatus::Refused);

        let mut form = build_request_form(&case, "h1").unwrap();
        pick(&mut form, RequestStatus::Granted);

        assert_eq!(
            review(&case, &form).warnings,
            vec![CHANGE_STATUS_WARNING.to_owned()]
        );
    }

    #[test]
    fn resubmitting_the_same_decision_is_quiet() {
        let mut case = case();
        decide(&mut case, PartyRef::Appellant, RequestStatus::Granted);

        let mut form = build_request_form(&case, "h1").unwrap();
        pick(&mut form, RequestStatus::Granted);

        assert!(review(&case, &form).warnings.is_empty());
    }

    #[test]
    fn deciding_a_pending_request_is_quiet() {
        let mut case = case();
        let recording = case.recording_data.recording("h1").cloned().unwrap();
        case.recording_data.requested.push(crate::recording::RecordingRequest {
            recording,
            party: PartyRef::Appellant,
            date_requested: date!(2021 - 06 - 01),
            date_approved: None,
        });

        let mut form = build_request_form(&case, "h1").unwrap();
        pick(&mut form, RequestStatus::Refused);

        assert!(review(&case, &form).warnings.is_empty());
    }

    #[test]
    fn reversals_warn_for_other_parties_too() {
        let mut case = case();
        case.other_parties = vec![OtherParty {
            id: "op1".to_owned(),
            name: "Henry Smith".to_owned(),
            representative: None,
        }];
        decide(
            &mut case,
            PartyRef::OtherParty("op1".to_owned()),
            RequestStatus::Granted,
        );

        let mut form = build_request_form(&case, "h1").unwrap();
        form.other_party_rows[0].status.selected = Some(SelectionItem {
            code: "Refused".to_owned(),
            label: "Refused".to_owned(),
        });

        assert_eq!(
            review(&case, &form).warnings,
            vec![CHANGE_STATUS_WARNING.to_owned()]
        );
    }

    #[test]
    fn removed_other_party_rows_block_the_submission() {
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

        let mut form = build_request_form(&case, "h1").unwrap();
        assert_eq!(form.other_party_rows.len(), 3);

        form.other_party_rows.pop();

        let review = review(&case, &form);

        assert_eq!(review.errors, vec![REMOVED_ROWS_ERROR.to_owned()]);
        assert!(review.is_blocked());
    }

    #[test]
    fn a_full_row_set_passes_the_integrity_check() {
        let mut case = case();
        case.other_parties = vec![OtherParty {
            id: "op1".to_owned(),
            name: "Henry Smith".to_owned(),
            representative: None,
        }];

        let form = build_request_form(&case, "h1").unwrap();

        assert!(review(&case, &form).errors.is_empty());
    }
}
