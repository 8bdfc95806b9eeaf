use std::collections::BTreeMap;

use time::Date;

use crate::case::{CaseData, DwpState};
use crate::party::PartyRef;
use crate::recording::{RecordingData, RecordingRequest, RequestStatus};

/// Looks up the current status of a (hearing, party) pair, with the
/// backing request if one exists. A pair no caseworker has touched and
/// no party has requested has no status at all.
pub fn status_of<'a>(
    data: &'a RecordingData,
    hearing_id: &str,
    party: &PartyRef,
) -> Option<(RequestStatus, &'a RecordingRequest)> {
    let found = |requests: &'a [RecordingRequest], status: RequestStatus| {
        requests
            .iter()
            .find(|r| r.is_for(hearing_id, party))
            .map(|r| (status, r))
    };

    found(&data.requested, RequestStatus::Requested)
        .or_else(|| found(&data.dwp_released, RequestStatus::Granted))
        .or_else(|| found(&data.citizen_released, RequestStatus::Granted))
        .or_else(|| found(&data.refused, RequestStatus::Refused))
}

/// One party's submitted decision for the chosen hearing. `None` and
/// `Requested` both leave the pair untouched; pending is the system's
/// implicit starting point, never a caseworker target.
#[derive(Clone, Debug)]
pub struct Submission {
    pub party: PartyRef,
    pub status: Option<RequestStatus>,
}

/// What a batch actually did. `skipped` lists parties whose decision
/// referenced a hearing with no recording record; callers log these.
#[derive(Debug, Default)]
pub struct Outcome {
    pub applied: usize,
    pub skipped: Vec<PartyRef>,
}

/// Applies a batch of caseworker decisions for one hearing.
///
/// The four partitions are folded into a single map keyed by
/// (hearing, party), decisions are applied as upserts, and the
/// partitions are rebuilt from the map. Reapplying an identical batch
/// leaves the partitions unchanged, and no pair can end up in two
/// partitions. A failure to resolve one party's recording never aborts
/// the rest of the batch.
pub fn apply_batch(
    case: &mut CaseData,
    hearing_id: &str,
    submissions: &[Submission],
    today: Date,
) -> Outcome {
    let mut ledger = Ledger::from_partitions(&case.recording_data);
    let mut outcome = Outcome::default();

    for submission in submissions {
        let decided = match submission.status {
            Some(status @ RequestStatus::Granted) | Some(status @ RequestStatus::Refused) => status,
            Some(RequestStatus::Requested) | None => continue,
        };

        let entry = match ledger.entry_or_synthesize(
            &case.recording_data,
            hearing_id,
            &submission.party,
            today,
        ) {
            Some(entry) => entry,
            None => {
                outcome.skipped.push(submission.party.clone());
                continue;
            }
        };

        entry.status = decided;
        entry.request.date_approved = match decided {
            RequestStatus::Granted => Some(today),
            _ => None,
        };

        if submission.party == PartyRef::Dwp {
            case.dwp_state = Some(DwpState::HearingRecordingProcessed);
        }

        outcome.applied += 1;
    }

    ledger.write_back(&mut case.recording_data);
    case.recording_data.outstanding_request = !case.recording_data.requested.is_empty();

    outcome
}

/// Map key for one (hearing, party) pair.
#[derive(Clone, Eq, Ord, PartialEq, PartialOrd)]
struct Key {
    hearing_id: String,
    party: PartyRef,
}

struct Entry {
    request: RecordingRequest,
    status: RequestStatus,
}

/// Every request on the case, one entry per (hearing, party) pair. The
/// four storage partitions are derived views of this map.
struct Ledger {
    entries: BTreeMap<Key, Entry>,
}

impl Ledger {
    fn from_partitions(data: &RecordingData) -> Self {
        let mut entries = BTreeMap::new();

        {
            let mut absorb = |requests: &[RecordingRequest], status: RequestStatus| {
                for request in requests {
                    let key = Key {
                        hearing_id: request.recording.hearing_id.clone(),
                        party: request.party.clone(),
                    };

                    // first occurrence wins; storage duplicates collapse here
                    entries.entry(key).or_insert_with(|| Entry {
                        request: request.clone(),
                        status,
                    });
                }
            };

            absorb(&data.requested, RequestStatus::Requested);
            absorb(&data.dwp_released, RequestStatus::Granted);
            absorb(&data.citizen_released, RequestStatus::Granted);
            absorb(&data.refused, RequestStatus::Refused);
        }

        Ledger { entries }
    }

    /// The entry for the pair, created as pending if the hearing has a
    /// recording record to bind it to. `None` means the pair has no
    /// request and none can be created.
    fn entry_or_synthesize(
        &mut self,
        data: &RecordingData,
        hearing_id: &str,
        party: &PartyRef,
        today: Date,
    ) -> Option<&mut Entry> {
        let key = Key {
            hearing_id: hearing_id.to_owned(),
            party: party.clone(),
        };

        if !self.entries.contains_key(&key) {
            let recording = data.recording(hearing_id)?;

            self.entries.insert(
                key.clone(),
                Entry {
                    request: RecordingRequest {
                        recording: recording.clone(),
                        party: party.clone(),
                        date_requested: today,
                        date_approved: None,
                    },
                    status: RequestStatus::Requested,
                },
            );
        }

        self.entries.get_mut(&key)
    }

    fn write_back(self, data: &mut RecordingData) {
        let mut requested = Vec::new();
        let mut dwp_released = Vec::new();
        let mut citizen_released = Vec::new();
        let mut refused = Vec::new();

        for (_, entry) in self.entries {
            let partition = match entry.status {
                RequestStatus::Requested => &mut requested,
                RequestStatus::Granted if entry.request.party == PartyRef::Dwp => &mut dwp_released,
                RequestStatus::Granted => &mut citizen_released,
                RequestStatus::Refused => &mut refused,
            };

            partition.push(entry.request);
        }

        data.requested = requested;
        data.dwp_released = dwp_released;
        data.citizen_released = citizen_released;
        data.refused = refused;
    }
}
