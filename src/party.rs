use serde::{Deserialize, Serialize};

use crate::case::CaseData;

/// Identifies a party able to request access to a hearing recording.
///
/// The two other-party variants carry the ID of the entity they stand
/// for; requests are matched on that identity, never on the position of
/// the entity in the case.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum PartyRef {
    Dwp,
    Appellant,
    JointParty,
    Representative,
    OtherParty(String),
    OtherPartyRepresentative(String),
}

impl PartyRef {
    /// Whether this is one of the per-case dynamic parties.
    pub fn is_other_party(&self) -> bool {
        matches!(
            self,
            PartyRef::OtherParty(_) | PartyRef::OtherPartyRepresentative(_)
        )
    }
}

/// Enumerates the parties able to request recordings on this case: the
/// fixed parties first, then one entry per other-party entity followed
/// by its representative. Ordering is stable for an unchanged snapshot.
pub fn applicable_parties(case: &CaseData) -> Vec<PartyRef> {
    let mut parties = vec![PartyRef::Dwp];

    if case.has_joint_party {
        parties.push(PartyRef::JointParty);
    }

    parties.push(PartyRef::Appellant);

    if case.has_representative() {
        parties.push(PartyRef::Representative);
    }

    for other in &case.other_parties {
        parties.push(PartyRef::OtherParty(other.id.clone()));

        if let Some(rep) = &other.representative {
            parties.push(PartyRef::OtherPartyRepresentative(rep.id.clone()));
        }
    }

    parties
}
