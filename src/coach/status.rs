use serde::Serialize;
use time::OffsetDateTime;

use crate::checkins::cadence::CadencePolicy;

/// Triage state of a client as seen by a coach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientStatus {
    // Declaration order is triage order.
    Overdue,
    Pending,
    Active,
}

/// Total over its inputs: not onboarded is `Pending`, otherwise the cadence
/// decides between `Active` and `Overdue`.
pub fn classify(
    onboarding_completed: bool,
    last_check_in_at: Option<OffsetDateTime>,
    policy: &CadencePolicy,
    now: OffsetDateTime,
) -> ClientStatus {
    if !onboarding_completed {
        return ClientStatus::Pending;
    }
    if policy.is_overdue(last_check_in_at, true, now) {
        ClientStatus::Overdue
    } else {
        ClientStatus::Active
    }
}
