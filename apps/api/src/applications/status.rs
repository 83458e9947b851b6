#![allow(dead_code)]

//! Application lifecycle — the status set and the transition rules that
//! govern a submitted application.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a submitted application.
///
/// SELECTED and REJECTED are terminal: no distinct-state transition leaves
/// them. A repeated write of the current status is accepted as a no-op, and
/// that rule applies to the terminal states too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    Applied,
    InReview,
    TestPending,
    TestCompleted,
    Interview,
    Selected,
    Rejected,
}

pub const ALL_STATUSES: [ApplicationStatus; 7] = [
    ApplicationStatus::Applied,
    ApplicationStatus::InReview,
    ApplicationStatus::TestPending,
    ApplicationStatus::TestCompleted,
    ApplicationStatus::Interview,
    ApplicationStatus::Selected,
    ApplicationStatus::Rejected,
];

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "APPLIED",
            ApplicationStatus::InReview => "IN_REVIEW",
            ApplicationStatus::TestPending => "TEST_PENDING",
            ApplicationStatus::TestCompleted => "TEST_COMPLETED",
            ApplicationStatus::Interview => "INTERVIEW",
            ApplicationStatus::Selected => "SELECTED",
            ApplicationStatus::Rejected => "REJECTED",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "APPLIED" => Ok(ApplicationStatus::Applied),
            "IN_REVIEW" => Ok(ApplicationStatus::InReview),
            "TEST_PENDING" => Ok(ApplicationStatus::TestPending),
            "TEST_COMPLETED" => Ok(ApplicationStatus::TestCompleted),
            "INTERVIEW" => Ok(ApplicationStatus::Interview),
            "SELECTED" => Ok(ApplicationStatus::Selected),
            "REJECTED" => Ok(ApplicationStatus::Rejected),
            other => Err(format!("unknown application status '{other}'")),
        }
    }
}

/// Returns true when moving from `current` to `next` is permitted.
///
/// Self-transitions are always permitted, terminal states included (the
/// status endpoint is idempotent by contract — do not change without product
/// sign-off).
pub fn is_valid_transition(current: ApplicationStatus, next: ApplicationStatus) -> bool {
    use ApplicationStatus::*;

    if current == next {
        return true;
    }

    matches!(
        (current, next),
        (Applied, InReview | Rejected)
            | (InReview, TestPending | Interview | Rejected)
            | (TestPending, TestCompleted | Rejected)
            | (TestCompleted, Interview | Rejected)
            | (Interview, Selected | Rejected)
    )
}

/// Distinct statuses reachable from `current`. Empty for terminal states.
pub fn valid_next(current: ApplicationStatus) -> &'static [ApplicationStatus] {
    use ApplicationStatus::*;

    match current {
        Applied => &[InReview, Rejected],
        InReview => &[TestPending, Interview, Rejected],
        TestPending => &[TestCompleted, Rejected],
        TestCompleted => &[Interview, Rejected],
        Interview => &[Selected, Rejected],
        Selected | Rejected => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ApplicationStatus::*;

    #[test]
    fn test_self_transition_is_valid_for_every_status() {
        for status in ALL_STATUSES {
            assert!(
                is_valid_transition(status, status),
                "self-transition rejected for {status}"
            );
        }
    }

    #[test]
    fn test_terminal_states_permit_no_distinct_transition() {
        assert!(!is_valid_transition(Selected, Rejected));
        assert!(!is_valid_transition(Rejected, Selected));
        for status in ALL_STATUSES {
            if status != Selected {
                assert!(!is_valid_transition(Selected, status));
            }
            if status != Rejected {
                assert!(!is_valid_transition(Rejected, status));
            }
        }
    }

    #[test]
    fn test_happy_path_through_testing_track() {
        assert!(is_valid_transition(Applied, InReview));
        assert!(is_valid_transition(InReview, TestPending));
        assert!(is_valid_transition(TestPending, TestCompleted));
        assert!(is_valid_transition(TestCompleted, Interview));
        assert!(is_valid_transition(Interview, Selected));
    }

    #[test]
    fn test_interview_can_skip_testing_track() {
        assert!(is_valid_transition(InReview, Interview));
    }

    #[test]
    fn test_rejection_is_reachable_from_every_live_status() {
        for status in [Applied, InReview, TestPending, TestCompleted, Interview] {
            assert!(is_valid_transition(status, Rejected), "cannot reject from {status}");
        }
    }

    #[test]
    fn test_skipping_review_is_invalid() {
        assert!(!is_valid_transition(Applied, Interview));
        assert!(!is_valid_transition(Applied, TestPending));
        assert!(!is_valid_transition(Applied, Selected));
    }

    #[test]
    fn test_no_backward_transitions() {
        assert!(!is_valid_transition(Interview, InReview));
        assert!(!is_valid_transition(TestCompleted, TestPending));
        assert!(!is_valid_transition(InReview, Applied));
    }

    #[test]
    fn test_valid_next_matches_transition_check() {
        for current in ALL_STATUSES {
            for next in ALL_STATUSES {
                let listed = valid_next(current).contains(&next);
                let expected = is_valid_transition(current, next) && current != next;
                assert_eq!(listed, expected, "mismatch for {current} -> {next}");
            }
        }
    }

    #[test]
    fn test_round_trips_through_strings() {
        for status in ALL_STATUSES {
            let parsed: ApplicationStatus = status.as_str().parse().unwrap();
            assert_eq!(parsed, status);
        }
        assert!("ARCHIVED".parse::<ApplicationStatus>().is_err());
    }

    #[test]
    fn test_serde_uses_screaming_snake_case() {
        let json = serde_json::to_string(&InReview).unwrap();
        assert_eq!(json, "\"IN_REVIEW\"");
        let parsed: ApplicationStatus = serde_json::from_str("\"TEST_PENDING\"").unwrap();
        assert_eq!(parsed, TestPending);
    }
}
