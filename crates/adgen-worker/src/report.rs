//! Per-run diagnostics returned to the cron caller.

use serde::Serialize;

/// Why a run did no provider work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunReason {
    /// Nothing awaiting submission; no rate-limit slots consumed
    NoPendingJobs,
    /// Nothing in flight; no rate-limit slots consumed
    NoActiveJobs,
    /// Zero slots granted this window. Not an error: observers use this to
    /// tell quota exhaustion from an empty queue
    RateLimited,
}

/// Outcome of one submit-worker run.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SubmitReport {
    /// Jobs successfully handed to the provider
    pub submitted: u32,
    /// Jobs marked failed by this run
    pub failed: u32,
    /// Slots granted for this run
    pub slots: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<RunReason>,
}

impl SubmitReport {
    pub fn idle() -> Self {
        Self {
            submitted: 0,
            failed: 0,
            slots: 0,
            reason: Some(RunReason::NoPendingJobs),
        }
    }

    pub fn rate_limited() -> Self {
        Self {
            submitted: 0,
            failed: 0,
            slots: 0,
            reason: Some(RunReason::RateLimited),
        }
    }
}

/// Outcome of one poll-worker run.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PollReport {
    /// Jobs whose provider status was read this run
    pub polled: u32,
    /// Jobs that reached `completed` this run
    pub completed: u32,
    /// Jobs that reached `failed` this run
    pub failed: u32,
    /// Slots granted for this run
    pub slots: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<RunReason>,
}

impl PollReport {
    pub fn idle() -> Self {
        Self {
            polled: 0,
            completed: 0,
            failed: 0,
            slots: 0,
            reason: Some(RunReason::NoActiveJobs),
        }
    }

    pub fn rate_limited() -> Self {
        Self {
            polled: 0,
            completed: 0,
            failed: 0,
            slots: 0,
            reason: Some(RunReason::RateLimited),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_serialization() {
        let report = SubmitReport::rate_limited();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["reason"], "rate_limited");
        assert_eq!(json["slots"], 0);

        let report = PollReport {
            polled: 3,
            completed: 1,
            failed: 0,
            slots: 5,
            reason: None,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["polled"], 3);
        assert!(json.get("reason").is_none());
    }
}
