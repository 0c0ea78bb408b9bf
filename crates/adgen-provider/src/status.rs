//! Upstream status-vocabulary normalization.

use adgen_models::JobStatus;

/// Map the provider's status vocabulary onto the internal status set.
///
/// Anything unrecognized maps to `submitted`: the job is known to the
/// provider but its phase is not, and a later poll will refine it.
pub fn normalize_status(upstream: &str) -> JobStatus {
    match upstream.to_ascii_lowercase().as_str() {
        "pending" | "queued" => JobStatus::Queued,
        "processing" | "rendering" => JobStatus::Rendering,
        "done" | "completed" => JobStatus::Completed,
        "failed" | "error" => JobStatus::Failed,
        _ => JobStatus::Submitted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalization_table() {
        assert_eq!(normalize_status("pending"), JobStatus::Queued);
        assert_eq!(normalize_status("queued"), JobStatus::Queued);
        assert_eq!(normalize_status("processing"), JobStatus::Rendering);
        assert_eq!(normalize_status("rendering"), JobStatus::Rendering);
        assert_eq!(normalize_status("done"), JobStatus::Completed);
        assert_eq!(normalize_status("completed"), JobStatus::Completed);
        assert_eq!(normalize_status("failed"), JobStatus::Failed);
        assert_eq!(normalize_status("error"), JobStatus::Failed);
    }

    #[test]
    fn test_unknown_vocabulary_falls_back_to_submitted() {
        assert_eq!(normalize_status("in_progress_v2"), JobStatus::Submitted);
        assert_eq!(normalize_status(""), JobStatus::Submitted);
    }

    #[test]
    fn test_normalization_is_case_insensitive() {
        assert_eq!(normalize_status("DONE"), JobStatus::Completed);
        assert_eq!(normalize_status("Queued"), JobStatus::Queued);
    }
}
