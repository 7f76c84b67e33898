use std::fmt;

/// Per-run counters. An iteration counts as a success once it holds a session.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    pub success: u64,
    pub failed: u64,
}

impl RunStats {
    pub fn total(&self) -> u64 {
        self.success + self.failed
    }

    pub fn success_rate(&self) -> f64 {
        if self.total() == 0 {
            return 0.0;
        }
        (self.success as f64 / self.total() as f64) * 100.0
    }
}

/// Outcome of a single API call, reported but never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskResult {
    pub success: bool,
    pub message: String,
}

impl TaskResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

impl fmt::Display for TaskResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.success { "SUCCESS" } else { "FAILED" };
        write!(f, "{} - {}", status, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_rate_empty_run() {
        assert_eq!(RunStats::default().success_rate(), 0.0);
    }

    #[test]
    fn test_success_rate() {
        let stats = RunStats {
            success: 3,
            failed: 1,
        };
        assert_eq!(stats.total(), 4);
        assert!((stats.success_rate() - 75.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_task_result_display() {
        assert_eq!(TaskResult::ok("done").to_string(), "SUCCESS - done");
        assert_eq!(
            TaskResult::failed("timeout").to_string(),
            "FAILED - timeout"
        );
    }
}
