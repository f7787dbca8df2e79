use time::{Duration, OffsetDateTime};

/// Expected interval between two check-ins.
pub const CHECK_IN_CADENCE: Duration = Duration::days(7);

/// Slack granted past the cadence window before a client counts as overdue.
pub const CHECK_IN_GRACE: Duration = Duration::ZERO;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CadencePolicy {
    pub window: Duration,
    pub grace: Duration,
}

impl Default for CadencePolicy {
    fn default() -> Self {
        Self {
            window: CHECK_IN_CADENCE,
            grace: CHECK_IN_GRACE,
        }
    }
}

impl CadencePolicy {
    /// Largest gap since the last check-in that is still on time.
    pub fn threshold(&self) -> Duration {
        self.window + self.grace
    }

    /// Inactive clients are never overdue; active clients who never checked in always are.
    pub fn is_overdue(
        &self,
        last_check_in_at: Option<OffsetDateTime>,
        is_active_client: bool,
        now: OffsetDateTime,
    ) -> bool {
        if !is_active_client {
            return false;
        }
        match last_check_in_at {
            None => true,
            Some(last) => now - last > self.threshold(),
        }
    }
}
