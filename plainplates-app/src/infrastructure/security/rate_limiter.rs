use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

const CLEANUP_INTERVAL_SECS: u64 = 300;

#[derive(Clone)]
struct RequestRecord {
    minute_count: u32,
    hour_count: u32,
    minute_start: Instant,
    hour_start: Instant,
}

impl Default for RequestRecord {
    fn default() -> Self {
        let now = Instant::now();
        Self {
            minute_count: 0,
            hour_count: 0,
            minute_start: now,
            hour_start: now,
        }
    }
}

/// In-memory fixed-window limiter keyed by user id.
#[derive(Clone)]
pub struct RateLimiter {
    requests: Arc<DashMap<String, RequestRecord>>,
    last_cleanup: Arc<std::sync::Mutex<Instant>>,
    per_minute: u32,
    per_hour: u32,
}

impl RateLimiter {
    pub fn new(per_minute: u32, per_hour: u32) -> Self {
        Self {
            requests: Arc::new(DashMap::new()),
            last_cleanup: Arc::new(std::sync::Mutex::new(Instant::now())),
            per_minute,
            per_hour,
        }
    }

    pub fn check_rate_limit(&self, key: &str) -> Result<(), RateLimitError> {
        self.maybe_cleanup();

        let now = Instant::now();
        let mut record = self.requests.entry(key.to_string()).or_default();

        if now.duration_since(record.minute_start) > Duration::from_secs(60) {
            record.minute_count = 0;
            record.minute_start = now;
        }

        if now.duration_since(record.hour_start) > Duration::from_secs(3600) {
            record.hour_count = 0;
            record.hour_start = now;
        }

        if record.minute_count >= self.per_minute {
            let wait_secs = 60u64.saturating_sub(now.duration_since(record.minute_start).as_secs());
            return Err(RateLimitError::TooManyRequestsPerMinute(wait_secs));
        }

        if record.hour_count >= self.per_hour {
            let wait_secs =
                3600u64.saturating_sub(now.duration_since(record.hour_start).as_secs());
            return Err(RateLimitError::TooManyRequestsPerHour(wait_secs));
        }

        record.minute_count += 1;
        record.hour_count += 1;

        Ok(())
    }

    fn maybe_cleanup(&self) {
        let mut last_cleanup = self
            .last_cleanup
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if last_cleanup.elapsed() > Duration::from_secs(CLEANUP_INTERVAL_SECS) {
            let cutoff = Instant::now() - Duration::from_secs(3600);
            self.requests.retain(|_, v| v.hour_start > cutoff);
            *last_cleanup = Instant::now();
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(5, 20)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateLimitError {
    TooManyRequestsPerMinute(u64),
    TooManyRequestsPerHour(u64),
}

impl RateLimitError {
    pub fn message(&self) -> String {
        match self {
            Self::TooManyRequestsPerMinute(secs) => {
                format!("Too many submissions. Try again in {} seconds.", secs)
            }
            Self::TooManyRequestsPerHour(secs) => {
                format!(
                    "You've reached the hourly submission limit. Try again in {} minutes.",
                    secs.div_ceil(60)
                )
            }
        }
    }
}

impl From<RateLimitError> for plainplates_errors::AppError {
    fn from(err: RateLimitError) -> Self {
        plainplates_errors::AppError::Validation(err.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minute_limit() {
        let limiter = RateLimiter::new(2, 20);
        assert!(limiter.check_rate_limit("user-a").is_ok());
        assert!(limiter.check_rate_limit("user-a").is_ok());
        assert!(matches!(
            limiter.check_rate_limit("user-a"),
            Err(RateLimitError::TooManyRequestsPerMinute(_))
        ));
        assert!(limiter.check_rate_limit("user-b").is_ok());
    }

    #[test]
    fn test_hour_limit() {
        let limiter = RateLimiter::new(10, 3);
        for _ in 0..3 {
            assert!(limiter.check_rate_limit("user-a").is_ok());
        }
        assert!(matches!(
            limiter.check_rate_limit("user-a"),
            Err(RateLimitError::TooManyRequestsPerHour(_))
        ));
    }

    #[test]
    fn test_error_converts_to_validation() {
        let err: plainplates_errors::AppError = RateLimitError::TooManyRequestsPerMinute(42).into();
        assert_eq!(
            err,
            plainplates_errors::AppError::Validation(
                "Too many submissions. Try again in 42 seconds.".to_string()
            )
        );
    }
}
