mod input_sanitizer;
mod rate_limiter;

pub use input_sanitizer::{ContentFilter, InputSanitizer, MAX_SUBMISSION_CHARS};
pub use rate_limiter::{RateLimitError, RateLimiter};
