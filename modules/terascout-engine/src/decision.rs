//! Pure decision functions for the cycle loop. Kept separate from the
//! workflow so the rate-limit and expiration rules are unit-testable
//! without a Restate context.

use chrono::{DateTime, Utc};

/// True once `now >= expires_at`: no further events or emails may be
/// produced per spec.md §3.
pub fn is_expired(now: DateTime<Utc>, expires_at: DateTime<Utc>) -> bool {
    now >= expires_at
}

/// True when today's count is still under the per-scout daily cap.
pub fn should_email(today_count: u32, max_per_day: u32) -> bool {
    today_count < max_per_day
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn at(offset_secs: i64) -> DateTime<Utc> {
        Utc::now() + Duration::seconds(offset_secs)
    }

    #[test]
    fn not_expired_before_deadline() {
        assert!(!is_expired(at(0), at(60)));
    }

    #[test]
    fn expired_exactly_at_deadline() {
        let t = at(0);
        assert!(is_expired(t, t));
    }

    #[test]
    fn expired_past_deadline() {
        assert!(is_expired(at(60), at(0)));
    }

    #[test]
    fn should_email_below_cap() {
        assert!(should_email(9, 10));
    }

    #[test]
    fn should_email_at_cap_is_false() {
        assert!(!should_email(10, 10));
    }

    #[test]
    fn should_email_above_cap_is_false() {
        assert!(!should_email(11, 10));
    }

    #[test]
    fn should_email_zero_cap_always_false() {
        assert!(!should_email(0, 0));
    }
}
