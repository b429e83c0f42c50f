//! Retry backoff curve
//!
//! Exponential in the retry count with bounded random jitter, decoupled
//! from the fixed inter-job delay. The jitter spreads retries from a batch
//! that failed together (provider outage) so they do not return together.

/// First retry delay
const BASE_DELAY_MS: i64 = 30_000;
/// Ceiling for the exponential curve
const MAX_DELAY_MS: i64 = 3_600_000;
/// Jitter fraction denominator (delay/4 → up to +25%)
const JITTER_DENOM: i64 = 4;

/// Deterministic exponential delay for a given retry count, capped.
pub fn delay_ms(retry_count: i32) -> i64 {
    let shift = retry_count.clamp(0, 20) as u32;
    BASE_DELAY_MS
        .saturating_mul(1_i64 << shift)
        .min(MAX_DELAY_MS)
}

/// Exponential delay plus random jitter in `[0, delay/4]`.
pub fn delay_with_jitter_ms(retry_count: i32) -> i64 {
    use rand::Rng;
    let base = delay_ms(retry_count);
    base + rand::thread_rng().gen_range(0..=base / JITTER_DENOM)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_grows_exponentially() {
        assert_eq!(delay_ms(0), 30_000);
        assert_eq!(delay_ms(1), 60_000);
        assert_eq!(delay_ms(2), 120_000);
        assert_eq!(delay_ms(3), 240_000);
    }

    #[test]
    fn test_delay_is_capped() {
        assert_eq!(delay_ms(10), MAX_DELAY_MS);
        assert_eq!(delay_ms(100), MAX_DELAY_MS);
    }

    #[test]
    fn test_negative_retry_count_clamps() {
        assert_eq!(delay_ms(-3), 30_000);
    }

    #[test]
    fn test_jitter_stays_in_bounds() {
        for retry in 0..6 {
            let base = delay_ms(retry);
            for _ in 0..50 {
                let jittered = delay_with_jitter_ms(retry);
                assert!(jittered >= base);
                assert!(jittered <= base + base / JITTER_DENOM);
            }
        }
    }
}
