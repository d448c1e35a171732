//! Recency to size mapping.
//!
//! Growth is logarithmic in hours since the last activity: a freshly tapped
//! bubble shrinks to the minimum and neglect saturates after one week.

use crate::entity::{BubbleEntity, Millis};

/// Smallest bubble radius
pub const MIN_SIZE: f64 = 15.0;
/// Largest bubble radius
pub const MAX_SIZE: f64 = 50.0;
/// Horizon at which size saturates (one week)
pub const MAX_HOURS: f64 = 168.0;

const MS_PER_HOUR: f64 = 3_600_000.0;

/// Radius for a bubble last touched at `last_activity`, evaluated at `now`.
///
/// `None` maps to [`MIN_SIZE`]. Timestamps at or after `now` also map to
/// [`MIN_SIZE`]; anything older than [`MAX_HOURS`] is flat at [`MAX_SIZE`].
pub fn compute_size(last_activity: Option<Millis>, now: Millis) -> f64 {
    let Some(last) = last_activity else {
        return MIN_SIZE;
    };
    let hours = now.saturating_sub(last) as f64 / MS_PER_HOUR;
    if hours <= 0.0 {
        return MIN_SIZE;
    }
    let scale = ((1.0 + hours).ln() / (1.0 + MAX_HOURS).ln()).clamp(0.0, 1.0);
    MIN_SIZE + (MAX_SIZE - MIN_SIZE) * scale
}

/// Radius for an entity at `now`.
pub fn size_of(entity: &BubbleEntity, now: Millis) -> f64 {
    compute_size(Some(entity.last_activity()), now)
}

/// Wall clock in milliseconds since the epoch.
pub fn now_millis() -> Millis {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR: Millis = 3_600_000;
    const NOW: Millis = 1_760_000_000_000;

    #[test]
    fn absent_activity_is_min_size() {
        assert_eq!(compute_size(None, NOW), MIN_SIZE);
    }

    #[test]
    fn zero_elapsed_is_exactly_min() {
        assert_eq!(compute_size(Some(NOW), NOW), 15.0);
    }

    #[test]
    fn one_week_is_exactly_max() {
        assert_eq!(compute_size(Some(NOW - 168 * HOUR), NOW), 50.0);
    }

    #[test]
    fn beyond_one_week_stays_flat() {
        assert_eq!(compute_size(Some(NOW - 8 * 168 * HOUR), NOW), MAX_SIZE);
        assert_eq!(compute_size(Some(NOW - 2 * 168 * HOUR), NOW), MAX_SIZE);
    }

    #[test]
    fn future_activity_is_min_size() {
        assert_eq!(compute_size(Some(NOW + 10 * HOUR), NOW), MIN_SIZE);
        assert_eq!(compute_size(Some(NOW + 1), NOW), MIN_SIZE);
    }

    #[test]
    fn extreme_timestamps_stay_in_range() {
        assert_eq!(compute_size(Some(Millis::MIN), NOW), MAX_SIZE);
        assert_eq!(compute_size(Some(Millis::MAX), NOW), MIN_SIZE);
        assert_eq!(compute_size(Some(Millis::MAX), Millis::MIN), MIN_SIZE);
        assert_eq!(compute_size(Some(Millis::MIN), Millis::MAX), MAX_SIZE);
    }

    #[test]
    fn monotonic_and_bounded() {
        let mut prev = compute_size(Some(NOW), NOW);
        for minutes in (0..=(400 * 60)).step_by(37) {
            let size = compute_size(Some(NOW - minutes as Millis * 60_000), NOW);
            assert!(size >= prev, "size decreased at {} minutes", minutes);
            assert!((MIN_SIZE..=MAX_SIZE).contains(&size));
            prev = size;
        }
    }

    #[test]
    fn one_hour_ago_is_closer_to_min() {
        let mut bubble = BubbleEntity::new(NOW - 500 * HOUR);
        bubble.log_activity(NOW - HOUR);
        let size = size_of(&bubble, NOW);
        assert!(size > MIN_SIZE && size < MAX_SIZE);
        assert!(size - MIN_SIZE < MAX_SIZE - size);
    }

    #[test]
    fn empty_history_uses_created_at() {
        let t0 = NOW - 168 * HOUR;
        let bubble = BubbleEntity::new(t0);
        assert_eq!(size_of(&bubble, t0 + 168 * HOUR), 50.0);
    }
}
