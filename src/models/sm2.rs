//! SM-2 derived review scheduler.
//!
//! Maps the current card state plus one review outcome to the next state:
//! - A lapse (incorrect answer, always the case for `Forgot`) resets
//!   repetitions to 0 and the interval to 1 day, and costs 0.2 ease
//! - A correct answer bumps repetitions and adjusts ease by quality
//!   (easy +0.15, normal 0, hard -0.15)
//! - Intervals follow 1 → 3 → 7 days, then previous interval × ease
//! - Ease never falls below 1.3 and the interval never below 1 day
//!
//! Everything here is pure: the clock is passed in as `now`.

use super::review_card::MIN_EASE_FACTOR;
use super::{MasteryLevel, ReviewCard, ReviewQuality};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// Fixed intervals (days) for the first three correct reviews in a row.
const FIRST_INTERVAL: u32 = 1;
const SECOND_INTERVAL: u32 = 3;
const THIRD_INTERVAL: u32 = 7;

/// Interval (days) after a lapse.
const LAPSE_INTERVAL: u32 = 1;

/// Scheduler output for one reviewed item.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResult {
    pub repetitions: u32,
    pub ease_factor: f64,
    pub interval_days: u32,
    pub next_review_date: DateTime<Utc>,
    pub mastery_level: MasteryLevel,
}

impl ScheduleResult {
    /// Card state to persist after a review made at `reviewed_at`.
    pub fn into_card(self, reviewed_at: DateTime<Utc>) -> ReviewCard {
        ReviewCard {
            repetitions: self.repetitions,
            ease_factor: self.ease_factor,
            interval_days: self.interval_days,
            last_review_date: Some(reviewed_at),
            mastery_level: self.mastery_level,
        }
    }
}

/// Calculates the next scheduling state for a single reviewed item.
///
/// `quality == Forgot` is always treated as incorrect, whatever `is_correct`
/// says; callers are expected to have rejected that pairing already (see
/// [`super::ReviewOutcome::new`]). Out-of-range stored state (ease below the
/// floor, zero interval) is clamped rather than rejected.
pub fn schedule_next_review(
    card: &ReviewCard,
    quality: ReviewQuality,
    is_correct: bool,
    now: DateTime<Utc>,
) -> ScheduleResult {
    let (repetitions, ease_factor, interval_days) = next_progress(card, quality, is_correct);

    ScheduleResult {
        repetitions,
        ease_factor,
        interval_days,
        next_review_date: add_days(now, interval_days),
        mastery_level: MasteryLevel::from_progress(repetitions, interval_days),
    }
}

/// Returns (repetitions, ease factor, interval) after the review.
fn next_progress(card: &ReviewCard, quality: ReviewQuality, is_correct: bool) -> (u32, f64, u32) {
    if !is_correct || quality == ReviewQuality::Forgot {
        let ease_factor = (card.ease_factor - 0.2).max(MIN_EASE_FACTOR);
        return (0, ease_factor, LAPSE_INTERVAL);
    }

    let repetitions = card.repetitions.saturating_add(1);
    let ease_factor = (card.ease_factor + quality.ease_adjustment()).max(MIN_EASE_FACTOR);

    let interval_days = match repetitions {
        1 => FIRST_INTERVAL,
        2 => SECOND_INTERVAL,
        3 => THIRD_INTERVAL,
        // Grows from the interval carried into this review, not the constants above
        _ => {
            let previous = card.interval_days.max(1) as f64;
            ((previous * ease_factor).round() as u32).max(1)
        }
    };

    (repetitions, ease_factor, interval_days)
}

/// True once the scheduled review time has been reached.
pub fn is_due(next_review_date: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    next_review_date <= now
}

/// Adds whole days, saturating at the latest representable instant.
pub fn add_days(date: DateTime<Utc>, days: u32) -> DateTime<Utc> {
    date.checked_add_signed(Duration::days(i64::from(days)))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Interval each rating would produce, in `ReviewQuality::ALL` order.
/// `Forgot` is scheduled as a lapse, the others as correct answers.
pub fn preview_intervals(card: &ReviewCard) -> [u32; 4] {
    ReviewQuality::ALL.map(|quality| {
        let is_correct = quality != ReviewQuality::Forgot;
        next_progress(card, quality, is_correct).2
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap()
    }

    fn card(repetitions: u32, ease_factor: f64, interval_days: u32) -> ReviewCard {
        ReviewCard {
            repetitions,
            ease_factor,
            interval_days,
            last_review_date: Some(now()),
            mastery_level: MasteryLevel::from_progress(repetitions, interval_days),
        }
    }

    fn assert_ease(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "ease factor {} != {}",
            actual,
            expected
        );
    }

    #[test]
    fn test_first_review_easy() {
        let next = schedule_next_review(&ReviewCard::default(), ReviewQuality::Easy, true, now());
        assert_eq!(next.repetitions, 1);
        assert_ease(next.ease_factor, 2.65);
        assert_eq!(next.interval_days, 1);
        assert_eq!(next.mastery_level, MasteryLevel::Learning);
    }

    #[test]
    fn test_first_review_forgot() {
        let next =
            schedule_next_review(&ReviewCard::default(), ReviewQuality::Forgot, false, now());
        assert_eq!(next.repetitions, 0);
        assert_ease(next.ease_factor, 2.3);
        assert_eq!(next.interval_days, 1);
        assert_eq!(next.mastery_level, MasteryLevel::New);
    }

    #[test]
    fn test_progression_through_fixed_steps_into_growth() {
        let first = schedule_next_review(&ReviewCard::default(), ReviewQuality::Normal, true, now());
        assert_eq!(
            (first.repetitions, first.interval_days, first.mastery_level),
            (1, 1, MasteryLevel::Learning)
        );
        assert_ease(first.ease_factor, 2.5);

        let second =
            schedule_next_review(&first.clone().into_card(now()), ReviewQuality::Normal, true, now());
        assert_eq!(
            (second.repetitions, second.interval_days, second.mastery_level),
            (2, 3, MasteryLevel::Learning)
        );
        assert_ease(second.ease_factor, 2.5);

        let third =
            schedule_next_review(&second.clone().into_card(now()), ReviewQuality::Easy, true, now());
        assert_eq!(
            (third.repetitions, third.interval_days, third.mastery_level),
            (3, 7, MasteryLevel::Reviewing)
        );
        assert_ease(third.ease_factor, 2.65);

        let fourth =
            schedule_next_review(&third.clone().into_card(now()), ReviewQuality::Normal, true, now());
        assert_eq!(fourth.repetitions, 4);
        assert_ease(fourth.ease_factor, 2.65);
        // round(7 * 2.65)
        assert_eq!(fourth.interval_days, 19);
        assert_eq!(fourth.mastery_level, MasteryLevel::Reviewing);
    }

    #[test]
    fn test_hard_on_mature_card_stays_mastered() {
        let next = schedule_next_review(&card(10, 2.8, 200), ReviewQuality::Hard, true, now());
        assert_eq!(next.repetitions, 11);
        assert_ease(next.ease_factor, 2.65);
        assert_eq!(next.interval_days, 530);
        assert_eq!(next.mastery_level, MasteryLevel::Mastered);
    }

    #[test]
    fn test_hard_is_not_a_lapse() {
        let next = schedule_next_review(&card(4, 2.5, 19), ReviewQuality::Hard, true, now());
        assert_eq!(next.repetitions, 5);
        assert!(next.interval_days > 19);
    }

    #[test]
    fn test_lapse_resets_any_history() {
        for prior in [card(1, 2.5, 1), card(6, 1.9, 45), card(25, 3.4, 900)] {
            let next = schedule_next_review(&prior, ReviewQuality::Forgot, false, now());
            assert_eq!(next.repetitions, 0);
            assert_eq!(next.interval_days, 1);
            assert_eq!(next.mastery_level, MasteryLevel::New);
            assert_ease(next.ease_factor, (prior.ease_factor - 0.2).max(MIN_EASE_FACTOR));
        }
    }

    #[test]
    fn test_incorrect_with_good_rating_still_lapses() {
        let next = schedule_next_review(&card(5, 2.5, 40), ReviewQuality::Easy, false, now());
        assert_eq!(next.repetitions, 0);
        assert_eq!(next.interval_days, 1);
        assert_ease(next.ease_factor, 2.3);
    }

    #[test]
    fn test_forgot_forces_lapse_even_if_marked_correct() {
        let next = schedule_next_review(&card(5, 2.5, 40), ReviewQuality::Forgot, true, now());
        assert_eq!(next.repetitions, 0);
        assert_eq!(next.interval_days, 1);
    }

    #[test]
    fn test_ease_floor() {
        let lapse = schedule_next_review(&card(3, 1.4, 7), ReviewQuality::Forgot, false, now());
        assert_ease(lapse.ease_factor, MIN_EASE_FACTOR);

        let hard = schedule_next_review(&card(3, 1.35, 7), ReviewQuality::Hard, true, now());
        assert_ease(hard.ease_factor, MIN_EASE_FACTOR);
    }

    #[test]
    fn test_corrupt_state_is_clamped() {
        let corrupt = ReviewCard {
            repetitions: 5,
            ease_factor: 0.4,
            interval_days: 0,
            last_review_date: None,
            mastery_level: MasteryLevel::Mastered,
        };

        let next = schedule_next_review(&corrupt, ReviewQuality::Normal, true, now());
        assert_ease(next.ease_factor, MIN_EASE_FACTOR);
        assert!(next.interval_days >= 1);
        assert_eq!(next.mastery_level, MasteryLevel::Reviewing);
    }

    #[test]
    fn test_same_review_twice_is_not_idempotent() {
        let start = card(4, 2.5, 19);
        let once = schedule_next_review(&start, ReviewQuality::Normal, true, now());
        let twice = schedule_next_review(&once.clone().into_card(now()), ReviewQuality::Normal, true, now());

        assert_eq!(twice.repetitions, once.repetitions + 1);
        assert!(twice.interval_days > once.interval_days);
    }

    #[test]
    fn test_next_review_date_is_now_plus_interval() {
        let next = schedule_next_review(&card(3, 2.5, 7), ReviewQuality::Normal, true, now());
        assert_eq!(next.interval_days, 18);
        assert_eq!(next.next_review_date, now() + Duration::days(18));
    }

    #[test]
    fn test_huge_interval_saturates_date() {
        let next = schedule_next_review(&card(50, 3.0, u32::MAX / 2), ReviewQuality::Easy, true, now());
        assert_eq!(next.interval_days, u32::MAX);
        assert_eq!(next.next_review_date, DateTime::<Utc>::MAX_UTC);
    }

    #[test]
    fn test_into_card_records_review_time() {
        let reviewed_at = now();
        let next = schedule_next_review(&ReviewCard::default(), ReviewQuality::Normal, true, reviewed_at);
        let updated = next.into_card(reviewed_at);
        assert_eq!(updated.last_review_date, Some(reviewed_at));
        assert_eq!(updated.repetitions, 1);
        assert!(!updated.is_new());
    }

    #[test]
    fn test_is_due() {
        assert!(is_due(now(), now()));
        assert!(is_due(now() - Duration::seconds(1), now()));
        assert!(!is_due(now() + Duration::seconds(1), now()));
    }

    #[test]
    fn test_preview_intervals() {
        assert_eq!(preview_intervals(&ReviewCard::default()), [1, 1, 1, 1]);
        assert_eq!(preview_intervals(&card(2, 2.5, 3)), [1, 7, 7, 7]);
        // 19 * 2.35, 19 * 2.5, 19 * 2.65
        assert_eq!(preview_intervals(&card(4, 2.5, 19)), [1, 45, 48, 50]);
    }
}
