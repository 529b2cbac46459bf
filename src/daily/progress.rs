//! Streak and completion bookkeeping
//!
//! The streak counts distinct days on which a daily set was completed. A
//! missed day does not reset it.

use chrono::NaiveDate;

use crate::vocab::models::{DailySet, UserProgress};

/// Mark `daily_set` complete for `today`.
///
/// Returns `false` and leaves everything untouched when the set was already
/// complete. Otherwise the set is marked complete, `today` is recorded once
/// (bumping the streak the first time), and the check-in date is updated.
pub fn complete_daily(
    progress: &mut UserProgress,
    daily_set: &mut DailySet,
    today: NaiveDate,
) -> bool {
    if daily_set.completed {
        return false;
    }

    daily_set.completed = true;

    if !progress.has_completed(today) {
        progress.completed_dates.push(today);
        progress.streak += 1;
    }
    progress.last_check_in = Some(today);

    true
}
