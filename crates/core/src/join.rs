//! First-seen date capture for join events.
//!
//! The earliest known date wins: a join event only stamps `joined_at` when
//! the record has none, whether the record was created by an earlier join or
//! by a command invocation.

use crate::types::CalendarDate;

/// What to do with an observed join date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinStamp {
    /// The record has no join date; persist this one.
    Stamp(CalendarDate),
    /// The record already has a join date; the observation is discarded.
    Keep(CalendarDate),
}

/// Decide whether `observed` should be written as the join date.
pub fn resolve(current: Option<CalendarDate>, observed: CalendarDate) -> JoinStamp {
    match current {
        Some(existing) => JoinStamp::Keep(existing),
        None => JoinStamp::Stamp(observed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn unset_join_date_is_stamped() {
        let observed = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(resolve(None, observed), JoinStamp::Stamp(observed));
    }

    #[test]
    fn existing_join_date_is_kept() {
        let first = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let later = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(resolve(Some(first), later), JoinStamp::Keep(first));
    }
}
