//! Scheduling-window validation.
//!
//! The clinic takes appointments in two daily windows, both ends inclusive:
//! 08:00–11:00 and 13:00–17:30. Only the time-of-day component matters; the
//! date is not constrained here. The check runs on every create and edit of
//! an appointment's date-time, never on confirm/cancel/finalize (those do not
//! touch the time).

use chrono::{NaiveDateTime, Timelike};

use crate::error::{ClinicError, ClinicResult};

/// Clinic opening windows as minutes since midnight, inclusive bounds.
const MORNING: (u32, u32) = (8 * 60, 11 * 60);
const AFTERNOON: (u32, u32) = (13 * 60, 17 * 60 + 30);

/// Validates that `scheduled_at` falls inside clinic hours.
///
/// # Errors
///
/// Returns [`ClinicError::OutsideSchedulingWindow`] when the time-of-day is
/// outside both windows. The error message names the allowed ranges for
/// display to the user.
pub fn validate_scheduling_window(scheduled_at: NaiveDateTime) -> ClinicResult<()> {
    let minute_of_day = scheduled_at.hour() * 60 + scheduled_at.minute();

    let in_morning = (MORNING.0..=MORNING.1).contains(&minute_of_day);
    let in_afternoon = (AFTERNOON.0..=AFTERNOON.1).contains(&minute_of_day);

    if in_morning || in_afternoon {
        Ok(())
    } else {
        Err(ClinicError::OutsideSchedulingWindow)
    }
}
