//! Time grid model for the day scheduler.
//!
//! Pure conversions between wall-clock `HH:MM` strings, minutes since
//! midnight, 15-minute slot indices and pixel offsets. Nothing in here
//! clamps: keeping values inside the operating window is the caller's job.

use chrono::{NaiveTime, Timelike};

use super::GridError;

/// Minutes covered by one grid slot
pub const SLOT_INTERVAL: u32 = 15;
/// 09:00, the first row of the grid
pub const DAY_START_MINUTES: u32 = 9 * 60;
/// 20:00, the closing boundary (a line, not a cell)
pub const DAY_END_MINUTES: u32 = 20 * 60;
/// Shortest appointment the grid can produce
pub const MIN_DURATION_MINUTES: u32 = SLOT_INTERVAL;

/// Parse an `HH:MM` string into minutes since midnight.
///
/// A trailing `:SS` component (as returned by SQL `time` columns) is
/// accepted and ignored. No timezone handling; same-day only.
///
/// # Examples
/// ```
/// use vet_calendar::scheduler::time_grid::to_minutes;
/// assert_eq!(to_minutes("09:30").unwrap(), 570);
/// ```
pub fn to_minutes(time: &str) -> Result<u32, GridError> {
    let invalid = || GridError::InvalidTime(time.to_string());
    let mut parts = time.trim().split(':');

    let hours = parts.next().ok_or_else(invalid)?;
    let minutes = parts.next().ok_or_else(invalid)?;
    if let Some(seconds) = parts.next() {
        if !is_two_digits(seconds) {
            return Err(invalid());
        }
    }
    if parts.next().is_some() {
        return Err(invalid());
    }

    if hours.is_empty() || hours.len() > 2 || !hours.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    if !is_two_digits(minutes) {
        return Err(invalid());
    }

    let hours: u32 = hours.parse().map_err(|_| invalid())?;
    let minutes: u32 = minutes.parse().map_err(|_| invalid())?;
    if hours > 23 || minutes > 59 {
        return Err(invalid());
    }

    Ok(hours * 60 + minutes)
}

fn is_two_digits(value: &str) -> bool {
    value.len() == 2 && value.bytes().all(|b| b.is_ascii_digit())
}

/// Format minutes since midnight as a zero-padded `HH:MM` string.
pub fn to_time_string(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Index of the slot starting at `time`, counted from 09:00.
///
/// Times before the grid start produce negative indices.
pub fn slot_index(time: &str) -> Result<i32, GridError> {
    let offset = to_minutes(time)? as i32 - DAY_START_MINUTES as i32;
    Ok(offset.div_euclid(SLOT_INTERVAL as i32))
}

/// Length of `start..end` measured in slots.
///
/// Fractional only when the inputs are not aligned to the grid.
pub fn duration_in_slots(start: &str, end: &str) -> Result<f64, GridError> {
    let start = to_minutes(start)? as f64;
    let end = to_minutes(end)? as f64;
    Ok((end - start) / SLOT_INTERVAL as f64)
}

/// Vertical pixel offset of `time` from the top of the grid.
pub fn slot_offset_px(time: &str, slot_height: f32) -> Result<f32, GridError> {
    let offset = to_minutes(time)? as f32 - DAY_START_MINUTES as f32;
    Ok(offset / SLOT_INTERVAL as f32 * slot_height)
}

/// Every grid line from 09:00 through 20:00 inclusive.
///
/// The last entry is the closing boundary; `grid_cells` drops it.
pub fn time_slots() -> Vec<String> {
    (DAY_START_MINUTES..=DAY_END_MINUTES)
        .step_by(SLOT_INTERVAL as usize)
        .map(to_time_string)
        .collect()
}

/// Start times of the selectable cells (09:00 through 19:45).
pub fn grid_cells() -> Vec<String> {
    let mut slots = time_slots();
    slots.pop();
    slots
}

/// Whether `minutes` sits on a slot boundary.
pub fn is_aligned(minutes: u32) -> bool {
    minutes % SLOT_INTERVAL == 0
}

/// Whole slots covered by a pointer displacement, rounded to the nearest
/// grid line so a drag snaps to whichever line is closer.
pub fn snap_steps(delta_px: f32, step_px: f32) -> i32 {
    if step_px <= 0.0 {
        return 0;
    }
    (delta_px / step_px).round() as i32
}

/// Minutes since midnight of a chrono time (seconds are dropped).
pub fn clock_minutes(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

/// Chrono time for minutes since midnight.
pub fn clock_time(minutes: u32) -> Result<NaiveTime, GridError> {
    NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0).ok_or(GridError::OutOfRange(minutes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use test_case::test_case;

    #[test_case("09:00", 540; "grid start")]
    #[test_case("20:00", 1200; "closing boundary")]
    #[test_case("00:00", 0; "midnight")]
    #[test_case("9:05", 545; "single digit hour")]
    #[test_case("13:45:00", 825; "sql time with seconds")]
    fn test_to_minutes(input: &str, expected: u32) {
        assert_eq!(to_minutes(input).unwrap(), expected);
    }

    #[test_case(""; "empty")]
    #[test_case("0900"; "missing colon")]
    #[test_case("24:00"; "hour out of range")]
    #[test_case("10:60"; "minute out of range")]
    #[test_case("10:5"; "single digit minute")]
    #[test_case("+9:00"; "signed hour")]
    #[test_case("10:00:00:00"; "too many parts")]
    fn test_to_minutes_rejects(input: &str) {
        assert!(matches!(to_minutes(input), Err(GridError::InvalidTime(_))));
    }

    #[test]
    fn test_to_time_string_pads() {
        assert_eq!(to_time_string(545), "09:05");
        assert_eq!(to_time_string(1200), "20:00");
    }

    #[test]
    fn test_slot_index() {
        assert_eq!(slot_index("09:00").unwrap(), 0);
        assert_eq!(slot_index("10:15").unwrap(), 5);
        assert_eq!(slot_index("19:45").unwrap(), 43);
        assert_eq!(slot_index("08:45").unwrap(), -1);
    }

    #[test]
    fn test_duration_in_slots() {
        assert_eq!(duration_in_slots("09:00", "09:30").unwrap(), 2.0);
        assert_eq!(duration_in_slots("09:00", "09:05").unwrap(), 1.0 / 3.0);
    }

    #[test]
    fn test_slot_offset_px() {
        assert_eq!(slot_offset_px("09:00", 64.0).unwrap(), 0.0);
        assert_eq!(slot_offset_px("10:30", 64.0).unwrap(), 6.0 * 64.0);
    }

    #[test]
    fn test_time_slots_cover_operating_window() {
        let slots = time_slots();
        assert_eq!(slots.len(), 45);
        assert_eq!(slots.first().map(String::as_str), Some("09:00"));
        assert_eq!(slots.last().map(String::as_str), Some("20:00"));

        let cells = grid_cells();
        assert_eq!(cells.len(), 44);
        assert_eq!(cells.last().map(String::as_str), Some("19:45"));
    }

    #[test]
    fn test_snap_steps_rounds_to_nearest() {
        assert_eq!(snap_steps(31.0, 64.0), 0);
        assert_eq!(snap_steps(33.0, 64.0), 1);
        assert_eq!(snap_steps(-97.0, 64.0), -2);
        assert_eq!(snap_steps(100.0, 0.0), 0);
    }

    #[test]
    fn test_clock_round_trip() {
        let time = clock_time(615).unwrap();
        assert_eq!(clock_minutes(time), 615);
        assert!(clock_time(24 * 60).is_err());
    }

    proptest! {
        /// Property: formatting then parsing is the identity on valid times
        #[test]
        fn prop_time_string_round_trip(hours in 0u32..24, minutes in 0u32..60) {
            let text = format!("{:02}:{:02}", hours, minutes);
            prop_assert_eq!(to_time_string(to_minutes(&text).unwrap()), text);
        }

        /// Property: aligned durations convert back to the same minute span
        #[test]
        fn prop_duration_in_slots_matches_minutes(start in 36u32..60, len in 1u32..20) {
            let start_min = start * SLOT_INTERVAL;
            let end_min = start_min + len * SLOT_INTERVAL;
            let slots = duration_in_slots(&to_time_string(start_min), &to_time_string(end_min)).unwrap();
            prop_assert_eq!((slots * SLOT_INTERVAL as f64) as u32, end_min - start_min);
        }
    }
}
