// Property tests for recurrence and selection
// Random dates and cells checked against the grid's invariants

use chrono::{Duration, NaiveDate, NaiveTime};
use proptest::prelude::*;

use vet_calendar::models::appointment::Appointment;
use vet_calendar::scheduler::time_grid::{DAY_END_MINUTES, DAY_START_MINUTES, SLOT_INTERVAL};
use vet_calendar::scheduler::{GridCell, Selection};
use vet_calendar::services::appointment::occurs_on;

fn booking(date: NaiveDate, recurring: bool) -> Appointment {
    let mut appointment = Appointment::new(
        "V1",
        date,
        NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
    );
    appointment.is_recurring = recurring;
    appointment
}

fn any_date() -> impl Strategy<Value = NaiveDate> {
    (0i64..3650).prop_map(|days| NaiveDate::from_ymd_opt(2020, 1, 1).unwrap() + Duration::days(days))
}

fn any_cell_minutes() -> impl Strategy<Value = u32> {
    (0..(DAY_END_MINUTES - DAY_START_MINUTES) / SLOT_INTERVAL + 1)
        .prop_map(|slot| DAY_START_MINUTES + slot * SLOT_INTERVAL)
}

proptest! {
    #[test]
    fn weekly_bookings_repeat_every_seven_days(date in any_date(), weeks in 0i64..200) {
        let appointment = booking(date, true);
        prop_assert!(occurs_on(&appointment, date + Duration::weeks(weeks)));
        prop_assert!(!occurs_on(&appointment, date + Duration::weeks(weeks) + Duration::days(3)));
    }

    #[test]
    fn one_off_bookings_stay_on_their_date(date in any_date(), offset in 1i64..400) {
        let appointment = booking(date, false);
        prop_assert!(occurs_on(&appointment, date));
        prop_assert!(!occurs_on(&appointment, date + Duration::days(offset)));
    }

    #[test]
    fn selection_drafts_stay_inside_opening_hours(a in any_cell_minutes(), b in any_cell_minutes()) {
        let mut selection = Selection::new(GridCell::new("V1", a));
        selection.extend(GridCell::new("V1", b));
        let draft = selection.to_draft();

        prop_assert_eq!(draft.start_minutes, a.min(b));
        prop_assert!(draft.end_minutes <= DAY_END_MINUTES);
        prop_assert!(draft.end_minutes >= draft.start_minutes);
    }
}
