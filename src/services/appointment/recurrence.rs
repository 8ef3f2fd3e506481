//! Weekly recurrence projection.
//!
//! A recurring appointment is stored once, on its anchor date, and projected
//! onto every later date that falls on the same weekday. Nothing is
//! materialised; the day view asks [`occurs_on`] for each row.

use chrono::NaiveDate;

use crate::models::appointment::Appointment;
use crate::models::veterinarian::ALL_VETS_ID;
use crate::utils::date::same_weekday;

/// Whether `appointment` shows up on `date`.
pub fn occurs_on(appointment: &Appointment, date: NaiveDate) -> bool {
    if appointment.date == date {
        return true;
    }
    appointment.is_recurring && date >= appointment.date && same_weekday(date, appointment.date)
}

/// Appointments to draw on `date`, in their stored order.
///
/// Rows booked against the "all practitioners" pseudo-entry are left out:
/// that entry has no column to draw them in.
pub fn appointments_for_day(appointments: &[Appointment], date: NaiveDate) -> Vec<&Appointment> {
    appointments
        .iter()
        .filter(|a| a.vet_id != ALL_VETS_ID && occurs_on(a, date))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use test_case::test_case;

    fn weekly_from(anchor: NaiveDate) -> Appointment {
        let mut appointment = Appointment::new(
            "V1",
            anchor,
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
        );
        appointment.is_recurring = true;
        appointment
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // 2025-06-02 is a Monday
    #[test_case(date(2025, 6, 2), true ; "anchor day")]
    #[test_case(date(2025, 6, 9), true ; "next monday")]
    #[test_case(date(2025, 9, 29), true ; "months later")]
    #[test_case(date(2025, 5, 26), false ; "monday before anchor")]
    #[test_case(date(2025, 6, 10), false ; "tuesday after anchor")]
    fn test_weekly_projection(on: NaiveDate, expected: bool) {
        assert_eq!(occurs_on(&weekly_from(date(2025, 6, 2)), on), expected);
    }

    #[test]
    fn test_one_off_only_on_its_date() {
        let mut appointment = weekly_from(date(2025, 6, 2));
        appointment.is_recurring = false;
        assert!(occurs_on(&appointment, date(2025, 6, 2)));
        assert!(!occurs_on(&appointment, date(2025, 6, 9)));
    }

    #[test]
    fn test_day_filter_skips_pseudo_vet() {
        let monday = date(2025, 6, 2);
        let mut shared = weekly_from(monday);
        shared.vet_id = ALL_VETS_ID.to_string();
        let rows = vec![weekly_from(monday), shared];

        let day = appointments_for_day(&rows, date(2025, 6, 16));
        assert_eq!(day.len(), 1);
        assert_eq!(day[0].vet_id, "V1");
    }
}
