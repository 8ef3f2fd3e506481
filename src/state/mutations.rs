// Mutations routed through the clinic container
//
// Each call writes to the backend and then reloads every collection, so
// views never patch their own copies.

use anyhow::Result;

use super::Clinic;
use crate::models::appointment::Appointment;
use crate::models::chart::SoapRecord;
use crate::models::order::DepartmentOrder;
use crate::models::patient::Patient;
use crate::models::settings::ClinicSettings;
use crate::models::veterinarian::Veterinarian;
use crate::models::waitlist::WaitlistEntry;
use crate::scheduler::AppointmentDraft;
use crate::services::appointment::AppointmentService;
use crate::services::chart::ChartService;
use crate::services::media::MediaService;
use crate::services::order::OrderService;
use crate::services::patient::PatientService;
use crate::services::settings::SettingsService;
use crate::services::veterinarian::VeterinarianService;
use crate::services::waitlist::WaitlistService;

impl Clinic {
    pub fn add_waitlist_entry(&mut self, entry: WaitlistEntry) -> Result<WaitlistEntry> {
        let added = WaitlistService::new(self.backend()).add(entry)?;
        self.refresh();
        Ok(added)
    }

    pub fn update_waitlist_entry(&mut self, entry: &WaitlistEntry) -> Result<()> {
        WaitlistService::new(self.backend()).update(entry)?;
        self.refresh();
        Ok(())
    }

    pub fn remove_waitlist_entry(&mut self, entry_id: &str) -> Result<()> {
        WaitlistService::new(self.backend()).remove(entry_id)?;
        self.refresh();
        Ok(())
    }

    /// Book the appointment described by a creation draft on the selected day.
    pub fn book_draft(&mut self, draft: &AppointmentDraft, reason: &str) -> Result<Appointment> {
        let appointment = draft.to_appointment(
            self.selected_date,
            reason,
            &self.options.default_color,
        )?;
        self.save_appointment(appointment)
    }

    /// Create or overwrite an appointment from the edit form.
    pub fn save_appointment(&mut self, appointment: Appointment) -> Result<Appointment> {
        let service = AppointmentService::new(self.backend());
        let saved = match appointment.id {
            Some(_) => service.update(&appointment)?,
            None => service.create(appointment)?,
        };
        self.refresh();
        Ok(saved)
    }

    pub fn delete_appointment(&mut self, appointment_id: &str) -> Result<()> {
        AppointmentService::new(self.backend()).delete(appointment_id)?;
        self.refresh();
        Ok(())
    }

    pub fn register_patient(&mut self, patient: Patient) -> Result<Patient> {
        let registered = PatientService::new(self.backend()).register(patient)?;
        self.refresh();
        Ok(registered)
    }

    pub fn update_patient(&mut self, patient: &Patient) -> Result<Patient> {
        let updated = PatientService::new(self.backend()).update(patient)?;
        self.refresh();
        Ok(updated)
    }

    pub fn save_order(&mut self, order: &DepartmentOrder) -> Result<DepartmentOrder> {
        let saved = OrderService::new(self.backend()).save(order)?;
        self.refresh();
        Ok(saved)
    }

    pub fn complete_order(&mut self, order_id: &str) -> Result<()> {
        OrderService::new(self.backend()).complete(order_id)?;
        self.refresh();
        Ok(())
    }

    /// Charts are not part of the refreshed collections; the saved record
    /// is handed back instead.
    pub fn save_chart(&mut self, record: &SoapRecord) -> Result<SoapRecord> {
        ChartService::new(self.backend()).save(record)
    }

    pub fn charts_for(&self, patient_id: &str) -> Result<Vec<SoapRecord>> {
        ChartService::new(self.backend()).list_for_patient(patient_id)
    }

    pub fn update_settings(&mut self, settings: &ClinicSettings) -> Result<()> {
        SettingsService::new(self.backend()).update(settings)?;
        self.refresh();
        Ok(())
    }

    pub fn add_vet(&mut self, vet: &Veterinarian) -> Result<()> {
        VeterinarianService::new(self.backend()).add(vet)?;
        self.refresh();
        Ok(())
    }

    pub fn remove_vet(&mut self, vet_id: &str) -> Result<()> {
        VeterinarianService::new(self.backend()).remove(vet_id)?;
        self.refresh();
        Ok(())
    }

    /// Upload a clinical image; `None` when the upload failed.
    pub fn upload_image(&self, file_name: &str, bytes: &[u8]) -> Option<String> {
        MediaService::new(self.backend()).upload_image(file_name, bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::super::{Clinic, ClinicOptions};
    use super::*;
    use crate::models::patient::Species;
    use crate::scheduler::GridCell;
    use crate::services::backend::{Collection, MockBackend};
    use chrono::NaiveTime;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_book_selection_draft() {
        let mut clinic = seeded_clinic();
        clinic.scheduler_mut().begin_selection(GridCell::new("V2", 630));
        clinic.scheduler_mut().extend_selection(GridCell::new("V2", 660));
        let draft = clinic.release_selection().unwrap();

        let booked = clinic.book_draft(&draft, "Vaccination").unwrap();
        assert_eq!(booked.vet_id, "V2");
        assert_eq!((booked.start_label(), booked.end_label()), ("10:30".to_string(), "11:15".to_string()));
        assert_eq!(booked.date, monday());
        assert_eq!(clinic.appointments().len(), 2);
    }

    #[test]
    fn test_save_and_delete_appointment() {
        let mut clinic = seeded_clinic();
        let mut appointment = clinic.appointment("a1").cloned().unwrap();
        appointment.is_recurring = true;
        clinic.save_appointment(appointment).unwrap();
        assert!(clinic.appointment("a1").unwrap().is_recurring);

        clinic.delete_appointment("a1").unwrap();
        assert!(clinic.appointments().is_empty());
    }

    #[test]
    fn test_waitlist_mutations() {
        let mut clinic = seeded_clinic();
        let mut entry = clinic.waitlist_entry("w1").cloned().unwrap();
        entry.memo = "Limping".to_string();
        clinic.update_waitlist_entry(&entry).unwrap();
        assert_eq!(clinic.waitlist_entry("w1").unwrap().memo, "Limping");

        clinic.remove_waitlist_entry("w1").unwrap();
        assert!(clinic.waitlist().is_empty());
    }

    #[test]
    fn test_register_patient_refreshes() {
        let mut clinic = seeded_clinic();
        clinic
            .register_patient(Patient::new("Bori", "Lee", Species::Cat))
            .unwrap();
        assert_eq!(clinic.patients().len(), 2);
        assert_eq!(clinic.patients()[0].name, "Bori");
    }

    #[test]
    fn test_settings_and_vets() {
        let mut clinic = seeded_clinic();
        let mut settings = clinic.settings().clone();
        settings.lunch_start_time = NaiveTime::from_hms_opt(12, 0, 0).unwrap();
        clinic.update_settings(&settings).unwrap();
        assert_eq!(clinic.settings(), &settings);

        clinic.add_vet(&Veterinarian::new("V3", "Dr. Yoon")).unwrap();
        assert_eq!(clinic.column_ids(), vec!["V1", "V2", "V3"]);
        clinic.remove_vet("V3").unwrap();
        assert_eq!(clinic.vets().len(), 2);
    }

    #[test]
    fn test_chart_save_error_is_returned() {
        let mut backend = MockBackend::new();
        backend.expect_fetch_all().returning(|_, _| Ok(Vec::new()));
        backend
            .expect_insert()
            .withf(|collection, _| *collection == Collection::SoapRecords)
            .returning(|_, _| Err(anyhow::anyhow!("permission denied")));

        let mut clinic = Clinic::new(Box::new(backend), ClinicOptions::default(), monday());
        let mut record = SoapRecord::new("p1", monday());
        record.cc = "Cough".to_string();

        let err = clinic.save_chart(&record).unwrap_err();
        assert!(format!("{:#}", err).contains("permission denied"));
    }

    #[test]
    fn test_upload_image() {
        let clinic = seeded_clinic();
        let url = clinic.upload_image("echo.jpg", b"jpg").unwrap();
        assert!(url.ends_with(".jpg"));
    }
}
