//! Clinic state container.
//!
//! Owns every collection fetched from the backend together with the live
//! grid gesture and drag payload. All writes go through methods on
//! [`Clinic`] that call the backend and then refresh, so views only ever
//! read from here.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::NaiveDate;

use crate::config::{ClinicConfig, DEFAULT_DROP_DURATION};
use crate::models::appointment::{Appointment, DEFAULT_COLOR};
use crate::models::order::DepartmentOrder;
use crate::models::patient::Patient;
use crate::models::settings::ClinicSettings;
use crate::models::veterinarian::Veterinarian;
use crate::models::waitlist::WaitlistEntry;
use crate::scheduler::{ClinicView, DayLayout, DayScheduler, DragCarrier, GridGeometry};
use crate::services::appointment::AppointmentService;
use crate::services::backend::{Backend, ChangeEvent, Collection, Subscription};
use crate::services::order::OrderService;
use crate::services::patient::PatientService;
use crate::services::settings::SettingsService;
use crate::services::veterinarian::VeterinarianService;
use crate::services::waitlist::{group_by_vet, WaitlistBoard, WaitlistService};

mod drag;
mod drops;
mod mutations;

pub use drag::CommitOutcome;
pub use drops::DropOutcome;

/// Knobs taken from the configuration file.
#[derive(Debug, Clone, PartialEq)]
pub struct ClinicOptions {
    pub geometry: GridGeometry,
    pub default_color: String,
    pub drop_duration: u32,
    pub admin_email: Option<String>,
}

impl Default for ClinicOptions {
    fn default() -> Self {
        Self {
            geometry: GridGeometry::default(),
            default_color: DEFAULT_COLOR.to_string(),
            drop_duration: DEFAULT_DROP_DURATION,
            admin_email: None,
        }
    }
}

impl From<&ClinicConfig> for ClinicOptions {
    fn from(config: &ClinicConfig) -> Self {
        Self {
            geometry: config.geometry(),
            default_color: config.grid.default_color.clone(),
            drop_duration: config.grid.drop_duration_minutes,
            admin_email: config.admin_email.clone(),
        }
    }
}

pub struct Clinic {
    backend: Box<dyn Backend>,
    options: ClinicOptions,

    patients: Vec<Patient>,
    vets: Vec<Veterinarian>,
    waitlist: Vec<WaitlistEntry>,
    appointments: Vec<Appointment>,
    orders: Vec<DepartmentOrder>,
    settings: ClinicSettings,

    selected_date: NaiveDate,
    view: ClinicView,
    scheduler: DayScheduler,
    carrier: DragCarrier,

    waitlist_stale: Arc<AtomicBool>,
    waitlist_subscription: Option<Subscription>,
}

impl Clinic {
    /// Empty container; call [`Clinic::refresh`] to load data.
    pub fn new(backend: Box<dyn Backend>, options: ClinicOptions, today: NaiveDate) -> Self {
        Self {
            backend,
            scheduler: DayScheduler::new(options.geometry),
            options,
            patients: Vec::new(),
            vets: Vec::new(),
            waitlist: Vec::new(),
            appointments: Vec::new(),
            orders: Vec::new(),
            settings: ClinicSettings::default(),
            selected_date: today,
            view: ClinicView::Reception,
            carrier: DragCarrier::new(),
            waitlist_stale: Arc::new(AtomicBool::new(false)),
            waitlist_subscription: None,
        }
    }

    pub(crate) fn backend(&self) -> &dyn Backend {
        self.backend.as_ref()
    }

    /// Reload every collection.
    ///
    /// A collection that fails to load keeps its previous contents. Returns
    /// whether everything loaded.
    pub fn refresh(&mut self) -> bool {
        let backend = self.backend.as_ref();
        let mut ok = true;

        match PatientService::new(backend).list_all() {
            Ok(patients) => self.patients = patients,
            Err(e) => ok = warn_stale("patients", e),
        }
        match VeterinarianService::new(backend).list_all() {
            Ok(vets) => self.vets = vets,
            Err(e) => ok = warn_stale("veterinarians", e),
        }
        match WaitlistService::new(backend).list_all() {
            Ok(waitlist) => self.waitlist = waitlist,
            Err(e) => ok = warn_stale("waitlist", e),
        }
        match AppointmentService::new(backend).list_all() {
            Ok(appointments) => self.appointments = appointments,
            Err(e) => ok = warn_stale("appointments", e),
        }
        match OrderService::new(backend).list_all() {
            Ok(orders) => self.orders = orders,
            Err(e) => ok = warn_stale("department orders", e),
        }
        match SettingsService::new(backend).get() {
            Ok(settings) => self.settings = settings,
            Err(e) => ok = warn_stale("clinic settings", e),
        }

        self.waitlist_stale.store(false, Ordering::SeqCst);
        log::debug!(
            "Refreshed: {} patients, {} vets, {} waiting, {} appointments, {} orders",
            self.patients.len(),
            self.vets.len(),
            self.waitlist.len(),
            self.appointments.len(),
            self.orders.len()
        );
        ok
    }

    /// Start listening for waitlist changes made elsewhere.
    pub fn subscribe_waitlist(&mut self) {
        let stale = Arc::clone(&self.waitlist_stale);
        let subscription = self.backend.subscribe(
            Collection::Waitlist,
            Arc::new(move |event: &ChangeEvent| {
                log::debug!("Waitlist changed: {:?} {:?}", event.kind, event.id);
                stale.store(true, Ordering::SeqCst);
            }),
        );
        self.waitlist_subscription = Some(subscription);
    }

    pub fn is_subscribed(&self) -> bool {
        self.waitlist_subscription.is_some()
    }

    /// Refresh if a change notification arrived since the last refresh.
    pub fn poll_realtime(&mut self) -> bool {
        if self.waitlist_stale.swap(false, Ordering::SeqCst) {
            self.refresh();
            true
        } else {
            false
        }
    }

    pub fn patients(&self) -> &[Patient] {
        &self.patients
    }

    pub fn vets(&self) -> &[Veterinarian] {
        &self.vets
    }

    pub fn waitlist(&self) -> &[WaitlistEntry] {
        &self.waitlist
    }

    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    pub fn orders(&self) -> &[DepartmentOrder] {
        &self.orders
    }

    pub fn settings(&self) -> &ClinicSettings {
        &self.settings
    }

    pub fn options(&self) -> &ClinicOptions {
        &self.options
    }

    pub fn patient(&self, id: &str) -> Option<&Patient> {
        self.patients.iter().find(|p| p.id.as_deref() == Some(id))
    }

    pub fn appointment(&self, id: &str) -> Option<&Appointment> {
        self.appointments.iter().find(|a| a.id.as_deref() == Some(id))
    }

    pub fn waitlist_entry(&self, id: &str) -> Option<&WaitlistEntry> {
        self.waitlist.iter().find(|e| e.id.as_deref() == Some(id))
    }

    pub fn waitlist_board(&self) -> WaitlistBoard<'_> {
        group_by_vet(&self.waitlist, &self.vets)
    }

    pub fn selected_date(&self) -> NaiveDate {
        self.selected_date
    }

    pub fn select_date(&mut self, date: NaiveDate) {
        self.selected_date = date;
    }

    pub fn view(&self) -> ClinicView {
        self.view
    }

    pub fn set_view(&mut self, view: ClinicView) {
        self.view = view;
    }

    pub fn scheduler(&self) -> &DayScheduler {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut DayScheduler {
        &mut self.scheduler
    }

    pub fn carrier(&self) -> &DragCarrier {
        &self.carrier
    }

    pub fn carrier_mut(&mut self) -> &mut DragCarrier {
        &mut self.carrier
    }

    /// Practitioner ids in column order, as the grid gestures expect them.
    pub fn column_ids(&self) -> Vec<String> {
        crate::models::veterinarian::practitioner_columns(&self.vets)
            .into_iter()
            .map(|v| v.id.clone())
            .collect()
    }

    /// Layout of the selected day with the live gesture applied.
    pub fn day_layout(&self) -> DayLayout {
        DayLayout::build(
            self.selected_date,
            &self.vets,
            &self.appointments,
            &self.patients,
            &self.scheduler,
            &self.settings,
        )
    }

    /// Whether `email` belongs to the configured administrator.
    pub fn is_admin(&self, email: &str) -> bool {
        self.options
            .admin_email
            .as_deref()
            .map_or(false, |admin| admin == email)
    }
}

fn warn_stale(what: &str, err: anyhow::Error) -> bool {
    log::warn!("Failed to refresh {}: {:#}; keeping previous data", what, err);
    false
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::services::backend::MockBackend;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_refresh_loads_collections() {
        let clinic = seeded_clinic();
        assert_eq!(clinic.vets().len(), 2);
        assert_eq!(clinic.patients()[0].name, "Coco");
        assert_eq!(clinic.waitlist().len(), 1);
        assert_eq!(clinic.appointments().len(), 1);
        assert_eq!(clinic.column_ids(), vec!["V1", "V2"]);
    }

    #[test]
    fn test_failed_refresh_keeps_previous_data() {
        let mut backend = MockBackend::new();
        let mut calls = 0;
        backend.expect_fetch_all().returning(move |collection, _| {
            calls += 1;
            match (collection, calls) {
                (Collection::Veterinarians, n) if n <= 6 => Ok(vec![json_vet()]),
                (Collection::Veterinarians, _) => Err(anyhow::anyhow!("offline")),
                _ => Ok(Vec::new()),
            }
        });

        let mut clinic = Clinic::new(Box::new(backend), ClinicOptions::default(), monday());
        assert!(clinic.refresh());
        assert!(!clinic.refresh());
        assert_eq!(clinic.vets().len(), 1);
    }

    fn json_vet() -> serde_json::Value {
        serde_json::json!({"id": "V1", "name": "Dr. Han"})
    }

    #[test]
    fn test_realtime_flag_triggers_refresh() {
        let mut clinic = seeded_clinic();
        clinic.subscribe_waitlist();
        assert!(clinic.is_subscribed());
        assert!(!clinic.poll_realtime());

        clinic
            .backend()
            .insert(
                Collection::Waitlist,
                vec![serde_json::json!({"patient_id": "p1", "patient_name": "Coco"})],
            )
            .unwrap();
        assert!(clinic.poll_realtime());
        assert_eq!(clinic.waitlist().len(), 2);
        assert!(!clinic.poll_realtime());
    }

    #[test]
    fn test_is_admin() {
        let mut options = ClinicOptions::default();
        options.admin_email = Some("admin@clinic.example".to_string());
        let clinic = Clinic::new(Box::new(MockBackend::new()), options, monday());
        assert!(clinic.is_admin("admin@clinic.example"));
        assert!(!clinic.is_admin("Admin@Clinic.example"));
        assert!(!clinic.is_admin(" admin@clinic.example"));
        assert!(!clinic.is_admin("vet@clinic.example"));

        let clinic = Clinic::new(Box::new(MockBackend::new()), ClinicOptions::default(), monday());
        assert!(!clinic.is_admin("admin@clinic.example"));
    }

    #[test]
    fn test_day_layout_for_selected_date() {
        let mut clinic = seeded_clinic();
        assert_eq!(clinic.day_layout().blocks.len(), 1);
        clinic.select_date(monday().succ_opt().unwrap());
        assert!(clinic.day_layout().blocks.is_empty());
    }

    #[test]
    fn test_waitlist_board() {
        let clinic = seeded_clinic();
        let board = clinic.waitlist_board();
        assert_eq!(board.unassigned.len(), 1);
        assert_eq!(board.lanes.len(), 2);
    }
}
