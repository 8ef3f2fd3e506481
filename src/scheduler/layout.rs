//! Layout contract for the day grid.
//!
//! Turns the day's data and the live gesture into positioned columns, time
//! rows and appointment blocks. A renderer only has to draw what is in
//! [`DayLayout`]; it never repeats the grid arithmetic.

use std::collections::HashMap;
use std::fmt;

use chrono::NaiveDate;

use super::gesture::DayScheduler;
use super::time_grid::{to_time_string, time_slots, DAY_END_MINUTES, DAY_START_MINUTES, SLOT_INTERVAL};
use super::GridGeometry;
use crate::models::appointment::Appointment;
use crate::models::patient::Patient;
use crate::models::settings::ClinicSettings;
use crate::models::veterinarian::{practitioner_columns, Veterinarian};
use crate::services::appointment::recurrence::appointments_for_day;

/// Gap kept above each block so neighbours do not touch
pub const BLOCK_TOP_INSET: f32 = 2.0;
/// Subtracted from the raw block height for the same reason
pub const BLOCK_HEIGHT_INSET: f32 = 4.0;
/// Blocks never render shorter than this
pub const MIN_BLOCK_HEIGHT: f32 = 30.0;
/// Blocks spanning at most this many slots use the compact style
const SHORT_BLOCK_SLOTS: f32 = 1.01;

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutColumn {
    pub vet_id: String,
    pub name: String,
    pub specialty: String,
    /// Left edge, after the time gutter
    pub left_px: f32,
}

/// One labelled row of the time gutter.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeRow {
    pub time: String,
    pub top_px: f32,
    pub is_hour: bool,
    pub is_lunch: bool,
    /// The 20:00 line; drawn but not selectable
    pub is_closing: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppointmentBlock {
    pub appointment_id: Option<String>,
    pub vet_id: String,
    pub column_index: usize,
    pub start_minutes: u32,
    pub end_minutes: u32,
    pub top_px: f32,
    pub height_px: f32,
    pub is_short: bool,
    /// Drawn at its proposed placement under an active drag
    pub is_dragging: bool,
    pub is_recurring: bool,
    pub color: String,
    pub reason: String,
    pub patient_name: Option<String>,
}

impl AppointmentBlock {
    pub fn time_label(&self) -> String {
        format!(
            "{} - {}",
            to_time_string(self.start_minutes),
            to_time_string(self.end_minutes)
        )
    }
}

/// Highlighted range of an in-progress cell selection.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionHighlight {
    pub vet_id: String,
    pub column_index: usize,
    pub start_minutes: u32,
    pub end_minutes: u32,
    pub top_px: f32,
    pub height_px: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayLayout {
    pub date: NaiveDate,
    pub geometry: GridGeometry,
    pub columns: Vec<LayoutColumn>,
    pub rows: Vec<TimeRow>,
    pub blocks: Vec<AppointmentBlock>,
    pub selection: Option<SelectionHighlight>,
    pub total_width: f32,
    pub total_height: f32,
}

fn offset_px(minutes: u32, slot_height: f32) -> f32 {
    (minutes as f32 - DAY_START_MINUTES as f32) / SLOT_INTERVAL as f32 * slot_height
}

fn span_slots(start: u32, end: u32) -> f32 {
    (end as f32 - start as f32) / SLOT_INTERVAL as f32
}

impl DayLayout {
    /// Lay out `date` for the given practitioners.
    ///
    /// `appointments` may hold every stored row; only those occurring on
    /// `date` are placed. Blocks whose practitioner has no column are
    /// skipped. The dragged block, if any, is placed at its proposed
    /// column and times.
    pub fn build(
        date: NaiveDate,
        vets: &[Veterinarian],
        appointments: &[Appointment],
        patients: &[Patient],
        scheduler: &DayScheduler,
        settings: &ClinicSettings,
    ) -> Self {
        let geometry = *scheduler.geometry();

        let columns: Vec<LayoutColumn> = practitioner_columns(vets)
            .into_iter()
            .enumerate()
            .map(|(index, vet)| LayoutColumn {
                vet_id: vet.id.clone(),
                name: vet.name.clone(),
                specialty: vet.specialty.clone(),
                left_px: geometry.time_column_width + index as f32 * geometry.column_width,
            })
            .collect();
        let column_of: HashMap<&str, usize> = columns
            .iter()
            .enumerate()
            .map(|(index, column)| (column.vet_id.as_str(), index))
            .collect();

        let rows = time_slots()
            .into_iter()
            .enumerate()
            .map(|(index, time)| {
                let minutes = DAY_START_MINUTES + index as u32 * SLOT_INTERVAL;
                TimeRow {
                    is_hour: minutes % 60 == 0,
                    is_lunch: settings.is_lunch_slot(minutes),
                    is_closing: minutes == DAY_END_MINUTES,
                    top_px: index as f32 * geometry.slot_height,
                    time,
                }
            })
            .collect();

        let patient_names: HashMap<&str, &str> = patients
            .iter()
            .filter_map(|p| p.id.as_deref().map(|id| (id, p.name.as_str())))
            .collect();

        let blocks = appointments_for_day(appointments, date)
            .into_iter()
            .filter_map(|appointment| {
                let proposed = appointment
                    .id
                    .as_deref()
                    .and_then(|id| scheduler.proposed_placement(id));
                let (vet_id, start, end) = match proposed {
                    Some(p) => (p.vet_id.as_str(), p.start_minutes, p.end_minutes),
                    None => (
                        appointment.vet_id.as_str(),
                        appointment.start_minutes(),
                        appointment.end_minutes(),
                    ),
                };
                let column_index = *column_of.get(vet_id)?;
                let slots = span_slots(start, end);

                Some(AppointmentBlock {
                    appointment_id: appointment.id.clone(),
                    vet_id: vet_id.to_string(),
                    column_index,
                    start_minutes: start,
                    end_minutes: end,
                    top_px: offset_px(start, geometry.slot_height) + BLOCK_TOP_INSET,
                    height_px: (slots * geometry.slot_height - BLOCK_HEIGHT_INSET)
                        .max(MIN_BLOCK_HEIGHT),
                    is_short: slots <= SHORT_BLOCK_SLOTS,
                    is_dragging: proposed.is_some(),
                    is_recurring: appointment.is_recurring,
                    color: appointment.color.clone(),
                    reason: appointment.reason.clone(),
                    patient_name: appointment
                        .patient_id
                        .as_deref()
                        .and_then(|id| patient_names.get(id))
                        .map(|name| name.to_string()),
                })
            })
            .collect();

        let selection = scheduler.active_selection().and_then(|selection| {
            let column_index = *column_of.get(selection.vet_id())?;
            let draft = selection.to_draft();
            Some(SelectionHighlight {
                vet_id: draft.vet_id.clone(),
                column_index,
                start_minutes: draft.start_minutes,
                end_minutes: draft.end_minutes,
                top_px: offset_px(draft.start_minutes, geometry.slot_height),
                height_px: span_slots(draft.start_minutes, draft.end_minutes) * geometry.slot_height,
            })
        });

        let total_width = geometry.time_column_width + columns.len() as f32 * geometry.column_width;
        let total_height = offset_px(DAY_END_MINUTES, geometry.slot_height);

        Self {
            date,
            geometry,
            columns,
            rows,
            blocks,
            selection,
            total_width,
            total_height,
        }
    }

    pub fn blocks_in_column(&self, column_index: usize) -> impl Iterator<Item = &AppointmentBlock> {
        self.blocks.iter().filter(move |b| b.column_index == column_index)
    }

    pub fn block_for(&self, appointment_id: &str) -> Option<&AppointmentBlock> {
        self.blocks
            .iter()
            .find(|b| b.appointment_id.as_deref() == Some(appointment_id))
    }
}

impl fmt::Display for DayLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.date.format("%A %Y-%m-%d"))?;
        if self.columns.is_empty() {
            return writeln!(f, "  (no practitioners)");
        }
        for (index, column) in self.columns.iter().enumerate() {
            if column.specialty.is_empty() {
                writeln!(f, "{}", column.name)?;
            } else {
                writeln!(f, "{} ({})", column.name, column.specialty)?;
            }
            let mut blocks: Vec<&AppointmentBlock> = self.blocks_in_column(index).collect();
            blocks.sort_by_key(|b| b.start_minutes);
            if blocks.is_empty() {
                writeln!(f, "  -")?;
            }
            for block in blocks {
                let patient = block.patient_name.as_deref().unwrap_or("-");
                let marker = if block.is_recurring { " [weekly]" } else { "" };
                writeln!(f, "  {}  {}  {}{}", block.time_label(), patient, block.reason, marker)?;
            }
        }
        Ok(())
    }
}
