// Department order module
// Work requested from treatment, pharmacy and imaging, with billed items

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::utils::nullable::null_as_default;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Department {
    Treatment,
    Pharmacy,
    #[serde(rename = "X-ray")]
    XRay,
    Ultrasound,
}

impl Department {
    pub fn all() -> [Department; 4] {
        [
            Department::Treatment,
            Department::Pharmacy,
            Department::XRay,
            Department::Ultrasound,
        ]
    }

    pub fn is_imaging(&self) -> bool {
        matches!(self, Department::XRay | Department::Ultrasound)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    #[default]
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ServiceCategory {
    Consultation,
    Imaging,
    Laboratory,
    Procedure,
    Pharmacy,
    Prevention,
    Food,
    Supplies,
    Hospitalization,
}

/// One billed line attached to an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillingItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub service_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub category: Option<ServiceCategory>,
    pub unit_price: f64,
    pub quantity: u32,
    pub total_price: f64,
    #[serde(default)]
    pub performing_vet_id: Option<String>,
}

impl BillingItem {
    pub fn new(name: impl Into<String>, unit_price: f64, quantity: u32) -> Self {
        Self {
            id: None,
            service_id: None,
            name: name.into(),
            category: None,
            unit_price,
            quantity,
            total_price: unit_price * quantity as f64,
            performing_vet_id: None,
        }
    }

    /// Recompute the line total after a price or quantity edit
    pub fn recalculate(&mut self) {
        self.total_price = self.unit_price * self.quantity as f64;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderImage {
    pub url: String,
    pub name: String,
    #[serde(default)]
    pub uploaded_at: Option<DateTime<Local>>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartmentOrder {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub patient_id: String,
    pub patient_name: String,
    #[serde(default)]
    pub soap_id: Option<String>,
    pub department: Department,
    #[serde(default, deserialize_with = "null_as_default")]
    pub vet_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub request_details: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: OrderStatus,
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<BillingItem>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<OrderImage>,
    #[serde(default)]
    pub order_index: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Local>>,
}

impl DepartmentOrder {
    pub fn new(
        patient_id: impl Into<String>,
        patient_name: impl Into<String>,
        department: Department,
    ) -> Self {
        Self {
            id: None,
            patient_id: patient_id.into(),
            patient_name: patient_name.into(),
            soap_id: None,
            department,
            vet_name: String::new(),
            request_details: String::new(),
            status: OrderStatus::Pending,
            items: Vec::new(),
            images: Vec::new(),
            order_index: None,
            created_at: None,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.patient_id.trim().is_empty() {
            return Err("Order must reference a patient".to_string());
        }
        if self.items.iter().any(|item| item.quantity == 0) {
            return Err("Billing item quantity must be at least 1".to_string());
        }
        if self.items.iter().any(|item| item.unit_price < 0.0) {
            return Err("Billing item price cannot be negative".to_string());
        }
        Ok(())
    }

    pub fn is_completed(&self) -> bool {
        self.status == OrderStatus::Completed
    }

    pub fn total(&self) -> f64 {
        self.items.iter().map(|item| item.total_price).sum()
    }
}
