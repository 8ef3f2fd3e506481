// Module exports for models
// Row types exchanged with the clinic backend

pub mod appointment;
pub mod chart;
pub mod order;
pub mod patient;
pub mod settings;
pub mod veterinarian;
pub mod waitlist;
