// Service module exports
// Backend access and the per-collection services built on it

pub mod appointment;
pub mod backend;
pub mod chart;
pub mod database;
pub mod media;
pub mod order;
pub mod patient;
pub mod settings;
pub mod veterinarian;
pub mod waitlist;
