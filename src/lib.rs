// Vet Calendar Library
// Scheduling grid, clinic state and backend access for the front desk

pub mod config;
pub mod models;
pub mod scheduler;
pub mod services;
pub mod state;
pub mod utils;
