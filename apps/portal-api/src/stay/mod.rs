//! Room occupancy: derivation, filtering and the CSV stay sheet.

pub mod csv;
pub mod export;
pub mod filter;
pub mod import;
pub mod occupancy;
