// src/services/mod.rs
pub mod chart;
pub mod error;
pub mod extremes;
pub mod returns;
pub mod tradier;
