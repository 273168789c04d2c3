// src/handlers/mod.rs
pub mod error;
pub mod extremes;
pub mod ticker;
pub mod view;
