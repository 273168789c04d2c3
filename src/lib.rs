// src/lib.rs

pub mod config;
pub mod models;
pub mod services;
pub mod handlers;
pub mod routes;
pub mod state;
