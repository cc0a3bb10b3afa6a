//! Bike sharing dashboard: an egui front end over a pre-aggregated
//! daily / 2-hourly rental dataset.
//!
//! The [`data`] module is UI-free: load a [`data::model::Table`], filter it
//! by date range and group / reduce its columns. Everything else renders
//! those results.

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod state;
pub mod ui;
