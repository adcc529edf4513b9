//! Sensorboard - temperature/humidity dashboard backend
//!
//! Daily and range aggregate reports over stored sensor readings, plus a
//! bounded live feed of newly inserted readings.

pub mod config;
pub mod live_feed;
pub mod report_core;
pub mod sqlite_pragma;
pub mod store;
pub mod view;
pub mod web;
