//! Seat and work-from-home allocation engine
//!
//! This crate decides, for one office branch and one date, which employees
//! get a desk and which work from home. Employees are ranked by designation,
//! commute distance and how much of their monthly WFH allowance is left;
//! the highest ranked fill the seats and the rest are recorded as WFH for
//! the day.

#![warn(missing_docs)]

pub mod allocation;
pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod store;
pub mod telemetry;
