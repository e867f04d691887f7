//! Attendance deviation and leave coverage engine.
//!
//! This crate converts UTC attendance marks into the organization's fixed
//! local time, flags clock-ins and clock-outs that deviate from the expected
//! shift time, and builds day-by-day coverage calendars from weekly rest-day
//! rotations and approved leave.

#![warn(missing_docs)]

pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
