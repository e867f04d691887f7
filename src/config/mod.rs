//! Roster snapshot loading for the attendance engine.
//!
//! The UTC offset and deviation tolerance are compile-time constants in
//! [`crate::calculation`]; this module only loads roster data (employees,
//! rest-day assignments, leave intervals and balances) from YAML files.
//!
//! # Example
//!
//! ```no_run
//! use attendance_engine::config::RosterLoader;
//!
//! let loader = RosterLoader::load("./config/sample").unwrap();
//! println!("Loaded {} employees", loader.snapshot().employees().len());
//! ```

mod loader;
mod types;

pub use loader::RosterLoader;
pub use types::{
    EmployeesFile, LeaveBalanceRecord, LeaveBalancesFile, LeaveIntervalsFile, RosterSnapshot,
    ShiftAssignmentsFile,
};
