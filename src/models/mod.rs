//! Core data models for the seat allocation engine.
//!
//! This module contains all the domain models used throughout the engine.

mod allocation_result;
mod employee;
mod office;
mod wfh;

pub use allocation_result::{
    AllocationResult, AllocationWarning, FloorSeating, PriorityScore, SeatAssignment,
    WfhAssignment, WfhUsage, group_by_floor,
};
pub use employee::{Employee, normalize_designation};
pub use office::{Branch, Company, Seat, SeatMutation};
pub use wfh::{WfhLimits, WfhRecord};
