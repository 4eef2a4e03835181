//! Payroll Engine
//!
//! This crate computes payroll for one employee over one pay period: it
//! gathers compensation terms, hours, non-working days, leave, deductions and
//! the tax bracket table from independent systems of record, then derives
//! gross pay, tax withholding, deductions and net pay.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod providers;
