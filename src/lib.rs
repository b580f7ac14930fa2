//! Time & pay engine for staff timesheets
//!
//! This crate turns raw clock-in/clock-out records into net hours, rates and
//! pay, applying an organization's break rules, and aggregates them into
//! payroll-ready exports: a three-sheet workbook, a delimited detail table
//! and a flat file for payroll import.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod export;
pub mod models;
