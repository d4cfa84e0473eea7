//! Payroll batch listing and pay-stub ("colillas") printing over Odoo.
//!
//! This crate authenticates users against an Odoo backend, lists payroll
//! runs, and renders every payslip of a run as a single PDF through the
//! backend's own report engine. It is exposed as an HTTP service by the
//! `colillas` binary.

#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod odoo;
pub mod payroll;
pub mod pipeline;
pub mod report;
