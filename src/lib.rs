//! Number formatting and data plumbing for pie-chart widgets
//!
//! - [`format`]: K/M/B scaling, format specifiers, grouped rendering
//! - [`fetch`]: rows from a managed query service or a custom endpoint
//! - [`chart`]: typed widget configuration and slice assembly
//! - [`config`] / [`logging`]: application configuration and tracing setup

pub mod chart;
pub mod config;
pub mod fetch;
pub mod format;
pub mod logging;
