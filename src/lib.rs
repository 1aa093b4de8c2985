//! # HRMS Lite
//!
//! Client for a small human-resources backend: employee records and daily
//! attendance, presented as three pages (Dashboard, Employees, Attendance).
//!
//! ## Modules
//!
//! - [`models`]: Wire records exchanged with the backend
//! - [`client`]: Typed HTTP client and the `HrmsApi` seam
//! - [`validation`]: Employee form checks run before submission
//! - [`notifications`]: Transient success/error/warning messages
//! - [`controllers`]: Per-page state and fetch/mutate/refetch flows
//! - [`shell`]: Terminal rendering of the pages
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use hrms_lite::client::HttpClient;
//! use hrms_lite::controllers::DashboardController;
//! use hrms_lite::notifications::NotificationCenter;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let api = Arc::new(HttpClient::new("http://localhost:8000/api")?);
//!     let dashboard = DashboardController::new(api, NotificationCenter::default());
//!
//!     dashboard.load().await?;
//!     let state = dashboard.state().await;
//!     println!("{} employees", state.stats.unwrap_or_default().total_employees);
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod controllers;
pub mod models;
pub mod notifications;
pub mod shell;
pub mod validation;

#[cfg(test)]
mod testing;

// Re-export top-level types for convenience
pub use client::{ApiError, ApiResult, AttendanceFilter, HrmsApi, HttpClient};

pub use config::{Config, ConfigError};

pub use controllers::{
    AttendanceController, DashboardController, EmployeesController, SummaryErrorPolicy,
};

pub use models::{
    AttendanceRecord, AttendanceStatus, AttendanceSummary, Department, Employee, EmployeeInput,
    NewAttendance, Stats,
};

pub use notifications::{Notification, NotificationCenter, NotificationKind};

pub use shell::{OutputFormat, Shell, ShellError};
