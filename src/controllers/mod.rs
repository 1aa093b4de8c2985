//! Page Data Controllers
//!
//! Each page (Dashboard, Employees, Attendance) owns its state and drives the
//! fetch / mutate / refetch sequences against the backend. Controllers are
//! cheap cloneable handles; state snapshots are taken with `state()`.
//!
//! ## Data Flow
//!
//! 1. A user action calls a controller operation
//! 2. The controller calls the backend through `HrmsApi`
//! 3. On success it updates its state and/or refetches
//! 4. On failure it pushes a message to the `NotificationCenter`
//!
//! Nothing is shared between pages: each one refetches independently.

mod attendance;
mod dashboard;
mod employees;

pub use attendance::{AttendanceController, AttendanceState, MarkForm, MarkOutcome};
pub use dashboard::{DashboardController, DashboardState, RECENT_LIMIT};
pub use employees::{EmployeesController, EmployeesState, ModalState, SubmitOutcome};

use serde::Deserialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic request tags.
///
/// A completion is applied only if its tag is still the latest issued, so the
/// last request made wins regardless of the order responses arrive in.
#[derive(Debug, Default)]
pub struct RequestSequence {
    latest: AtomicU64,
}

impl RequestSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag a new request, superseding every earlier one
    pub fn issue(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_latest(&self, ticket: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket
    }
}

/// What to do when the per-employee attendance summary cannot be fetched.
///
/// Both variants clear the summary and keep the message in `summary_error`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryErrorPolicy {
    /// Show an empty summary only
    #[default]
    Swallow,
    /// Also raise an error notification
    Notify,
}
