//! Dashboard page: aggregate counts plus recent employees and attendance

use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::client::{ApiResult, AttendanceFilter, HrmsApi};
use crate::models::{AttendanceRecord, Employee, Stats};
use crate::notifications::NotificationCenter;

/// Rows shown in each preview panel
pub const RECENT_LIMIT: usize = 5;

#[derive(Debug, Clone, Default, Serialize)]
pub struct DashboardState {
    pub stats: Option<Stats>,
    /// First rows of the employee list, in backend order
    pub recent_employees: Vec<Employee>,
    /// First rows of the attendance list, in backend order
    pub recent_attendance: Vec<AttendanceRecord>,
    pub loading: bool,
    /// Inline error panel contents
    pub error: Option<String>,
}

#[derive(Clone)]
pub struct DashboardController {
    api: Arc<dyn HrmsApi>,
    notifications: NotificationCenter,
    state: Arc<RwLock<DashboardState>>,
}

impl DashboardController {
    pub fn new(api: Arc<dyn HrmsApi>, notifications: NotificationCenter) -> Self {
        Self {
            api,
            notifications,
            state: Arc::new(RwLock::new(DashboardState::default())),
        }
    }

    pub async fn state(&self) -> DashboardState {
        self.state.read().await.clone()
    }

    /// Fetch stats, employees and attendance in parallel.
    ///
    /// Any single failure fails the whole load: the inline error is set and
    /// an error notification is emitted.
    pub async fn load(&self) -> ApiResult<()> {
        {
            let mut state = self.state.write().await;
            state.loading = true;
            state.error = None;
        }

        let filter = AttendanceFilter::none();
        let result = tokio::try_join!(
            self.api.stats(),
            self.api.list_employees(),
            self.api.list_attendance(&filter)
        );

        let mut state = self.state.write().await;
        state.loading = false;

        match result {
            Ok((stats, employees, records)) => {
                tracing::debug!(
                    employees = employees.len(),
                    records = records.len(),
                    "Dashboard loaded"
                );
                state.stats = Some(stats);
                state.recent_employees = employees.into_iter().take(RECENT_LIMIT).collect();
                state.recent_attendance = records.into_iter().take(RECENT_LIMIT).collect();
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Dashboard load failed");
                state.error = Some(e.to_string());
                drop(state);
                self.notifications.error(e.to_string()).await;
                Err(e)
            }
        }
    }
}
