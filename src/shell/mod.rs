//! Terminal Shell
//!
//! Renders the three pages on a terminal. Each subcommand of the `hrms`
//! binary maps to one method here, which drives the matching controller and
//! prints its final state. Notifications are printed as they are raised.

pub mod render;

use chrono::NaiveDate;
use serde::Serialize;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::broadcast;

use crate::client::{ApiError, HrmsApi};
use crate::config::Config;
use crate::controllers::{
    AttendanceController, DashboardController, EmployeesController, MarkOutcome,
    SubmitOutcome, SummaryErrorPolicy,
};
use crate::models::{AttendanceStatus, Employee};
use crate::notifications::{NotificationCenter, NotificationEvent};
use crate::validation::{FieldErrors, FormField};

/// How page data is printed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Employee form inputs given on the command line
#[derive(Debug, Clone, Default, clap::Args)]
pub struct EmployeeFields {
    /// Employee ID (e.g. EMP001)
    #[arg(long)]
    pub employee_id: Option<String>,
    /// Full name
    #[arg(long = "name")]
    pub full_name: Option<String>,
    /// Email address
    #[arg(long)]
    pub email: Option<String>,
    /// Department (e.g. Engineering, "Human Resources")
    #[arg(long)]
    pub department: Option<String>,
}

impl EmployeeFields {
    fn entries(&self) -> impl Iterator<Item = (FormField, &str)> {
        [
            (FormField::EmployeeId, self.employee_id.as_deref()),
            (FormField::FullName, self.full_name.as_deref()),
            (FormField::Email, self.email.as_deref()),
            (FormField::Department, self.department.as_deref()),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.map(|v| (field, v)))
    }
}

/// Yes/no confirmation before destructive actions
pub trait Confirm: Send {
    fn confirm(&mut self, prompt: &str) -> io::Result<bool>;
}

/// Ask on stderr, read the answer from stdin; anything but y/yes declines
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&mut self, prompt: &str) -> io::Result<bool> {
        let mut stderr = io::stderr();
        write!(stderr, "{} [y/N] ", prompt)?;
        stderr.flush()?;

        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;
        Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
    }
}

/// `--yes`
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&mut self, _prompt: &str) -> io::Result<bool> {
        Ok(true)
    }
}

#[derive(Debug, Error)]
pub enum ShellError {
    /// Backend failure, already printed as a notification
    #[error("{0}")]
    Api(#[from] ApiError),

    /// Form rejected before sending, already printed next to the fields
    #[error("Validation failed")]
    Invalid(FieldErrors),

    /// Page ended in an error state that was rendered inline
    #[error("{0}")]
    Page(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Output error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ShellError {
    /// Whether the user has already seen this error
    pub fn already_reported(&self) -> bool {
        matches!(
            self,
            ShellError::Api(_) | ShellError::Invalid(_) | ShellError::Page(_)
        )
    }
}

pub type ShellResult<T> = Result<T, ShellError>;

/// Terminal front end: page output on `out`, loading lines and notifications on `err`
pub struct Shell<O, E> {
    api: Arc<dyn HrmsApi>,
    notifications: NotificationCenter,
    toasts: broadcast::Receiver<NotificationEvent>,
    summary_errors: SummaryErrorPolicy,
    format: OutputFormat,
    confirm: Box<dyn Confirm>,
    out: O,
    err: E,
}

impl<O: Write, E: Write> Shell<O, E> {
    pub fn new(api: Arc<dyn HrmsApi>, config: &Config, format: OutputFormat, out: O, err: E) -> Self {
        let notifications =
            NotificationCenter::new(Duration::from_millis(config.notifications.ttl_ms));
        let toasts = notifications.subscribe();

        Self {
            api,
            notifications,
            toasts,
            summary_errors: config.attendance.summary_errors,
            format,
            confirm: Box::new(StdinConfirm),
            out,
            err,
        }
    }

    pub fn with_confirm(mut self, confirm: impl Confirm + 'static) -> Self {
        self.confirm = Box::new(confirm);
        self
    }

    /// Print every notification raised since the last call
    fn flush_toasts(&mut self) -> io::Result<()> {
        loop {
            match self.toasts.try_recv() {
                Ok(NotificationEvent::Added(notification)) => {
                    writeln!(self.err, "{}", render::toast_line(&notification))?;
                }
                Ok(NotificationEvent::Removed(_)) => {}
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Notifications dropped before display");
                }
                Err(_) => return Ok(()),
            }
        }
    }

    fn loading(&mut self, what: &str) -> io::Result<()> {
        if self.format == OutputFormat::Table {
            render::loading(&mut self.err, what)?;
        }
        Ok(())
    }

    fn json<T: Serialize + ?Sized>(&mut self, value: &T) -> ShellResult<()> {
        writeln!(self.out, "{}", serde_json::to_string_pretty(value)?)?;
        Ok(())
    }

    // ---- Dashboard ----

    pub async fn dashboard(&mut self) -> ShellResult<()> {
        let dashboard = DashboardController::new(self.api.clone(), self.notifications.clone());

        self.loading("dashboard")?;
        let result = dashboard.load().await;
        self.flush_toasts()?;
        let state = dashboard.state().await;

        if let Err(e) = result {
            if self.format == OutputFormat::Table {
                render::error_panel(&mut self.out, &e.to_string())?;
            }
            return Err(e.into());
        }

        if self.format == OutputFormat::Json {
            return self.json(&state);
        }

        if let Some(stats) = &state.stats {
            render::stat_cards(&mut self.out, stats)?;
        }

        writeln!(self.out)?;
        writeln!(self.out, "Recent Employees")?;
        if state.recent_employees.is_empty() {
            render::empty_state(&mut self.out, "No employees yet", None)?;
        } else {
            render::employee_table(&mut self.out, &state.recent_employees)?;
        }

        writeln!(self.out)?;
        writeln!(self.out, "Recent Attendance")?;
        if state.recent_attendance.is_empty() {
            render::empty_state(&mut self.out, "No attendance records yet", None)?;
        } else {
            render::attendance_table(&mut self.out, &state.recent_attendance)?;
        }
        Ok(())
    }

    // ---- Employees ----

    async fn loaded_employees(&mut self) -> ShellResult<EmployeesController> {
        let employees = EmployeesController::new(self.api.clone(), self.notifications.clone());
        self.loading("employees")?;
        let result = employees.load().await;
        self.flush_toasts()?;
        result?;
        Ok(employees)
    }

    async fn find_employee(
        &self,
        employees: &EmployeesController,
        employee_id: &str,
    ) -> ShellResult<Employee> {
        employees
            .state()
            .await
            .employees
            .into_iter()
            .find(|e| e.employee_id == employee_id)
            .ok_or_else(|| ShellError::NotFound(format!("Employee with ID '{}' not found", employee_id)))
    }

    pub async fn employees_list(&mut self, search: Option<&str>) -> ShellResult<()> {
        let employees = self.loaded_employees().await?;
        let term = search.unwrap_or("").to_string();
        employees.set_search(term.clone()).await;
        let visible = employees.visible_employees().await;

        if self.format == OutputFormat::Json {
            return self.json(&visible);
        }

        if visible.is_empty() {
            if term.is_empty() {
                render::empty_state(
                    &mut self.out,
                    "No employees yet",
                    Some("Add your first employee with: hrms employees add"),
                )?;
            } else {
                render::empty_state(
                    &mut self.out,
                    &format!("No employees match '{}'", term),
                    None,
                )?;
            }
            return Ok(());
        }

        render::employee_table(&mut self.out, &visible)?;
        Ok(())
    }

    pub async fn employees_show(&mut self, employee_id: &str) -> ShellResult<()> {
        let result = self.api.get_employee(employee_id).await;
        let employee = match result {
            Ok(employee) => employee,
            Err(e) => {
                self.notifications.error(e.to_string()).await;
                self.flush_toasts()?;
                return Err(e.into());
            }
        };

        if self.format == OutputFormat::Json {
            return self.json(&employee);
        }
        render::employee_detail(&mut self.out, &employee)?;
        Ok(())
    }

    pub async fn employees_add(&mut self, fields: &EmployeeFields) -> ShellResult<()> {
        let employees = EmployeesController::new(self.api.clone(), self.notifications.clone());
        employees.open_create().await;
        self.submit_employee(&employees, fields).await
    }

    pub async fn employees_edit(
        &mut self,
        employee_id: &str,
        fields: &EmployeeFields,
    ) -> ShellResult<()> {
        let employees = self.loaded_employees().await?;
        let target = self.find_employee(&employees, employee_id).await?;
        employees.open_edit(&target).await;
        self.submit_employee(&employees, fields).await
    }

    async fn submit_employee(
        &mut self,
        employees: &EmployeesController,
        fields: &EmployeeFields,
    ) -> ShellResult<()> {
        for (field, value) in fields.entries() {
            employees.set_field(field, value).await;
        }

        let outcome = employees.submit().await;
        self.flush_toasts()?;

        match outcome {
            SubmitOutcome::Saved(employee) => {
                if self.format == OutputFormat::Json {
                    return self.json(&employee);
                }
                render::employee_detail(&mut self.out, &employee)?;
                Ok(())
            }
            SubmitOutcome::Invalid(errors) => {
                render::field_errors(&mut self.out, &errors)?;
                Err(ShellError::Invalid(errors))
            }
            SubmitOutcome::Failed(e) => Err(e.into()),
            SubmitOutcome::Ignored => Ok(()),
        }
    }

    pub async fn employees_delete(&mut self, employee_id: &str) -> ShellResult<()> {
        let employees = self.loaded_employees().await?;
        let target = self.find_employee(&employees, employee_id).await?;
        employees.request_delete(&target).await;

        let prompt = format!(
            "Delete {} ({})? All attendance records for this employee will also be deleted.",
            target.full_name, target.employee_id
        );
        if !self.confirm.confirm(&prompt)? {
            employees.cancel_delete().await;
            writeln!(self.out, "Cancelled")?;
            return Ok(());
        }

        let result = employees.confirm_delete().await;
        self.flush_toasts()?;
        result?;
        Ok(())
    }

    // ---- Attendance ----

    fn attendance(&self) -> AttendanceController {
        AttendanceController::new(
            self.api.clone(),
            self.notifications.clone(),
            self.summary_errors,
        )
    }

    pub async fn attendance_list(
        &mut self,
        date: Option<NaiveDate>,
        employee_id: Option<String>,
        search: Option<&str>,
    ) -> ShellResult<()> {
        let attendance = self.attendance();
        // Filters set before the first load are applied by it
        attendance.set_date_filter(date).await?;
        attendance.set_employee_filter(employee_id).await?;
        if let Some(term) = search {
            attendance.set_search(term).await;
        }

        self.loading("attendance")?;
        let result = attendance.load().await;
        self.flush_toasts()?;
        result?;

        let state = attendance.state().await;
        let visible: Vec<_> = state.visible_records().into_iter().cloned().collect();

        if self.format == OutputFormat::Json {
            return self.json(&visible);
        }

        if visible.is_empty() {
            if state.filter.is_empty() && state.search.is_empty() {
                render::empty_state(
                    &mut self.out,
                    "No attendance records found",
                    Some("Mark attendance with: hrms attendance mark"),
                )?;
            } else {
                render::empty_state(
                    &mut self.out,
                    "No attendance records match the selected filters",
                    None,
                )?;
            }
            return Ok(());
        }

        render::attendance_table(&mut self.out, &visible)?;
        Ok(())
    }

    pub async fn attendance_mark(
        &mut self,
        employee_id: Option<String>,
        date: Option<NaiveDate>,
        status: AttendanceStatus,
    ) -> ShellResult<()> {
        let attendance = self.attendance();
        attendance.select_mark_employee(employee_id).await;
        if let Some(date) = date {
            attendance.set_mark_date(date).await;
        }
        attendance.set_mark_status(status).await;

        let outcome = attendance.submit_mark().await;
        self.flush_toasts()?;

        match outcome {
            MarkOutcome::Marked(record) => {
                if self.format == OutputFormat::Json {
                    return self.json(&record);
                }
                render::attendance_table(&mut self.out, std::slice::from_ref(&record))?;
                Ok(())
            }
            MarkOutcome::MissingEmployee => Err(ShellError::Page(
                "Please select an employee".to_string(),
            )),
            MarkOutcome::Failed(e) => Err(e.into()),
        }
    }

    pub async fn attendance_summary(&mut self, employee_id: &str) -> ShellResult<()> {
        let attendance = self.attendance();
        attendance
            .select_summary_employee(Some(employee_id.to_string()))
            .await;
        self.flush_toasts()?;

        let state = attendance.state().await;
        match (state.summary, state.summary_error) {
            (Some(summary), _) => {
                if self.format == OutputFormat::Json {
                    return self.json(&summary);
                }
                render::summary_panel(&mut self.out, &summary)?;
                Ok(())
            }
            (None, error) => {
                let message = error.unwrap_or_else(|| "Summary unavailable".to_string());
                match self.format {
                    OutputFormat::Table => {
                        render::empty_state(&mut self.out, "No summary available", Some(message.as_str()))?;
                    }
                    // A notified failure has already gone out as a toast
                    OutputFormat::Json if self.summary_errors == SummaryErrorPolicy::Swallow => {
                        writeln!(self.err, "{}", message)?;
                    }
                    OutputFormat::Json => {}
                }
                Err(ShellError::Page(message))
            }
        }
    }

    pub async fn attendance_history(&mut self, employee_id: &str) -> ShellResult<()> {
        let records = match self.api.employee_attendance(employee_id).await {
            Ok(records) => records,
            Err(e) => {
                self.notifications.error(e.to_string()).await;
                self.flush_toasts()?;
                return Err(e.into());
            }
        };

        if self.format == OutputFormat::Json {
            return self.json(&records);
        }
        if records.is_empty() {
            render::empty_state(
                &mut self.out,
                &format!("No attendance records for {}", employee_id),
                None,
            )?;
            return Ok(());
        }
        render::attendance_table(&mut self.out, &records)?;
        Ok(())
    }

    pub async fn attendance_delete(&mut self, record_id: &str) -> ShellResult<()> {
        let prompt = format!("Delete attendance record {}?", record_id);
        if !self.confirm.confirm(&prompt)? {
            writeln!(self.out, "Cancelled")?;
            return Ok(());
        }

        let result = self.api.delete_attendance(record_id).await;
        match &result {
            Ok(()) => {
                tracing::info!(record_id, "Attendance record deleted");
                self.notifications.success("Attendance record deleted").await;
            }
            Err(e) => {
                self.notifications.error(e.to_string()).await;
            }
        }
        self.flush_toasts()?;
        result.map_err(ShellError::from)
    }
}
