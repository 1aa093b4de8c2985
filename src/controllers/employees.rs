//! Employees page: list, search, create/edit modal and delete confirmation

use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::client::{ApiError, ApiResult, HrmsApi};
use crate::models::{Department, Employee};
use crate::notifications::NotificationCenter;
use crate::validation::{validate_employee, EmployeeForm, FieldErrors, FormField};

/// Create/edit modal
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub enum ModalState {
    #[default]
    Closed,
    Create,
    /// Editing the given record; the update is addressed by its original id
    Edit(Employee),
}

impl ModalState {
    pub fn is_open(&self) -> bool {
        !matches!(self, ModalState::Closed)
    }
}

/// Result of submitting the modal form
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Saved(Employee),
    /// Validation failed; nothing was sent
    Invalid(FieldErrors),
    /// Backend rejected the request; the modal stays open with the form intact
    Failed(ApiError),
    /// No modal open
    Ignored,
}

#[derive(Debug, Clone, Default)]
pub struct EmployeesState {
    pub employees: Vec<Employee>,
    pub loading: bool,
    pub error: Option<String>,
    pub modal: ModalState,
    pub form: EmployeeForm,
    pub form_errors: FieldErrors,
    pub submitting: bool,
    /// Employee awaiting delete confirmation
    pub delete_target: Option<Employee>,
    pub deleting: bool,
    pub search: String,
}

impl EmployeesState {
    /// Already-fetched employees matching the search box
    pub fn visible_employees(&self) -> Vec<&Employee> {
        let term = self.search.as_str();
        self.employees
            .iter()
            .filter(|e| term.is_empty() || e.matches(term))
            .collect()
    }
}

#[derive(Clone)]
pub struct EmployeesController {
    api: Arc<dyn HrmsApi>,
    notifications: NotificationCenter,
    state: Arc<RwLock<EmployeesState>>,
}

impl EmployeesController {
    pub fn new(api: Arc<dyn HrmsApi>, notifications: NotificationCenter) -> Self {
        Self {
            api,
            notifications,
            state: Arc::new(RwLock::new(EmployeesState::default())),
        }
    }

    pub async fn state(&self) -> EmployeesState {
        self.state.read().await.clone()
    }

    /// (Re)fetch the employee list
    pub async fn load(&self) -> ApiResult<()> {
        self.state.write().await.loading = true;

        let result = self.api.list_employees().await;

        let mut state = self.state.write().await;
        state.loading = false;
        match result {
            Ok(employees) => {
                tracing::debug!(count = employees.len(), "Employees loaded");
                state.employees = employees;
                state.error = None;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Employee list fetch failed");
                state.error = Some(e.to_string());
                drop(state);
                self.notifications.error(e.to_string()).await;
                Err(e)
            }
        }
    }

    /// Client-side filter over name and employee id; never refetches
    pub async fn set_search(&self, term: impl Into<String>) {
        self.state.write().await.search = term.into();
    }

    pub async fn visible_employees(&self) -> Vec<Employee> {
        let state = self.state.read().await;
        state.visible_employees().into_iter().cloned().collect()
    }

    pub async fn open_create(&self) {
        let mut state = self.state.write().await;
        state.modal = ModalState::Create;
        state.form = EmployeeForm::default();
        state.form_errors = FieldErrors::default();
    }

    pub async fn open_edit(&self, employee: &Employee) {
        let mut state = self.state.write().await;
        state.modal = ModalState::Edit(employee.clone());
        state.form = EmployeeForm::from_employee(employee);
        state.form_errors = FieldErrors::default();
    }

    /// Close the modal and reset the form
    pub async fn close_modal(&self) {
        let mut state = self.state.write().await;
        state.modal = ModalState::Closed;
        state.form = EmployeeForm::default();
        state.form_errors = FieldErrors::default();
    }

    /// Update one form input and clear its error.
    ///
    /// For `FormField::Department` the value is parsed; unknown names unset it.
    pub async fn set_field(&self, field: FormField, value: &str) {
        let mut state = self.state.write().await;
        match field {
            FormField::EmployeeId => state.form.employee_id = value.to_string(),
            FormField::FullName => state.form.full_name = value.to_string(),
            FormField::Email => state.form.email = value.to_string(),
            FormField::Department => state.form.department = value.parse().ok(),
        }
        state.form_errors.clear(field);
    }

    pub async fn set_department(&self, department: Option<Department>) {
        let mut state = self.state.write().await;
        state.form.department = department;
        state.form_errors.clear(FormField::Department);
    }

    /// Validate and send the modal form: create, or replace the edit target
    pub async fn submit(&self) -> SubmitOutcome {
        let (modal, form) = {
            let state = self.state.read().await;
            (state.modal.clone(), state.form.clone())
        };

        if !modal.is_open() {
            return SubmitOutcome::Ignored;
        }

        let input = match validate_employee(&form) {
            Ok(input) => input,
            Err(errors) => {
                tracing::debug!(?errors, "Employee form rejected");
                self.state.write().await.form_errors = errors.clone();
                return SubmitOutcome::Invalid(errors);
            }
        };

        self.state.write().await.submitting = true;

        let (result, verb) = match &modal {
            ModalState::Edit(target) => (
                self.api.update_employee(&target.employee_id, &input).await,
                "updated",
            ),
            _ => (self.api.create_employee(&input).await, "added"),
        };

        self.state.write().await.submitting = false;

        match result {
            Ok(saved) => {
                {
                    let mut state = self.state.write().await;
                    state.modal = ModalState::Closed;
                    state.form = EmployeeForm::default();
                    state.form_errors = FieldErrors::default();
                }
                tracing::info!(employee_id = %saved.employee_id, "Employee {}", verb);
                self.notifications
                    .success(format!("Employee {} {} successfully", input.full_name, verb))
                    .await;
                // Already reported through notifications
                let _ = self.load().await;
                SubmitOutcome::Saved(saved)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Employee save failed");
                self.notifications.error(e.to_string()).await;
                SubmitOutcome::Failed(e)
            }
        }
    }

    /// First step of deletion: select the target
    pub async fn request_delete(&self, employee: &Employee) {
        self.state.write().await.delete_target = Some(employee.clone());
    }

    pub async fn cancel_delete(&self) {
        self.state.write().await.delete_target = None;
    }

    /// Second step of deletion. A no-op when nothing is selected.
    ///
    /// On failure the target stays selected so the user can retry.
    pub async fn confirm_delete(&self) -> ApiResult<()> {
        let target = {
            let mut state = self.state.write().await;
            match state.delete_target.clone() {
                Some(target) => {
                    state.deleting = true;
                    target
                }
                None => return Ok(()),
            }
        };

        let result = self.api.delete_employee(&target.employee_id).await;

        self.state.write().await.deleting = false;

        match result {
            Ok(()) => {
                self.state.write().await.delete_target = None;
                tracing::info!(employee_id = %target.employee_id, "Employee deleted");
                self.notifications
                    .success(format!("Employee {} deleted", target.full_name))
                    .await;
                let _ = self.load().await;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Employee delete failed");
                self.notifications.error(e.to_string()).await;
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EmployeeInput;
    use crate::notifications::NotificationKind;
    use crate::testing::{employee, Call, FakeApi};

    fn setup(api: FakeApi) -> (Arc<FakeApi>, NotificationCenter, EmployeesController) {
        let api = Arc::new(api);
        let notifications = NotificationCenter::default();
        let controller = EmployeesController::new(api.clone(), notifications.clone());
        (api, notifications, controller)
    }

    async fn fill(controller: &EmployeesController, id: &str, name: &str, email: &str, dept: &str) {
        controller.set_field(FormField::EmployeeId, id).await;
        controller.set_field(FormField::FullName, name).await;
        controller.set_field(FormField::Email, email).await;
        controller.set_field(FormField::Department, dept).await;
    }

    #[tokio::test]
    async fn test_invalid_form_never_calls_api() {
        let (api, notifications, controller) = setup(FakeApi::new());
        controller.open_create().await;
        fill(&controller, "", "A", "not-an-email", "").await;

        let errors = match controller.submit().await {
            SubmitOutcome::Invalid(errors) => errors,
            other => panic!("expected validation failure, got {:?}", other),
        };
        assert_eq!(errors.get(FormField::EmployeeId), Some("Employee ID is required"));
        assert_eq!(errors.get(FormField::FullName), Some("Name must be at least 2 characters"));
        assert_eq!(errors.get(FormField::Email), Some("Please enter a valid email address"));
        assert_eq!(errors.get(FormField::Department), Some("Department is required"));

        assert!(api.calls().is_empty());
        assert!(notifications.list().await.is_empty());

        let state = controller.state().await;
        assert_eq!(state.form_errors, errors);
        assert_eq!(state.modal, ModalState::Create);
    }

    #[tokio::test]
    async fn test_typing_clears_only_that_error() {
        let (_api, _n, controller) = setup(FakeApi::new());
        controller.open_create().await;
        controller.submit().await;

        controller.set_field(FormField::Email, "a").await;
        let errors = controller.state().await.form_errors;
        assert!(errors.get(FormField::Email).is_none());
        assert!(errors.get(FormField::FullName).is_some());
    }

    #[tokio::test]
    async fn test_valid_create() {
        let (api, notifications, controller) = setup(FakeApi::new());
        controller.load().await.unwrap();
        controller.open_create().await;
        fill(&controller, "EMP001", "Ada Lovelace", "ada@example.com", "Engineering").await;

        let outcome = controller.submit().await;
        assert!(matches!(outcome, SubmitOutcome::Saved(ref e) if e.employee_id == "EMP001"));

        let expected = EmployeeInput {
            employee_id: "EMP001".to_string(),
            full_name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            department: Department::Engineering,
        };
        assert_eq!(
            api.calls(),
            vec![Call::ListEmployees, Call::CreateEmployee(expected), Call::ListEmployees]
        );

        let state = controller.state().await;
        assert_eq!(state.modal, ModalState::Closed);
        assert_eq!(state.form, EmployeeForm::default());
        assert!(state.form_errors.is_empty());
        assert_eq!(state.employees.len(), 1);

        let toasts = notifications.list().await;
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].kind, NotificationKind::Success);
        assert_eq!(toasts[0].message, "Employee Ada Lovelace added successfully");
    }

    #[tokio::test]
    async fn test_failed_create_keeps_modal_and_form() {
        let (api, notifications, controller) =
            setup(FakeApi::new().with_employees(vec![employee("EMP001", "Ada Lovelace")]));
        controller.open_create().await;
        fill(&controller, "EMP001", "Someone Else", "else@example.com", "Sales").await;

        let outcome = controller.submit().await;
        assert!(matches!(outcome, SubmitOutcome::Failed(ApiError::Status { status: 409, .. })));
        assert_eq!(api.count("list_employees"), 0);

        let state = controller.state().await;
        assert_eq!(state.modal, ModalState::Create);
        assert_eq!(state.form.full_name, "Someone Else");
        assert_eq!(state.form.department, Some(Department::Sales));
        assert!(!state.submitting);

        let toasts = notifications.list().await;
        assert_eq!(toasts[0].kind, NotificationKind::Error);
        assert_eq!(toasts[0].message, "Employee with ID 'EMP001' already exists");
    }

    #[tokio::test]
    async fn test_edit_replaces_by_original_id() {
        let original = employee("EMP001", "Ada Lovelace");
        let (api, notifications, controller) =
            setup(FakeApi::new().with_employees(vec![original.clone()]));
        controller.load().await.unwrap();

        controller.open_edit(&original).await;
        let state = controller.state().await;
        assert_eq!(state.form.full_name, "Ada Lovelace");
        assert_eq!(state.form.department, Some(Department::Engineering));

        controller.set_field(FormField::FullName, "Ada King").await;
        let outcome = controller.submit().await;
        assert!(matches!(outcome, SubmitOutcome::Saved(_)));

        assert!(api.calls().contains(&Call::UpdateEmployee(
            "EMP001".to_string(),
            EmployeeInput {
                employee_id: "EMP001".to_string(),
                full_name: "Ada King".to_string(),
                email: "emp001@example.com".to_string(),
                department: Department::Engineering,
            }
        )));
        assert_eq!(controller.state().await.employees[0].full_name, "Ada King");
        assert_eq!(
            notifications.list().await[0].message,
            "Employee Ada King updated successfully"
        );
    }

    #[tokio::test]
    async fn test_close_modal_resets_form() {
        let (_api, _n, controller) = setup(FakeApi::new());
        controller.open_create().await;
        controller.set_field(FormField::FullName, "Draft").await;
        controller.close_modal().await;

        let state = controller.state().await;
        assert_eq!(state.modal, ModalState::Closed);
        assert_eq!(state.form, EmployeeForm::default());
        assert_eq!(controller.submit().await, SubmitOutcome::Ignored);
    }

    #[tokio::test]
    async fn test_confirmed_delete_calls_once_and_refetches_once() {
        let ada = employee("EMP001", "Ada Lovelace");
        let (api, notifications, controller) =
            setup(FakeApi::new().with_employees(vec![ada.clone(), employee("EMP002", "Grace Hopper")]));
        controller.load().await.unwrap();

        controller.request_delete(&ada).await;
        controller.confirm_delete().await.unwrap();

        assert_eq!(api.count("delete_employee"), 1);
        // Initial load plus exactly one refetch
        assert_eq!(api.count("list_employees"), 2);
        assert_eq!(
            api.calls()[1..],
            [Call::DeleteEmployee("EMP001".to_string()), Call::ListEmployees]
        );

        let state = controller.state().await;
        assert!(state.delete_target.is_none());
        assert_eq!(state.employees.len(), 1);
        assert_eq!(notifications.list().await[0].message, "Employee Ada Lovelace deleted");
    }

    #[tokio::test]
    async fn test_cancelled_delete_makes_no_calls() {
        let ada = employee("EMP001", "Ada Lovelace");
        let (api, _n, controller) = setup(FakeApi::new().with_employees(vec![ada.clone()]));

        controller.request_delete(&ada).await;
        controller.cancel_delete().await;
        controller.confirm_delete().await.unwrap();

        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_target() {
        let ada = employee("EMP001", "Ada Lovelace");
        let (api, notifications, controller) = setup(FakeApi::new().with_employees(vec![ada.clone()]));
        api.fail("delete_employee", ApiError::Unreachable);

        controller.request_delete(&ada).await;
        assert!(controller.confirm_delete().await.is_err());

        let state = controller.state().await;
        assert_eq!(state.delete_target, Some(ada));
        assert!(!state.deleting);
        assert_eq!(api.count("list_employees"), 0);
        assert_eq!(notifications.list().await[0].kind, NotificationKind::Error);
    }

    #[tokio::test]
    async fn test_search_is_client_side() {
        let (api, _n, controller) = setup(FakeApi::new().with_employees(vec![
            employee("EMP001", "Ada Lovelace"),
            employee("EMP002", "Grace Hopper"),
            employee("ENG003", "Alan Turing"),
        ]));
        controller.load().await.unwrap();

        controller.set_search("HOP").await;
        let names: Vec<_> = controller
            .visible_employees()
            .await
            .into_iter()
            .map(|e| e.full_name)
            .collect();
        assert_eq!(names, ["Grace Hopper"]);

        controller.set_search("emp").await;
        assert_eq!(controller.visible_employees().await.len(), 2);

        controller.set_search("").await;
        assert_eq!(controller.visible_employees().await.len(), 3);

        assert_eq!(api.count("list_employees"), 1);
    }

    #[tokio::test]
    async fn test_search_term_matched_as_typed() {
        let (_api, _n, controller) = setup(FakeApi::new().with_employees(vec![
            employee("EMP001", "Ada Lovelace"),
            employee("EMP002", "Grace Hopper"),
        ]));
        controller.load().await.unwrap();

        // Whitespace is part of the term
        controller.set_search("hopper ").await;
        assert!(controller.visible_employees().await.is_empty());

        controller.set_search("ada ").await;
        let ids: Vec<_> = controller
            .visible_employees()
            .await
            .into_iter()
            .map(|e| e.employee_id)
            .collect();
        assert_eq!(ids, ["EMP001"]);
    }

    #[tokio::test]
    async fn test_load_failure_is_notified() {
        let (api, notifications, controller) = setup(FakeApi::new());
        api.fail("list_employees", ApiError::Unreachable);

        assert!(controller.load().await.is_err());
        let state = controller.state().await;
        assert!(!state.loading);
        assert!(state.error.is_some());
        assert_eq!(notifications.list().await.len(), 1);
    }
}
