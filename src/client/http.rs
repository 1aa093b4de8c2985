//! HTTP implementation of the backend client (reqwest)

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{ApiError, ApiResult, AttendanceFilter, HrmsApi};
use crate::config::ApiConfig;
use crate::models::{
    AttendanceList, AttendanceRecord, AttendanceSummary, Employee, EmployeeInput, EmployeeList,
    NewAttendance, Stats,
};

/// REST client for the HRMS backend
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
}

impl HttpClient {
    /// Create a client rooted at `base_url` (e.g. "http://localhost:8000/api")
    pub fn new(base_url: impl Into<String>) -> ApiResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| ApiError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        // Normalize: remove trailing slash
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self { client, base_url })
    }

    /// Create a client from the `[api]` configuration section
    pub fn from_config(config: &ApiConfig) -> ApiResult<Self> {
        Self::new(config.base_url.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue one request. Returns `None` for 204, the raw body otherwise.
    async fn execute<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        query: &[(&'static str, String)],
        body: Option<&B>,
    ) -> ApiResult<Option<Vec<u8>>> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%method, path = %path, "Backend request");

        let mut request = self.client.request(method.clone(), &url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            tracing::warn!(%method, path = %path, error = %e, "Backend unreachable");
            ApiError::from_send(e)
        })?;

        let status = response.status();
        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| {
                tracing::warn!(%method, path = %path, error = %e, "Connection lost reading response");
                ApiError::Unreachable
            })?;

        if !status.is_success() {
            let err = ApiError::from_status(status.as_u16(), &bytes);
            tracing::warn!(%method, path = %path, status = status.as_u16(), error = %err, "Backend rejected request");
            return Err(err);
        }

        Ok(Some(bytes.to_vec()))
    }

    /// Issue a request and decode its JSON body
    async fn fetch<T, B>(
        &self,
        method: Method,
        path: &str,
        query: &[(&'static str, String)],
        body: Option<&B>,
    ) -> ApiResult<Option<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        match self.execute(method, path, query, body).await? {
            Some(bytes) => serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(|e| ApiError::Decode(e.to_string())),
            None => Ok(None),
        }
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> ApiResult<T> {
        let body = self.fetch::<T, ()>(Method::GET, path, query, None).await?;
        required(body)
    }

    async fn send_json<T, B>(&self, method: Method, path: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = self.fetch::<T, B>(method, path, &[], Some(body)).await?;
        required(body)
    }

    async fn delete(&self, path: &str) -> ApiResult<()> {
        self.execute::<()>(Method::DELETE, path, &[], None).await?;
        Ok(())
    }
}

fn required<T>(body: Option<T>) -> ApiResult<T> {
    body.ok_or_else(|| ApiError::Decode("expected a response body".to_string()))
}

fn segment(id: &str) -> std::borrow::Cow<'_, str> {
    urlencoding::encode(id)
}

#[async_trait]
impl HrmsApi for HttpClient {
    async fn list_employees(&self) -> ApiResult<Vec<Employee>> {
        let list: EmployeeList = self.get("/employees", &[]).await?;
        Ok(list.employees)
    }

    async fn get_employee(&self, employee_id: &str) -> ApiResult<Employee> {
        self.get(&format!("/employees/{}", segment(employee_id)), &[])
            .await
    }

    async fn create_employee(&self, input: &EmployeeInput) -> ApiResult<Employee> {
        self.send_json(Method::POST, "/employees", input).await
    }

    async fn update_employee(
        &self,
        employee_id: &str,
        input: &EmployeeInput,
    ) -> ApiResult<Employee> {
        self.send_json(
            Method::PUT,
            &format!("/employees/{}", segment(employee_id)),
            input,
        )
        .await
    }

    async fn delete_employee(&self, employee_id: &str) -> ApiResult<()> {
        self.delete(&format!("/employees/{}", segment(employee_id)))
            .await
    }

    async fn list_attendance(&self, filter: &AttendanceFilter) -> ApiResult<Vec<AttendanceRecord>> {
        let list: AttendanceList = self.get("/attendance", &filter.query_pairs()).await?;
        Ok(list.records)
    }

    async fn employee_attendance(&self, employee_id: &str) -> ApiResult<Vec<AttendanceRecord>> {
        let list: AttendanceList = self
            .get(&format!("/attendance/employee/{}", segment(employee_id)), &[])
            .await?;
        Ok(list.records)
    }

    async fn attendance_summary(&self, employee_id: &str) -> ApiResult<AttendanceSummary> {
        self.get(&format!("/attendance/summary/{}", segment(employee_id)), &[])
            .await
    }

    async fn mark_attendance(&self, attendance: &NewAttendance) -> ApiResult<AttendanceRecord> {
        self.send_json(Method::POST, "/attendance", attendance).await
    }

    async fn delete_attendance(&self, record_id: &str) -> ApiResult<()> {
        self.delete(&format!("/attendance/{}", segment(record_id)))
            .await
    }

    async fn stats(&self) -> ApiResult<Stats> {
        self.get("/stats", &[]).await
    }
}
