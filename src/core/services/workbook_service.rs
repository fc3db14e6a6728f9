use super::traits::{GetService, ListService};
use super::types::ListParams;
use crate::AppError;
use crate::api::models::{Workbook, WorkbookPage, WorkbookResponse, WorkbooksResponse};
use crate::api::session::Session;
use crate::error::{ApiError, AuthError};
use crate::utils::error_helpers::{convert_json_error, extract_error_detail, map_status_error};
use crate::utils::validation::validate_resource_id;
use async_trait::async_trait;
use reqwest::{Method, StatusCode};

/// Workbook service for listing and fetching published workbooks
pub struct WorkbookService<'a> {
    session: &'a Session,
    site_uuid: &'a str,
}

impl<'a> WorkbookService<'a> {
    /// Create new WorkbookService; the session must already be signed in
    pub fn new(session: &'a Session) -> Result<Self, AppError> {
        let site_uuid = session.site_uuid().ok_or(AuthError::NotAuthenticated)?;
        Ok(Self { session, site_uuid })
    }

    fn workbooks_path(&self) -> String {
        self.session.rest_path(&format!("/sites/{}/workbooks", self.site_uuid))
    }

    /// List workbooks on the current site with tags and views flattened
    pub async fn list_workbooks(&self, params: &ListParams) -> Result<Vec<Workbook>, AppError> {
        Ok(self.list_page(params).await?.workbooks)
    }

    /// List one page of workbooks, keeping the pagination block
    pub async fn list_page(&self, params: &ListParams) -> Result<WorkbookPage, AppError> {
        let endpoint = self.workbooks_path();
        let query = params.to_query();

        log::debug!("GET {} {:?}", endpoint, query);
        let response = self
            .session
            .build_request(Method::GET, &endpoint)
            .query(&query)
            .send()
            .await
            .map_err(|e| self.session.request_error(e, &endpoint))?;

        let status = response.status();

        if status.is_success() {
            let body: WorkbooksResponse = response
                .json()
                .await
                .map_err(|e| convert_json_error(e, &endpoint))?;

            let workbooks = body
                .workbooks
                .and_then(|list| list.workbook)
                .unwrap_or_default();
            log::debug!("Received {} workbooks", workbooks.len());

            Ok(WorkbookPage {
                workbooks,
                pagination: body.pagination,
            })
        } else {
            let error_text = response.text().await.unwrap_or_default();
            Err(map_status_error(status.as_u16(), &error_text, &endpoint).into())
        }
    }

    /// Fetch a single workbook by id
    pub async fn get_workbook(&self, id: &str) -> Result<Workbook, AppError> {
        let id = validate_resource_id("Workbook id", id)?;
        let endpoint = format!("{}/{}", self.workbooks_path(), id);

        log::debug!("GET {}", endpoint);
        let response = self
            .session
            .build_request(Method::GET, &endpoint)
            .send()
            .await
            .map_err(|e| self.session.request_error(e, &endpoint))?;

        let status = response.status();

        if status.is_success() {
            let body: WorkbookResponse = response
                .json()
                .await
                .map_err(|e| convert_json_error(e, &endpoint))?;

            body.workbook.ok_or_else(|| {
                ApiError::InvalidResponse {
                    endpoint,
                    message: "response has no workbook".to_string(),
                }
                .into()
            })
        } else if status == StatusCode::NOT_FOUND {
            let error_text = response.text().await.unwrap_or_default();
            Err(ApiError::NotFound {
                resource: "Workbook".to_string(),
                id: id.to_string(),
                detail: extract_error_detail(&error_text),
            }
            .into())
        } else {
            let error_text = response.text().await.unwrap_or_default();
            Err(map_status_error(status.as_u16(), &error_text, &endpoint).into())
        }
    }
}

#[async_trait]
impl ListService<Workbook> for WorkbookService<'_> {
    async fn list(&self, params: &ListParams) -> Result<Vec<Workbook>, AppError> {
        self.list_workbooks(params).await
    }
}

#[async_trait]
impl GetService<Workbook> for WorkbookService<'_> {
    async fn get(&self, id: &str) -> Result<Workbook, AppError> {
        self.get_workbook(id).await
    }
}
