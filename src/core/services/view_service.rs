use crate::AppError;
use crate::api::session::Session;
use crate::error::{ApiError, AuthError};
use crate::utils::error_helpers::{convert_json_error, extract_error_detail, map_status_error};
use crate::utils::validation::validate_resource_id;
use crate::viz::table::DataTable;
use reqwest::{Method, StatusCode};
use serde_json::Value;

/// Reads the underlying data of published views
pub struct ViewService<'a> {
    session: &'a Session,
    site_uuid: &'a str,
}

impl<'a> ViewService<'a> {
    pub fn new(session: &'a Session) -> Result<Self, AppError> {
        let site_uuid = session.site_uuid().ok_or(AuthError::NotAuthenticated)?;
        Ok(Self { session, site_uuid })
    }

    /// Fetch a view's data as a table.
    ///
    /// The body's `data` member may be a list of row objects or an object of
    /// column arrays.
    pub async fn data(&self, view_id: &str) -> Result<DataTable, AppError> {
        let view_id = validate_resource_id("View id", view_id)?;
        let endpoint = self
            .session
            .rest_path(&format!("/sites/{}/views/{}/data", self.site_uuid, view_id));

        log::debug!("GET {}", endpoint);
        let response = self
            .session
            .build_request(Method::GET, &endpoint)
            .send()
            .await
            .map_err(|e| self.session.request_error(e, &endpoint))?;

        let status = response.status();

        if status.is_success() {
            let body: Value = response
                .json()
                .await
                .map_err(|e| convert_json_error(e, &endpoint))?;
            let data = body.get("data").ok_or_else(|| ApiError::InvalidResponse {
                endpoint: endpoint.clone(),
                message: "response has no data member".to_string(),
            })?;
            Ok(DataTable::from_json(data)?)
        } else if status == StatusCode::NOT_FOUND {
            let error_text = response.text().await.unwrap_or_default();
            Err(ApiError::NotFound {
                resource: "View".to_string(),
                id: view_id.to_string(),
                detail: extract_error_detail(&error_text),
            }
            .into())
        } else {
            let error_text = response.text().await.unwrap_or_default();
            Err(map_status_error(status.as_u16(), &error_text, &endpoint).into())
        }
    }
}
