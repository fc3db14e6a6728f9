use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Accepts Tableau's string-encoded numbers as well as plain JSON numbers
fn deserialize_u32_lenient<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Number(n) => Ok(n.as_u64().and_then(|n| u32::try_from(n).ok())),
        Value::String(s) => Ok(s.trim().parse::<u32>().ok()),
        _ => Ok(None),
    }
}

#[derive(Debug, Deserialize)]
struct TagLabel {
    label: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TagsField {
    Flat(Vec<String>),
    Wrapped { tag: Option<Vec<TagLabel>> },
}

/// Custom deserializer: unwraps `{"tag": [{"label": ..}]}` into plain labels
///
/// An already flat list passes through, so reshaping is idempotent.
/// Null, `{}` and a missing field all become an empty list.
fn deserialize_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let field = Option::<TagsField>::deserialize(deserializer)?;
    Ok(match field {
        Some(TagsField::Flat(labels)) => labels,
        Some(TagsField::Wrapped { tag }) => tag
            .unwrap_or_default()
            .into_iter()
            .map(|t| t.label)
            .collect(),
        None => Vec::new(),
    })
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ViewsField {
    Flat(Vec<View>),
    Wrapped { view: Option<Vec<View>> },
}

/// Custom deserializer: unwraps `{"view": [..]}` the same way as tags
fn deserialize_views<'de, D>(deserializer: D) -> Result<Vec<View>, D::Error>
where
    D: Deserializer<'de>,
{
    let field = Option::<ViewsField>::deserialize(deserializer)?;
    Ok(match field {
        Some(ViewsField::Flat(views)) => views,
        Some(ViewsField::Wrapped { view }) => view.unwrap_or_default(),
        None => Vec::new(),
    })
}

// Authentication models
#[derive(Debug, Serialize)]
pub struct SignInRequest {
    pub credentials: SignInCredentials,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInCredentials {
    pub personal_access_token_name: String,
    pub personal_access_token_secret: String,
    pub site: SiteRef,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct SiteRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub content_url: String,
}

impl SignInRequest {
    pub fn personal_access_token(name: &str, secret: &str, site_id: Option<&str>) -> Self {
        Self {
            credentials: SignInCredentials {
                personal_access_token_name: name.to_string(),
                personal_access_token_secret: secret.to_string(),
                site: SiteRef {
                    id: None,
                    content_url: site_id.unwrap_or_default().to_string(),
                },
            },
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct SignInResponse {
    #[serde(default)]
    pub credentials: SignedInCredentials,
}

#[derive(Debug, Deserialize, Default)]
pub struct SignedInCredentials {
    pub token: Option<String>,
    pub site: Option<SiteRef>,
    pub user: Option<UserRef>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct UserRef {
    pub id: String,
}

/// Tableau REST error body: `{"error": {"code", "summary", "detail"}}`
#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    pub code: Option<String>,
    pub summary: Option<String>,
    pub detail: Option<String>,
}

// Workbook models
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct NamedRef {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct View {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Workbook {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_page_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<NamedRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<NamedRef>,
    #[serde(default, deserialize_with = "deserialize_tags")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_views")]
    pub views: Vec<View>,
    /// Every other field the server sent, kept verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[serde(default, deserialize_with = "deserialize_u32_lenient")]
    pub page_number: Option<u32>,
    #[serde(default, deserialize_with = "deserialize_u32_lenient")]
    pub page_size: Option<u32>,
    #[serde(default, deserialize_with = "deserialize_u32_lenient")]
    pub total_available: Option<u32>,
}

#[derive(Debug, Deserialize, Default)]
pub struct WorkbookList {
    #[serde(default)]
    pub workbook: Option<Vec<Workbook>>,
}

/// Body of `GET /sites/{site}/workbooks`
#[derive(Debug, Deserialize, Default)]
pub struct WorkbooksResponse {
    #[serde(default)]
    pub workbooks: Option<WorkbookList>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

/// Body of `GET /sites/{site}/workbooks/{id}`
#[derive(Debug, Deserialize)]
pub struct WorkbookResponse {
    pub workbook: Option<Workbook>,
}

/// A page of workbooks together with the server's pagination block
#[derive(Debug, Clone, Default)]
pub struct WorkbookPage {
    pub workbooks: Vec<Workbook>,
    pub pagination: Option<Pagination>,
}

// Metadata API models
#[derive(Debug, Serialize)]
pub struct GraphqlRequest<'a> {
    pub query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<&'a Value>,
}
