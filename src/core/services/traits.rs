use crate::AppError;
use crate::core::services::types::ListParams;
use async_trait::async_trait;

/// Trait for services that can list resources
#[async_trait]
pub trait ListService<T> {
    /// List all resources matching the given parameters
    async fn list(&self, params: &ListParams) -> Result<Vec<T>, AppError>;
}

/// Trait for services that can retrieve individual resources
#[async_trait]
pub trait GetService<T> {
    /// Get a single resource by ID
    async fn get(&self, id: &str) -> Result<T, AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;

    // Mock service for testing traits
    struct MockService;

    #[async_trait]
    impl ListService<String> for MockService {
        async fn list(&self, params: &ListParams) -> Result<Vec<String>, AppError> {
            let limit = params.page_size.unwrap_or(2) as usize;
            Ok(vec!["item1".to_string(), "item2".to_string(), "item3".to_string()]
                .into_iter()
                .take(limit)
                .collect())
        }
    }

    #[async_trait]
    impl GetService<String> for MockService {
        async fn get(&self, id: &str) -> Result<String, AppError> {
            if id.is_empty() {
                return Err(ValidationError::EmptyField {
                    field: "id".to_string(),
                }
                .into());
            }
            Ok(format!("item-{}", id))
        }
    }

    #[tokio::test]
    async fn test_list_service() {
        let service = MockService;
        let result = service.list(&ListParams::new().page_size(1)).await;
        assert_eq!(result.unwrap(), vec!["item1".to_string()]);
    }

    #[tokio::test]
    async fn test_get_service() {
        let service = MockService;
        assert_eq!(service.get("7").await.unwrap(), "item-7");
        assert!(service.get("").await.is_err());
    }
}
