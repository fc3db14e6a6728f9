/// Query parameters accepted by the workbook list endpoint
///
/// Named fields cover the parameters Tableau documents; `extra` carries
/// anything else verbatim.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListParams {
    pub filter: Option<String>,
    pub sort: Option<String>,
    pub page_size: Option<u32>,
    pub page_number: Option<u32>,
    pub fields: Option<String>,
    pub extra: Vec<(String, String)>,
}

impl ListParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn page_number(mut self, page_number: u32) -> Self {
        self.page_number = Some(page_number);
        self
    }

    pub fn fields(mut self, fields: impl Into<String>) -> Self {
        self.fields = Some(fields.into());
        self
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.push((key.into(), value.into()));
        self
    }

    /// Render as query pairs using Tableau's camelCase names
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if let Some(filter) = &self.filter {
            query.push(("filter".to_string(), filter.clone()));
        }
        if let Some(sort) = &self.sort {
            query.push(("sort".to_string(), sort.clone()));
        }
        if let Some(page_size) = self.page_size {
            query.push(("pageSize".to_string(), page_size.to_string()));
        }
        if let Some(page_number) = self.page_number {
            query.push(("pageNumber".to_string(), page_number.to_string()));
        }
        if let Some(fields) = &self.fields {
            query.push(("fields".to_string(), fields.clone()));
        }
        query.extend(self.extra.iter().cloned());
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_params_default_is_empty() {
        let params = ListParams::default();
        assert!(params.to_query().is_empty());
    }

    #[test]
    fn test_list_params_to_query() {
        let params = ListParams::new()
            .filter("name:eq:Dashboard")
            .sort("name:asc")
            .page_size(50)
            .page_number(2)
            .param("fields", "_default_");

        assert_eq!(
            params.to_query(),
            vec![
                ("filter".to_string(), "name:eq:Dashboard".to_string()),
                ("sort".to_string(), "name:asc".to_string()),
                ("pageSize".to_string(), "50".to_string()),
                ("pageNumber".to_string(), "2".to_string()),
                ("fields".to_string(), "_default_".to_string()),
            ]
        );
    }
}
