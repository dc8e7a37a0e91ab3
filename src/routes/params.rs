use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Catalog filters. Blank values are treated as absent.
#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CatalogQuery {
    /// Category id to filter on.
    pub category: Option<String>,
    /// Case-insensitive text matched against name or description.
    pub search: Option<String>,
}

impl CatalogQuery {
    pub fn category_id(&self) -> AppResult<Option<Uuid>> {
        match self.category.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            None => Ok(None),
            Some(raw) => Uuid::parse_str(raw)
                .map(Some)
                .map_err(|_| AppError::BadRequest(format!("invalid category id {raw:?}"))),
        }
    }

    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}
