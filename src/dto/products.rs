use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{Category, Product};

/// Catalog page: the filtered products plus every category for the filter menu.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProductListing {
    pub products: Vec<Product>,
    pub categories: Vec<Category>,
}
