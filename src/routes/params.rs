use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::validation::ValidationError;

pub const DEFAULT_PAGE_SIZE: u64 = 20;
pub const MAX_PAGE_SIZE: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u64,
    pub size: u64,
}

impl Pagination {
    /// Clamps size to 1..=100 and page to the range whose offset still fits
    /// the signed 64-bit OFFSET the database drivers bind.
    pub fn new(page: Option<u64>, size: Option<u64>) -> Self {
        let size = size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
        let max_page = i64::MAX as u64 / size + 1;
        Self {
            page: page.unwrap_or(1).clamp(1, max_page),
            size,
        }
    }

    pub fn offset(&self) -> u64 {
        (self.page - 1) * self.size
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(None, None)
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProductSortBy {
    #[default]
    Id,
    Name,
    Price,
    Quantity,
    CreatedAt,
}

/// Query string accepted by `GET /products/`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductQuery {
    /// Page number, starting at 1
    pub page: Option<u64>,
    /// Items per page, 1 to 100 (default 20)
    #[serde(alias = "per_page", alias = "page_size")]
    pub size: Option<u64>,
    /// Case-insensitive substring of the product name
    pub name: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_quantity: Option<i32>,
    pub max_quantity: Option<i32>,
    /// `true` keeps products with quantity > 0, `false` those with quantity 0
    pub in_stock: Option<bool>,
    #[param(inline)]
    pub sort_by: Option<ProductSortBy>,
    #[param(inline)]
    pub sort_order: Option<SortOrder>,
}

impl ProductQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.page, self.size)
    }

    pub fn check_ranges(&self) -> Result<(), ValidationError> {
        if let (Some(min), Some(max)) = (self.min_price, self.max_price) {
            if min > max {
                return Err(ValidationError::InvertedRange {
                    min_field: "min_price",
                    max_field: "max_price",
                });
            }
        }
        if let (Some(min), Some(max)) = (self.min_quantity, self.max_quantity) {
            if min > max {
                return Err(ValidationError::InvertedRange {
                    min_field: "min_quantity",
                    max_field: "max_quantity",
                });
            }
        }
        Ok(())
    }
}
