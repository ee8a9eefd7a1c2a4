use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// JSON body of every error response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub detail: String,
}

/// One page of a listing.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub size: u64,
    pub pages: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64, page: u64, size: u64) -> Self {
        Self {
            items,
            total,
            page,
            size,
            pages: total_pages(total, size),
        }
    }
}

pub fn total_pages(total: u64, size: u64) -> u64 {
    if size == 0 { 0 } else { total.div_ceil(size) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_count() {
        assert_eq!(total_pages(0, 20), 0);
        assert_eq!(total_pages(1, 20), 1);
        assert_eq!(total_pages(20, 20), 1);
        assert_eq!(total_pages(21, 20), 2);
        assert_eq!(total_pages(25, 10), 3);
    }

    #[test]
    fn page_serializes_pages_field() {
        let page = Page::new(vec![1, 2], 12, 1, 5);
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["pages"], 3);
        assert_eq!(json["items"], serde_json::json!([1, 2]));
    }
}
