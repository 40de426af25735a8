//! Pagination query parameters shared by list endpoints.

use serde::{Deserialize, Serialize};

use capacity_core::types::pagination::{PageRequest, PageResponse};

/// `?page=&page_size=` on list endpoints.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ListParams {
    /// Page number (1-based, default: 1).
    pub page: Option<u64>,
    /// Items per page (default: 50, max: 500).
    pub page_size: Option<u64>,
}

impl ListParams {
    /// Converts to a clamped `PageRequest`.
    pub fn page_request(&self) -> PageRequest {
        let defaults = PageRequest::default();
        PageRequest::new(
            self.page.unwrap_or(defaults.page),
            self.page_size.unwrap_or(defaults.page_size),
        )
    }

    /// Page an already-loaded list.
    pub fn paginate<T: Serialize>(&self, items: Vec<T>) -> PageResponse<T> {
        let request = self.page_request();
        let count = items.len() as u64;
        let results = items
            .into_iter()
            .skip(request.offset() as usize)
            .take(request.limit() as usize)
            .collect();
        PageResponse::new(results, request, count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_and_clamp() {
        let request = ListParams::default().page_request();
        assert_eq!((request.page, request.page_size), (1, 50));

        let clamped = ListParams {
            page: Some(0),
            page_size: Some(10_000),
        }
        .page_request();
        assert_eq!((clamped.page, clamped.page_size), (1, 500));
    }

    #[test]
    fn test_paginate_in_memory() {
        let params = ListParams {
            page: Some(2),
            page_size: Some(2),
        };
        let page = params.paginate(vec![1, 2, 3, 4, 5]);
        assert_eq!(page.count, 5);
        assert_eq!(page.results, vec![3, 4]);
        assert_eq!(page.total_pages, 3);
    }
}
