use serde::{Deserialize, Serialize};

/// Uniform envelope returned by every lifecycle operation. Business
/// rejections travel as a failed envelope with the rule's message;
/// only infrastructure faults surface as errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error_message: Option<String>,
}

impl<T> ResultResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error_message: None,
        }
    }

    pub fn failure(error_message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error_message: Some(error_message.into()),
        }
    }
}

/// One page of a collection plus the page arithmetic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagedResult<T> {
    pub items: Vec<T>,
    pub total_count: i64,
    pub page_size: i32,
    pub current_page: i32,
}

impl<T> PagedResult<T> {
    pub fn new(items: Vec<T>, total_count: i64, page_size: i32, current_page: i32) -> Self {
        Self {
            items,
            total_count,
            page_size,
            current_page,
        }
    }

    pub fn total_pages(&self) -> i32 {
        if self.page_size <= 0 {
            return 0;
        }
        let size = self.page_size as i64;
        ((self.total_count + size - 1) / size) as i32
    }

    pub fn has_previous_page(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next_page(&self) -> bool {
        self.current_page < self.total_pages()
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PagedResult<U> {
        PagedResult {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
            page_size: self.page_size,
            current_page: self.current_page,
        }
    }
}
