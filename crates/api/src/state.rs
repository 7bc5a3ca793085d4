//! Application state

use common::KeyDictionary;
use github::RequestValidator;
use std::sync::Arc;

/// Shared application state
pub struct AppState {
    pub validator: RequestValidator,
}

impl AppState {
    pub fn new(keys: KeyDictionary) -> Self {
        Self {
            validator: RequestValidator::new(Arc::new(keys)),
        }
    }
}
