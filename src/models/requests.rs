//! Request DTOs for the recommendation API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

use crate::models::UserId;

/// Longest message accepted, in bytes
pub const MAX_MESSAGE_LENGTH: usize = 2000;

/// Request body for `POST /recommend`
#[derive(Debug, Clone, Deserialize)]
pub struct RecommendRequest {
    /// Chat user the message came from
    pub identity: UserId,
    /// Free-text message
    pub text: String,
}

impl RecommendRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.text.trim().is_empty() {
            return Some("Message text cannot be empty".to_string());
        }
        if self.text.len() > MAX_MESSAGE_LENGTH {
            return Some(format!(
                "Message exceeds maximum length of {} bytes",
                MAX_MESSAGE_LENGTH
            ));
        }
        None
    }
}
