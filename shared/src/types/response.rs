//! API response envelope
//!
//! Every endpoint answers with the same `{success, message, data}` shape.
//! `data` is serialized as `null` on errors so clients can always read it.

use serde::{Deserialize, Serialize};

/// Standard API response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the request was successful
    pub success: bool,

    /// Human-readable outcome message
    pub message: String,

    /// Response payload, `null` on failure
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response with a payload
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }

    /// Create a successful response without a payload
    pub fn success_empty(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
        }
    }

    /// Create an error response
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }

    /// Check if the response is successful
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Extract the data, consuming the response
    pub fn into_data(self) -> Option<T> {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_response() {
        let response = ApiResponse::success("Login successful", 42);
        assert!(response.is_success());
        assert_eq!(response.message, "Login successful");
        assert_eq!(response.into_data(), Some(42));
    }

    #[test]
    fn test_error_response_serializes_null_data() {
        let response = ApiResponse::<()>::error("Invalid credentials");
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Invalid credentials");
        assert!(json["data"].is_null());
    }

    #[test]
    fn test_empty_success_keeps_null_data() {
        let response = ApiResponse::<()>::success_empty("Logged out successfully");
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["success"], true);
        assert!(json["data"].is_null());
    }
}
