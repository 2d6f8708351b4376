//! HTTP Response Utilities
//!
//! Status checking and decoding shared by the API-based providers.

use kindred_domain::error::{Error, Result};
use reqwest::Response;
use serde::de::DeserializeOwned;

/// Utilities for processing HTTP responses
pub struct HttpResponseUtils;

impl HttpResponseUtils {
    /// Map a transport error, distinguishing timeouts
    pub fn transport_error(provider_name: &str, error: &reqwest::Error) -> Error {
        if error.is_timeout() {
            Error::external_service(provider_name, "request timed out")
        } else {
            Error::external_service(provider_name, format!("HTTP request failed: {error}"))
        }
    }

    /// Check the response status and decode the JSON body
    ///
    /// # Returns
    /// The decoded body on success, or an `ExternalService` error naming the
    /// failure class (authentication, rate limit, server error, ...)
    pub async fn check_and_parse<T: DeserializeOwned>(
        response: Response,
        provider_name: &str,
    ) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let code = status.as_u16();
            let context = match code {
                401 => "authentication failed".to_string(),
                429 => "rate limit exceeded".to_string(),
                500..=599 => format!("server error ({code})"),
                _ => format!("request failed ({code})"),
            };
            return Err(Error::external_service(
                provider_name,
                format!("{context}: {error_text}"),
            ));
        }

        response.json().await.map_err(|e| {
            Error::external_service_with_source(provider_name, "response parse failed", e)
        })
    }
}
