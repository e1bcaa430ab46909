//! Redirects carrying a one-shot user notification.

use axum::http::header::{LOCATION, REFERER};
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

/// Header holding the notification text.
pub const FLASH_MESSAGE_HEADER: HeaderName = HeaderName::from_static("x-flash-message");

/// Header holding the notification level.
pub const FLASH_CATEGORY_HEADER: HeaderName = HeaderName::from_static("x-flash-category");

/// Bytes escaped in the message header. Non-ASCII is always escaped, and `%`
/// is escaped so clients can decode the value unambiguously.
const FLASH_MESSAGE_ENCODE_SET: &AsciiSet = &CONTROLS.add(b'%');

/// Notification level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashCategory {
    /// The action went through.
    Success,
    /// The action failed.
    Error,
}

impl FlashCategory {
    fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// A `303 See Other` to `location` with a flash notification attached.
#[derive(Debug, Clone)]
pub struct FlashRedirect {
    location: String,
    category: FlashCategory,
    message: String,
}

impl FlashRedirect {
    /// Redirect with a success notification.
    pub fn success(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            category: FlashCategory::Success,
            message: message.into(),
        }
    }

    /// Redirect with an error notification.
    pub fn error(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            category: FlashCategory::Error,
            message: message.into(),
        }
    }
}

impl IntoResponse for FlashRedirect {
    fn into_response(self) -> Response {
        let mut headers = HeaderMap::new();
        let location =
            HeaderValue::try_from(self.location).unwrap_or_else(|_| HeaderValue::from_static("/"));
        headers.insert(LOCATION, location);
        headers.insert(
            FLASH_CATEGORY_HEADER,
            HeaderValue::from_static(self.category.as_str()),
        );
        let encoded = utf8_percent_encode(&self.message, FLASH_MESSAGE_ENCODE_SET).to_string();
        match HeaderValue::try_from(encoded) {
            Ok(message) => {
                headers.insert(FLASH_MESSAGE_HEADER, message);
            }
            Err(_) => tracing::debug!(message = %self.message, "flash message dropped"),
        }
        (StatusCode::SEE_OTHER, headers).into_response()
    }
}

/// The local path (and query) of the `Referer`, or `/` when there is none.
///
/// Scheme and host are discarded so the redirect never leaves the site.
pub fn back_to_referer(headers: &HeaderMap) -> String {
    headers
        .get(REFERER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<Uri>().ok())
        .and_then(|uri| uri.path_and_query().map(|pq| pq.as_str().to_owned()))
        .filter(|path| path.starts_with('/') && !path.starts_with("//"))
        .unwrap_or_else(|| "/".to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn referer(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(REFERER, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_back_to_referer_keeps_path_and_query() {
        assert_eq!(
            back_to_referer(&referer("https://shop.example/search?search=tv")),
            "/search?search=tv"
        );
    }

    #[test]
    fn test_back_to_referer_defaults_to_root() {
        assert_eq!(back_to_referer(&HeaderMap::new()), "/");
    }

    #[test]
    fn test_back_to_referer_rejects_protocol_relative_paths() {
        assert_eq!(back_to_referer(&referer("//evil.example/")), "/");
    }

    #[test]
    fn test_flash_redirect_sets_headers() {
        // Act
        let response = FlashRedirect::success("/orders", "Order Placed Successfully").into_response();

        // Assert
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[LOCATION], "/orders");
        assert_eq!(response.headers()[FLASH_CATEGORY_HEADER], "success");
        assert_eq!(
            response.headers()[FLASH_MESSAGE_HEADER],
            "Order Placed Successfully"
        );
    }

    #[test]
    fn test_non_ascii_message_is_percent_encoded() {
        let response = FlashRedirect::error("/", "Café not added").into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[FLASH_MESSAGE_HEADER], "Caf%C3%A9 not added");
        assert_eq!(response.headers()[FLASH_CATEGORY_HEADER], "error");
    }

    #[test]
    fn test_percent_sign_and_control_bytes_are_escaped() {
        let response = FlashRedirect::success("/", "50% off\nnow").into_response();

        assert_eq!(response.headers()[FLASH_MESSAGE_HEADER], "50%25 off%0Anow");
    }
}
