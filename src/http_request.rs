//! Abstract HTTP request.
//!
//! The [`HttpRequest`] type represents an HTTP request that can (and should)
//! be sent to a chat completions endpoint, without committing to a specific
//! HTTP client.
//!
//! ## Features
//!
//! If the `reqwest`/`reqwest-blocking` feature is enabled, the
//! [`HttpRequest`] type can be converted to a [`reqwest::Request`] or
//! [`reqwest::blocking::Request`] using the `try_into_reqwest` or
//! `try_into_reqwest_blocking` methods.

use std::{fmt, sync::Arc};

/// HTTP request encapsulation.
///
/// This type represents an HTTP request. Supports pretty-printing the request
/// as a string (through the [`std::fmt::Display`] trait).
///
/// ## `reqwest`/`reqwest-blocking` feature
///
/// If the `reqwest`/`reqwest-blocking` feature is enabled, the
/// [`HttpRequest`] type can be converted to a `reqwest::Request` or
/// `reqwest::blocking::Request` using the `try_into_reqwest` or
/// `try_into_reqwest_blocking` methods.
///
/// Additionally, the `From<HttpRequest>` trait is implemented for
/// `reqwest::Request` and `reqwest::blocking::Request`, beware that it will
/// panic if the conversion fails.
#[derive(Debug)]
pub struct HttpRequest {
    /// Request URL.
    ///
    /// The endpoint is configured as one opaque URL, so the request carries
    /// it whole instead of splitting host and path.
    pub url: String,
    /// HTTP method.
    pub method: &'static str,
    /// Request headers.
    pub headers: Vec<(&'static str, Arc<str>)>,
    /// Request body.
    pub body: String,
}

impl fmt::Display for HttpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", self.method, self.url)?;

        for (key, value) in &self.headers {
            writeln!(f, "{}: {}", key, value.as_ref())?;
        }

        // Empty line between headers and body
        writeln!(f)?;

        // Write body
        write!(f, "{}", self.body)?;

        Ok(())
    }
}

#[cfg(feature = "reqwest")]
impl HttpRequest {
    /// Converts this [`HttpRequest`] into a [`reqwest::Request`].
    pub fn try_into_reqwest(self) -> Result<reqwest::Request, Box<dyn std::error::Error>> {
        let method = reqwest::Method::from_bytes(self.method.as_bytes())?;

        let url = reqwest::Url::parse(&self.url)?;
        let mut request = reqwest::Request::new(method, url);

        *request.body_mut() = Some(self.body.into());

        let headers = request.headers_mut();
        for (key, value) in self.headers {
            let header_name = reqwest::header::HeaderName::from_bytes(key.as_bytes())?;
            let header_value = reqwest::header::HeaderValue::from_str(&value)?;
            headers.insert(header_name, header_value);
        }

        Ok(request)
    }
}

#[cfg(feature = "reqwest-blocking")]
impl HttpRequest {
    /// Converts this [`HttpRequest`] into a [`reqwest::blocking::Request`].
    pub fn try_into_reqwest_blocking(
        self,
    ) -> Result<reqwest::blocking::Request, Box<dyn std::error::Error>> {
        let method = reqwest::Method::from_bytes(self.method.as_bytes())?;

        let url = reqwest::Url::parse(&self.url)?;
        let mut request = reqwest::blocking::Request::new(method, url);

        *request.body_mut() = Some(self.body.into());

        let headers = request.headers_mut();
        for (key, value) in self.headers {
            let header_name = reqwest::header::HeaderName::from_bytes(key.as_bytes())?;
            let header_value = reqwest::header::HeaderValue::from_str(&value)?;
            headers.insert(header_name, header_value);
        }

        Ok(request)
    }
}

#[cfg(feature = "reqwest")]
impl From<HttpRequest> for reqwest::Request {
    fn from(http_request: HttpRequest) -> Self {
        http_request
            .try_into_reqwest()
            .expect("failed to convert to reqwest::Request")
    }
}

#[cfg(feature = "reqwest-blocking")]
impl From<HttpRequest> for reqwest::blocking::Request {
    fn from(http_request: HttpRequest) -> Self {
        http_request
            .try_into_reqwest_blocking()
            .expect("failed to convert to reqwest::blocking::Request")
    }
}
