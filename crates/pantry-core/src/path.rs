//! # Base Path Derivation
//!
//! The backend may be served under a sub-path (for example behind a Home
//! Assistant ingress prefix). Endpoints are always built as
//! `{basePath}/{endpoint}` where `basePath` is the configured location with
//! trailing slashes removed.

/// Strips trailing slashes from a page path or base URL.
///
/// ```rust
/// use pantry_core::path::base_path;
///
/// assert_eq!(base_path("/api/hassio_ingress/abc/"), "/api/hassio_ingress/abc");
/// assert_eq!(base_path("/"), "");
/// ```
pub fn base_path(location: &str) -> &str {
    location.trim_end_matches('/')
}

/// Joins an endpoint onto a base path with exactly one slash between them.
pub fn endpoint_url(location: &str, endpoint: &str) -> String {
    format!("{}/{}", base_path(location), endpoint.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_path_strips_trailing_slashes() {
        assert_eq!(base_path("http://host:3456/"), "http://host:3456");
        assert_eq!(base_path("http://host/sub//"), "http://host/sub");
        assert_eq!(base_path("http://host/sub"), "http://host/sub");
        assert_eq!(base_path(""), "");
    }

    #[test]
    fn test_endpoint_url() {
        assert_eq!(
            endpoint_url("http://host/ingress/xyz/", "api/check-barcode"),
            "http://host/ingress/xyz/api/check-barcode"
        );
        assert_eq!(endpoint_url("/", "/health"), "/health");
    }
}
