use axum::{extract::Request, middleware::Next, response::Response};
use log::debug;

/// Header carrying the caller's identity
pub const IDENTITY_HEADER: &str = "x-user-id";

/// Per-request identity used to scope uploaded files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestIdentity(pub String);

impl RequestIdentity {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the identity can be used as one directory name under the upload root
    pub fn is_safe_path_segment(&self) -> bool {
        let id = self.0.as_str();
        !id.is_empty()
            && id != "."
            && id != ".."
            && !id.contains(['/', '\\'])
            && !id.chars().any(char::is_control)
    }
}

/// Reads the identity header and exposes it to handlers as `Extension<RequestIdentity>`.
///
/// Requests without the header pass through untouched. Handlers that need an
/// identity decide how to fail when it is missing.
pub async fn identity_middleware(mut req: Request, next: Next) -> Response {
    let identity = req
        .headers()
        .get(IDENTITY_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.trim().to_string());

    if let Some(identity) = identity {
        debug!("Request identity: {}", identity);
        req.extensions_mut().insert(RequestIdentity(identity));
    }

    next.run(req).await
}
