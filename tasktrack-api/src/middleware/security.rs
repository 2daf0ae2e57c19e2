/// Security headers middleware
///
/// Adds security-related HTTP headers to every response.
///
/// # Headers Applied
///
/// - `X-Content-Type-Options: nosniff`
/// - `X-Frame-Options: DENY`
/// - `Referrer-Policy: strict-origin-when-cross-origin`
/// - `Strict-Transport-Security` (production only)
///
/// # Example
///
/// ```no_run
/// use axum::Router;
/// use tasktrack_api::middleware::security::SecurityHeadersLayer;
///
/// let app: Router = Router::new()
///     .layer(SecurityHeadersLayer::new(true)); // true = production mode
/// ```
use axum::{extract::Request, response::Response};
use std::task::{Context, Poll};
use tower::{Layer, Service};

/// Security headers middleware layer
#[derive(Clone)]
pub struct SecurityHeadersLayer {
    /// Whether to enable HSTS (only meaningful behind HTTPS)
    enable_hsts: bool,
}

impl SecurityHeadersLayer {
    /// Creates a new security headers layer
    ///
    /// # Arguments
    ///
    /// * `enable_hsts` - Whether to send the HSTS header (production with HTTPS)
    pub fn new(enable_hsts: bool) -> Self {
        Self { enable_hsts }
    }
}

impl<S> Layer<S> for SecurityHeadersLayer {
    type Service = SecurityHeadersMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        SecurityHeadersMiddleware {
            inner,
            enable_hsts: self.enable_hsts,
        }
    }
}

/// Security headers middleware service
#[derive(Clone)]
pub struct SecurityHeadersMiddleware<S> {
    inner: S,
    enable_hsts: bool,
}

impl<S> Service<Request> for SecurityHeadersMiddleware<S>
where
    S: Service<Request, Response = Response> + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        let enable_hsts = self.enable_hsts;
        let future = self.inner.call(req);

        Box::pin(async move {
            let mut response = future.await?;

            let headers = response.headers_mut();
            headers.insert(
                "X-Content-Type-Options",
                axum::http::HeaderValue::from_static("nosniff"),
            );
            headers.insert(
                "X-Frame-Options",
                axum::http::HeaderValue::from_static("DENY"),
            );
            headers.insert(
                "Referrer-Policy",
                axum::http::HeaderValue::from_static("strict-origin-when-cross-origin"),
            );

            if enable_hsts {
                headers.insert(
                    "Strict-Transport-Security",
                    axum::http::HeaderValue::from_static("max-age=31536000; includeSubDomains"),
                );
            }

            Ok(response)
        })
    }
}
