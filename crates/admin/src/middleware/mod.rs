//! HTTP middleware stack for admin.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Security headers (no third-party origins at all)
//! 5. Session layer (tower-sessions with `PostgreSQL` store, `SameSite=Strict`)
//! 6. Rate limiting on the login form (governor)
//!
//! Authentication is enforced per handler with the [`RequireAdminAuth`]
//! extractor.

pub mod auth;
pub mod flash;
pub mod rate_limit;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use auth::{
    OptionalAdminAuth, RequireAdminAuth, clear_current_admin, set_current_admin,
};
pub use rate_limit::login_rate_limiter;
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
