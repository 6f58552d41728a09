//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Session layer (tower-sessions with in-memory store)
//!
//! The per-request [`SessionContext`](crate::session::SessionContext) is read
//! by the [`CurrentSession`] extractor, not by a layer.

pub mod auth;
pub mod request_id;
pub mod session;

pub use auth::CurrentSession;
pub use request_id::{REQUEST_ID_HEADER, RequestId, request_id_middleware};
pub use session::{SESSION_COOKIE_NAME, create_session_layer};
