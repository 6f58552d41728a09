//! Client-side session: key-value storage, the per-request session context,
//! and the demo login controls.
//!
//! Everything here is client-writable state. It drives which parts of the
//! storefront are shown, but it is not a trust boundary.

pub mod context;
pub mod demo;
pub mod storage;

pub use context::SessionContext;
pub use demo::{login_as_regular_user, logout, simulate_admin_access};
pub use storage::{ClientStorage, MemoryStorage, StorageError, clear_session};
