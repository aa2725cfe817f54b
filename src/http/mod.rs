//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → preprocess.rs (CORS, data override, OPTIONS short-circuit)
//!     → server.rs (request ID, limits, timeout, route table)
//!     → dispatch.rs (resolve hostname to a service)
//!     → proxy.rs (forward to backend) or response.rs (maintenance/error page)
//!     → Send to client
//! ```

pub mod dispatch;
pub mod preprocess;
pub mod proxy;
pub mod request;
pub mod response;
pub mod server;

pub use proxy::{ProxyAdapter, ProxyError};
pub use request::{RequestIdExt, X_REQUEST_ID};
pub use server::{AppState, GatewayServer, STATIC_PREFIX};
