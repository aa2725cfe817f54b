//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (Host header)
//!     → resolver.rs (root domain + registry lookup)
//!     → Resolution { service, matched, is_api }
//!     → http::dispatch decides JSON / proxy / page
//! ```
//!
//! # Design Decisions
//! - Registry compiled at startup, immutable at runtime
//! - Deterministic: same hostname always resolves the same way
//! - First match wins (ordered by load order)

pub mod resolver;

pub use resolver::{resolve, root_domain, Resolution};
