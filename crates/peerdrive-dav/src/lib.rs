//! # Peerdrive DAV Gateway
//!
//! WebDAV-compatible HTTP adapter over a peerdrive content drive, so that
//! unmodified OS file managers (Finder's "Connect to Server", Explorer's
//! network locations, Linux file managers) can browse, read, and write the
//! drive as a network share.
//!
//! This crate provides:
//! - **Method dispatch**: OPTIONS, PROPFIND, GET, HEAD, PUT, DELETE, MKCOL,
//!   MOVE, LOCK, UNLOCK, PROPPATCH under a fixed mount prefix
//! - **Collection listing**: depth 0/1 PROPFIND multistatus rendering
//! - **Streaming reads**: single- and multi-range byte serving
//! - **Bounded inline writes**: buffered PUT under a fixed cap
//! - **Class 2 shims**: no-op LOCK/UNLOCK/PROPPATCH for probing clients
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │              WebDAV Clients                         │
//! │      (Finder, Explorer, davfs2, curl, cadaver)      │
//! └─────────────────────────┬───────────────────────────┘
//!                           │
//! ┌─────────────────────────▼───────────────────────────┐
//! │               Peerdrive DAV Gateway                  │
//! ├─────────────────────────────────────────────────────┤
//! │  DAV Headers │ Request Log │ Method Dispatch        │
//! ├─────────────────────────────────────────────────────┤
//! │        Handlers (PROPFIND, GET, PUT, MOVE, …)       │
//! ├─────────────────────────────────────────────────────┤
//! │               peerdrive-store                        │
//! │        (Drive, key variants, engines)               │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! Directories are virtual: there are no directory objects in the drive,
//! only key prefixes. Locking is advertised but never enforced; the stubs
//! exist solely for clients that probe for Class 2 support before writing.

pub mod cache;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod mime;
pub mod path;
pub mod propfind;
pub mod range;
pub mod routes;
pub mod server;
pub mod state;

pub use config::{GatewayConfig, INLINE_PUT_CAP};
pub use error::{DavError, ALLOWED_METHODS};
pub use server::run_server;
pub use state::AppState;
