//! Master Builder schema backend client
//!
//! [`SchemaStore`] is the async seam between the tools and the backend that
//! persists schema snapshots and defined masters:
//!
//! - [`HttpSchemaStore`]: the REST API (`schemas/`, `masters/`)
//! - [`MemorySchemaStore`]: in-process, for tests and offline use
//!
//! # Example
//!
//! ```rust
//! use mb_client::{MemorySchemaStore, SchemaStore};
//!
//! # async fn demo() -> mb_client::Result<()> {
//! let store = MemorySchemaStore::new();
//! let saved = store.save_schema("HR", "", mb_schema::sample_graph(), None).await?;
//! let updated = store
//!     .save_schema("HR", "v2", saved.graph().clone(), Some(saved.id))
//!     .await?;
//! assert_eq!(updated.version, 2);
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod config;
mod error;
mod http;
mod memory;
mod store;

pub use config::{ClientConfig, BASE_URL_ENV, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
pub use error::{ClientError, Result};
pub use http::HttpSchemaStore;
pub use memory::MemorySchemaStore;
pub use store::SchemaStore;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{ClientConfig, ClientError, HttpSchemaStore, MemorySchemaStore, SchemaStore};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
