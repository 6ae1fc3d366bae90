//! # Tessera
//!
//! Connection descriptors and session lifecycle for document databases.
//!
//! Tessera provides:
//! - A structured connection profile that derives a canonical connection URI
//! - An explicit-URI override that bypasses derivation entirely
//! - A connection handle with database and collection selection
//! - Reopening a session with extra URI parameters
//! - A MongoDB driver built on the official client (feature `mongodb`)
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tessera::prelude::*;
//! use tessera::mongodb::MongoDriver;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), tessera::TesseraError> {
//!     let settings = Settings::load_or_default("tessera.toml")?;
//!     let descriptor = settings.connection_config().descriptor()?;
//!
//!     let handle = ConnectionHandle::new(Arc::new(MongoDriver::default()), descriptor);
//!     handle.open().await?;
//!     handle.select_database("app")?;
//!     handle.select_collection("users")?;
//!
//!     handle.close().await
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// Core connection types.
pub mod core {
    pub use tessera_core::*;
}

/// MongoDB driver.
#[cfg(feature = "mongodb")]
#[cfg_attr(docsrs, doc(cfg(feature = "mongodb")))]
pub mod mongodb {
    pub use tessera_mongodb::*;
}

/// Prelude module for convenient imports.
pub mod prelude {
    pub use tessera_core::prelude::*;

    #[cfg(feature = "mongodb")]
    pub use tessera_mongodb::{MongoDriver, ObjectId};
}

// Re-export key types at the crate root
pub use tessera_core::{
    ConnectionConfig, ConnectionDescriptor, ConnectionDescriptorBuilder, ConnectionHandle,
    DocumentDriver, Settings, TesseraError, TesseraResult,
};
