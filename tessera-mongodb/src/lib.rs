//! # tessera-mongodb
//!
//! MongoDB implementation of the Tessera [`DocumentDriver`](tessera_core::DocumentDriver).
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tessera_core::{ConnectionConfig, ConnectionHandle};
//! use tessera_mongodb::MongoDriver;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let descriptor = ConnectionConfig::builder()
//!         .username("app")
//!         .password("s3cret")
//!         .host("localhost:27017")
//!         .login_database("admin")
//!         .build()
//!         .descriptor()?;
//!
//!     let handle = ConnectionHandle::new(Arc::new(MongoDriver::default()), descriptor);
//!     handle.open().await?;
//!     handle.select_database("app")?;
//!     handle.select_collection("users")?;
//!
//!     let users = handle.collection()?.expect("collection selected");
//!     let id = handle.to_object_id("507f1f77bcf86cd799439011")?;
//!     users.find_one(bson::doc! { "_id": id }, None).await?;
//!
//!     handle.close().await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod driver;
pub mod error;

pub use bson::oid::ObjectId;
pub use bson::{Bson, Document, doc};
pub use config::MongoDriverConfig;
pub use driver::{MongoDriver, MongoDriverBuilder};
pub use error::{MongoError, MongoResult};
