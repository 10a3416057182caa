//! A typed CRUD and aggregation model layer over MongoDB collections.
//!
//! This crate gives calling code a uniform, compile-time-checked contract
//! over one collection: a [`Model`] is generic over the stored document type
//! and an independent aggregation-result type, so callers never write ad-hoc
//! untyped queries and never fall back on runtime type inspection.
//!
//! Three pieces make up the whole crate:
//!
//! - **[`Connector`]** ([`connector`]) - builds a client from a connection
//!   string and returns an owned [`Connection`] bound to one database
//! - **[`Model`]** ([`model`]) - the per-collection CRUD + aggregation surface
//! - **Options** ([`options`]) - per-operation option structs with one
//!   explicit field-level merge rule
//!
//! # Quick Start
//!
//! ```ignore
//! use docmodel::{Connector, Model};
//! use bson::doc;
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! struct User {
//!     #[serde(rename = "_id")]
//!     id: String,
//!     name: String,
//!     age: i32,
//! }
//!
//! #[derive(Debug, Deserialize)]
//! struct NameOnly {
//!     name: String,
//! }
//!
//! #[tokio::main]
//! async fn main() -> docmodel::ModelResult<()> {
//!     let conn = Connector::new("mongodb://localhost:27017", "app")
//!         .connect()
//!         .await?;
//!
//!     let users: Model<User, NameOnly> = Model::new(conn.database(), "users");
//!
//!     users.create(&User { id: "1".into(), name: "Alice".into(), age: 30 }).await?;
//!
//!     let alice = users.find_one(doc! { "name": "Alice" }, None).await?;
//!     println!("found {}", alice.name);
//!
//!     let names = users
//!         .aggregate(vec![doc! { "$project": { "name": 1 } }])
//!         .await?;
//!     println!("{} projected rows", names.len());
//!
//!     // The client is never released implicitly.
//!     conn.shutdown().await;
//!     Ok(())
//! }
//! ```
//!
//! # Zero-match semantics
//!
//! The three read shapes deliberately differ: [`Model::find_one`] returns
//! [`ModelError::NotFound`], [`Model::find_many`] returns an empty `Vec`,
//! and [`Model::aggregate`] returns [`ModelError::EmptyResult`]. Callers
//! must not assume uniform "nothing found" behavior across them.

pub mod connector;
pub mod error;
pub mod model;
pub mod options;

pub use connector::{Connection, Connector};
pub use error::{ModelError, ModelResult};
pub use model::{Model, Pipeline};
pub use options::{
    DatabaseConfig, FindOneOptions, FindOptions, Merge, ModelOptions, UpdateOptions,
};

// Re-export BSON types for convenience
pub use bson;
