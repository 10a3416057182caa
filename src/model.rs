//! The generic model bound to a single collection.

use std::marker::PhantomData;

use bson::{Document, de::deserialize_from_document, ser::serialize_to_document};
use futures::TryStreamExt;
use mongodb::{Collection, Database};
use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;

use crate::{
    error::{ModelError, ModelResult},
    options::{FindOneOptions, FindOptions, Merge, ModelOptions, UpdateOptions},
};

/// An ordered sequence of aggregation stages, forwarded to the server verbatim.
pub type Pipeline = Vec<Document>;

/// A typed CRUD and aggregation surface over one collection.
///
/// `T` is the stored document type; `C` is an independent result type used
/// only for decoding aggregation output (it defaults to a raw [`Document`]).
/// Resolving each operation per concrete instantiation keeps decoding free of
/// runtime type inspection.
///
/// The collection handle is resolved once at construction and reused for
/// every call, and the model holds no mutable state, so one instance can be
/// shared freely across concurrent callers.
///
/// # Example
///
/// ```ignore
/// use docmodel::{Connector, Model};
/// use bson::doc;
/// use serde::{Serialize, Deserialize};
///
/// #[derive(Debug, Clone, Serialize, Deserialize)]
/// struct User {
///     #[serde(rename = "_id")]
///     id: String,
///     name: String,
/// }
///
/// # async fn example() -> docmodel::ModelResult<()> {
/// let conn = Connector::new("mongodb://localhost:27017", "app").connect().await?;
/// let users: Model<User> = Model::new(conn.database(), "users");
///
/// users.create(&User { id: "1".into(), name: "Alice".into() }).await?;
/// let alice = users.find_one(doc! { "name": "Alice" }, None).await?;
/// # conn.shutdown().await;
/// # Ok(()) }
/// ```
#[derive(Debug, Clone)]
pub struct Model<T, C = Document> {
    name: String,
    collection: Collection<Document>,
    defaults: ModelOptions,
    _marker: PhantomData<(T, C)>,
}

impl<T, C> Model<T, C>
where
    T: Serialize + DeserializeOwned + Send + Sync,
    C: DeserializeOwned + Send + Sync,
{
    /// Create a model bound to the named collection.
    pub fn new(database: &Database, name: &str) -> Self {
        Self::with_defaults(database, name, ModelOptions::default())
    }

    /// Create a model with base options merged under every call's overrides.
    pub fn with_defaults(database: &Database, name: &str, defaults: ModelOptions) -> Self {
        Self {
            name: name.to_string(),
            collection: database.collection(name),
            defaults,
            _marker: PhantomData,
        }
    }

    /// Returns the bound collection name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Retrieve the first document matching the filter, decoded into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::NotFound`] when nothing matches and
    /// [`ModelError::Decode`] when the stored shape cannot populate `T`.
    pub async fn find_one(
        &self,
        filter: Document,
        options: Option<FindOneOptions>,
    ) -> ModelResult<T> {
        debug!(collection = %self.name, "executing find_one");

        let options = self
            .defaults
            .find_one
            .clone()
            .overlay(options.unwrap_or_default());

        let document = self
            .collection
            .find_one(filter)
            .with_options(options.to_driver())
            .await
            .map_err(|e| ModelError::from_driver("find_one", &self.name, e))?
            .ok_or_else(|| ModelError::NotFound {
                collection: self.name.clone(),
            })?;

        deserialize_from_document(document).map_err(|e| ModelError::Decode {
            operation: "find_one",
            source: e,
        })
    }

    /// Retrieve every document matching the filter, in store-iteration order.
    ///
    /// Zero matches are an empty `Vec`, not an error.
    pub async fn find_many(
        &self,
        filter: Document,
        options: Option<FindOptions>,
    ) -> ModelResult<Vec<T>> {
        debug!(collection = %self.name, "executing find_many");

        let options = self
            .defaults
            .find
            .clone()
            .overlay(options.unwrap_or_default());

        self.collection
            .find(filter)
            .with_options(options.to_driver())
            .await
            .map_err(|e| ModelError::from_driver("find_many", &self.name, e))?
            .try_collect::<Vec<Document>>()
            .await
            .map_err(|e| ModelError::from_driver("find_many", &self.name, e))?
            .into_iter()
            .map(|document| {
                deserialize_from_document(document).map_err(|e| ModelError::Decode {
                    operation: "find_many",
                    source: e,
                })
            })
            .collect()
    }

    /// Insert one document, unmodified.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Conflict`] when the server reports a duplicate
    /// key and [`ModelError::Serialization`] when `T` cannot be encoded.
    pub async fn create(&self, document: &T) -> ModelResult<()> {
        debug!(collection = %self.name, "executing create");

        self.collection
            .insert_one(serialize_to_document(document)?)
            .await
            .map_err(|e| ModelError::from_driver("create", &self.name, e))?;

        Ok(())
    }

    /// Apply the update to the first document matching the filter.
    ///
    /// Succeeds even when zero documents match; matched counts are not
    /// surfaced. A caller that needs to know whether anything changed checks
    /// independently via [`Model::find_one`] or [`Model::find_many`].
    pub async fn update_one(
        &self,
        filter: Document,
        update: Document,
        options: Option<UpdateOptions>,
    ) -> ModelResult<()> {
        debug!(collection = %self.name, "executing update_one");

        let options = self
            .defaults
            .update
            .overlay(options.unwrap_or_default());

        self.collection
            .update_one(filter, update)
            .with_options(options.to_driver())
            .await
            .map_err(|e| ModelError::from_driver("update_one", &self.name, e))?;

        Ok(())
    }

    /// Apply the update to every document matching the filter.
    pub async fn update_many(
        &self,
        filter: Document,
        update: Document,
        options: Option<UpdateOptions>,
    ) -> ModelResult<()> {
        debug!(collection = %self.name, "executing update_many");

        let options = self
            .defaults
            .update
            .overlay(options.unwrap_or_default());

        self.collection
            .update_many(filter, update)
            .with_options(options.to_driver())
            .await
            .map_err(|e| ModelError::from_driver("update_many", &self.name, e))?;

        Ok(())
    }

    /// Remove the first document matching the filter.
    ///
    /// Succeeds even when zero documents match, mirroring the update
    /// operations.
    pub async fn delete_one(&self, filter: Document) -> ModelResult<()> {
        debug!(collection = %self.name, "executing delete_one");

        self.collection
            .delete_one(filter)
            .await
            .map_err(|e| ModelError::from_driver("delete_one", &self.name, e))?;

        Ok(())
    }

    /// Remove every document matching the filter.
    pub async fn delete_many(&self, filter: Document) -> ModelResult<()> {
        debug!(collection = %self.name, "executing delete_many");

        self.collection
            .delete_many(filter)
            .await
            .map_err(|e| ModelError::from_driver("delete_many", &self.name, e))?;

        Ok(())
    }

    /// Execute the ordered pipeline and decode each output row into `C`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Execution`] when the server rejects the
    /// pipeline, [`ModelError::Decode`] when a row cannot populate `C`, and
    /// [`ModelError::EmptyResult`] when execution succeeds with zero rows.
    /// The empty case is deliberately an error, unlike [`Model::find_many`],
    /// so callers can tell "ran and produced nothing" apart at the call site.
    pub async fn aggregate(&self, pipeline: Pipeline) -> ModelResult<Vec<C>> {
        debug!(collection = %self.name, stages = pipeline.len(), "executing aggregate");

        let results = self
            .collection
            .aggregate(pipeline)
            .await
            .map_err(|e| ModelError::from_driver("aggregate", &self.name, e))?
            .try_collect::<Vec<Document>>()
            .await
            .map_err(|e| ModelError::from_driver("aggregate", &self.name, e))?
            .into_iter()
            .map(|document| {
                deserialize_from_document(document).map_err(|e| ModelError::Decode {
                    operation: "aggregate",
                    source: e,
                })
            })
            .collect::<ModelResult<Vec<C>>>()?;

        if results.is_empty() {
            return Err(ModelError::EmptyResult {
                collection: self.name.clone(),
            });
        }

        Ok(results)
    }
}
