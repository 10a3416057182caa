//! Per-operation option structs and the rule for merging them.
//!
//! Each struct recognizes a fixed set of fields and converts to its driver
//! counterpart by copying only the fields that were set. Layering follows a
//! single rule, [`Merge::overlay`]: a field set in the overriding layer
//! replaces the base value, an unset field leaves the base untouched. Folding
//! layers left to right therefore makes the last supplied value win.

use bson::Document;
use mongodb::options::{ReadConcern, SelectionCriteria, WriteConcern};

/// Field-level "last supplied value wins" merging of option layers.
pub trait Merge: Default + Sized {
    /// Returns `self` with every field that is set in `other` replaced by
    /// `other`'s value.
    fn overlay(self, other: Self) -> Self;

    /// Folds a sequence of layers over the default (empty) options.
    ///
    /// Zero layers yield the default; with several layers, later ones
    /// override earlier ones field by field.
    fn merged(layers: impl IntoIterator<Item = Self>) -> Self {
        layers.into_iter().fold(Self::default(), Self::overlay)
    }
}

fn replace<T>(base: Option<T>, over: Option<T>) -> Option<T> {
    over.or(base)
}

/// Options recognized by [`Model::find_one`](crate::Model::find_one).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindOneOptions {
    /// Sort order applied before the first match is taken.
    pub sort: Option<Document>,
    /// Field projection applied to the returned document.
    pub projection: Option<Document>,
    /// Number of matching documents to skip.
    pub skip: Option<u64>,
}

impl FindOneOptions {
    /// Set the sort order.
    pub fn sort(mut self, sort: Document) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Set the field projection.
    pub fn projection(mut self, projection: Document) -> Self {
        self.projection = Some(projection);
        self
    }

    /// Set the number of documents to skip.
    pub fn skip(mut self, skip: u64) -> Self {
        self.skip = Some(skip);
        self
    }

    pub(crate) fn to_driver(&self) -> mongodb::options::FindOneOptions {
        let mut options = mongodb::options::FindOneOptions::default();
        options.sort = self.sort.clone();
        options.projection = self.projection.clone();
        options.skip = self.skip;
        options
    }
}

impl Merge for FindOneOptions {
    fn overlay(self, other: Self) -> Self {
        Self {
            sort: replace(self.sort, other.sort),
            projection: replace(self.projection, other.projection),
            skip: replace(self.skip, other.skip),
        }
    }
}

/// Options recognized by [`Model::find_many`](crate::Model::find_many).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindOptions {
    /// Sort order of the returned sequence.
    pub sort: Option<Document>,
    /// Field projection applied to every returned document.
    pub projection: Option<Document>,
    /// Number of matching documents to skip.
    pub skip: Option<u64>,
    /// Maximum number of documents to return.
    pub limit: Option<i64>,
}

impl FindOptions {
    /// Set the sort order.
    pub fn sort(mut self, sort: Document) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Set the field projection.
    pub fn projection(mut self, projection: Document) -> Self {
        self.projection = Some(projection);
        self
    }

    /// Set the number of documents to skip.
    pub fn skip(mut self, skip: u64) -> Self {
        self.skip = Some(skip);
        self
    }

    /// Set the maximum number of documents to return.
    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub(crate) fn to_driver(&self) -> mongodb::options::FindOptions {
        let mut options = mongodb::options::FindOptions::default();
        options.sort = self.sort.clone();
        options.projection = self.projection.clone();
        options.skip = self.skip;
        options.limit = self.limit;
        options
    }
}

impl Merge for FindOptions {
    fn overlay(self, other: Self) -> Self {
        Self {
            sort: replace(self.sort, other.sort),
            projection: replace(self.projection, other.projection),
            skip: replace(self.skip, other.skip),
            limit: replace(self.limit, other.limit),
        }
    }
}

/// Options recognized by the update operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOptions {
    /// Insert a new document when no document matches the filter.
    pub upsert: Option<bool>,
}

impl UpdateOptions {
    /// Enable or disable upsert behavior.
    pub fn upsert(mut self, upsert: bool) -> Self {
        self.upsert = Some(upsert);
        self
    }

    pub(crate) fn to_driver(&self) -> mongodb::options::UpdateOptions {
        let mut options = mongodb::options::UpdateOptions::default();
        options.upsert = self.upsert;
        options
    }
}

impl Merge for UpdateOptions {
    fn overlay(self, other: Self) -> Self {
        Self {
            upsert: replace(self.upsert, other.upsert),
        }
    }
}

/// Model-level base options, merged under each call's overrides.
#[derive(Debug, Clone, Default)]
pub struct ModelOptions {
    /// Base options for `find_one`.
    pub find_one: FindOneOptions,
    /// Base options for `find_many`.
    pub find: FindOptions,
    /// Base options for `update_one` and `update_many`.
    pub update: UpdateOptions,
}

/// Database-level configuration applied when the connector obtains the
/// database handle.
#[derive(Debug, Clone, Default)]
pub struct DatabaseConfig {
    /// Read concern for every operation issued through the handle.
    pub read_concern: Option<ReadConcern>,
    /// Write concern for every operation issued through the handle.
    pub write_concern: Option<WriteConcern>,
    /// Server selection criteria (read preference).
    pub selection_criteria: Option<SelectionCriteria>,
}

impl DatabaseConfig {
    /// Set the read concern.
    pub fn read_concern(mut self, concern: ReadConcern) -> Self {
        self.read_concern = Some(concern);
        self
    }

    /// Set the write concern.
    pub fn write_concern(mut self, concern: WriteConcern) -> Self {
        self.write_concern = Some(concern);
        self
    }

    /// Set the server selection criteria.
    pub fn selection_criteria(mut self, criteria: SelectionCriteria) -> Self {
        self.selection_criteria = Some(criteria);
        self
    }

    pub(crate) fn to_driver(&self) -> mongodb::options::DatabaseOptions {
        let mut options = mongodb::options::DatabaseOptions::default();
        options.read_concern = self.read_concern.clone();
        options.write_concern = self.write_concern.clone();
        options.selection_criteria = self.selection_criteria.clone();
        options
    }
}
