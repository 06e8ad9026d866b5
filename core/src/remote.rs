//! Contracts for the remote object store.
//!
//! A backend provides a record handle ([`RemoteObject`]) and a composable
//! query ([`RemoteQuery`]). The query layer in this crate only talks to a
//! store through these two traits.

use crate::value::Value;

/// Opaque error raised by a backend. Passed through to callers untouched.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type for backend calls.
pub type RemoteResult<T> = core::result::Result<T, BoxError>;

/// Ordered attribute list used when constructing records.
pub type Attributes<O> = Vec<(String, Value<O>)>;

/// One raw record (document) in a remote collection.
pub trait RemoteObject: Clone + Sized {
    /// Query type for the store this record lives in.
    type Query: RemoteQuery<Object = Self>;

    /// Collection the record belongs to.
    fn class_name(&self) -> &str;

    /// Collection-scoped identifier, `None` until the record is saved.
    fn object_id(&self) -> Option<&str>;

    /// Reads an attribute. `objectId` resolves to the identifier.
    fn get(&self, key: &str) -> Option<Value<Self>>;

    /// Sets an attribute locally; persisted on the next [`save`](Self::save).
    fn set(&mut self, key: &str, value: Value<Self>);

    /// Whether attribute data is present, as opposed to a bare pointer.
    fn is_data_available(&self) -> bool;

    /// Loads the full record behind this handle.
    fn fetch(&self, use_master_key: bool) -> RemoteResult<Self>;

    /// Persists the record, assigning an identifier when it has none.
    fn save(&mut self, use_master_key: bool) -> RemoteResult<()>;

    /// A fresh query against `class_name` on the same store.
    fn query_for(&self, class_name: &str) -> Self::Query;
}

/// A composable query against one remote collection.
///
/// `Clone` must deep-copy all predicate state: a clone and its original
/// evolve independently.
pub trait RemoteQuery: Clone + Sized {
    type Object: RemoteObject<Query = Self>;

    /// Collection this query targets.
    fn class_name(&self) -> &str;

    /// A new, unconstrained query on the same collection and store.
    fn fresh(&self) -> Self;

    /// Builds an unsaved record of this query's collection.
    fn create_object(&self, attributes: Attributes<Self::Object>) -> Self::Object;

    fn equal_to(&mut self, key: &str, value: Value<Self::Object>);
    fn not_equal_to(&mut self, key: &str, value: Value<Self::Object>);
    fn greater_than(&mut self, key: &str, value: Value<Self::Object>);
    fn greater_than_or_equal_to(&mut self, key: &str, value: Value<Self::Object>);
    fn less_than(&mut self, key: &str, value: Value<Self::Object>);
    fn less_than_or_equal_to(&mut self, key: &str, value: Value<Self::Object>);
    fn contained_in(&mut self, key: &str, values: Vec<Value<Self::Object>>);
    fn exists(&mut self, key: &str);
    fn does_not_exist(&mut self, key: &str);

    /// `key` points at a record matched by `query`.
    fn matches_query(&mut self, key: &str, query: Self);
    fn does_not_match_query(&mut self, key: &str, query: Self);

    /// `key` equals the `query_key` attribute of some record matched by `query`.
    fn matches_key_in_query(&mut self, key: &str, query_key: &str, query: Self);
    fn does_not_match_key_in_query(&mut self, key: &str, query_key: &str, query: Self);

    /// Replaces the sort order with `key` ascending.
    fn ascending(&mut self, key: &str);
    /// Replaces the sort order with `key` descending.
    fn descending(&mut self, key: &str);

    /// Restricts returned attributes. Keys accumulate across calls.
    fn select(&mut self, keys: Vec<String>) -> RemoteResult<()>;

    /// Hydrates the pointer (or dot-separated pointer path) `key` in results.
    fn include_key(&mut self, key: &str);

    fn limit(&mut self, n: usize);
    fn skip(&mut self, n: usize);

    /// Number of matching records, ignoring limit and skip.
    fn count(&self, use_master_key: bool) -> RemoteResult<usize>;
    fn find(&self, use_master_key: bool) -> RemoteResult<Vec<Self::Object>>;
    fn first(&self, use_master_key: bool) -> RemoteResult<Option<Self::Object>>;

    /// Logical OR over `queries`, all of which target the same collection.
    fn or_queries(queries: Vec<Self>) -> RemoteResult<Self>;
}
