//! In-process backend for `strata-core`.
//!
//! [`MemoryStore`] keeps collections of documents behind a shared handle and
//! evaluates [`MemoryQuery`] predicates locally. Every remote call is recorded
//! in a journal, and faults can be queued per operation with
//! [`MemoryStore::fail_next`].
//!
//! ```ignore
//! let store = MemoryStore::new();
//! store.insert("Post", json!({"title": "hello"}))?;
//!
//! let posts: Vec<Post> = store.query::<Post>().where_eq("title", "hello").get(Select::All)?;
//! ```

mod error;
mod object;
mod query;
mod store;

pub use error::MemoryError;
pub use object::MemoryObject;
pub use query::MemoryQuery;
pub use store::{Call, MemoryStore, Op};
