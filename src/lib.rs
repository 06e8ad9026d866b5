//! # Strata
//!
//! A typed query builder and model layer for remote document stores.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use strata::prelude::*;
//! use strata::memory::{MemoryObject, MemoryStore};
//!
//! struct Post {
//!     object: MemoryObject,
//!     use_master_key: bool,
//! }
//!
//! impl Relations for Post {
//!     fn relation(&self, name: &str) -> strata::Result<Related<'_>> {
//!         Err(Self::unknown_relation(name))
//!     }
//! }
//!
//! impl Model for Post {
//!     type Object = MemoryObject;
//!     const CLASS_NAME: &'static str = "Post";
//!
//!     fn from_object(object: MemoryObject, use_master_key: bool) -> Self {
//!         Self { object, use_master_key }
//!     }
//!     fn object(&self) -> &MemoryObject { &self.object }
//!     fn object_mut(&mut self) -> &mut MemoryObject { &mut self.object }
//!     fn uses_master_key(&self) -> bool { self.use_master_key }
//! }
//!
//! # fn main() -> strata::Result<()> {
//! let store = MemoryStore::new();
//! let page = store
//!     .query::<Post>()
//!     .r#where("views", ">=", 10)?
//!     .order_by("views", Direction::Descending)
//!     .paginate(Some(20), Select::All, None, None)?;
//!
//! for post in page.items() {
//!     println!("{:?}", post.id());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Backends
//!
//! | Backend   | Crate           | Feature Flag |
//! |-----------|-----------------|--------------|
//! | In-memory | `strata-memory` | `memory`     |
//!
//! Any store can be plugged in by implementing [`RemoteQuery`] and
//! [`RemoteObject`].

// =============================================================================
// Root-level exports
// =============================================================================

/// Result type for strata operations
pub use strata_core::error::Result;

/// Error types
pub mod error {
    pub use strata_core::config::ConfigError;
    pub use strata_core::error::StrataError;
}

/// Runtime configuration, loaded from `strata.toml`.
pub use strata_core::config::{CONFIG_FILE, Config};

/// Backend contracts.
pub use strata_core::{Attributes, BoxError, RemoteObject, RemoteQuery, RemoteResult, Value};

// =============================================================================
// Query API
// =============================================================================

/// Query builder, constraint operators and result shaping.
pub mod query {
    pub use strata_core::query::{
        ChunkControl, Direction, Operator, OrOperand, Query, QueryContext, Select,
    };
}

/// Paginated result containers and page sources.
pub mod pagination {
    pub use strata_core::pagination::*;
}

/// Models and lazily loaded relations.
pub mod model {
    pub use strata_core::model::{Model, Related, Relations, RemoteQueryOf};
    pub use strata_core::relation::{BelongsTo, BelongsToMany, HasMany};
    pub use strata_core::value::IntoValue;
}

// =============================================================================
// Backends
// =============================================================================

/// In-process backend with a call journal and fault injection.
#[cfg(feature = "memory")]
pub mod memory {
    pub use strata_memory::{Call, MemoryError, MemoryObject, MemoryQuery, MemoryStore, Op};
}

// =============================================================================
// Prelude
// =============================================================================

pub mod prelude {
    pub use crate::model::{BelongsTo, BelongsToMany, HasMany, IntoValue, Model, Related, Relations};
    pub use crate::pagination::{LengthAwarePaginator, PageResolver, Paginator, StaticPageResolver};
    pub use crate::query::{Direction, Operator, OrOperand, Query, QueryContext, Select};
    pub use crate::{Config, RemoteObject, RemoteQuery, Value};
}
