//! Core query and model layer for remote document stores.
//!
//! Backends implement [`RemoteQuery`] and [`RemoteObject`]; applications
//! implement [`Model`] and [`Relations`] for their record types and build
//! queries with [`Query`].

pub mod config;
pub mod error;
pub mod model;
pub mod pagination;
pub mod query;
pub mod relation;
pub mod remote;
#[doc(hidden)]
pub mod trace;
pub mod value;

// Re-export key types and traits
pub use config::{Config, ConfigError};
pub use error::{Result, StrataError};
pub use model::{Model, Related, Relations, RemoteQueryOf};
pub use pagination::{
    LengthAwarePaginator, NoRequestContext, PageLinks, PageResolver, Paginator,
    StaticPageResolver,
};
pub use query::{ChunkControl, Direction, Operator, OrOperand, Query, QueryContext, Select};
pub use relation::{BelongsTo, BelongsToMany, HasMany};
pub use remote::{Attributes, BoxError, RemoteObject, RemoteQuery, RemoteResult};
pub use value::{IntoValue, Value};
