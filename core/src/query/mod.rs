//! Query API.
//!
//! The pipeline: a [`Query`] accumulates constraints, ordering and include
//! paths on a wrapped [`RemoteQuery`](crate::RemoteQuery). A terminal
//! operation (`first`, `get`, `paginate`, `simple_paginate`, `chunk_by_id`,
//! `count`) issues the remote fetches, and the materializer turns raw records
//! into models, eagerly resolving every path passed to [`Query::with`].

mod builder;
mod chunk;
mod find;
mod materialize;
mod operator;
mod paginate;
mod select;

use std::sync::Arc;

use crate::config::Config;
use crate::pagination::{NoRequestContext, PageResolver};

pub use builder::{OrOperand, Query};
pub use chunk::ChunkControl;
pub use operator::{Direction, Operator};
pub use select::Select;

/// Configuration and page source shared by every query built from it.
#[derive(Clone)]
pub struct QueryContext {
    config: Arc<Config>,
    resolver: Arc<dyn PageResolver>,
}

impl QueryContext {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            resolver: Arc::new(NoRequestContext),
        }
    }

    /// Replaces the page source used by `paginate` and `simple_paginate`.
    pub fn with_resolver(mut self, resolver: impl PageResolver + 'static) -> Self {
        self.resolver = Arc::new(resolver);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn resolver(&self) -> &dyn PageResolver {
        self.resolver.as_ref()
    }
}

impl Default for QueryContext {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl core::fmt::Debug for QueryContext {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("QueryContext")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
