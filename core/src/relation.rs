//! Lazily loaded, cached relation cells for use inside models.
//!
//! Each cell resolves once on first access and then serves the cached models,
//! so a relation poked during materialization costs no further round-trip.
//!
//! ```ignore
//! impl Relations for Post {
//!     fn relation(&self, name: &str) -> Result<Related<'_>> {
//!         match name {
//!             "user" => Ok(Related::one(self.user()?)),
//!             "categories" => Ok(Related::many(self.categories()?)),
//!             _ => Err(Self::unknown_relation(name)),
//!         }
//!     }
//! }
//! ```

use std::cell::OnceCell;

use crate::error::Result;
use crate::model::Model;
use crate::query::{Query, Select};
use crate::remote::RemoteObject;
use crate::value::Value;

fn hydrate<O: RemoteObject>(object: O, use_master_key: bool) -> Result<O> {
    if object.is_data_available() {
        Ok(object)
    } else {
        crate::strata_trace_fetch!("fetch", object.class_name(), use_master_key);
        Ok(object.fetch(use_master_key)?)
    }
}

/// A pointer attribute on the parent record.
pub struct BelongsTo<M> {
    key: &'static str,
    cell: OnceCell<Option<M>>,
}

impl<M: Model> BelongsTo<M> {
    pub const fn new(key: &'static str) -> Self {
        Self {
            key,
            cell: OnceCell::new(),
        }
    }

    pub const fn key(&self) -> &'static str {
        self.key
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }

    pub fn get(&self, parent: &M::Object, use_master_key: bool) -> Result<Option<&M>> {
        if let Some(loaded) = self.cell.get() {
            return Ok(loaded.as_ref());
        }

        let related = match parent.get(self.key) {
            Some(Value::Object(object)) => {
                let object = hydrate(object, use_master_key)?;
                Some(M::from_object(object, use_master_key))
            }
            _ => None,
        };

        Ok(self.cell.get_or_init(|| related).as_ref())
    }
}

/// Child records whose `foreign_key` points back at the parent.
///
/// Array-valued foreign keys match when they contain the parent.
pub struct HasMany<M> {
    foreign_key: &'static str,
    cell: OnceCell<Vec<M>>,
}

impl<M: Model> HasMany<M> {
    pub const fn new(foreign_key: &'static str) -> Self {
        Self {
            foreign_key,
            cell: OnceCell::new(),
        }
    }

    pub const fn foreign_key(&self) -> &'static str {
        self.foreign_key
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }

    pub fn get(&self, parent: &M::Object, use_master_key: bool) -> Result<&[M]> {
        if let Some(loaded) = self.cell.get() {
            return Ok(loaded);
        }

        let related = if parent.object_id().is_none() {
            Vec::new()
        } else {
            self.query(parent, use_master_key).get(Select::All)?
        };

        Ok(self.cell.get_or_init(|| related))
    }

    /// The unexecuted query behind this relation.
    pub fn query(&self, parent: &M::Object, use_master_key: bool) -> Query<M> {
        Query::on_store_of(parent, use_master_key)
            .where_eq(self.foreign_key, Value::Object(parent.clone()))
    }
}

/// An array of pointers on the parent record.
pub struct BelongsToMany<M> {
    key: &'static str,
    cell: OnceCell<Vec<M>>,
}

impl<M: Model> BelongsToMany<M> {
    pub const fn new(key: &'static str) -> Self {
        Self {
            key,
            cell: OnceCell::new(),
        }
    }

    pub const fn key(&self) -> &'static str {
        self.key
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }

    pub fn get(&self, parent: &M::Object, use_master_key: bool) -> Result<&[M]> {
        if let Some(loaded) = self.cell.get() {
            return Ok(loaded);
        }

        let mut related = Vec::new();
        if let Some(Value::Array(items)) = parent.get(self.key) {
            for item in items {
                if let Value::Object(object) = item {
                    let object = hydrate(object, use_master_key)?;
                    related.push(M::from_object(object, use_master_key));
                }
            }
        }

        Ok(self.cell.get_or_init(|| related))
    }
}
