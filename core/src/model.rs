//! Typed models over remote records.

use crate::error::{Result, StrataError};
use crate::remote::RemoteObject;
use crate::value::Value;

/// The remote query type backing a model.
pub type RemoteQueryOf<M> = <<M as Model>::Object as RemoteObject>::Query;

/// Lazy relation access, object-safe so relation graphs can mix model types.
pub trait Relations {
    /// Resolves the relation `name`, loading it on first access.
    fn relation(&self, name: &str) -> Result<Related<'_>>;
}

/// Shape of a resolved relation.
pub enum Related<'a> {
    /// Unset pointer or a relation without a target.
    None,
    One(&'a dyn Relations),
    Many(Vec<&'a dyn Relations>),
}

impl<'a> Related<'a> {
    pub fn one<M: Relations>(model: Option<&'a M>) -> Self {
        match model {
            Some(m) => Self::One(m),
            None => Self::None,
        }
    }

    pub fn many<M: Relations>(models: &'a [M]) -> Self {
        Self::Many(models.iter().map(|m| m as &dyn Relations).collect())
    }

    /// Number of models reached by this relation.
    pub fn len(&self) -> usize {
        match self {
            Self::None => 0,
            Self::One(_) => 1,
            Self::Many(members) => members.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A typed wrapper around one remote record.
pub trait Model: Relations + Sized {
    type Object: RemoteObject;

    /// Remote collection this model is stored in.
    const CLASS_NAME: &'static str;

    /// Wraps a fetched (or freshly built) record.
    fn from_object(object: Self::Object, use_master_key: bool) -> Self;

    fn object(&self) -> &Self::Object;

    fn object_mut(&mut self) -> &mut Self::Object;

    /// Whether remote calls made on behalf of this model use elevated access.
    fn uses_master_key(&self) -> bool;

    /// Identifier used in diagnostics such as [`StrataError::ModelNotFound`].
    fn model_name() -> &'static str {
        core::any::type_name::<Self>()
    }

    fn id(&self) -> Option<&str> {
        self.object().object_id()
    }

    fn get(&self, key: &str) -> Option<Value<Self::Object>> {
        self.object().get(key)
    }

    fn set(&mut self, key: &str, value: Value<Self::Object>) {
        self.object_mut().set(key, value);
    }

    fn save(&mut self) -> Result<()> {
        let use_master_key = self.uses_master_key();
        self.object_mut().save(use_master_key)?;
        Ok(())
    }

    /// The error a [`Relations`] impl reports for a name it does not know.
    fn unknown_relation(name: &str) -> StrataError {
        StrataError::UnknownRelation {
            model: Self::model_name(),
            relation: name.to_owned(),
        }
    }
}
