//! Record-to-model conversion and eager relation loading.

use smallvec::SmallVec;

use crate::error::Result;
use crate::model::{Model, Related, Relations};

use super::Query;

type Path<'a> = SmallVec<[&'a str; 4]>;

impl<M: Model> Query<M> {
    /// Wraps `object` in `M` and resolves every include path on it.
    pub(crate) fn create_model(&self, object: M::Object) -> Result<M> {
        let model = M::from_object(object, self.use_master_key);

        for relation in &self.include_keys {
            let path: Path<'_> = relation.split('.').filter(|s| !s.is_empty()).collect();
            poke(&model, &path)?;
        }

        Ok(model)
    }

    pub(crate) fn create_models(&self, objects: Vec<M::Object>) -> Result<Vec<M>> {
        objects
            .into_iter()
            .map(|object| self.create_model(object))
            .collect()
    }
}

/// Resolves `path` starting at `node`. A collection fans the rest of the
/// path out to each of its members.
pub(crate) fn poke(node: &dyn Relations, path: &[&str]) -> Result<()> {
    let Some((head, rest)) = path.split_first() else {
        return Ok(());
    };

    match node.relation(head)? {
        Related::None => Ok(()),
        Related::One(next) => poke(next, rest),
        Related::Many(members) => members.into_iter().try_for_each(|m| poke(m, rest)),
    }
}
