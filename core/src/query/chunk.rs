//! Cursor-based batch iteration.

use core::ops::ControlFlow;

use crate::error::Result;
use crate::model::Model;
use crate::remote::RemoteQuery;
use crate::value::Value;

use super::Query;
use super::find::OBJECT_ID;

/// What a chunk callback may return.
///
/// `()` and `true` continue, `false` stops. `Result` lets the callback fail
/// the whole iteration.
pub trait ChunkControl {
    fn into_continue(self) -> Result<bool>;
}

impl ChunkControl for () {
    #[inline]
    fn into_continue(self) -> Result<bool> {
        Ok(true)
    }
}

impl ChunkControl for bool {
    #[inline]
    fn into_continue(self) -> Result<bool> {
        Ok(self)
    }
}

impl ChunkControl for ControlFlow<()> {
    #[inline]
    fn into_continue(self) -> Result<bool> {
        Ok(self.is_continue())
    }
}

impl<T: ChunkControl> ChunkControl for Result<T> {
    fn into_continue(self) -> Result<bool> {
        self?.into_continue()
    }
}

impl<M: Model> Query<M> {
    /// [`chunk_by_id`](Self::chunk_by_id) over the configured chunk column.
    pub fn chunk<F, R>(&self, count: usize, callback: F) -> Result<bool>
    where
        F: FnMut(Vec<M>) -> R,
        R: ChunkControl,
    {
        let column = self.context.config().chunk_column.clone();
        self.chunk_by_id(count, callback, &column, None)
    }

    /// Feeds the whole result set to `callback` in batches of `count`,
    /// ordered ascending by `column`.
    ///
    /// Returns `Ok(true)` once the data runs out and `Ok(false)` when the
    /// callback asks to stop. Each batch is fetched only after the previous
    /// callback returned.
    ///
    /// When `alias` differs from `column` and the builder already restricts
    /// attributes with [`select`](Self::select), `column` joins that
    /// projection. Unprojected records are left whole.
    pub fn chunk_by_id<F, R>(
        &self,
        count: usize,
        mut callback: F,
        column: &str,
        alias: Option<&str>,
    ) -> Result<bool>
    where
        F: FnMut(Vec<M>) -> R,
        R: ChunkControl,
    {
        if count == 0 {
            return Ok(true);
        }

        let mut cursor: Option<Value<M::Object>> = None;

        loop {
            let mut query = self.remote.clone();
            query.ascending(column);

            if let Some(last) = cursor.take() {
                query.greater_than(column, last);
            }

            if self.projected && alias.is_some_and(|a| a != column) {
                if let Err(_e) = query.select(vec![column.to_owned()]) {
                    crate::strata_trace_event!(
                        debug,
                        "strata.chunk",
                        column = %column,
                        error = %_e,
                        "projection rejected, keeping existing selection"
                    );
                }
            }

            query.limit(count);

            crate::strata_trace_fetch!("find", self.class_name, self.use_master_key);
            let objects = query.find(self.use_master_key)?;
            let models = self.create_models(objects)?;

            if models.is_empty() {
                return Ok(true);
            }

            let batch_len = models.len();
            let next = models
                .last()
                .and_then(|last| cursor_value(last, column, alias));

            if !callback(models).into_continue()? {
                return Ok(false);
            }

            if batch_len < count {
                return Ok(true);
            }

            match next {
                Some(value) => cursor = Some(value),
                None => {
                    // Without a cursor the next fetch would start over.
                    crate::strata_trace_event!(
                        warn,
                        "strata.chunk",
                        column = %column,
                        class = %self.class_name,
                        "no cursor value on last record, stopping"
                    );
                    return Ok(false);
                }
            }
        }
    }
}

/// Cursor for the next batch: the alias attribute, then the id when walking
/// by `objectId`, then the column attribute.
fn cursor_value<M: Model>(last: &M, column: &str, alias: Option<&str>) -> Option<Value<M::Object>> {
    if let Some(value) = alias.and_then(|a| last.get(a)).filter(|v| !v.is_null()) {
        return Some(value);
    }

    if column == OBJECT_ID {
        return last.id().map(|id| Value::String(id.to_owned()));
    }

    last.get(column).filter(|v| !v.is_null())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StrataError;

    #[test]
    fn callback_return_types() {
        assert!(().into_continue().unwrap());
        assert!(true.into_continue().unwrap());
        assert!(!false.into_continue().unwrap());
        let stop: ControlFlow<()> = ControlFlow::Break(());
        let go: ControlFlow<()> = ControlFlow::Continue(());
        assert!(!stop.into_continue().unwrap());
        assert!(go.into_continue().unwrap());
        assert!(Ok::<_, StrataError>(false).into_continue().map(|c| !c).unwrap());
    }

    #[test]
    fn callback_errors_propagate() {
        let failed: Result<()> = Err(StrataError::ModelNotFound("Post"));
        assert!(matches!(
            failed.into_continue(),
            Err(StrataError::ModelNotFound("Post"))
        ));
    }
}
