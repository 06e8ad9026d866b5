//! Terminal lookups: `first`, `get`, `find` and their fallbacks.

use crate::error::{Result, StrataError};
use crate::model::Model;
use crate::remote::RemoteQuery;
use crate::value::IntoValue;

use super::{Query, Select};

pub(crate) const OBJECT_ID: &str = "objectId";

impl<M: Model> Query<M> {
    /// Forwards a projection unless it is the wildcard.
    pub(crate) fn apply_select(&mut self, select: Select) -> Result<()> {
        if let Some(keys) = select.into_keys() {
            self.remote.select(keys)?;
        }
        Ok(())
    }

    /// Number of matching records.
    pub fn count(&self) -> Result<usize> {
        crate::strata_trace_fetch!("count", self.class_name, self.use_master_key);
        Ok(self.remote.count(self.use_master_key)?)
    }

    /// First matching record, if any.
    pub fn first(mut self, select: impl Into<Select>) -> Result<Option<M>> {
        self.apply_select(select.into())?;

        crate::strata_trace_fetch!("first", self.class_name, self.use_master_key);
        match self.remote.first(self.use_master_key)? {
            Some(object) => self.create_model(object).map(Some),
            None => Ok(None),
        }
    }

    pub fn first_or_fail(self, select: impl Into<Select>) -> Result<M> {
        self.first(select)?
            .ok_or(StrataError::ModelNotFound(M::model_name()))
    }

    /// First record matching `attributes`, or an unsaved model carrying them.
    pub fn first_or_new<I, K, V>(self, attributes: I) -> Result<M>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: IntoValue<M::Object>,
    {
        let attributes: Vec<(String, _)> = attributes
            .into_iter()
            .map(|(k, v)| (k.into(), v.into_value()))
            .collect();

        let blank = self.blank();
        let use_master_key = self.use_master_key;

        if let Some(record) = self.where_map(attributes.clone()).first(Select::All)? {
            return Ok(record);
        }

        let object = blank.remote.create_object(attributes);
        Ok(M::from_object(object, use_master_key))
    }

    /// Like [`first_or_new`](Self::first_or_new), saving the new model.
    pub fn first_or_create<I, K, V>(self, attributes: I) -> Result<M>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: IntoValue<M::Object>,
    {
        let mut record = self.first_or_new(attributes)?;

        if record.id().is_none() {
            record.save()?;
        }

        Ok(record)
    }

    /// All matching records, in remote order.
    pub fn get(mut self, select: impl Into<Select>) -> Result<Vec<M>> {
        self.apply_select(select.into())?;

        crate::strata_trace_fetch!("find", self.class_name, self.use_master_key);
        let objects = self.remote.find(self.use_master_key)?;
        self.create_models(objects)
    }

    pub fn find(self, object_id: &str, select: impl Into<Select>) -> Result<Option<M>> {
        self.where_eq(OBJECT_ID, object_id).first(select)
    }

    pub fn find_or_fail(self, object_id: &str, select: impl Into<Select>) -> Result<M> {
        self.where_eq(OBJECT_ID, object_id).first_or_fail(select)
    }

    /// The record with `object_id`, or a blank unsaved model.
    pub fn find_or_new(self, object_id: &str, select: impl Into<Select>) -> Result<M> {
        let blank = self.blank();

        match self.find(object_id, select)? {
            Some(record) => Ok(record),
            None => {
                let object = blank.remote.create_object(Vec::new());
                Ok(M::from_object(object, blank.use_master_key))
            }
        }
    }
}

