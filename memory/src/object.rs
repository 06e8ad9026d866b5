use std::collections::BTreeMap;

use strata_core::{RemoteObject, RemoteResult, Value};

use crate::error::MemoryError;
use crate::query::MemoryQuery;
use crate::store::{Document, Fields, MemoryStore, Op, Pointer, Stored};

/// Attributes as held by a record handle.
pub(crate) type Attrs = BTreeMap<String, Value<MemoryObject>>;

/// A record handle into a [`MemoryStore`].
///
/// A handle is either unsaved (no id), a bare pointer (id without data) or
/// loaded (id and data).
#[derive(Clone)]
pub struct MemoryObject {
    pub(crate) store: MemoryStore,
    pub(crate) class: String,
    pub(crate) id: Option<String>,
    pub(crate) data: Option<Attrs>,
}

impl MemoryObject {
    pub(crate) fn unsaved(store: MemoryStore, class: &str, data: Attrs) -> Self {
        Self {
            store,
            class: class.to_owned(),
            id: None,
            data: Some(data),
        }
    }

    pub(crate) fn pointer(store: MemoryStore, pointer: &Pointer) -> Self {
        Self {
            store,
            class: pointer.class.clone(),
            id: Some(pointer.id.clone()),
            data: None,
        }
    }

    pub(crate) fn loaded(store: &MemoryStore, class: &str, doc: &Document, data: Attrs) -> Self {
        Self {
            store: store.clone(),
            class: class.to_owned(),
            id: Some(doc.id.clone()),
            data: Some(data),
        }
    }

    /// Handle-side attributes converted from stored fields.
    pub(crate) fn attrs(store: &MemoryStore, fields: &Fields) -> Attrs {
        fields
            .iter()
            .map(|(key, value)| (key.clone(), from_stored(store, value)))
            .collect()
    }

    /// Saves the record, returning the backend error type.
    pub fn persist(&mut self, use_master_key: bool) -> Result<(), MemoryError> {
        let fields = self
            .data
            .iter()
            .flatten()
            .map(|(key, value)| Ok((key.clone(), to_stored(value)?)))
            .collect::<Result<Fields, MemoryError>>()?;

        let mut inner = self.store.lock();
        inner.record(Op::Save, &self.class, use_master_key)?;

        match self.id.clone() {
            Some(id) => inner.update(&self.class, &id, fields)?,
            None => self.id = Some(inner.insert(&self.class, fields)),
        }

        Ok(())
    }

    /// The store this record lives in.
    pub fn store(&self) -> &MemoryStore {
        &self.store
    }
}

/// Converts a handle value into its stored form. Records are kept as
/// pointers, so they must already have an id.
pub(crate) fn to_stored(value: &Value<MemoryObject>) -> Result<Stored, MemoryError> {
    Ok(match value {
        Value::Null => Value::Null,
        Value::Bool(b) => Value::Bool(*b),
        Value::Int(n) => Value::Int(*n),
        Value::Float(f) => Value::Float(*f),
        Value::String(s) => Value::String(s.clone()),
        Value::Array(items) => Value::Array(items.iter().map(to_stored).collect::<Result<_, _>>()?),
        Value::Object(object) => {
            let id = object
                .id
                .clone()
                .ok_or_else(|| MemoryError::UnsavedPointer(object.class.clone()))?;
            Value::Object(Pointer {
                class: object.class.clone(),
                id,
            })
        }
    })
}

pub(crate) fn from_stored(store: &MemoryStore, value: &Stored) -> Value<MemoryObject> {
    match value {
        Value::Null => Value::Null,
        Value::Bool(b) => Value::Bool(*b),
        Value::Int(n) => Value::Int(*n),
        Value::Float(f) => Value::Float(*f),
        Value::String(s) => Value::String(s.clone()),
        Value::Array(items) => Value::Array(items.iter().map(|v| from_stored(store, v)).collect()),
        Value::Object(pointer) => Value::Object(MemoryObject::pointer(store.clone(), pointer)),
    }
}

impl RemoteObject for MemoryObject {
    type Query = MemoryQuery;

    fn class_name(&self) -> &str {
        &self.class
    }

    fn object_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn get(&self, key: &str) -> Option<Value<Self>> {
        if key == "objectId" {
            return self.id.clone().map(Value::String);
        }
        self.data.as_ref()?.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value<Self>) {
        self.data
            .get_or_insert_with(Attrs::new)
            .insert(key.to_owned(), value);
    }

    fn is_data_available(&self) -> bool {
        self.data.is_some()
    }

    fn fetch(&self, use_master_key: bool) -> RemoteResult<Self> {
        let id = self
            .id
            .as_deref()
            .ok_or_else(|| MemoryError::Unsaved(self.class.clone()))?;

        let mut inner = self.store.lock();
        inner.record(Op::Fetch, &self.class, use_master_key)?;

        let doc = inner
            .document(&self.class, id)
            .ok_or_else(|| MemoryError::ObjectNotFound {
                class: self.class.clone(),
                id: id.to_owned(),
            })?;

        let data = Self::attrs(&self.store, &doc.fields);
        Ok(Self::loaded(&self.store, &self.class, doc, data))
    }

    fn save(&mut self, use_master_key: bool) -> RemoteResult<()> {
        Ok(self.persist(use_master_key)?)
    }

    fn query_for(&self, class_name: &str) -> MemoryQuery {
        self.store.remote_query(class_name)
    }
}

impl PartialEq for MemoryObject {
    fn eq(&self, other: &Self) -> bool {
        if !self.store.same_store(&other.store) || self.class != other.class {
            return false;
        }
        match (&self.id, &other.id) {
            (Some(a), Some(b)) => a == b,
            (None, None) => self.data == other.data,
            _ => false,
        }
    }
}

impl core::fmt::Debug for MemoryObject {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MemoryObject")
            .field("class", &self.class)
            .field("id", &self.id)
            .field("data", &self.data)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn pointers_are_stored_by_id() {
        let store = MemoryStore::new();
        let user = store.insert("User", json!({"name": "ada"})).unwrap();

        let mut post = store.object("Post");
        post.set("user", Value::Object(user.clone()));
        post.persist(false).unwrap();

        let fetched = post.fetch(false).unwrap();
        let pointer = fetched.get("user").and_then(|v| v.as_object().cloned()).unwrap();

        assert_eq!(pointer, user);
        assert!(!pointer.is_data_available());
        assert_eq!(pointer.fetch(false).unwrap().get("name"), Some(Value::String("ada".into())));
    }

    #[test]
    fn unsaved_pointer_is_rejected() {
        let store = MemoryStore::new();
        let draft = store.object("User");

        let mut post = store.object("Post");
        post.set("user", Value::Object(draft));

        let err = post.persist(false).unwrap_err();
        assert!(matches!(err, MemoryError::UnsavedPointer(class) if class == "User"));
        assert!(store.is_empty("Post"));
    }

    #[test]
    fn save_updates_in_place() {
        let store = MemoryStore::new();
        let mut post = store.insert("Post", json!({"title": "a", "views": 1})).unwrap();
        let id = post.object_id().map(str::to_owned);

        post.set("title", Value::String("b".into()));
        post.save(true).unwrap();

        assert_eq!(post.object_id().map(str::to_owned), id);
        assert_eq!(store.len("Post"), 1);

        let fetched = post.fetch(false).unwrap();
        assert_eq!(fetched.get("title"), Some(Value::String("b".into())));
        assert_eq!(fetched.get("views"), Some(Value::Int(1)));
        assert_eq!(fetched.get("objectId").and_then(|v| v.as_str().map(str::to_owned)), id);
    }

    #[test]
    fn fetch_requires_an_id() {
        let store = MemoryStore::new();
        let err = store.object("Post").fetch(false).unwrap_err();

        assert!(err.downcast_ref::<MemoryError>().is_some_and(|e| matches!(e, MemoryError::Unsaved(_))));
        assert!(store.journal().is_empty());
    }
}
