//! Shared document storage, call journal and fault injection.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use hashbrown::HashMap;
use strata_core::{Model, Query, QueryContext, RemoteObject, Value};

use crate::error::MemoryError;
use crate::object::MemoryObject;
use crate::query::MemoryQuery;

/// A stored reference to another record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Pointer {
    pub(crate) class: String,
    pub(crate) id: String,
}

/// Values as persisted. Records are held by pointer, never by handle.
pub(crate) type Stored = Value<Pointer>;

pub(crate) type Fields = BTreeMap<String, Stored>;

/// Remote operation kinds, as recorded in the journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Count,
    Find,
    First,
    Select,
    Fetch,
    Save,
}

/// One recorded remote call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub op: Op,
    pub class: String,
    pub use_master_key: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct Document {
    pub(crate) id: String,
    pub(crate) fields: Fields,
}

impl Document {
    /// Attribute lookup; `objectId` resolves to the id.
    pub(crate) fn field(&self, key: &str) -> Option<Stored> {
        if key == "objectId" {
            return Some(Value::String(self.id.clone()));
        }
        self.fields.get(key).cloned()
    }
}

#[derive(Debug, Default)]
pub(crate) struct Inner {
    pub(crate) classes: HashMap<String, Vec<Document>>,
    next_id: u64,
    journal: Vec<Call>,
    faults: Vec<Op>,
}

impl Inner {
    pub(crate) fn documents(&self, class: &str) -> &[Document] {
        self.classes.get(class).map_or(&[], Vec::as_slice)
    }

    pub(crate) fn document(&self, class: &str, id: &str) -> Option<&Document> {
        self.documents(class).iter().find(|d| d.id == id)
    }

    /// Journals `op` and fails it when a matching fault is queued.
    pub(crate) fn record(&mut self, op: Op, class: &str, use_master_key: bool) -> Result<(), MemoryError> {
        self.journal.push(Call {
            op,
            class: class.to_owned(),
            use_master_key,
        });

        if let Some(pos) = self.faults.iter().position(|f| *f == op) {
            self.faults.remove(pos);
            return Err(MemoryError::InjectedFault(op));
        }

        Ok(())
    }

    pub(crate) fn insert(&mut self, class: &str, fields: Fields) -> String {
        self.next_id += 1;
        // Zero-padded so lexical id order matches insertion order.
        let id = format!("{:010}", self.next_id);
        self.classes
            .entry(class.to_owned())
            .or_default()
            .push(Document {
                id: id.clone(),
                fields,
            });
        id
    }

    pub(crate) fn update(&mut self, class: &str, id: &str, fields: Fields) -> Result<(), MemoryError> {
        let doc = self
            .classes
            .get_mut(class)
            .and_then(|docs| docs.iter_mut().find(|d| d.id == id))
            .ok_or_else(|| MemoryError::ObjectNotFound {
                class: class.to_owned(),
                id: id.to_owned(),
            })?;
        doc.fields.extend(fields);
        Ok(())
    }
}

/// An in-process object store.
///
/// Handles are cheap to clone and share one set of collections.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
    context: QueryContext,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `context` for every query built through [`MemoryStore::query`].
    pub fn with_context(context: QueryContext) -> Self {
        Self {
            inner: Arc::default(),
            context,
        }
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn context(&self) -> &QueryContext {
        &self.context
    }

    /// A typed query over the collection backing `M`.
    pub fn query<M>(&self) -> Query<M>
    where
        M: Model<Object = MemoryObject>,
    {
        Query::with_context(self.remote_query(M::CLASS_NAME), self.context.clone())
    }

    /// A raw remote query over `class`.
    pub fn remote_query(&self, class: &str) -> MemoryQuery {
        MemoryQuery::new(self.clone(), class)
    }

    /// A new unsaved record in `class`.
    pub fn object(&self, class: &str) -> MemoryObject {
        MemoryObject::unsaved(self.clone(), class, Default::default())
    }

    /// Saves a record built from a JSON object's top-level fields.
    pub fn insert(&self, class: &str, document: serde_json::Value) -> Result<MemoryObject, MemoryError> {
        let mut object = self.object(class);
        if let serde_json::Value::Object(map) = document {
            for (key, value) in map {
                object.set(&key, Value::from(value));
            }
        }
        object.persist(false)?;
        Ok(object)
    }

    /// Number of stored records in `class`.
    pub fn len(&self, class: &str) -> usize {
        self.lock().documents(class).len()
    }

    pub fn is_empty(&self, class: &str) -> bool {
        self.len(class) == 0
    }

    /// Every remote call made so far, oldest first.
    pub fn journal(&self) -> Vec<Call> {
        self.lock().journal.clone()
    }

    /// Number of journaled calls of kind `op`.
    pub fn calls(&self, op: Op) -> usize {
        self.lock().journal.iter().filter(|c| c.op == op).count()
    }

    pub fn clear_journal(&self) {
        self.lock().journal.clear();
    }

    /// Makes the next call of kind `op` fail with
    /// [`MemoryError::InjectedFault`].
    pub fn fail_next(&self, op: Op) {
        self.lock().faults.push(op);
    }

    pub(crate) fn same_store(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl core::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let inner = self.lock();
        let mut classes: Vec<_> = inner
            .classes
            .iter()
            .map(|(name, docs)| (name.as_str(), docs.len()))
            .collect();
        classes.sort_unstable();
        f.debug_struct("MemoryStore")
            .field("classes", &classes)
            .finish_non_exhaustive()
    }
}
