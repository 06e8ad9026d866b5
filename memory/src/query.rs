use core::cmp::Ordering;

use smallvec::SmallVec;
use strata_core::{Attributes, Direction, RemoteQuery, RemoteResult, Value};

use crate::error::MemoryError;
use crate::object::{Attrs, MemoryObject, from_stored, to_stored};
use crate::store::{Document, Inner, MemoryStore, Op, Pointer, Stored};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cmp {
    Eq,
    NotEq,
    Gt,
    Gte,
    Lt,
    Lte,
}

#[derive(Debug, Clone)]
enum Condition {
    /// `probe` is `None` when the value names an unsaved record, which no
    /// stored field can equal.
    Compare {
        key: String,
        cmp: Cmp,
        probe: Option<Stored>,
    },
    In {
        key: String,
        probes: Vec<Stored>,
    },
    Exists {
        key: String,
        present: bool,
    },
    MatchesQuery {
        key: String,
        query: MemoryQuery,
        negated: bool,
    },
    MatchesKeyInQuery {
        key: String,
        query_key: String,
        query: MemoryQuery,
        negated: bool,
    },
    Or(Vec<MemoryQuery>),
}

/// A query over one collection of a [`MemoryStore`].
#[derive(Debug, Clone)]
pub struct MemoryQuery {
    store: MemoryStore,
    class: String,
    conditions: Vec<Condition>,
    order: Option<(String, Direction)>,
    select: Option<Vec<String>>,
    includes: Vec<String>,
    limit: Option<usize>,
    skip: usize,
}

impl MemoryQuery {
    pub(crate) fn new(store: MemoryStore, class: &str) -> Self {
        Self {
            store,
            class: class.to_owned(),
            conditions: Vec::new(),
            order: None,
            select: None,
            includes: Vec::new(),
            limit: None,
            skip: 0,
        }
    }

    /// Keys restricted by `select`, if any.
    pub fn selected_keys(&self) -> Option<&[String]> {
        self.select.as_deref()
    }

    fn compare(&mut self, key: &str, cmp: Cmp, value: Value<MemoryObject>) {
        self.conditions.push(Condition::Compare {
            key: key.to_owned(),
            cmp,
            probe: to_stored(&value).ok(),
        });
    }

    fn matches(&self, inner: &Inner, doc: &Document) -> bool {
        self.conditions.iter().all(|condition| match condition {
            Condition::Compare { key, cmp, probe } => {
                let field = doc.field(key).unwrap_or_default();
                match (cmp, probe) {
                    (Cmp::Eq, Some(probe)) => equals(&field, probe),
                    (Cmp::NotEq, Some(probe)) => !equals(&field, probe),
                    (Cmp::NotEq, None) => true,
                    (_, None) => false,
                    (cmp, Some(probe)) => field.compare(probe).is_some_and(|ord| match cmp {
                        Cmp::Gt => ord.is_gt(),
                        Cmp::Gte => ord.is_ge(),
                        Cmp::Lt => ord.is_lt(),
                        _ => ord.is_le(),
                    }),
                }
            }
            Condition::In { key, probes } => {
                let field = doc.field(key).unwrap_or_default();
                probes.iter().any(|probe| equals(&field, probe))
            }
            Condition::Exists { key, present } => {
                doc.field(key).is_some_and(|v| !v.is_null()) == *present
            }
            Condition::MatchesQuery {
                key,
                query,
                negated,
            } => {
                let field = doc.field(key).unwrap_or_default();
                let hit = pointers(&field).any(|pointer| {
                    pointer.class == query.class
                        && inner
                            .document(&pointer.class, &pointer.id)
                            .is_some_and(|target| query.matches(inner, target))
                });
                hit != *negated
            }
            Condition::MatchesKeyInQuery {
                key,
                query_key,
                query,
                negated,
            } => {
                let field = doc.field(key).unwrap_or_default();
                let hit = query
                    .filtered(inner)
                    .into_iter()
                    .filter_map(|target| target.field(query_key))
                    .any(|value| equals(&field, &value));
                hit != *negated
            }
            Condition::Or(queries) => queries.iter().any(|q| q.matches(inner, doc)),
        })
    }

    /// Matching documents in sort order, before skip and limit.
    fn filtered<'a>(&self, inner: &'a Inner) -> Vec<&'a Document> {
        let mut docs: Vec<&Document> = inner
            .documents(&self.class)
            .iter()
            .filter(|doc| self.matches(inner, doc))
            .collect();

        if let Some((key, direction)) = &self.order {
            docs.sort_by(|a, b| {
                let ord = sort_order(
                    &a.field(key).unwrap_or_default(),
                    &b.field(key).unwrap_or_default(),
                );
                match direction {
                    Direction::Ascending => ord,
                    Direction::Descending => ord.reverse(),
                }
            });
        }

        docs
    }

    fn window<'a>(&self, inner: &'a Inner) -> impl Iterator<Item = &'a Document> {
        let limit = self.limit.unwrap_or(usize::MAX);
        self.filtered(inner).into_iter().skip(self.skip).take(limit)
    }

    fn materialize(&self, inner: &Inner, doc: &Document) -> MemoryObject {
        let mut data: Attrs = doc
            .fields
            .iter()
            .filter(|(key, _)| {
                self.select
                    .as_ref()
                    .is_none_or(|keys| keys.iter().any(|k| k == *key))
            })
            .map(|(key, value)| (key.clone(), from_stored(&self.store, value)))
            .collect();

        for include in &self.includes {
            let path: SmallVec<[&str; 4]> = include.split('.').collect();
            hydrate(inner, &mut data, &path);
        }

        MemoryObject::loaded(&self.store, &self.class, doc, data)
    }
}

/// Loads the records along `path` in place.
fn hydrate(inner: &Inner, data: &mut Attrs, path: &[&str]) {
    let Some((head, rest)) = path.split_first() else {
        return;
    };
    let Some(value) = data.get_mut(*head) else {
        return;
    };

    match value {
        Value::Object(object) => hydrate_object(inner, object, rest),
        Value::Array(items) => {
            for item in items {
                if let Value::Object(object) = item {
                    hydrate_object(inner, object, rest);
                }
            }
        }
        _ => {}
    }
}

fn hydrate_object(inner: &Inner, object: &mut MemoryObject, rest: &[&str]) {
    if object.data.is_none() {
        let Some(id) = object.id.as_deref() else {
            return;
        };
        let Some(doc) = inner.document(&object.class, id) else {
            return;
        };
        object.data = Some(MemoryObject::attrs(&object.store, &doc.fields));
    }

    if let Some(data) = object.data.as_mut() {
        hydrate(inner, data, rest);
    }
}

/// Equality as the store's predicates see it: an array field equals any of
/// its elements.
fn equals(field: &Stored, probe: &Stored) -> bool {
    if field == probe || field.compare(probe) == Some(Ordering::Equal) {
        return true;
    }
    match (field, probe) {
        (Value::Array(items), probe) if !matches!(probe, Value::Array(_)) => {
            items.iter().any(|item| equals(item, probe))
        }
        _ => false,
    }
}

fn pointers(value: &Stored) -> impl Iterator<Item = &Pointer> {
    let items: SmallVec<[&Pointer; 4]> = match value {
        Value::Object(pointer) => SmallVec::from_elem(pointer, 1),
        Value::Array(items) => items.iter().filter_map(Value::as_object).collect(),
        _ => SmallVec::new(),
    };
    items.into_iter()
}

/// Missing and null values sort first; mismatched kinds keep their order.
fn sort_order(a: &Stored, b: &Stored) -> Ordering {
    match (a.is_null(), b.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.compare(b).unwrap_or(Ordering::Equal),
    }
}

impl RemoteQuery for MemoryQuery {
    type Object = MemoryObject;

    fn class_name(&self) -> &str {
        &self.class
    }

    fn fresh(&self) -> Self {
        Self::new(self.store.clone(), &self.class)
    }

    fn create_object(&self, attributes: Attributes<MemoryObject>) -> MemoryObject {
        MemoryObject::unsaved(self.store.clone(), &self.class, attributes.into_iter().collect())
    }

    fn equal_to(&mut self, key: &str, value: Value<MemoryObject>) {
        self.compare(key, Cmp::Eq, value);
    }

    fn not_equal_to(&mut self, key: &str, value: Value<MemoryObject>) {
        self.compare(key, Cmp::NotEq, value);
    }

    fn greater_than(&mut self, key: &str, value: Value<MemoryObject>) {
        self.compare(key, Cmp::Gt, value);
    }

    fn greater_than_or_equal_to(&mut self, key: &str, value: Value<MemoryObject>) {
        self.compare(key, Cmp::Gte, value);
    }

    fn less_than(&mut self, key: &str, value: Value<MemoryObject>) {
        self.compare(key, Cmp::Lt, value);
    }

    fn less_than_or_equal_to(&mut self, key: &str, value: Value<MemoryObject>) {
        self.compare(key, Cmp::Lte, value);
    }

    fn contained_in(&mut self, key: &str, values: Vec<Value<MemoryObject>>) {
        self.conditions.push(Condition::In {
            key: key.to_owned(),
            probes: values.iter().filter_map(|v| to_stored(v).ok()).collect(),
        });
    }

    fn exists(&mut self, key: &str) {
        self.conditions.push(Condition::Exists {
            key: key.to_owned(),
            present: true,
        });
    }

    fn does_not_exist(&mut self, key: &str) {
        self.conditions.push(Condition::Exists {
            key: key.to_owned(),
            present: false,
        });
    }

    fn matches_query(&mut self, key: &str, query: Self) {
        self.conditions.push(Condition::MatchesQuery {
            key: key.to_owned(),
            query,
            negated: false,
        });
    }

    fn does_not_match_query(&mut self, key: &str, query: Self) {
        self.conditions.push(Condition::MatchesQuery {
            key: key.to_owned(),
            query,
            negated: true,
        });
    }

    fn matches_key_in_query(&mut self, key: &str, query_key: &str, query: Self) {
        self.conditions.push(Condition::MatchesKeyInQuery {
            key: key.to_owned(),
            query_key: query_key.to_owned(),
            query,
            negated: false,
        });
    }

    fn does_not_match_key_in_query(&mut self, key: &str, query_key: &str, query: Self) {
        self.conditions.push(Condition::MatchesKeyInQuery {
            key: key.to_owned(),
            query_key: query_key.to_owned(),
            query,
            negated: true,
        });
    }

    fn ascending(&mut self, key: &str) {
        self.order = Some((key.to_owned(), Direction::Ascending));
    }

    fn descending(&mut self, key: &str) {
        self.order = Some((key.to_owned(), Direction::Descending));
    }

    fn select(&mut self, keys: Vec<String>) -> RemoteResult<()> {
        self.store.lock().record(Op::Select, &self.class, false)?;

        if keys.is_empty() {
            return Err(MemoryError::EmptySelect.into());
        }

        let selected = self.select.get_or_insert_with(Vec::new);
        for key in keys {
            if !selected.contains(&key) {
                selected.push(key);
            }
        }
        Ok(())
    }

    fn include_key(&mut self, key: &str) {
        if !self.includes.iter().any(|k| k == key) {
            self.includes.push(key.to_owned());
        }
    }

    fn limit(&mut self, n: usize) {
        self.limit = Some(n);
    }

    fn skip(&mut self, n: usize) {
        self.skip = n;
    }

    fn count(&self, use_master_key: bool) -> RemoteResult<usize> {
        let mut inner = self.store.lock();
        inner.record(Op::Count, &self.class, use_master_key)?;
        Ok(self.filtered(&inner).len())
    }

    fn find(&self, use_master_key: bool) -> RemoteResult<Vec<MemoryObject>> {
        let mut inner = self.store.lock();
        inner.record(Op::Find, &self.class, use_master_key)?;

        let objects = self
            .window(&inner)
            .map(|doc| self.materialize(&inner, doc))
            .collect();

        strata_core::strata_trace_event!(
            trace,
            "strata.memory",
            class = %self.class,
            "find"
        );

        Ok(objects)
    }

    fn first(&self, use_master_key: bool) -> RemoteResult<Option<MemoryObject>> {
        let mut inner = self.store.lock();
        inner.record(Op::First, &self.class, use_master_key)?;

        let first = self.window(&inner).next();
        Ok(first.map(|doc| self.materialize(&inner, doc)))
    }

    fn or_queries(queries: Vec<Self>) -> RemoteResult<Self> {
        let first = queries.first().ok_or(MemoryError::EmptyOr)?;

        if let Some(other) = queries.iter().find(|q| q.class != first.class) {
            return Err(MemoryError::ClassMismatch {
                expected: first.class.clone(),
                found: other.class.clone(),
            }
            .into());
        }

        let mut query = first.fresh();
        query.conditions.push(Condition::Or(queries));
        Ok(query)
    }
}
