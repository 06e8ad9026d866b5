//! Core `Query` builder: constraint accumulation and OR composition.

use core::marker::PhantomData;

use crate::error::Result;
use crate::model::{Model, RemoteQueryOf};
use crate::remote::{RemoteObject, RemoteQuery};
use crate::value::IntoValue;

use super::QueryContext;
use super::operator::{Direction, Operator};

/// A typed query over the remote collection backing `M`.
///
/// Every builder step is applied straight to the wrapped remote query, so the
/// remote handle always reflects what has been configured. `Clone` deep-copies
/// that state.
pub struct Query<M: Model> {
    pub(crate) remote: RemoteQueryOf<M>,
    pub(crate) class_name: String,
    pub(crate) use_master_key: bool,
    pub(crate) include_keys: Vec<String>,
    pub(crate) projected: bool,
    pub(crate) context: QueryContext,
    _model: PhantomData<fn() -> M>,
}

impl<M: Model> Clone for Query<M> {
    fn clone(&self) -> Self {
        Self {
            remote: self.remote.clone(),
            class_name: self.class_name.clone(),
            use_master_key: self.use_master_key,
            include_keys: self.include_keys.clone(),
            projected: self.projected,
            context: self.context.clone(),
            _model: PhantomData,
        }
    }
}

/// One operand of an OR composition.
pub enum OrOperand<'a, M: Model> {
    Query(Query<M>),
    Remote(RemoteQueryOf<M>),
    /// Populates a fresh builder sharing the first operand's collection,
    /// model and access flag.
    Deferred(Box<dyn FnOnce(Query<M>) -> Query<M> + 'a>),
}

impl<'a, M: Model> OrOperand<'a, M> {
    pub fn remote(query: RemoteQueryOf<M>) -> Self {
        Self::Remote(query)
    }

    pub fn deferred(f: impl FnOnce(Query<M>) -> Query<M> + 'a) -> Self {
        Self::Deferred(Box::new(f))
    }
}

impl<M: Model> From<Query<M>> for OrOperand<'_, M> {
    fn from(query: Query<M>) -> Self {
        Self::Query(query)
    }
}

macro_rules! forward_comparison {
    ($($name:ident),* $(,)?) => {
        $(
            pub fn $name(mut self, key: &str, value: impl IntoValue<M::Object>) -> Self {
                self.remote.$name(key, value.into_value());
                self
            }
        )*
    };
}

impl<M: Model> Query<M> {
    /// Wraps `remote` with default configuration.
    pub fn new(remote: RemoteQueryOf<M>) -> Self {
        Self::with_context(remote, QueryContext::default())
    }

    /// Wraps `remote`; the access flag is seeded from `context`.
    pub fn with_context(remote: RemoteQueryOf<M>, context: QueryContext) -> Self {
        Self {
            class_name: remote.class_name().to_owned(),
            use_master_key: context.config().use_master_key,
            remote,
            include_keys: Vec::new(),
            projected: false,
            context,
            _model: PhantomData,
        }
    }

    /// A query for `M` on the store `object` lives in.
    pub fn on_store_of(object: &M::Object, use_master_key: bool) -> Self {
        Self::new(object.query_for(M::CLASS_NAME)).use_master_key(use_master_key)
    }

    /// An unconstrained builder sharing this one's collection, access flag
    /// and context.
    pub(crate) fn blank(&self) -> Self {
        Self {
            remote: self.remote.fresh(),
            class_name: self.class_name.clone(),
            use_master_key: self.use_master_key,
            include_keys: Vec::new(),
            projected: false,
            context: self.context.clone(),
            _model: PhantomData,
        }
    }

    pub fn use_master_key(mut self, value: bool) -> Self {
        self.use_master_key = value;
        self
    }

    pub const fn uses_master_key(&self) -> bool {
        self.use_master_key
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn model_name(&self) -> &'static str {
        M::model_name()
    }

    pub fn include_keys(&self) -> &[String] {
        &self.include_keys
    }

    pub fn context(&self) -> &QueryContext {
        &self.context
    }

    pub fn remote(&self) -> &RemoteQueryOf<M> {
        &self.remote
    }

    // =========================================================================
    // OR composition
    // =========================================================================

    /// ORs `first` with every operand in `rest`.
    ///
    /// ```ignore
    /// Query::or_queries(published, [
    ///     OrOperand::from(drafts),
    ///     OrOperand::deferred(|q| q.where_eq("pinned", true)),
    /// ])?;
    /// ```
    pub fn or_queries<'a, I>(first: Self, rest: I) -> Result<Self>
    where
        I: IntoIterator<Item = OrOperand<'a, M>>,
        M: 'a,
    {
        let seed = first.blank();
        let mut remotes = vec![first.remote];

        for operand in rest {
            let remote = match operand {
                OrOperand::Query(query) => query.remote,
                OrOperand::Remote(remote) => remote,
                OrOperand::Deferred(f) => f(seed.blank()).remote,
            };
            remotes.push(remote);
        }

        crate::strata_trace_event!(
            debug,
            "strata.query",
            class = %seed.class_name,
            operands = remotes.len(),
            "or composition"
        );

        let remote = <RemoteQueryOf<M> as RemoteQuery>::or_queries(remotes)?;

        Ok(Self { remote, ..seed })
    }

    /// ORs this query with `rest`; see [`Query::or_queries`].
    pub fn or_query<'a, I>(self, rest: I) -> Result<Self>
    where
        I: IntoIterator<Item = OrOperand<'a, M>>,
        M: 'a,
    {
        Self::or_queries(self, rest)
    }

    // =========================================================================
    // Constraints
    // =========================================================================

    /// Three-argument `where`: `query.r#where("age", ">=", 18)?`.
    ///
    /// Fails with [`InvalidOperator`](crate::StrataError::InvalidOperator)
    /// before touching the remote query.
    pub fn r#where(self, key: &str, operator: &str, value: impl IntoValue<M::Object>) -> Result<Self> {
        let operator: Operator = operator.parse()?;
        Ok(self.where_op(key, operator, value))
    }

    pub fn where_op(mut self, key: &str, operator: Operator, value: impl IntoValue<M::Object>) -> Self {
        operator.apply(&mut self.remote, key, value.into_value());
        self
    }

    /// Equality constraint. Models are sent as their remote record.
    pub fn where_eq(mut self, key: &str, value: impl IntoValue<M::Object>) -> Self {
        self.remote.equal_to(key, value.into_value());
        self
    }

    /// Conjunction of equality constraints.
    pub fn where_map<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: IntoValue<M::Object>,
    {
        for (key, value) in pairs {
            self.remote.equal_to(key.as_ref(), value.into_value());
        }
        self
    }

    /// `key` is one of `values`. A scalar is treated as a one-element list.
    pub fn contained_in(mut self, key: &str, values: impl IntoValue<M::Object>) -> Self {
        self.remote.contained_in(key, values.into_value().into_list());
        self
    }

    /// Alias for [`contained_in`](Self::contained_in).
    pub fn where_in(self, key: &str, values: impl IntoValue<M::Object>) -> Self {
        self.contained_in(key, values)
    }

    pub fn where_exists(self, key: &str) -> Self {
        self.exists(key)
    }

    pub fn where_not_exists(self, key: &str) -> Self {
        self.does_not_exist(key)
    }

    pub fn matches_query<N>(mut self, key: &str, query: Query<N>) -> Self
    where
        N: Model<Object = M::Object>,
    {
        self.remote.matches_query(key, query.remote);
        self
    }

    pub fn matches_remote_query(mut self, key: &str, query: RemoteQueryOf<M>) -> Self {
        self.remote.matches_query(key, query);
        self
    }

    pub fn does_not_match_query<N>(mut self, key: &str, query: Query<N>) -> Self
    where
        N: Model<Object = M::Object>,
    {
        self.remote.does_not_match_query(key, query.remote);
        self
    }

    pub fn does_not_match_remote_query(mut self, key: &str, query: RemoteQueryOf<M>) -> Self {
        self.remote.does_not_match_query(key, query);
        self
    }

    pub fn matches_key_in_query<N>(mut self, key: &str, query_key: &str, query: Query<N>) -> Self
    where
        N: Model<Object = M::Object>,
    {
        self.remote.matches_key_in_query(key, query_key, query.remote);
        self
    }

    pub fn does_not_match_key_in_query<N>(
        mut self,
        key: &str,
        query_key: &str,
        query: Query<N>,
    ) -> Self
    where
        N: Model<Object = M::Object>,
    {
        self.remote
            .does_not_match_key_in_query(key, query_key, query.remote);
        self
    }

    pub fn matches_key_in_remote_query(
        mut self,
        key: &str,
        query_key: &str,
        query: RemoteQueryOf<M>,
    ) -> Self {
        self.remote.matches_key_in_query(key, query_key, query);
        self
    }

    pub fn does_not_match_key_in_remote_query(
        mut self,
        key: &str,
        query_key: &str,
        query: RemoteQueryOf<M>,
    ) -> Self {
        self.remote.does_not_match_key_in_query(key, query_key, query);
        self
    }

    pub fn order_by(self, key: &str, direction: Direction) -> Self {
        match direction {
            Direction::Ascending => self.ascending(key),
            Direction::Descending => self.descending(key),
        }
    }

    /// `order_by` with a textual direction (`asc`, `descending`, `1`, ...).
    pub fn order_by_token(self, key: &str, token: &str) -> Result<Self> {
        let direction: Direction = token.parse()?;
        Ok(self.order_by(key, direction))
    }

    /// Eagerly loads each relation path (dot-separated for nested relations)
    /// on every materialized model.
    pub fn with<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for key in keys {
            let key = key.into();
            self.remote.include_key(&key);
            self.include_keys.push(key);
        }
        self
    }

    /// Applies `callback` when `condition` holds.
    pub fn when(self, condition: bool, callback: impl FnOnce(Self) -> Self) -> Self {
        if condition { callback(self) } else { self }
    }

    /// Applies `callback` when `condition` holds, `default` otherwise.
    pub fn when_else(
        self,
        condition: bool,
        callback: impl FnOnce(Self) -> Self,
        default: impl FnOnce(Self) -> Self,
    ) -> Self {
        if condition { callback(self) } else { default(self) }
    }

    // =========================================================================
    // Remote query passthrough
    // =========================================================================

    forward_comparison!(
        equal_to,
        not_equal_to,
        greater_than,
        greater_than_or_equal_to,
        less_than,
        less_than_or_equal_to,
    );

    pub fn exists(mut self, key: &str) -> Self {
        self.remote.exists(key);
        self
    }

    pub fn does_not_exist(mut self, key: &str) -> Self {
        self.remote.does_not_exist(key);
        self
    }

    pub fn ascending(mut self, key: &str) -> Self {
        self.remote.ascending(key);
        self
    }

    pub fn descending(mut self, key: &str) -> Self {
        self.remote.descending(key);
        self
    }

    pub fn limit(mut self, n: usize) -> Self {
        self.remote.limit(n);
        self
    }

    pub fn skip(mut self, n: usize) -> Self {
        self.remote.skip(n);
        self
    }

    /// Hydrates `key` remotely without poking it on materialized models.
    pub fn include_key(mut self, key: &str) -> Self {
        self.remote.include_key(key);
        self
    }

    pub fn select<I, S>(mut self, keys: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.remote.select(keys.into_iter().map(Into::into).collect())?;
        self.projected = true;
        Ok(self)
    }
}
