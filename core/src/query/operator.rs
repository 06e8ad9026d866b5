//! Comparison operators and sort directions.

use core::fmt;
use core::str::FromStr;

use crate::error::StrataError;
use crate::remote::RemoteQuery;
use crate::value::Value;

/// Comparison accepted by the three-argument `where`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    NotEq,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
}

impl Operator {
    pub const ALL: &'static [Operator] = &[
        Self::Eq,
        Self::NotEq,
        Self::Gt,
        Self::Gte,
        Self::Lt,
        Self::Lte,
        Self::In,
    ];

    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::NotEq => "!=",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::In => "in",
        }
    }

    /// Issues the matching predicate on `query`. `In` flattens `value` into
    /// a list.
    pub fn apply<Q: RemoteQuery>(self, query: &mut Q, key: &str, value: Value<Q::Object>) {
        match self {
            Self::Eq => query.equal_to(key, value),
            Self::NotEq => query.not_equal_to(key, value),
            Self::Gt => query.greater_than(key, value),
            Self::Gte => query.greater_than_or_equal_to(key, value),
            Self::Lt => query.less_than(key, value),
            Self::Lte => query.less_than_or_equal_to(key, value),
            Self::In => query.contained_in(key, value.into_list()),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = StrataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| StrataError::InvalidOperator(s.to_owned()))
    }
}

/// Sort direction for `order_by`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
}

impl FromStr for Direction {
    type Err = StrataError;

    /// Accepts `1`, `asc`, `ascending`, `0`, `desc`, `descending`, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "1" | "asc" | "ascending" => Ok(Self::Ascending),
            "0" | "desc" | "descending" => Ok(Self::Descending),
            _ => Err(StrataError::InvalidDirection(s.to_owned())),
        }
    }
}

impl TryFrom<i64> for Direction {
    type Error = StrataError;

    fn try_from(n: i64) -> Result<Self, Self::Error> {
        match n {
            1 => Ok(Self::Ascending),
            0 => Ok(Self::Descending),
            other => Err(StrataError::InvalidDirection(other.to_string())),
        }
    }
}
