//! Field projection for terminal operations.

/// Which attributes a fetch returns.
///
/// `"*"`, `["*"]` and `None` all mean [`Select::All`], which never reaches
/// the remote projection call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Select {
    #[default]
    All,
    Keys(Vec<String>),
}

impl Select {
    pub fn keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_keys(keys.into_iter().map(Into::into).collect())
    }

    fn from_keys(keys: Vec<String>) -> Self {
        if keys.len() == 1 && keys[0] == "*" {
            Self::All
        } else {
            Self::Keys(keys)
        }
    }

    #[inline]
    pub const fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// The keys to forward, or `None` for the wildcard.
    pub fn into_keys(self) -> Option<Vec<String>> {
        match self {
            Self::All => None,
            Self::Keys(keys) => Some(keys),
        }
    }
}

impl From<&str> for Select {
    fn from(key: &str) -> Self {
        Self::from_keys(vec![key.to_owned()])
    }
}

impl From<String> for Select {
    fn from(key: String) -> Self {
        Self::from_keys(vec![key])
    }
}

impl From<Vec<String>> for Select {
    fn from(keys: Vec<String>) -> Self {
        Self::from_keys(keys)
    }
}

impl From<Vec<&str>> for Select {
    fn from(keys: Vec<&str>) -> Self {
        Self::keys(keys)
    }
}

impl<const N: usize> From<[&str; N]> for Select {
    fn from(keys: [&str; N]) -> Self {
        Self::keys(keys)
    }
}

impl From<&[&str]> for Select {
    fn from(keys: &[&str]) -> Self {
        Self::keys(keys.iter().copied())
    }
}

impl<T: Into<Select>> From<Option<T>> for Select {
    fn from(select: Option<T>) -> Self {
        select.map_or(Self::All, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcards() {
        assert!(Select::from("*").is_all());
        assert!(Select::from(["*"]).is_all());
        assert!(Select::from(vec!["*"]).is_all());
        assert!(Select::from(None::<&str>).is_all());
        assert!(Select::default().is_all());
    }

    #[test]
    fn star_among_other_keys_is_forwarded() {
        let select = Select::from(["*", "title"]);
        assert_eq!(
            select.into_keys(),
            Some(vec!["*".to_owned(), "title".to_owned()])
        );
    }

    #[test]
    fn single_key() {
        assert_eq!(
            Select::from("title").into_keys(),
            Some(vec!["title".to_owned()])
        );
    }
}
