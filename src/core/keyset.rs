//! Keyset data model.

use std::{
    collections::{BTreeMap, HashMap},
    fmt,
    str::FromStr,
    sync::LazyLock,
};

use anyhow::{Result, bail};
use regex::Regex;

/// Tag that selects no language and produces an unwrapped artifact.
pub const ALL_LANG: &str = "all";

static LANG_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("valid language tag regex"));

/// Language tag of a generation pass.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Lang {
    /// The `all` sentinel: registrations only, no bootstrap wrapper.
    All,
    Named(String),
}

impl Lang {
    pub fn as_str(&self) -> &str {
        match self {
            Lang::All => ALL_LANG,
            Lang::Named(tag) => tag,
        }
    }

    /// File name of the keyset modules that belong to this language.
    pub fn keyset_file_name(&self) -> String {
        format!("{}.js", self.as_str())
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Lang::All)
    }
}

impl FromStr for Lang {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        if s == ALL_LANG {
            return Ok(Lang::All);
        }
        if !LANG_TAG.is_match(s) {
            bail!("Invalid language tag \"{}\"", s);
        }
        Ok(Lang::Named(s.to_string()))
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keys of one keyset with their raw template values.
///
/// Iteration follows JavaScript property order: array-index keys (`"0"`,
/// `"17"`) first in ascending numeric order, then every other key in
/// insertion order. Re-inserting a key replaces the value in place, the way
/// a JavaScript object keeps the position of an overwritten property.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keyset {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl Keyset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.index.get(&key) {
            Some(&pos) => self.entries[pos].1 = value,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.index.get(key).map(|&pos| self.entries[pos].1.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        let mut indexed: Vec<(u32, &(String, String))> = self
            .entries
            .iter()
            .filter_map(|entry| array_index(&entry.0).map(|n| (n, entry)))
            .collect();
        indexed.sort_by_key(|&(n, _)| n);

        indexed
            .into_iter()
            .map(|(_, entry)| entry)
            .chain(
                self.entries
                    .iter()
                    .filter(|entry| array_index(&entry.0).is_none()),
            )
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.iter().map(|(k, _)| k)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Numeric value of a canonical array index (`0` to `2^32 - 2`, no sign,
/// no leading zeros).
fn array_index(key: &str) -> Option<u32> {
    if key.starts_with('+') || (key.len() > 1 && key.starts_with('0')) {
        return None;
    }
    key.parse::<u32>().ok().filter(|&n| n != u32::MAX)
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Keyset {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut keyset = Keyset::new();
        for (k, v) in iter {
            keyset.insert(k, v);
        }
        keyset
    }
}

/// Keyset name → keyset.
///
/// Iteration is ordered by keyset name, which is the order the generator
/// emits registrations in.
pub type KeysetCollection = BTreeMap<String, Keyset>;

/// A keyset whose values went through the compactor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledKeyset {
    pub name: String,
    /// Key → compacted JavaScript expression, in keyset order.
    pub entries: Vec<(String, String)>,
}

/// Total number of keys across a collection.
pub fn count_keys(collection: &KeysetCollection) -> usize {
    collection.values().map(Keyset::len).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lang() {
        assert_eq!("all".parse::<Lang>().unwrap(), Lang::All);
        assert_eq!(
            "zh-CN".parse::<Lang>().unwrap(),
            Lang::Named("zh-CN".to_string())
        );
        assert!("en/../x".parse::<Lang>().is_err());
        assert!("".parse::<Lang>().is_err());
    }

    #[test]
    fn test_keyset_file_name() {
        assert_eq!(Lang::Named("ru".into()).keyset_file_name(), "ru.js");
        assert_eq!(Lang::All.keyset_file_name(), "all.js");
    }

    #[test]
    fn test_insert_keeps_position_of_overwritten_key() {
        let mut keyset = Keyset::new();
        keyset.insert("b", "1");
        keyset.insert("a", "2");
        keyset.insert("b", "3");

        let entries: Vec<_> = keyset.iter().collect();
        assert_eq!(entries, vec![("b", "3"), ("a", "2")]);
        assert_eq!(keyset.len(), 2);
        assert_eq!(keyset.get("b"), Some("3"));
    }

    #[test]
    fn test_array_index_keys_come_first_in_numeric_order() {
        let keyset: Keyset = [
            ("b", "x"),
            ("10", "ten"),
            ("2", "two"),
            ("a", "y"),
            ("01", "padded"),
            ("4294967295", "max"),
            ("0", "zero"),
        ]
        .into_iter()
        .collect();

        let keys: Vec<_> = keyset.keys().collect();
        assert_eq!(
            keys,
            vec!["0", "2", "10", "b", "a", "01", "4294967295"]
        );
    }
}
