use ahash::AHashMap;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Occurrence counts keyed by extracted value.
///
/// Entries keep the order in which each key was first observed. That order is
/// what breaks ties in [`top_key`] and what the serialized map follows.
#[derive(Debug, Clone, Default)]
pub struct FrequencyTable {
    index: AHashMap<String, usize>,
    entries: Vec<(String, u64)>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one occurrence of `key` and returns its new count.
    pub fn increment(&mut self, key: &str) -> u64 {
        self.add(key, 1)
    }

    pub fn add(&mut self, key: &str, n: u64) -> u64 {
        match self.index.get(key) {
            Some(&slot) => {
                let count = &mut self.entries[slot].1;
                *count += n;
                *count
            }
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), n));
                n
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<u64> {
        self.index.get(key).map(|&slot| self.entries[slot].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, c)| c).sum()
    }

    /// Entries in first-observed order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.entries.iter().map(|(k, c)| (k.as_str(), *c))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn clear(&mut self) {
        self.index.clear();
        self.entries.clear();
    }

    pub fn top(&self) -> Option<&str> {
        top_key(self)
    }
}

/// Key with the greatest count. Among keys tied at the maximum, the one
/// observed first wins. `None` for an empty table.
pub fn top_key(table: &FrequencyTable) -> Option<&str> {
    let mut best: Option<(&str, u64)> = None;
    for (key, count) in table.iter() {
        match best {
            Some((_, max)) if count <= max => {}
            _ => best = Some((key, count)),
        }
    }
    best.map(|(key, _)| key)
}

impl PartialEq for FrequencyTable {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for FrequencyTable {}

impl<'a> FromIterator<(&'a str, u64)> for FrequencyTable {
    fn from_iter<I: IntoIterator<Item = (&'a str, u64)>>(iter: I) -> Self {
        let mut table = FrequencyTable::new();
        for (key, n) in iter {
            table.add(key, n);
        }
        table
    }
}

impl Serialize for FrequencyTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, count) in &self.entries {
            map.serialize_entry(key, count)?;
        }
        map.end()
    }
}

struct TableVisitor;

impl<'de> Visitor<'de> for TableVisitor {
    type Value = FrequencyTable;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of string keys to counts")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut table = FrequencyTable::new();
        while let Some((key, count)) = access.next_entry::<String, u64>()? {
            table.add(&key, count);
        }
        Ok(table)
    }
}

impl<'de> Deserialize<'de> for FrequencyTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(TableVisitor)
    }
}
