//! Flat `<field>_g` / `<field>_s` / `<field>_c` JSON maps.

use super::money::{Gsc, Money};
use serde::Serialize;
use serde_json::{Map, Value};

/// Ordered list of named money figures, serialized as a flat display map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoneyFields {
    entries: Vec<(String, Money)>,
}

impl MoneyFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: Money) -> Self {
        self.push(name, value);
        self
    }

    /// Add or replace a named figure, keeping first-insertion order.
    pub fn push(&mut self, name: impl Into<String>, value: Money) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<Money> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Money)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_json_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        for (name, value) in &self.entries {
            insert_gsc(&mut map, name, value.to_display());
        }
        map
    }
}

impl Serialize for MoneyFields {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json_map().serialize(serializer)
    }
}

pub fn insert_gsc(map: &mut Map<String, Value>, name: &str, gsc: Gsc) {
    map.insert(format!("{}_g", name), Value::from(gsc.gold));
    map.insert(format!("{}_s", name), Value::from(gsc.silver));
    map.insert(format!("{}_c", name), Value::from(gsc.copper));
}

/// Read a `<name>_g/_s/_c` triple back out of a flat map.
///
/// Returns `None` if any limb is missing or not an integer.
pub fn read_gsc(map: &Map<String, Value>, name: &str) -> Option<Gsc> {
    let limb = |suffix: &str| map.get(&format!("{}_{}", name, suffix))?.as_i64();
    Some(Gsc::new(limb("g")?, limb("s")?, limb("c")?))
}
