use std::collections::{BTreeMap, BTreeSet};

/// Locale code to displayable value, ordered by locale.
pub type LocaleValues = BTreeMap<String, String>;

/// Translation keys and their per-locale values.
///
/// Built once before injection starts and only read afterwards, so it can
/// be shared across worker threads by reference.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationKeyMap {
    entries: BTreeMap<String, LocaleValues>,
}

impl TranslationKeyMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        key: impl Into<String>,
        locale: impl Into<String>,
        value: impl Into<String>,
    ) {
        self.entries
            .entry(key.into())
            .or_default()
            .insert(locale.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&LocaleValues> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &LocaleValues)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn locales(&self) -> BTreeSet<&str> {
        self.entries
            .values()
            .flat_map(|values| values.keys().map(String::as_str))
            .collect()
    }

    /// Drop every locale not listed in `locales`. An empty filter keeps all.
    pub fn retain_locales(&mut self, locales: &[String]) {
        if locales.is_empty() {
            return;
        }
        for values in self.entries.values_mut() {
            values.retain(|locale, _| locales.contains(locale));
        }
        self.entries.retain(|_, values| !values.is_empty());
    }
}

impl<K, L, V> FromIterator<(K, L, V)> for TranslationKeyMap
where
    K: Into<String>,
    L: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, L, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, locale, value) in iter {
            map.insert(key, locale, value);
        }
        map
    }
}
