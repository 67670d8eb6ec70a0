//! Label sets extracted from a single descriptor

/// Label key to raw value, iterated in order of first appearance.
///
/// Built once per descriptor and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelSet {
    labels: Vec<(String, String)>,
}

impl LabelSet {
    /// Returns the raw value for a key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.labels
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Iterates over `(key, value)` pairs in descriptor order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.labels.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    fn assign(&mut self, key: String, value: String) {
        match self.labels.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.labels.push((key, value)),
        }
    }
}

/// Later pairs override earlier ones in place, as repeated `LABEL` assignments do.
impl<K, V> FromIterator<(K, V)> for LabelSet
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = Self::default();
        for (key, value) in iter {
            set.assign(key.into(), value.into());
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_assignment_wins() {
        let labels: LabelSet = [("a", "1"), ("b", "2"), ("a", "3")].into_iter().collect();
        assert_eq!(labels.len(), 2);
        assert_eq!(labels.get("a"), Some("3"));
    }

    #[test]
    fn test_iteration_follows_first_appearance() {
        let labels: LabelSet = [("zebra", "1"), ("apple", "2"), ("zebra", "3")]
            .into_iter()
            .collect();
        let pairs: Vec<(&str, &str)> = labels.iter().collect();
        assert_eq!(pairs, vec![("zebra", "3"), ("apple", "2")]);
    }
}
