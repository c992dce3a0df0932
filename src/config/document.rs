//! The key=value settings document the vkBasalt layer reads.

/// An ordered, unique-key settings mapping.
///
/// Keys are fixed and case-sensitive on the consumer side; keys we do
/// not recognize are carried through verbatim so newer layer versions
/// keep working.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsDocument {
    entries: Vec<(String, String)>,
}

impl SettingsDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a key, replacing any existing value.
    pub fn set(&mut self, key: &str, value: &str) {
        for entry in &mut self.entries {
            if entry.0 == key {
                entry.1 = value.to_string();
                return;
            }
        }
        self.entries.push((key.to_string(), value.to_string()));
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Parse the consumer's line format. Blank lines and `#` comments
    /// are skipped; later duplicates overwrite earlier ones.
    pub fn parse(input: &str) -> Self {
        let mut doc = Self::new();
        for line in input.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                doc.set(key.trim(), value.trim());
            }
        }
        doc
    }

    /// Serialize back to the consumer's line format.
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        for (key, value) in self.iter() {
            out.push_str(key);
            out.push_str(" = ");
            out.push_str(value);
            out.push('\n');
        }
        out
    }
}

impl std::fmt::Display for SettingsDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.serialize())
    }
}
