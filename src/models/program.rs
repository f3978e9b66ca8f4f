use serde::{Deserialize, Serialize, Serializer, ser::SerializeMap};
use std::str::FromStr;

/// One catalog entry. All fields are opaque strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub name: String,
    pub rss: String,
    pub image: String,
    pub description: String,
    pub category: String,
}

/// What to do when one submission names the same key twice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicateKeyPolicy {
    #[default]
    Reject,
    /// Later entries replace earlier ones.
    Overwrite,
}

impl FromStr for DuplicateKeyPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "overwrite" => Ok(Self::Overwrite),
            other => Err(format!("unknown duplicate key policy '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateKey(pub String);

/// Keyed programs in submission order. Serializes as a JSON object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    entries: Vec<(String, Program)>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        key: String,
        program: Program,
        policy: DuplicateKeyPolicy,
    ) -> Result<(), DuplicateKey> {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(_) if policy == DuplicateKeyPolicy::Reject => Err(DuplicateKey(key)),
            Some((_, existing)) => {
                *existing = program;
                Ok(())
            }
            None => {
                self.entries.push((key, program));
                Ok(())
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&Program> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, p)| p)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Three-space indented JSON, the layout the catalog file has always had.
    pub fn to_pretty_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        let mut out = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"   ");
        let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
        self.serialize(&mut ser)?;
        Ok(out)
    }
}

impl Serialize for Catalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, program) in &self.entries {
            map.serialize_entry(key, program)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> Program {
        Program {
            name: name.to_string(),
            ..Program::default()
        }
    }

    #[test]
    fn reject_policy_refuses_repeated_key() {
        let mut catalog = Catalog::new();
        catalog
            .insert("abc".into(), named("first"), DuplicateKeyPolicy::Reject)
            .unwrap();

        let err = catalog
            .insert("abc".into(), named("second"), DuplicateKeyPolicy::Reject)
            .unwrap_err();
        assert_eq!(err, DuplicateKey("abc".into()));
        assert_eq!(catalog.get("abc"), Some(&named("first")));
    }

    #[test]
    fn overwrite_policy_keeps_position_and_last_value() {
        let mut catalog = Catalog::new();
        for (key, name) in [("a", "1"), ("b", "2"), ("a", "3")] {
            catalog
                .insert(key.into(), named(name), DuplicateKeyPolicy::Overwrite)
                .unwrap();
        }

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.keys().collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(catalog.get("a"), Some(&named("3")));
    }

    #[test]
    fn json_keeps_submission_order_and_field_layout() {
        let mut catalog = Catalog::new();
        catalog
            .insert("zeta".into(), named("Z"), DuplicateKeyPolicy::Reject)
            .unwrap();
        catalog
            .insert("alpha".into(), named("A"), DuplicateKeyPolicy::Reject)
            .unwrap();

        let json = String::from_utf8(catalog.to_pretty_json().unwrap()).unwrap();
        let expected = r#"{
   "zeta": {
      "name": "Z",
      "rss": "",
      "image": "",
      "description": "",
      "category": ""
   },
   "alpha": {
      "name": "A",
      "rss": "",
      "image": "",
      "description": "",
      "category": ""
   }
}"#;
        assert_eq!(json, expected);
    }

    #[test]
    fn policy_parses_case_insensitively() {
        assert_eq!("Overwrite".parse(), Ok(DuplicateKeyPolicy::Overwrite));
        assert_eq!(" reject ".parse(), Ok(DuplicateKeyPolicy::Reject));
        assert!("merge".parse::<DuplicateKeyPolicy>().is_err());
    }
}
