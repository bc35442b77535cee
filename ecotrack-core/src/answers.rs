//! Answer sets: the options a household picked on one survey submission.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A chosen option code, e.g. `"GAS"` or `"50"`.
///
/// Integer codes (the renewable percentage) are kept in their decimal form so
/// every lookup goes through the same string-keyed weight table.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "RawCode")]
pub struct OptionCode(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCode {
    Text(String),
    Int(i64),
}

impl From<RawCode> for OptionCode {
    fn from(raw: RawCode) -> Self {
        match raw {
            RawCode::Text(s) => Self(s.trim().to_string()),
            RawCode::Int(n) => Self(n.to_string()),
        }
    }
}

impl OptionCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for OptionCode {
    fn from(s: &str) -> Self {
        Self(s.trim().to_string())
    }
}

impl From<String> for OptionCode {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<u32> for OptionCode {
    fn from(n: u32) -> Self {
        Self(n.to_string())
    }
}

impl fmt::Display for OptionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Question-key → option-code mapping for one survey instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSet {
    answers: BTreeMap<String, OptionCode>,
}

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, question_key: impl Into<String>, option: impl Into<OptionCode>) -> Self {
        self.insert(question_key, option);
        self
    }

    pub fn insert(&mut self, question_key: impl Into<String>, option: impl Into<OptionCode>) {
        self.answers.insert(question_key.into(), option.into());
    }

    /// The option chosen for `question_key`, if answered.
    pub fn get(&self, question_key: &str) -> Option<&str> {
        self.answers.get(question_key).map(OptionCode::as_str)
    }

    pub fn contains(&self, question_key: &str) -> bool {
        self.answers.contains_key(question_key)
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.answers.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for AnswerSet
where
    K: Into<String>,
    V: Into<OptionCode>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = AnswerSet::new();
        for (k, v) in iter {
            set.insert(k, v);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_and_lookup() {
        let answers = AnswerSet::new()
            .with("home_type", "APT")
            .with("renewable_pct", 50u32);
        assert_eq!(answers.get("home_type"), Some("APT"));
        assert_eq!(answers.get("renewable_pct"), Some("50"));
        assert_eq!(answers.get("car_type"), None);
        assert_eq!(answers.len(), 2);
    }

    #[test]
    fn test_codes_are_trimmed() {
        let answers: AnswerSet = [("lighting_type", " LED ")].into_iter().collect();
        assert_eq!(answers.get("lighting_type"), Some("LED"));
    }

    #[test]
    fn test_deserialize_mixed_codes() {
        let json = r#"{"primary_heating": "ELEC", "renewable_pct": 75}"#;
        let answers: AnswerSet = serde_json::from_str(json).unwrap();
        assert_eq!(answers.get("primary_heating"), Some("ELEC"));
        assert_eq!(answers.get("renewable_pct"), Some("75"));
    }

    #[test]
    fn test_serialize_flat_object() {
        let answers = AnswerSet::new().with("compost_waste", "YES");
        let json = serde_json::to_string(&answers).unwrap();
        assert_eq!(json, r#"{"compost_waste":"YES"}"#);
    }
}
