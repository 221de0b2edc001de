use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::io::Read;

/// An answer exactly as the session layer stored it.
///
/// Stored sessions are not typed: the same question may come back as `3`,
/// `"3"` or `true` depending on which client wrote it. Anything else
/// (`null`, arrays, objects) lands in `Other` and normalizes to missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawAnswer {
    Bool(bool),
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl RawAnswer {
    pub fn is_null(&self) -> bool {
        matches!(self, RawAnswer::Other(serde_json::Value::Null))
    }
}

impl fmt::Display for RawAnswer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawAnswer::Bool(value) => write!(f, "{value}"),
            RawAnswer::Number(value) => write!(f, "{value}"),
            RawAnswer::Text(value) => f.write_str(value),
            RawAnswer::Other(serde_json::Value::Null) => Ok(()),
            RawAnswer::Other(value) => write!(f, "{value}"),
        }
    }
}

impl From<f64> for RawAnswer {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for RawAnswer {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<bool> for RawAnswer {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for RawAnswer {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Answers keyed by question id. The scorer only ever reads from it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSheet(pub BTreeMap<String, RawAnswer>);

impl AnswerSheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, serde_json::Error> {
        serde_json::from_reader(reader)
    }

    pub fn get(&self, question_id: &str) -> Option<&RawAnswer> {
        self.0.get(question_id)
    }

    pub fn insert(&mut self, question_id: impl Into<String>, answer: impl Into<RawAnswer>) {
        self.0.insert(question_id.into(), answer.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for AnswerSheet
where
    K: Into<String>,
    V: Into<RawAnswer>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}
