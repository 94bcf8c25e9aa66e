use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Clean field names a fix may target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FixField {
    Character,
    Note,
    Response,
}

impl FixField {
    pub const ALL: [FixField; 3] = [FixField::Character, FixField::Note, FixField::Response];

    pub fn as_str(&self) -> &'static str {
        match self {
            FixField::Character => "character",
            FixField::Note => "note",
            FixField::Response => "response",
        }
    }
}

impl fmt::Display for FixField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FixField {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "character" => Ok(FixField::Character),
            "note" => Ok(FixField::Note),
            "response" => Ok(FixField::Response),
            other => Err(ValidationError::UnknownFixField {
                name: other.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for FixField {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<FixField> for String {
    fn from(f: FixField) -> Self {
        f.as_str().to_string()
    }
}

/// One `{name, value}` pair of a fix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixEntry {
    #[serde(rename = "name")]
    pub field: FixField,
    pub value: String,
}

impl FixEntry {
    pub fn new(field: FixField, value: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
        }
    }
}

/// After-the-fact correction of one stored raw entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fix {
    /// Id of the raw entry being corrected.
    pub id: String,
    pub entries: Vec<FixEntry>,
}

impl Fix {
    pub fn new(id: impl Into<String>, entries: Vec<FixEntry>) -> Self {
        Self {
            id: id.into(),
            entries,
        }
    }

    /// Build from untyped `(name, value)` pairs, e.g. an edited table row.
    pub fn from_pairs<I, N, V>(id: impl Into<String>, pairs: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = (N, V)>,
        N: AsRef<str>,
        V: Into<String>,
    {
        let entries = pairs
            .into_iter()
            .map(|(name, value)| Ok(FixEntry::new(name.as_ref().parse()?, value)))
            .collect::<Result<Vec<_>, ValidationError>>()?;
        Ok(Self::new(id, entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_names_parse() {
        for f in FixField::ALL {
            assert_eq!(f.as_str().parse::<FixField>().unwrap(), f);
        }
    }

    #[test]
    fn unknown_name_is_rejected_on_build() {
        let err = Fix::from_pairs("1", [("itemName", "Ring")]).unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnknownFixField {
                name: "itemName".to_string()
            }
        );
    }

    #[test]
    fn unknown_name_is_rejected_on_decode() {
        let res: Result<Fix, _> =
            serde_json::from_str(r#"{"id":"1","entries":[{"name":"player","value":"x"}]}"#);
        assert!(res.is_err(), "raw key `player` is not a fix target");
    }

    #[test]
    fn wire_shape_is_name_value() {
        let fix = Fix::new("7", vec![FixEntry::new(FixField::Note, "30")]);
        let v = serde_json::to_value(&fix).unwrap();
        assert_eq!(v["entries"][0]["name"], "note");
        assert_eq!(v["entries"][0]["value"], "30");
    }
}
