use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::ops::Deref;
use thiserror::Error;

/// Errors raised while mapping categories to codes
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("Invalid value '{value}' for '{field}'. Allowed values: {allowed:?}")]
    UnknownCategory {
        field: String,
        value: String,
        allowed: Vec<String>,
    },

    #[error("Encoder for '{0}' not found in model artifacts.")]
    MissingEncoder(String),

    #[error("Duplicate class '{0}' in encoder")]
    DuplicateClass(String),
}

/// Serialized form of a label encoder
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelEncoderRepr {
    pub classes: Vec<String>,
}

/// Bidirectional category <-> code mapping fixed at training time
///
/// Codes are positions in the class list, so the list order is part of the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "LabelEncoderRepr", into = "LabelEncoderRepr")]
pub struct LabelEncoder {
    classes: Vec<String>,
    codes: HashMap<String, usize>,
}

impl LabelEncoder {
    pub fn new(classes: Vec<String>) -> Result<Self, EncodeError> {
        let mut codes = HashMap::with_capacity(classes.len());
        for (code, class) in classes.iter().enumerate() {
            if codes.insert(class.clone(), code).is_some() {
                return Err(EncodeError::DuplicateClass(class.clone()));
            }
        }
        Ok(Self { classes, codes })
    }

    /// Known categories in code order
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Code of `value`, or an error naming `field` and every allowed class
    pub fn encode(&self, field: &str, value: &str) -> Result<usize, EncodeError> {
        self.codes
            .get(value)
            .copied()
            .ok_or_else(|| EncodeError::UnknownCategory {
                field: field.to_string(),
                value: value.to_string(),
                allowed: self.classes.clone(),
            })
    }
}

impl TryFrom<LabelEncoderRepr> for LabelEncoder {
    type Error = EncodeError;

    fn try_from(repr: LabelEncoderRepr) -> Result<Self, Self::Error> {
        Self::new(repr.classes)
    }
}

impl From<LabelEncoder> for LabelEncoderRepr {
    fn from(encoder: LabelEncoder) -> Self {
        Self { classes: encoder.classes }
    }
}

/// Encoders keyed by source field, remembering the order they were declared in
///
/// Lookups go through the sorted map; iteration and serialization follow the
/// declaration order of the bundle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncoderMap {
    order: Vec<String>,
    encoders: BTreeMap<String, LabelEncoder>,
}

impl EncoderMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `encoder` for `field`; a repeated field keeps its first position
    pub fn insert(&mut self, field: impl Into<String>, encoder: LabelEncoder) {
        let field = field.into();
        if self.encoders.insert(field.clone(), encoder).is_none() {
            self.order.push(field);
        }
    }

    /// Fields and encoders in declaration order
    pub fn in_order(&self) -> impl Iterator<Item = (&str, &LabelEncoder)> + '_ {
        self.order
            .iter()
            .filter_map(move |field| self.encoders.get(field).map(|encoder| (field.as_str(), encoder)))
    }
}

impl Deref for EncoderMap {
    type Target = BTreeMap<String, LabelEncoder>;

    fn deref(&self) -> &Self::Target {
        &self.encoders
    }
}

impl FromIterator<(String, LabelEncoder)> for EncoderMap {
    fn from_iter<I: IntoIterator<Item = (String, LabelEncoder)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (field, encoder) in iter {
            map.insert(field, encoder);
        }
        map
    }
}

impl From<BTreeMap<String, LabelEncoder>> for EncoderMap {
    fn from(encoders: BTreeMap<String, LabelEncoder>) -> Self {
        encoders.into_iter().collect()
    }
}

impl Serialize for EncoderMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.order.len()))?;
        for (field, encoder) in self.in_order() {
            map.serialize_entry(field, encoder)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for EncoderMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EncoderMapVisitor;

        impl<'de> Visitor<'de> for EncoderMapVisitor {
            type Value = EncoderMap;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of field names to label encoders")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut map = EncoderMap::new();
                while let Some((field, encoder)) = access.next_entry::<String, LabelEncoder>()? {
                    map.insert(field, encoder);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(EncoderMapVisitor)
    }
}

/// Known classes of every encoder, serialized as a JSON object in declaration order
#[derive(Debug, Clone, Copy)]
pub struct EncoderClasses<'a>(pub &'a EncoderMap);

impl EncoderClasses<'_> {
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(LabelEncoder::classes)
    }
}

impl Serialize for EncoderClasses<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (field, encoder) in self.0.in_order() {
            map.serialize_entry(field, encoder.classes())?;
        }
        map.end()
    }
}

/// Name of the feature column holding the codes of `field`
pub fn encoded_column(field: &str) -> String {
    format!("{}_encoded", field)
}

/// Source field of an encoded feature column, if `column` is one
pub fn source_field(column: &str) -> Option<&str> {
    column.strip_suffix("_encoded").filter(|field| !field.is_empty())
}

/// Encode `value` with the encoder registered for `field`
pub fn encode_field(
    encoders: &BTreeMap<String, LabelEncoder>,
    field: &str,
    value: &str,
) -> Result<usize, EncodeError> {
    encoders
        .get(field)
        .ok_or_else(|| EncodeError::MissingEncoder(field.to_string()))?
        .encode(field, value)
}
