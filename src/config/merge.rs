//! Layer merging for configuration tiers.
//!
//! Each tier contributes a [`ConfigLayer`]: a partial record where `None`
//! means "not specified here". Layers are folded lowest priority first, and the
//! last layer that sets a field wins. Sequences are replaced entirely, not
//! concatenated.

use super::types::{
    Configuration, DEFAULT_STACK_DIR, DEFAULT_STACK_NAME_PATTERN, DEFAULT_TERRAFORM_DIR,
};
use serde::{Deserialize, Deserializer, de};
use serde_yaml::{Mapping, Value};

/// One tier's contribution to the configuration.
///
/// Build it from a config file with [`ConfigLayer::from_yaml`]: keys match
/// case-insensitively, unknown keys are ignored and an explicit YAML `null`
/// counts as unset. Scalars are accepted where strings are expected, and a
/// single string for `StackDirs` is split on `,`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ConfigLayer {
    #[serde(rename = "stackdirs", default, deserialize_with = "string_list")]
    pub stack_dirs: Option<Vec<String>>,

    #[serde(rename = "terraformdir", default, deserialize_with = "string")]
    pub terraform_dir: Option<String>,

    #[serde(rename = "stacknamepattern", default, deserialize_with = "string")]
    pub stack_name_pattern: Option<String>,
}

/// A YAML scalar read as text.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Str(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
}

impl Scalar {
    fn into_string(self) -> String {
        match self {
            Scalar::Str(s) => s,
            Scalar::Int(n) => n.to_string(),
            Scalar::UInt(n) => n.to_string(),
            Scalar::Float(n) => n.to_string(),
            // Matches the weak decoding of booleans into strings
            Scalar::Bool(b) => if b { "1" } else { "0" }.to_string(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ScalarOrSeq {
    Seq(Vec<Scalar>),
    One(Scalar),
}

fn string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(Scalar::into_string))
}

fn string_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        Option::<ScalarOrSeq>::deserialize(deserializer)?.map(|value| match value {
            ScalarOrSeq::Seq(items) => items.into_iter().map(Scalar::into_string).collect(),
            ScalarOrSeq::One(one) => {
                let joined = one.into_string();
                if joined.is_empty() {
                    Vec::new()
                } else {
                    joined.split(',').map(String::from).collect()
                }
            }
        }),
    )
}

impl ConfigLayer {
    /// Decode a parsed config document. Top-level keys are lowercased first,
    /// so `StackDirs`, `stackDirs` and `stackdirs` are the same key; when two
    /// spellings collide the later one wins.
    pub fn from_yaml(raw: Value) -> Result<Self, serde_yaml::Error> {
        let raw = match raw {
            Value::Null => return Ok(Self::default()),
            Value::Mapping(map) => Value::Mapping(
                map.into_iter()
                    .map(|(key, value)| match key {
                        Value::String(key) => (Value::String(key.to_lowercase()), value),
                        other => (other, value),
                    })
                    .collect::<Mapping>(),
            ),
            _ => {
                return Err(de::Error::custom(
                    "config file must be a mapping of keys to values",
                ));
            }
        };
        serde_yaml::from_value(raw)
    }

    /// Built-in defaults (lowest priority).
    pub fn defaults() -> Self {
        Self {
            stack_dirs: Some(vec![DEFAULT_STACK_DIR.to_string()]),
            terraform_dir: Some(DEFAULT_TERRAFORM_DIR.to_string()),
            stack_name_pattern: Some(DEFAULT_STACK_NAME_PATTERN.to_string()),
        }
    }

    /// Whether this layer sets nothing at all.
    pub fn is_empty(&self) -> bool {
        self.stack_dirs.is_none() && self.terraform_dir.is_none() && self.stack_name_pattern.is_none()
    }

    /// Merge `overlay` on top of `self`; fields set in `overlay` win.
    pub fn merge(self, overlay: ConfigLayer) -> ConfigLayer {
        ConfigLayer {
            stack_dirs: overlay.stack_dirs.or(self.stack_dirs),
            terraform_dir: overlay.terraform_dir.or(self.terraform_dir),
            stack_name_pattern: overlay.stack_name_pattern.or(self.stack_name_pattern),
        }
    }

    /// Decode into the typed record. Unset fields become empty and are
    /// caught by validation.
    pub fn into_configuration(self) -> Configuration {
        Configuration {
            stack_name_pattern: self.stack_name_pattern.unwrap_or_default(),
            stack_dirs: self.stack_dirs.unwrap_or_default(),
            terraform_dir: self.terraform_dir.unwrap_or_default(),
            ..Default::default()
        }
    }
}

/// Merge layers in order, with later layers taking precedence.
///
/// Equivalent to folding [`ConfigLayer::merge`] over the list.
pub fn merge_layers(layers: impl IntoIterator<Item = ConfigLayer>) -> ConfigLayer {
    layers
        .into_iter()
        .fold(ConfigLayer::default(), ConfigLayer::merge)
}

/// Treat an empty string as "not specified".
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
