use serde::{Deserialize, Deserializer};
use std::collections::HashMap;

pub const TOOLBOX_LABELS: [&str; 2] = [
    "com.github.containers.toolbox",
    "com.github.debarshiray.toolbox",
];

/// One entry of `podman ps --format json`.
///
/// Accepts both the current shape (`Id`, `Names: [..]`) and the one emitted
/// by podman 1.x (`ID`, `Names: ".."`).
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ContainerRecord {
    #[serde(rename = "Id", alias = "ID")]
    pub id: String,
    #[serde(rename = "Names", default, deserialize_with = "one_or_many")]
    pub names: Vec<String>,
    #[serde(rename = "Image", default, deserialize_with = "null_as_default")]
    pub image: String,
    #[serde(rename = "State", default, deserialize_with = "text_or_number")]
    pub state: String,
    #[serde(rename = "Status", default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(rename = "Created", default, deserialize_with = "unix_seconds")]
    pub created: Option<i64>,
    #[serde(rename = "Labels", default, deserialize_with = "null_as_default")]
    pub labels: HashMap<String, String>,
}

impl ContainerRecord {
    /// Primary name, as shown by `podman ps`.
    pub fn name(&self) -> Option<&str> {
        self.names.first().map(String::as_str)
    }

    pub fn is_running(&self) -> bool {
        self.state.eq_ignore_ascii_case("running")
    }

    pub fn is_toolbox(&self) -> bool {
        has_toolbox_label(&self.labels)
    }
}

/// One entry of `podman images --format json`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ImageRecord {
    #[serde(rename = "Id", alias = "ID", alias = "id")]
    pub id: String,
    #[serde(
        rename = "Names",
        alias = "names",
        default,
        deserialize_with = "one_or_many"
    )]
    pub names: Vec<String>,
    #[serde(
        rename = "Created",
        alias = "created",
        default,
        deserialize_with = "unix_seconds"
    )]
    pub created: Option<i64>,
    #[serde(rename = "Size", alias = "size", default)]
    pub size: Option<u64>,
    #[serde(
        rename = "Labels",
        alias = "labels",
        default,
        deserialize_with = "null_as_default"
    )]
    pub labels: HashMap<String, String>,
}

impl ImageRecord {
    pub fn is_toolbox(&self) -> bool {
        has_toolbox_label(&self.labels)
    }
}

fn has_toolbox_label(labels: &HashMap<String, String>) -> bool {
    TOOLBOX_LABELS
        .iter()
        .any(|key| labels.get(*key).is_some_and(|v| v == "true"))
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Names {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<Names>::deserialize(deserializer)? {
        Some(Names::One(name)) => name
            .split(',')
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(String::from)
            .collect(),
        Some(Names::Many(names)) => names,
        None => Vec::new(),
    })
}

fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => s,
        serde_json::Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

// podman 1.x reported a human-readable string here; only the numeric form is kept.
fn unix_seconds<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(serde_json::Value::deserialize(deserializer)?.as_i64())
}
