//! Parsers for podman's JSON output.
//!
//! Everything here takes raw text and knows nothing about processes, so it
//! can be tested against captured output from any podman release.

use crate::domain::{ContainerRecord, ImageRecord, Version};
use crate::error::{PodmanError, Result};
use serde::Deserialize;
use serde::de::DeserializeOwned;

#[derive(Deserialize)]
struct VersionReport {
    #[serde(rename = "Client")]
    client: Option<VersionSection>,
    #[serde(rename = "Version")]
    version: Option<String>,
}

#[derive(Deserialize)]
struct VersionSection {
    #[serde(rename = "Version")]
    version: Option<String>,
}

/// Extracts the client version from `podman version --format json`.
pub fn parse_version(raw: &str) -> Result<Version> {
    let report: VersionReport =
        serde_json::from_str(raw.trim()).map_err(|e| PodmanError::parse("version", e))?;

    let version = report
        .client
        .and_then(|c| c.version)
        .or(report.version)
        .ok_or_else(|| PodmanError::parse("version", "no Client.Version field"))?;

    Version::parse_lenient(&version)
}

/// Parses `podman ps --format json`.
pub fn parse_containers(raw: &str) -> Result<Vec<ContainerRecord>> {
    parse_list("container list", raw)
}

/// Parses `podman images --format json`.
pub fn parse_images(raw: &str) -> Result<Vec<ImageRecord>> {
    parse_list("image list", raw)
}

// Some podman releases print nothing at all instead of `[]` when the list is empty.
fn parse_list<T: DeserializeOwned>(what: &'static str, raw: &str) -> Result<Vec<T>> {
    let raw = raw.trim();
    if raw.is_empty() || raw == "null" {
        return Ok(Vec::new());
    }

    serde_json::from_str(raw).map_err(|e| PodmanError::parse(what, e))
}
