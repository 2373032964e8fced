//! Domain entities: core data structures

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Caller-chosen key of a redirect mapping.
///
/// May contain `/` to denote a namespace, e.g. `yt/video`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShortId(String);

impl ShortId {
    /// Validate and wrap a short ID. Surrounding whitespace is trimmed.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DomainError::EmptyShortId);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShortId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Destination a short ID resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetUrl(String);

impl TargetUrl {
    /// Validate and wrap a target URL.
    ///
    /// Only emptiness is checked here; the service decides what it accepts.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DomainError::EmptyTargetUrl);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TargetUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One mapping entry as understood by the remote service.
///
/// Serializes to the wire shape of `POST /api/create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortLink {
    pub short_id: ShortId,
    pub target_url: TargetUrl,
}

impl ShortLink {
    pub fn new(short_id: ShortId, target_url: TargetUrl) -> Self {
        Self {
            short_id,
            target_url,
        }
    }
}

/// Decoded body of `GET /api/list`: short ID to target URL.
///
/// Backed by a `BTreeMap` so iteration is sorted by short ID.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinkListing(BTreeMap<String, String>);

impl LinkListing {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries in short ID order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
