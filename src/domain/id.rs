//! Identifiers for shipments and audit log entries
//!
//! ID Format:
//! - Shipment IDs: `s-{7-char-hash}` (e.g., `s-7f2b4c1`)
//! - Audit entry IDs: `e-{7-char-hash}` (e.g., `e-9d3e5f2`)
//!
//! Hash is derived from a seed string + creation timestamp, ensuring
//! uniqueness. The same seed at different times produces different IDs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum IdError {
    #[error("Invalid shipment ID format: expected 's-{{7-char-hash}}', got '{0}'")]
    InvalidShipmentId(String),

    #[error("Invalid audit entry ID format: expected 'e-{{7-char-hash}}', got '{0}'")]
    InvalidAuditEntryId(String),
}

/// Generates a 7-character hash from a seed string and timestamp
fn generate_hash(seed: &str, timestamp: DateTime<Utc>) -> String {
    let input = format!("{}{}", seed, timestamp.timestamp_nanos_opt().unwrap_or(0));
    let hash = blake3::hash(input.as_bytes());
    let hex = hash.to_hex();
    hex[..7].to_string()
}

fn valid_hash(hash: &str) -> bool {
    hash.len() == 7 && hash.chars().all(|c| c.is_ascii_hexdigit())
}

/// Shipment ID in the format `s-{7-char-hash}`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ShipmentId {
    hash: String,
}

impl ShipmentId {
    /// Creates a new shipment ID from a seed (customer or booking reference)
    /// and timestamp
    pub fn new(seed: &str, timestamp: DateTime<Utc>) -> Self {
        Self {
            hash: generate_hash(seed, timestamp),
        }
    }

    /// Returns the hash portion of the ID
    pub fn hash(&self) -> &str {
        &self.hash
    }
}

impl fmt::Display for ShipmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s-{}", self.hash)
    }
}

impl FromStr for ShipmentId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let hash = s
            .strip_prefix("s-")
            .ok_or_else(|| IdError::InvalidShipmentId(s.to_string()))?;

        if !valid_hash(hash) {
            return Err(IdError::InvalidShipmentId(s.to_string()));
        }

        Ok(Self {
            hash: hash.to_string(),
        })
    }
}

impl TryFrom<String> for ShipmentId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ShipmentId> for String {
    fn from(id: ShipmentId) -> Self {
        id.to_string()
    }
}

/// Audit entry ID in the format `e-{7-char-hash}`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AuditEntryId {
    hash: String,
}

impl AuditEntryId {
    /// Creates a new audit entry ID from a seed (shipment id + field) and
    /// timestamp
    pub fn new(seed: &str, timestamp: DateTime<Utc>) -> Self {
        Self {
            hash: generate_hash(seed, timestamp),
        }
    }

    /// Returns the hash portion of the ID
    pub fn hash(&self) -> &str {
        &self.hash
    }
}

impl fmt::Display for AuditEntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e-{}", self.hash)
    }
}

impl FromStr for AuditEntryId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let hash = s
            .strip_prefix("e-")
            .ok_or_else(|| IdError::InvalidAuditEntryId(s.to_string()))?;

        if !valid_hash(hash) {
            return Err(IdError::InvalidAuditEntryId(s.to_string()));
        }

        Ok(Self {
            hash: hash.to_string(),
        })
    }
}

impl TryFrom<String> for AuditEntryId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AuditEntryId> for String {
    fn from(id: AuditEntryId) -> Self {
        id.to_string()
    }
}
