//! Workflow execution identity.
//!
//! A workflow execution is named by `(hostname, transaction_id)`; the
//! transaction id is only unique per host. Both parts are opaque strings and
//! travel through URLs as individually percent-encoded path segments.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Which half of the identity a condition refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityField {
    Hostname,
    TransactionId,
}

impl fmt::Display for IdentityField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentityField::Hostname => write!(f, "hostname"),
            IdentityField::TransactionId => write!(f, "transaction id"),
        }
    }
}

/// A drill-down identity that could not be built
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedIdentity {
    #[error("missing {0} segment")]
    Missing(IdentityField),

    #[error("{0} segment does not decode to UTF-8")]
    Encoding(IdentityField),
}

/// Identity of one workflow execution
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, utoipa::ToSchema)]
pub struct WorkflowIdentity {
    hostname: String,
    transaction_id: String,
}

impl WorkflowIdentity {
    pub fn new(
        hostname: impl Into<String>,
        transaction_id: impl Into<String>,
    ) -> Result<Self, MalformedIdentity> {
        let hostname = hostname.into();
        let transaction_id = transaction_id.into();

        if hostname.is_empty() {
            return Err(MalformedIdentity::Missing(IdentityField::Hostname));
        }
        if transaction_id.is_empty() {
            return Err(MalformedIdentity::Missing(IdentityField::TransactionId));
        }

        Ok(Self {
            hostname,
            transaction_id,
        })
    }

    /// Decode an identity from two raw (still percent-encoded) path segments
    pub fn from_segments(hostname: &str, transaction_id: &str) -> Result<Self, MalformedIdentity> {
        let hostname = decode_segment(hostname, IdentityField::Hostname)?;
        let transaction_id = decode_segment(transaction_id, IdentityField::TransactionId)?;
        Self::new(hostname, transaction_id)
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn transaction_id(&self) -> &str {
        &self.transaction_id
    }

    pub fn encoded_hostname(&self) -> String {
        encode_segment(&self.hostname)
    }

    pub fn encoded_transaction_id(&self) -> String {
        encode_segment(&self.transaction_id)
    }

    /// Canonical `{hostname}/{transaction_id}` path fragment
    pub fn to_path_segments(&self) -> String {
        format!(
            "{}/{}",
            self.encoded_hostname(),
            self.encoded_transaction_id()
        )
    }

    /// Id of the backing workflow document (`{txId}-{hostname}`)
    pub fn document_id(&self) -> String {
        format!("{}-{}", self.transaction_id, self.hostname)
    }
}

impl fmt::Display for WorkflowIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.hostname, self.transaction_id)
    }
}

/// Percent-encode one segment. Dot segments are escaped too, since clients
/// collapse a literal `.` or `..` before sending the request.
fn encode_segment(value: &str) -> String {
    match value {
        "." => "%2E".to_string(),
        ".." => "%2E%2E".to_string(),
        _ => urlencoding::encode(value).into_owned(),
    }
}

fn decode_segment(raw: &str, field: IdentityField) -> Result<String, MalformedIdentity> {
    if raw.is_empty() {
        return Err(MalformedIdentity::Missing(field));
    }
    urlencoding::decode(raw)
        .map(|decoded| decoded.into_owned())
        .map_err(|_| MalformedIdentity::Encoding(field))
}
