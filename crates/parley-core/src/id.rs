//! Identifier generation for stored entities.
//!
//! Agents and conversations are keyed by a creation timestamp with second
//! resolution. A random suffix keeps two entities created within the same
//! second from colliding on the same key.

use chrono::{DateTime, Local, Utc};
use uuid::Uuid;

/// Timestamp layout used as the leading segment of every identifier.
const ID_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Length of the random hex suffix appended to the timestamp.
const SUFFIX_LEN: usize = 8;

/// Generates a new identifier of the form `YYYYmmdd_HHMMSS_xxxxxxxx`.
pub fn generate_id() -> String {
    generate_id_at(Local::now())
}

/// Generates an identifier for the given instant.
pub fn generate_id_at(at: DateTime<Local>) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!(
        "{}_{}",
        at.format(ID_TIMESTAMP_FORMAT),
        &suffix[..SUFFIX_LEN]
    )
}

/// Current time as an RFC 3339 string, the format used for `created_at`.
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339()
}
