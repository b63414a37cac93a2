//! Snowflake ID Generator
//!
//! Twitter-style distributed unique ID generation, plus the serde helpers
//! used to expose ids as decimal strings.

use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;
use serde::{de, Deserialize, Deserializer};

/// Service epoch (2024-01-01T00:00:00.000Z)
pub const EPOCH: u64 = 1704067200000;

const SEQUENCE_MASK: u64 = 0xFFF;

/// Snowflake ID generator
pub struct SnowflakeGenerator {
    machine_id: u64,
    node_id: u64,
    /// (last timestamp, sequence within that millisecond)
    state: Mutex<(u64, u64)>,
}

impl SnowflakeGenerator {
    /// Create a new snowflake generator
    pub fn new(machine_id: u64, node_id: u64) -> Self {
        Self {
            machine_id: machine_id & 0x1F, // 5 bits
            node_id: node_id & 0x1F,       // 5 bits
            state: Mutex::new((0, 0)),
        }
    }

    /// Generate a new snowflake ID
    pub fn generate(&self) -> i64 {
        let mut state = self.state.lock();
        let mut timestamp = current_timestamp().max(state.0);

        let sequence = if timestamp == state.0 {
            let next = (state.1 + 1) & SEQUENCE_MASK;
            if next == 0 {
                // Sequence exhausted for this millisecond; borrow the next one.
                timestamp += 1;
            }
            next
        } else {
            0
        };
        *state = (timestamp, sequence);

        let id = ((timestamp - EPOCH) << 22)
            | (self.machine_id << 17)
            | (self.node_id << 12)
            | sequence;

        id as i64
    }
}

/// Get current timestamp in milliseconds
fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(EPOCH)
        .max(EPOCH)
}

/// Parse snowflake from string
pub fn from_string(s: &str) -> Result<i64, std::num::ParseIntError> {
    s.trim().parse()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(i64),
    Text(String),
}

impl RawId {
    fn into_id<E: de::Error>(self) -> Result<i64, E> {
        match self {
            RawId::Number(n) => Ok(n),
            RawId::Text(s) => from_string(&s)
                .map_err(|_| E::custom(format!("invalid id `{}`", s))),
        }
    }
}

/// Accept an id written either as a JSON string or a JSON number.
pub fn deserialize_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    RawId::deserialize(deserializer)?.into_id()
}

/// [`deserialize_id`] for optional fields.
pub fn deserialize_optional_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<RawId>::deserialize(deserializer)?
        .map(RawId::into_id)
        .transpose()
}

/// [`deserialize_id`] for lists of ids.
pub fn deserialize_ids<'de, D>(deserializer: D) -> Result<Vec<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Vec::<RawId>::deserialize(deserializer)?
        .into_iter()
        .map(RawId::into_id)
        .collect()
}

/// [`deserialize_ids`] for optional lists.
pub fn deserialize_optional_ids<'de, D>(deserializer: D) -> Result<Option<Vec<i64>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Vec<RawId>>::deserialize(deserializer)?
        .map(|ids| ids.into_iter().map(RawId::into_id).collect())
        .transpose()
}
