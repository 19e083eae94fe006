//! Chaff obfuscation — hide real fields among type-matched decoys.
//!
//! `add_chaff` turns a plaintext field map into a larger, shuffled map
//! in which each genuine field is intermixed with `ratio` decoys whose
//! values have the same kind (string, number, boolean, date).  After
//! shuffling, every entry is re-keyed to an anonymous sequential name
//! (`field_0 … field_{n-1}`), so nothing about an entry's position or
//! key reveals whether it is real.
//!
//! Each `ChaffField` carries the field name it should be restored
//! under (`original_key`); decoys carry their own throwaway name so
//! real and decoy entries stay shape-identical.  `remove_chaff` keeps
//! the `is_real` entries and restores them under `original_key`.

use std::collections::HashMap;

use chrono::{Duration, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Default number of decoys generated per real field.
pub const DEFAULT_RATIO: u32 = 3;

/// Length of the random suffix appended to transient field keys.
const SUFFIX_LEN: usize = 4;

/// One entry of an obfuscated field map.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChaffField {
    /// The field value — genuine for real entries, synthetic for decoys.
    pub value: Value,

    /// Whether this entry is a genuine field.
    pub is_real: bool,

    /// The key this entry is restored under when the chaff is removed.
    /// For decoys this is the decoy's own randomized name.
    pub original_key: String,
}

/// Obfuscate `fields` by generating `ratio` decoys per real field,
/// shuffling everything, and re-keying as `field_0 … field_{n-1}`.
///
/// Output cardinality is exactly `fields.len() * (ratio + 1)`.
pub fn add_chaff(fields: &Map<String, Value>, ratio: u32) -> HashMap<String, ChaffField> {
    let mut rng = rand::thread_rng();
    let mut entries: Vec<ChaffField> = Vec::with_capacity(fields.len() * (ratio as usize + 1));

    for (key, value) in fields {
        // The real entry, remembering the name it must be restored under.
        entries.push(ChaffField {
            value: value.clone(),
            is_real: true,
            original_key: key.clone(),
        });

        // Type-matched decoys, each under its own randomized name.
        for _ in 0..ratio {
            let suffix: String = (&mut rng)
                .sample_iter(&Alphanumeric)
                .take(SUFFIX_LEN)
                .map(char::from)
                .collect();
            entries.push(ChaffField {
                value: decoy_value(value, &mut rng),
                is_real: false,
                original_key: format!("{key}_{suffix}"),
            });
        }
    }

    // Unbiased Fisher–Yates shuffle: swap position i with a uniformly
    // chosen position in [0, i].  thread_rng is a CSPRNG.
    for i in (1..entries.len()).rev() {
        let j = rng.gen_range(0..=i);
        entries.swap(i, j);
    }

    // Re-key sequentially, discarding the transient randomized names.
    entries
        .into_iter()
        .enumerate()
        .map(|(i, field)| (format!("field_{i}"), field))
        .collect()
}

/// Reverse `add_chaff`: keep only the real entries and restore each
/// under its original field name.
pub fn remove_chaff(obfuscated: &HashMap<String, ChaffField>) -> Map<String, Value> {
    let mut fields = Map::new();
    for entry in obfuscated.values() {
        if entry.is_real {
            fields.insert(entry.original_key.clone(), entry.value.clone());
        }
    }
    fields
}

/// Generate a synthetic value whose kind matches `real`.
///
/// Strings that parse as RFC 3339 timestamps get a random instant
/// within the past year; other strings get 8–15 random alphanumeric
/// characters.  Non-primitive values fall back to a random string.
fn decoy_value<R: Rng>(real: &Value, rng: &mut R) -> Value {
    match real {
        Value::String(s) if chrono::DateTime::parse_from_rfc3339(s).is_ok() => {
            let seconds_back = rng.gen_range(0..365 * 24 * 60 * 60);
            let instant = Utc::now() - Duration::seconds(seconds_back);
            Value::String(instant.to_rfc3339())
        }
        Value::String(_) => Value::String(random_string(rng)),
        Value::Number(_) => Value::from(rng.gen_range(0..1000i64)),
        Value::Bool(_) => Value::Bool(rng.gen_bool(0.5)),
        _ => Value::String(random_string(rng)),
    }
}

/// A random alphanumeric string of 8–15 characters.
fn random_string<R: Rng>(rng: &mut R) -> String {
    let len = rng.gen_range(8..=15);
    rng.sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}
