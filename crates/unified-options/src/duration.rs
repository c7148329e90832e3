//! Serde helpers for whole-number duration fields (`maxCommitTimeMS`,
//! `maxStalenessSeconds`, `wtimeoutMS`).
//!
//! Integers and integral doubles are accepted; `null` reads as absent.

use std::time::Duration;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Number;

pub(crate) fn millis<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    whole(deserializer, "milliseconds").map(|n| n.map(Duration::from_millis))
}

pub(crate) fn seconds<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    whole(deserializer, "seconds").map(|n| n.map(Duration::from_secs))
}

fn whole<'de, D>(deserializer: D, unit: &str) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<Number>::deserialize(deserializer)? else {
        return Ok(None);
    };
    as_whole(&raw).map(Some).ok_or_else(|| {
        D::Error::custom(format!(
            "expected a non-negative whole number of {unit}, found {raw}"
        ))
    })
}

fn as_whole(n: &Number) -> Option<u64> {
    if let Some(u) = n.as_u64() {
        return Some(u);
    }
    if n.is_i64() {
        return None;
    }
    let f = n.as_f64()?;
    // `u64::MAX as f64` rounds up to 2^64, which is already out of range.
    (f >= 0.0 && f.fract() == 0.0 && f < u64::MAX as f64).then_some(f as u64)
}
