//! Ordering Engine
//!
//! Pure key arithmetic for the ordered list. Entries are shown in
//! descending key order, so the first entry holds the largest key.
//!
//! - Appending places a new entry `GAP` above the current maximum.
//! - Moving places an entry at the midpoint of its two neighbors. A missing
//!   neighbor is synthesized one unit away from the other.
//! - Repeated moves into the same slot halve the gap each time. Once the
//!   gap drops below `MIN_GAP` the placement reports `GapExhausted` and the
//!   caller must respace the list with [`spaced_keys`].

use super::entity::{DomainError, DomainResult};

/// Distance between consecutive appended keys
pub const GAP: f64 = 10.0;

/// Smallest neighbor distance that may still be split
pub const MIN_GAP: f64 = 1e-9;

/// Rule used by the store to key an appended entry from the current maximum
pub type AppendRule = fn(Option<f64>) -> f64;

/// Rule used by the store to key a moved entry from its neighbor keys
pub type PlaceRule = fn(Option<f64>, Option<f64>) -> DomainResult<Placement>;

/// Outcome of placing an entry between two neighbors
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// The computed key lies strictly between the neighbors
    Key(f64),
    /// The neighbors are too close to split; the list needs respacing
    GapExhausted { back: f64, front: f64 },
}

/// Key for a new entry given the current maximum key.
pub fn append_key(max_key: Option<f64>) -> f64 {
    match max_key {
        Some(max) => max + GAP,
        None => 0.0,
    }
}

/// Fill in a missing neighbor bound.
///
/// `back` is the neighbor that ends up after the moved entry (smaller key),
/// `front` the one that ends up before it (larger key).
pub fn resolve_bounds(back: Option<f64>, front: Option<f64>) -> DomainResult<(f64, f64)> {
    match (back, front) {
        (Some(back), Some(front)) => Ok((back, front)),
        (Some(back), None) => Ok((back, back + 1.0)),
        (None, Some(front)) => Ok((front - 1.0, front)),
        (None, None) => Err(DomainError::InvalidInput(
            "at least one of back or front neighbor is required".to_string(),
        )),
    }
}

pub fn midpoint(back: f64, front: f64) -> f64 {
    (front + back) / 2.0
}

/// Key for an entry moved between two neighbors.
pub fn place_between(back: Option<f64>, front: Option<f64>) -> DomainResult<Placement> {
    let (back, front) = resolve_bounds(back, front)?;
    let key = midpoint(back, front);

    let (low, high) = if back <= front { (back, front) } else { (front, back) };
    if high - low < MIN_GAP || key <= low || key >= high {
        return Ok(Placement::GapExhausted { back, front });
    }
    Ok(Placement::Key(key))
}

/// Evenly spaced keys for `count` entries already in display order.
///
/// The last entry gets 0 and every entry above it `GAP` more, the same
/// keys a list built only by appends would have.
pub fn spaced_keys(count: usize) -> Vec<f64> {
    (0..count)
        .map(|position| (count - 1 - position) as f64 * GAP)
        .collect()
}
