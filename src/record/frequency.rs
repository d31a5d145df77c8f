// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Most-frequent disambiguation over decoded payloads.

use std::collections::HashMap;

use super::error::RecordEvent;
use crate::outcome::{Outcome, Status};

/// Pick the byte sequence occurring most often in `items`.
///
/// Ties resolve to the tied entry that appears first and raise a Warning
/// with the number of tied entries. An empty input is an Error.
pub fn most_frequent<T>(items: &[T]) -> Outcome<T>
where
    T: AsRef<[u8]> + Clone,
{
    if items.is_empty() {
        return Outcome::error(RecordEvent::EmptyCollection);
    }

    // content -> (count, index of first occurrence)
    let mut counts: HashMap<&[u8], (usize, usize)> = HashMap::new();
    for (i, item) in items.iter().enumerate() {
        counts.entry(item.as_ref()).or_insert((0, i)).0 += 1;
    }

    let best = counts.values().map(|&(count, _)| count).max().unwrap_or(0);
    let mut tied: Vec<usize> = counts
        .values()
        .filter(|&&(count, _)| count == best)
        .map(|&(_, first)| first)
        .collect();
    tied.sort_unstable();

    let mut status = Status::success();
    if tied.len() > 1 {
        status.add_event(RecordEvent::MultipleMostFrequent { tied: tied.len(), count: best });
    }
    status.into_outcome(items[tied[0]].clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_dominant_entry() {
        let items = vec![b"Okay".to_vec(), b"Test".to_vec(), b"Okay".to_vec()];
        let picked = most_frequent(&items);
        assert!(picked.is_success());
        assert_eq!(picked.into_value(), Some(b"Okay".to_vec()));
    }

    #[test]
    fn tie_warns_and_picks_first_seen() {
        let items = vec![b"B".to_vec(), b"A".to_vec(), b"A".to_vec(), b"B".to_vec()];
        let picked = most_frequent(&items);
        assert!(picked.is_warning());
        assert_eq!(
            picked.status().to_string(),
            "Warning (Record): Found 2 different most frequent watermarks (each occurring 2 times); returning the first."
        );
        assert_eq!(picked.into_value(), Some(b"B".to_vec()));
    }

    #[test]
    fn empty_is_error() {
        let picked = most_frequent::<Vec<u8>>(&[]);
        assert!(picked.is_error());
        assert!(picked.value().is_none());
    }
}
