// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Text carrier behaviour through the public API.
//!
//! Pins the exact messages callers match on and the capacity rules:
//! one occurrence of an `n`-byte watermark needs `4n + 2` slots, a carrier
//! with fewer slots gets a truncated occurrence plus a Warning.

use stegmark_core::text::DEFAULT_ALPHABET;
use stegmark_core::{TextWatermarker, Watermark};

/// `n` plain-space slots between words, no leading or trailing space.
fn words(n: usize) -> String {
    vec!["word"; n + 1].join(" ")
}

/// A carrier holding exactly one occurrence of `watermark`.
fn single(wm: &TextWatermarker, watermark: &str) -> String {
    let slots = 4 * watermark.len() + 2;
    wm.add_watermark(&words(slots), &Watermark::from(watermark))
        .into_result()
        .unwrap()
        .text
}

#[test]
fn single_watermark_picks_majority() {
    let wm = TextWatermarker::default();
    let carrier = [single(&wm, "Okay"), single(&wm, "Okay"), single(&wm, "Test")].join(" ");

    let all = wm.get_watermarks(&carrier, false, false);
    assert!(all.is_success(), "{}", all.status());
    assert_eq!(
        all.into_value().unwrap(),
        vec![Watermark::from("Okay"), Watermark::from("Okay"), Watermark::from("Test")]
    );

    let picked = wm.get_watermarks(&carrier, false, true);
    assert!(picked.is_success(), "{}", picked.status());
    assert_eq!(picked.status().to_string(), "Success");
    assert_eq!(picked.into_value().unwrap(), vec![Watermark::from("Okay")]);

    let squashed = wm.get_watermarks(&carrier, true, false).into_result().unwrap();
    assert_eq!(squashed, vec![Watermark::from("Okay"), Watermark::from("Test")]);
}

#[test]
fn majority_tie_warns() {
    let wm = TextWatermarker::default();
    let carrier = [single(&wm, "Okay"), single(&wm, "Test")].join(" ");
    let picked = wm.get_watermarks(&carrier, false, true);
    assert!(picked.is_warning());
    assert_eq!(
        picked.status().to_string(),
        "Warning (Record): Found 2 different most frequent watermarks (each occurring 1 times); returning the first."
    );
    assert_eq!(picked.into_value().unwrap(), vec![Watermark::from("Okay")]);
}

#[test]
fn oversized_watermark_is_inserted_partially() {
    let wm = TextWatermarker::default();
    let payload: Vec<u8> = (0..37u8).map(|i| b'a' + i % 26).collect();
    let text = words(96);

    let added = wm.add_watermark(&text, &Watermark::new(payload.clone()));
    assert!(added.is_warning());
    assert_eq!(
        added.status().to_string(),
        "Warning (TextWatermarker): The watermark is too large for the input and was inserted only partially (150 required, 96 inserted)."
    );
    let embedding = added.into_value().unwrap();
    // No complete occurrence, so no offsets.
    assert!(embedding.offsets.is_empty());
    assert!(!embedding.text.contains(' '));

    // One separator plus 95 symbols: 23 whole bytes and a 3-char remainder.
    let found = wm.get_watermarks(&embedding.text, false, false);
    assert!(found.is_warning());
    let message = found.status().to_string();
    assert!(message.contains("Could not restore a complete watermark starting at offset 4"), "{message}");
    assert!(message.contains("ended after 3 of 4 characters"), "{message}");
    assert_eq!(found.into_value().unwrap(), vec![Watermark::new(payload[..23].to_vec())]);
}

#[test]
fn marked_cover_text_is_rejected_unmodified() {
    let wm = TextWatermarker::default();
    let cover = format!("already{}marked text with spaces", DEFAULT_ALPHABET[2]);
    let added = wm.add_watermark(&cover, &Watermark::from("x"));
    assert!(added.is_error());
    assert!(added.value().is_none());
    assert!(added.status().to_string().starts_with(
        "Error (TextWatermarker): The input contains watermark characters (first at offset 7)"
    ));
}

#[test]
fn remove_then_contains_is_false() {
    let wm = TextWatermarker::default();
    let text = words(200);
    let marked = wm.add_watermark(&text, &Watermark::from("remove me")).into_result().unwrap();
    assert!(wm.contains_watermark(&marked.text));

    let removal = wm.remove_watermarks(&marked.text).into_result().unwrap();
    assert!(!wm.contains_watermark(&removal.text));
    assert_eq!(removal.text, text);
    assert!(removal.watermarks.iter().all(|w| w == &Watermark::from("remove me")));
}

#[test]
fn truncated_carrier_still_yields_watermark() {
    let wm = TextWatermarker::default();
    let marked = wm.add_watermark(&words(100), &Watermark::from("Hi")).into_result().unwrap();
    // Cut in the middle of the fourth occurrence.
    let cut: String = marked.text.chars().take(5 * 32).collect();

    let found = wm.get_watermarks(&cut, true, true);
    assert!(found.is_warning(), "{}", found.status());
    assert_eq!(found.into_value().unwrap(), vec![Watermark::from("Hi")]);
}

#[test]
fn removal_after_damage_warns_but_cleans() {
    let wm = TextWatermarker::default();
    let text = words(30);
    let marked = wm.add_watermark(&text, &Watermark::from("ok")).into_result().unwrap();
    let damaged: String = marked.text.chars().take(40).collect();

    let removal = wm.remove_watermarks(&damaged);
    assert!(removal.is_warning());
    assert!(removal
        .status()
        .to_string()
        .ends_with("Warning (TextWatermarker): The extraction of watermarks had a problem; watermark(s) removed anyway."));
    let removal = removal.into_value().unwrap();
    assert!(!wm.contains_watermark(&removal.text));
    assert_eq!(removal.text, text.chars().take(40).collect::<String>());
}
