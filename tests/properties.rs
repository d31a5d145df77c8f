// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Properties that must hold for every input, checked with proptest.

use proptest::prelude::*;

use stegmark_core::binary::{compress, decompress};
use stegmark_core::{
    ExtraField, LocalFileHeader, Record, Registry, TextWatermarker, Transcoding, Variant, Watermark, ZipFile,
};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn transcoding_is_lossless(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
        let transcoding = Transcoding::default();
        let encoded = transcoding.encode(&bytes);
        prop_assert_eq!(encoded.len(), 4 * bytes.len());
        let decoded = transcoding.decode(encoded);
        prop_assert!(decoded.is_success());
        prop_assert_eq!(decoded.into_value().unwrap(), bytes);
    }

    #[test]
    fn deflate_is_lossless(bytes in prop::collection::vec(any::<u8>(), 0..2048)) {
        let packed = compress(&bytes);
        prop_assert_eq!(decompress(&packed).into_result().unwrap(), bytes);
    }

    #[test]
    fn zip_header_reserialises(
        name in "[a-z/]{1,40}",
        fields in prop::collection::vec((any::<u16>(), prop::collection::vec(any::<u8>(), 0..64)), 0..6),
        tail in prop::collection::vec(any::<u8>(), 0..64),
    ) {
        let mut header = LocalFileHeader::new(name).into_result().unwrap();
        for (id, data) in fields {
            prop_assert!(header.add_extra_field(ExtraField::new(id, data)).is_success());
        }
        let mut bytes = header.to_bytes();
        bytes.extend_from_slice(&tail);

        let parsed = ZipFile::parse(&bytes).into_result().unwrap();
        prop_assert_eq!(parsed.to_bytes(), bytes);
    }

    #[test]
    fn text_add_then_extract(payload in prop::collection::vec(any::<u8>(), 1..24), extra in 0usize..40) {
        let wm = TextWatermarker::default();
        let slots = 4 * payload.len() + 2 + extra;
        let text = vec!["ab"; slots + 1].join(" ");
        let watermark = Watermark::new(payload);

        let embedding = wm.add_watermark(&text, &watermark).into_result().unwrap();
        let found = wm.get_watermarks(&embedding.text, true, false);
        prop_assert!(found.is_success(), "{}", found.status());
        prop_assert_eq!(found.into_value().unwrap(), vec![watermark]);

        let removal = wm.remove_watermarks(&embedding.text).into_result().unwrap();
        prop_assert_eq!(removal.text, text);
    }

    #[test]
    fn records_decode_what_they_encode(payload in prop::collection::vec(any::<u8>(), 0..300), index in 0usize..8) {
        let variant = Registry::default().variants().nth(index).copied().unwrap_or(Variant::RAW);
        let record = Record::builder(variant).payload(&payload).build().into_result().unwrap();
        let decoded = Record::decode(record.as_bytes()).into_result().unwrap();
        prop_assert_eq!(decoded.payload(), &payload[..]);
        prop_assert!(decoded.validate().is_success());
    }
}
