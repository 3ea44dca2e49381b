use hisi_nvme::extraction::decode_field;
use hisi_nvme::types::{MAX_GAP, STRING_LENGTH};
use hisi_nvme::{FieldValue, NvmeError, Tag, extract_value, find_tag, gap};
use proptest::prelude::*;

fn tag_strategy() -> impl Strategy<Value = Vec<u8>> {
    proptest::collection::vec(b'A'..=b'Z', 2..=8)
}

proptest! {
    #[test]
    fn planted_tag_is_found_at_its_offset(
        tag in tag_strategy(),
        offset in 0usize..4096,
    ) {
        let mut data = vec![0u8; offset + tag.len() + 64];
        data[offset..offset + tag.len()].copy_from_slice(&tag);
        let found = find_tag(&data, &Tag::hex(hex::encode(&tag))).unwrap();
        prop_assert_eq!(found, offset);
    }

    #[test]
    fn absent_tag_is_never_an_offset(
        tag in tag_strategy(),
        len in 1usize..4096,
    ) {
        let data = vec![0u8; len];
        let result = find_tag(&data, &Tag::bytes(tag));
        prop_assert!(matches!(result, Err(NvmeError::TagNotFound { .. })), "expected TagNotFound, got {:?}", result);
    }

    #[test]
    fn gap_and_length_sum_to_max(name in "[A-Z_]{0,20}") {
        prop_assert_eq!(gap(&name).unwrap() + name.len(), MAX_GAP);
    }

    #[test]
    fn long_names_overflow(name in "[A-Z_]{21,40}") {
        let overflowed = matches!(gap(&name), Err(NvmeError::GapOverflow { .. }));
        prop_assert!(overflowed);
    }

    #[test]
    fn planted_value_round_trips(
        value in "[A-Za-z0-9][A-Za-z0-9:. -]{0,44}",
        offset in 0usize..1024,
    ) {
        let tag = b"SN";
        let padding = gap("SN").unwrap();
        let mut data = vec![0u8; offset + tag.len() + padding + STRING_LENGTH];
        data[offset..offset + tag.len()].copy_from_slice(tag);
        let start = offset + tag.len() + padding;
        data[start..start + value.len()].copy_from_slice(value.as_bytes());

        let found = find_tag(&data, &Tag::hex("534E")).unwrap();
        prop_assert_eq!(extract_value(&data, found, padding, tag.len()), FieldValue::Text(value));
    }

    #[test]
    fn decoding_never_panics(field in proptest::collection::vec(any::<u8>(), 0..STRING_LENGTH)) {
        let _ = decode_field(&field);
    }
}
