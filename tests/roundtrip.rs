use nen::{Codebook, FrequencyTable, HuffmanCodec, HuffmanError, HuffmanTree};
use proptest::prelude::*;

proptest! {
    #[test]
    fn prop_roundtrip(data in prop::collection::vec(any::<u8>(), 1..4096)) {
        let codec = HuffmanCodec::default();
        let blob = codec.compress_to_blob(&data).unwrap();
        prop_assert_eq!(codec.decompress_blob(&blob).unwrap(), data);
    }

    #[test]
    fn prop_roundtrip_small_alphabet(
        data in prop::collection::vec(prop::sample::select(vec![0u8, 1, 2, 200]), 1..2048)
    ) {
        let codec = HuffmanCodec::default();
        let artifact = codec.compress(&data).unwrap();
        prop_assert_eq!(codec.decompress(&artifact).unwrap(), data);
    }

    #[test]
    fn prop_prefix_free(counts in prop::collection::btree_map(any::<u8>(), 1usize..10_000, 2..128)) {
        let freq: FrequencyTable = counts.into_iter().collect();
        prop_assume!(freq.len() >= 2);
        let book = Codebook::from_tree(&HuffmanTree::from_frequencies(&freq).unwrap());
        prop_assert_eq!(book.len(), freq.len());
        prop_assert!(book.is_prefix_free());
    }

    #[test]
    fn prop_deterministic(counts in prop::collection::btree_map(any::<u8>(), 1usize..8, 1..64)) {
        let freq: FrequencyTable = counts.into_iter().collect();
        let a = Codebook::from_tree(&HuffmanTree::from_frequencies(&freq).unwrap());
        let b = Codebook::from_tree(&HuffmanTree::from_frequencies(&freq).unwrap());
        prop_assert_eq!(a, b);
    }

    #[test]
    fn prop_packed_len_matches_codebook(data in prop::collection::vec(any::<u8>(), 1..1024)) {
        let artifact = HuffmanCodec::default().compress(&data).unwrap();
        let freq = FrequencyTable::from_bytes(&data);
        prop_assert_eq!(artifact.bits.bit_count(), artifact.codebook.encoded_bit_len(&freq));
    }
}

#[test]
fn test_single_symbol_input() {
    let codec = HuffmanCodec::default();
    for len in [1usize, 2, 7, 8, 9, 1000] {
        let data = vec![0x42; len];
        let artifact = codec.compress(&data).unwrap();
        assert_eq!(artifact.codebook.len(), 1);
        assert_eq!(artifact.codebook.get(0x42).map(|c| c.len()), Some(1));
        assert_eq!(artifact.bits.bit_count(), len);

        let blob = artifact.to_bytes().unwrap();
        assert_eq!(codec.decompress_blob(&blob).unwrap(), data);
    }
}

#[test]
fn test_empty_input_is_reported() {
    let codec = HuffmanCodec::default();
    assert!(matches!(codec.compress(&[]), Err(HuffmanError::EmptyInput)));
}

#[test]
fn test_tie_case_is_deterministic() {
    let data = b"ABCC";
    let first = HuffmanCodec::default().compress(data).unwrap();
    let second = HuffmanCodec::default().compress(data).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.to_bytes().unwrap(), second.to_bytes().unwrap());

    let codes: Vec<String> = first.codebook.iter().map(|(_, c)| c.to_string()).collect();
    assert_eq!(codes, vec!["10", "11", "0"]);
}

#[test]
fn test_skewed_distribution_compresses() {
    let mut data = vec![0u8; 900];
    for value in 1..=9u8 {
        data.extend(std::iter::repeat(value).take(11));
    }
    data.push(1);
    assert_eq!(data.len(), 1000);

    let artifact = HuffmanCodec::default().compress(&data).unwrap();
    assert!(artifact.bits.bit_count() < 8 * 1000);
    assert!(artifact.stats().ratio() < 0.5);
}

#[test]
fn test_all_byte_values() {
    let data: Vec<u8> = (0..=255u8).cycle().take(256 * 3 + 17).collect();
    let codec = HuffmanCodec::default();
    let artifact = codec.compress(&data).unwrap();
    assert_eq!(artifact.codebook.len(), 256);
    assert_eq!(codec.decompress(&artifact).unwrap(), data);
}

#[test]
fn test_truncated_bitstream_is_detected() {
    let codec = HuffmanCodec::default();
    let data = b"a moderately long sentence with a reasonable spread of letters";
    let mut artifact = codec.compress(data).unwrap();
    let full = artifact.bits.bit_count();

    for cut in [1, 3, 8, 13] {
        let mut truncated = artifact.clone();
        truncated.bits.truncate(full - cut);
        let err = codec.decompress(&truncated).unwrap_err();
        assert!(err.is_corrupt(), "cut {cut}: {err}");
    }

    // survives serialization too
    artifact.bits.truncate(full - 2);
    let blob = artifact.to_bytes().unwrap();
    assert!(codec.decompress_blob(&blob).unwrap_err().is_corrupt());
}

#[test]
fn test_mismatched_length_is_detected() {
    let codec = HuffmanCodec::default();
    let mut artifact = codec.compress(b"abcdefabcdef").unwrap();
    artifact.original_length += 1;
    assert!(codec.decompress(&artifact).unwrap_err().is_corrupt());
}

#[test]
fn test_corrupt_blob_is_not_partial() {
    let codec = HuffmanCodec::default();
    let blob = codec.compress_to_blob(b"some bytes to squeeze").unwrap();
    for cut in 1..blob.len() {
        assert!(codec.decompress_blob(&blob[..cut]).is_err());
    }
}
