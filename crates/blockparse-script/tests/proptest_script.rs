use proptest::prelude::*;

use blockparse_script::chunk::{decode_script, push_data_prefix, tokenize};
use blockparse_script::{ParsedScript, Script};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn tokenize_agrees_with_strict_decode(data in prop::collection::vec(any::<u8>(), 0..512)) {
        let (chunks, valid) = tokenize(&data);
        match decode_script(&data) {
            Ok(strict) => {
                prop_assert!(valid);
                prop_assert_eq!(strict, chunks);
            }
            Err(_) => prop_assert!(!valid),
        }
    }

    #[test]
    fn push_data_yields_single_chunk(data in prop::collection::vec(any::<u8>(), 1..600)) {
        let mut script = Script::new();
        script.append_push_data(&data);
        let parsed = ParsedScript::parse(script.to_bytes()).unwrap();
        prop_assert!(parsed.is_valid());
        prop_assert_eq!(parsed.chunks().len(), 1);
        prop_assert_eq!(parsed.chunks()[0].push_data(), Some(&data[..]));
    }

    #[test]
    fn truncated_push_is_invalid(data in prop::collection::vec(any::<u8>(), 1..300), cut in 1usize..300) {
        let mut bytes = push_data_prefix(data.len());
        bytes.extend_from_slice(&data);
        let cut = cut.min(data.len());
        bytes.truncate(bytes.len() - cut);
        let (_, valid) = tokenize(&bytes);
        prop_assert!(!valid);
    }

    #[test]
    fn oversized_script_is_rejected(extra in 1usize..64) {
        let bytes = vec![0x51u8; 100 + extra];
        prop_assert!(ParsedScript::parse_with_limit(&bytes, 100).is_err());
        prop_assert!(ParsedScript::parse_with_limit(&bytes, 100 + extra).is_ok());
    }
}
