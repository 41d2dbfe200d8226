#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let options = cbor_item::Options::default();
    let validated = cbor_item::validate_sequence(data, &options);

    let mut items = cbor_item::items(data);
    let decoded = items.by_ref().collect::<Result<Vec<_>, _>>();

    // Validation and materialization must agree on where the input breaks
    match (validated, decoded) {
        (Ok(summary), Ok(all)) => {
            assert_eq!(summary.top_level, all.len());
            assert_eq!(data.len(), items.offset());
        }
        (Err(v), Err(d)) => assert_eq!(v, d),
        (v, d) => panic!("validator {v:?} disagrees with decoder {d:?}"),
    }
});
