#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut client = cbor_item::FullParseClient::new();
    cbor_item::parse(data, &mut client);
    if let (Some(item), end, None) = client.into_parts() {
        assert!(end <= data.len());
        assert!(item.is_complete());
        _ = format!("{item}");
    }
});
