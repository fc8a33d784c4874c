#![no_main]

use atlasgen_spec::AtlasMetadata;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(metadata) = AtlasMetadata::from_json_str(text) else {
        return;
    };

    // Anything that parses must re-serialize and parse back to the same value
    let json = metadata.to_json_string().expect("serialize parsed metadata");
    let again = AtlasMetadata::from_json_str(&json).expect("reparse serialized metadata");
    assert_eq!(metadata, again);
});
