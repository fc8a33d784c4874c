#![no_main]

use atlasgen_spec::SizeClass;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(class) = text.parse::<SizeClass>() {
        assert!(class.size > 0);
        assert!(!class.name.is_empty());
        let reparsed: SizeClass = format!("{}={}", class.name, class.size)
            .parse()
            .expect("reparse canonical size class");
        assert_eq!(class, reparsed);
    }
});
