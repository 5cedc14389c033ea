#![no_main]

use libfuzzer_sys::fuzz_target;
use matrixproc::parse_program;

fuzz_target!(|data: &[u8]| {
    // Should never panic, regardless of input
    if let Ok(text) = std::str::from_utf8(data) {
        if let Ok(program) = parse_program(text) {
            // Whatever parses must print back to something that parses the same
            let printed: Vec<String> = program.iter().map(ToString::to_string).collect();
            assert_eq!(parse_program(&printed.join("\n")).ok(), Some(program));
        }
    }
});
