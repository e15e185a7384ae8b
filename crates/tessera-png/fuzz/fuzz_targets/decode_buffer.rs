#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let opts = tessera_core::options::DecoderOptions::new_lenient();

    let mut decoder = tessera_png::PngDecoder::new_with_options(data, opts);
    let _ = decoder.decode();
});
