#![no_main]

use libfuzzer_sys::fuzz_target;
use spectra_ingest::sources::{FileLocation, PicoFile, SpectraSource};

fuzz_target!(|data: &[u8]| {
    // Malformed documents must be rejected, never panic
    if let Ok(pico) = PicoFile::from_reader(data, FileLocation::new("/fuzz", "input.pico")) {
        for index in 0..pico.spectra_count() {
            let _ = pico.spectrum_pixels(index);
            let _ = pico.spectrum_metadata(index);
        }
    }
});
