#![no_main]

use libfuzzer_sys::fuzz_target;
use spectra_ingest::sources::AncillaryTable;

fuzz_target!(|data: &[u8]| {
    if let Ok(table) = AncillaryTable::from_reader(data) {
        for row in table.rows() {
            assert!(!row.plot_id().is_empty());
        }
    }
});
