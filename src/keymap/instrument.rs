use super::{AttributeMapping, MetadataKeyMap};

/// PICO metadata key → service attribute name, in upload order
const PICO_INSTRUMENT_KEYS: [(&str, &str); 20] = [
    ("Batch", "Batch"),
    // Automatic dark correction flag
    ("Dark", "Dark"),
    ("Datetime", "Datetime"),
    ("Direction", "Direction"),
    ("IntegrationTime", "Integration Time"),
    ("IntegrationTimeUnits", "Integration Time Units"),
    ("NonlinearityCorrectionCoefficients", "Nonlinearity Correction Coefficients"),
    ("OpticalPixelRange", "Optical Pixel Range"),
    ("Run", "Run"),
    ("SaturationLevel", "Saturation Level"),
    ("SerialNumber", "Instrument Serial Number"),
    ("TemperatureDetectorActual", "Temperature Detector Actual"),
    ("TemperatureDetectorSet", "Temperature Detector Set"),
    ("TemperatureHeatsink", "Temperature Detector Heatsink"),
    ("TemperatureMicrocontroller", "Temperature Detector Microcontroller"),
    ("TemperaturePCB", "Temperature Detector PCB"),
    ("TemperatureUnits", "Temperature Units"),
    ("Type", "Type"),
    ("WavelengthCalibrationCoefficients", "Wavelength Calibration Coefficients"),
    ("name", "name"),
];

/// Key map for the per-spectrum metadata of PICO files
pub fn pico_instrument_map() -> MetadataKeyMap {
    PICO_INSTRUMENT_KEYS
        .iter()
        .map(|&(key, name)| (key, AttributeMapping::single(name)))
        .collect()
}
