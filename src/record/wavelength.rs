use serde::{Deserialize, Serialize};

/// Bins of the default synthetic wavelength axis
pub const DEFAULT_BINS: usize = 2048;

/// Wavelength axis used for spectra whose source carries no calibration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum WavelengthCalibration {
    /// Evenly spaced axis from `first` to `last` inclusive
    Synthetic {
        /// First wavelength
        first: f64,
        /// Last wavelength
        last: f64,
        /// Number of bins
        bins: usize,
    },
    /// Calibrated axis, one wavelength per bin
    Explicit {
        /// Wavelengths in bin order
        wavelengths: Vec<f64>,
    },
}

impl Default for WavelengthCalibration {
    /// Placeholder axis `1.0 ..= 2048.0` over 2048 bins
    fn default() -> Self {
        WavelengthCalibration::Synthetic {
            first: 1.0,
            last: DEFAULT_BINS as f64,
            bins: DEFAULT_BINS,
        }
    }
}

impl WavelengthCalibration {
    /// Number of bins on the axis
    pub fn bins(&self) -> usize {
        match self {
            WavelengthCalibration::Synthetic { bins, .. } => *bins,
            WavelengthCalibration::Explicit { wavelengths } => wavelengths.len(),
        }
    }

    /// The wavelength of every bin
    pub fn wavelengths(&self) -> Vec<f64> {
        match self {
            WavelengthCalibration::Synthetic { first, last, bins } => linspace(*first, *last, *bins),
            WavelengthCalibration::Explicit { wavelengths } => wavelengths.clone(),
        }
    }
}

fn linspace(first: f64, last: f64, bins: usize) -> Vec<f64> {
    match bins {
        0 => Vec::new(),
        1 => vec![first],
        _ => {
            let step = (last - first) / (bins - 1) as f64;
            (0..bins).map(|i| first + step * i as f64).collect()
        }
    }
}
