use serde::{Serialize, Serializer};

/// How a pixel vector was fitted into a matrix row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RowFill {
    /// Pixels copied into the row
    pub copied: usize,
    /// Trailing bins left at zero
    pub padded: usize,
    /// Pixels beyond the last bin that were dropped
    pub truncated: usize,
}

/// Rectangular spectra × bins matrix, zero-filled on creation.
///
/// Values are kept as `f64` while building and narrowed to `f32`, the
/// service's storage type, on the way out.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementMatrix {
    rows: usize,
    bins: usize,
    values: Vec<f64>,
}

impl MeasurementMatrix {
    /// All-zero matrix of `rows` × `bins`
    pub fn zeros(rows: usize, bins: usize) -> Self {
        Self {
            rows,
            bins,
            values: vec![0.0; rows * bins],
        }
    }

    /// Number of spectra
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of bins per spectrum
    pub fn bins(&self) -> usize {
        self.bins
    }

    /// Values of spectrum `index`
    ///
    /// # Panics
    ///
    /// Panics if `index >= rows()`.
    pub fn row(&self, index: usize) -> &[f64] {
        let start = index * self.bins;
        &self.values[start..start + self.bins]
    }

    /// Copy `pixels` into row `index` from bin 0. Bins past the pixel vector
    /// stay zero; pixels past the last bin are dropped.
    ///
    /// # Panics
    ///
    /// Panics if `index >= rows()`.
    pub fn fill_row(&mut self, index: usize, pixels: &[f64]) -> RowFill {
        assert!(index < self.rows, "row {} out of range for {} rows", index, self.rows);

        let start = index * self.bins;
        let row = &mut self.values[start..start + self.bins];
        let copied = pixels.len().min(row.len());
        row[..copied].copy_from_slice(&pixels[..copied]);

        RowFill {
            copied,
            padded: row.len() - copied,
            truncated: pixels.len() - copied,
        }
    }

    /// Rows in the service's single-precision layout
    pub fn to_service_rows(&self) -> Vec<Vec<f32>> {
        (0..self.rows)
            .map(|i| self.row(i).iter().map(|&v| v as f32).collect())
            .collect()
    }
}

impl Serialize for MeasurementMatrix {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_service_rows().serialize(serializer)
    }
}
