//! Per-event strain datasets.
//!
//! A dataset is prepared offline from public strain: raw, whitened and
//! whitened + band-passed series for both detectors on a shared time axis,
//! plus each detector's noise PSD. It is stored as one JSON document and
//! loaded atomically: any inconsistency rejects the whole file.

use gwslider_core::{Error as CoreError, InterpolatedPsd, PsdTable};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::ops::Range;
use std::path::Path;

use crate::detector::Detector;
use crate::error::RegistryError;

/// Relative tolerance between `fs` and `1/dt`.
const RATE_TOLERANCE: f64 = 1e-9;

/// Strain series of one detector.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DetectorStrain {
    /// Raw strain.
    pub strain: Vec<f64>,
    /// Whitened strain.
    pub strain_whiten: Vec<f64>,
    /// Whitened and band-passed strain.
    pub strain_whitenbp: Vec<f64>,
}

impl DetectorStrain {
    fn series(&self) -> [(&'static str, &[f64]); 3] {
        [
            ("strain", &self.strain),
            ("strain_whiten", &self.strain_whiten),
            ("strain_whitenbp", &self.strain_whitenbp),
        ]
    }
}

/// On-disk form of an [`EventDataset`].
///
/// ```json
/// {
///   "time": [...], "time_center": 1126259462.0, "dt": 0.000244140625, "fs": 4096.0,
///   "detectors": {"H1": {"strain": [...], "strain_whiten": [...], "strain_whitenbp": [...]}, "L1": {...}},
///   "psds": {"H1": {"frequencies": [...], "power": [...]}, "L1": {...}}
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetFile {
    /// GPS time of every sample (s).
    pub time: Vec<f64>,
    /// GPS reference time of the event (s).
    pub time_center: f64,
    /// Sample interval (s).
    pub dt: f64,
    /// Sample rate (Hz).
    pub fs: f64,
    /// Strain series keyed by detector name.
    pub detectors: BTreeMap<String, DetectorStrain>,
    /// Noise PSD tables keyed by detector name.
    pub psds: BTreeMap<String, PsdTable>,
}

/// Validated, read-only strain dataset for one event.
#[derive(Debug, Clone, PartialEq)]
pub struct EventDataset {
    time: Vec<f64>,
    time_center: f64,
    dt: f64,
    fs: f64,
    strains: [DetectorStrain; 2],
    psds: [InterpolatedPsd; 2],
}

impl EventDataset {
    /// Assemble and validate a dataset. Series and PSDs are indexed in
    /// [`Detector::ALL`] order.
    pub fn new(
        time: Vec<f64>,
        time_center: f64,
        dt: f64,
        fs: f64,
        strains: [DetectorStrain; 2],
        psds: [InterpolatedPsd; 2],
    ) -> Result<Self, RegistryError> {
        let dataset = Self {
            time,
            time_center,
            dt,
            fs,
            strains,
            psds,
        };
        dataset.validate()?;
        Ok(dataset)
    }

    fn validate(&self) -> Result<(), RegistryError> {
        let n = self.time.len();
        if n < 2 {
            return Err(RegistryError::InvalidDataset(format!(
                "time axis has {n} samples"
            )));
        }
        if !(self.dt.is_finite() && self.dt > 0.0 && self.fs.is_finite() && self.fs > 0.0) {
            return Err(RegistryError::InvalidDataset(format!(
                "dt = {} and fs = {} must be positive",
                self.dt, self.fs
            )));
        }
        if (self.fs * self.dt - 1.0).abs() > RATE_TOLERANCE {
            return Err(RegistryError::InvalidDataset(format!(
                "fs = {} Hz disagrees with dt = {} s",
                self.fs, self.dt
            )));
        }
        let span = self.time[n - 1] - self.time[0];
        if !((span - (n - 1) as f64 * self.dt).abs() <= 0.5 * self.dt) {
            return Err(RegistryError::InvalidDataset(format!(
                "time axis spans {span} s, expected {} s",
                (n - 1) as f64 * self.dt
            )));
        }
        if !(self.time_center >= self.time[0] && self.time_center <= self.time[n - 1]) {
            return Err(RegistryError::InvalidDataset(format!(
                "time_center {} outside [{}, {}]",
                self.time_center,
                self.time[0],
                self.time[n - 1]
            )));
        }
        for det in Detector::ALL {
            for (series, values) in self.strains[det.index()].series() {
                if values.len() != n {
                    return Err(RegistryError::LengthMismatch {
                        detector: det,
                        series,
                        expected: n,
                        found: values.len(),
                    });
                }
                if values.iter().any(|v| !v.is_finite()) {
                    return Err(RegistryError::InvalidDataset(format!(
                        "{det} {series} contains non-finite samples"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Load a dataset from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| RegistryError::read_file(path, e))?;
        let raw: DatasetFile = serde_json::from_reader(BufReader::new(file))?;
        Self::try_from(raw)
    }

    /// Parse a dataset from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        Self::try_from(serde_json::from_str::<DatasetFile>(json)?)
    }

    /// Write the dataset as JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), RegistryError> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| RegistryError::write_file(path, e))?;
        serde_json::to_writer(BufWriter::new(file), &self.to_file())?;
        Ok(())
    }

    /// Serialize to a JSON string.
    pub fn to_json(&self) -> Result<String, RegistryError> {
        Ok(serde_json::to_string(&self.to_file())?)
    }

    /// On-disk form.
    pub fn to_file(&self) -> DatasetFile {
        DatasetFile {
            time: self.time.clone(),
            time_center: self.time_center,
            dt: self.dt,
            fs: self.fs,
            detectors: Detector::ALL
                .iter()
                .map(|d| (d.as_str().to_string(), self.strains[d.index()].clone()))
                .collect(),
            psds: Detector::ALL
                .iter()
                .map(|d| (d.as_str().to_string(), PsdTable::from(self.psds[d.index()].clone())))
                .collect(),
        }
    }

    /// GPS time of every sample.
    pub fn time(&self) -> &[f64] {
        &self.time
    }

    /// GPS reference time of the event.
    pub fn time_center(&self) -> f64 {
        self.time_center
    }

    /// Sample interval (s).
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Sample rate (Hz).
    pub fn sample_rate(&self) -> f64 {
        self.fs
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// Always false for a validated dataset.
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Duration covered by the samples (s).
    pub fn duration(&self) -> f64 {
        self.time.len() as f64 * self.dt
    }

    /// Strain series of `detector`.
    pub fn strain(&self, detector: Detector) -> &DetectorStrain {
        &self.strains[detector.index()]
    }

    /// Noise PSD of `detector`.
    pub fn psd(&self, detector: Detector) -> &InterpolatedPsd {
        &self.psds[detector.index()]
    }

    /// Index of the sample closest to `time_center`.
    pub fn center_index(&self) -> usize {
        let i = self.time.partition_point(|&t| t < self.time_center);
        if i == 0 {
            0
        } else if i == self.time.len() {
            i - 1
        } else if self.time[i] - self.time_center < self.time_center - self.time[i - 1] {
            i
        } else {
            i - 1
        }
    }

    /// Index range of a `window_seconds` window centered on the event.
    ///
    /// The window holds `round(window_seconds·fs)` samples with the center
    /// sample at its midpoint.
    pub fn crop_range(&self, window_seconds: f64) -> gwslider_core::Result<Range<usize>> {
        let n = (window_seconds * self.fs).round();
        if !(n >= 2.0) {
            return Err(CoreError::InvalidInput(format!(
                "crop window of {window_seconds} s holds fewer than two samples"
            )));
        }
        let n = n as usize;
        let center = self.center_index();
        let half = n / 2;
        if center < half || center - half + n > self.len() {
            return Err(CoreError::InvalidInput(format!(
                "crop window of {window_seconds} s around sample {center} exceeds the {} s dataset",
                self.duration()
            )));
        }
        Ok(center - half..center - half + n)
    }

    /// Sample times in `range` relative to the event time.
    pub fn relative_time(&self, range: Range<usize>) -> Vec<f64> {
        self.time[range].iter().map(|t| t - self.time_center).collect()
    }
}

fn take_detectors<T, U>(
    mut map: BTreeMap<String, T>,
    section: &'static str,
    convert: impl Fn(Detector, T) -> Result<U, RegistryError>,
) -> Result<[U; 2], RegistryError> {
    if let Some(key) = map.keys().find(|k| !Detector::ALL.iter().any(|d| d.as_str() == k.as_str())) {
        return Err(RegistryError::UnknownDetector(key.clone()));
    }
    let mut take = |detector: Detector| {
        map.remove(detector.as_str())
            .ok_or(RegistryError::MissingDetector { section, detector })
            .and_then(|value| convert(detector, value))
    };
    Ok([take(Detector::H1)?, take(Detector::L1)?])
}

impl TryFrom<DatasetFile> for EventDataset {
    type Error = RegistryError;

    fn try_from(file: DatasetFile) -> Result<Self, RegistryError> {
        let strains = take_detectors(file.detectors, "detectors", |_, s| Ok(s))?;
        let psds = take_detectors(file.psds, "psds", |detector, table| {
            InterpolatedPsd::try_from(table).map_err(|source| RegistryError::Psd { detector, source })
        })?;
        Self::new(file.time, file.time_center, file.dt, file.fs, strains, psds)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Small dataset: `n` samples at `fs`, event at the middle sample.
    pub(crate) fn sample_file(n: usize, fs: f64) -> DatasetFile {
        let dt = 1.0 / fs;
        let t0 = 1126259446.0;
        let time: Vec<f64> = (0..n).map(|i| t0 + i as f64 * dt).collect();
        let series: Vec<f64> = (0..n).map(|i| (i as f64 * 0.05).sin()).collect();
        let strain = DetectorStrain {
            strain: series.clone(),
            strain_whiten: series.clone(),
            strain_whitenbp: series,
        };
        let psd = PsdTable {
            frequencies: vec![0.0, fs / 2.0],
            power: vec![1.0, 1.0],
        };
        DatasetFile {
            time_center: time[n / 2],
            time,
            dt,
            fs,
            detectors: [("H1".to_string(), strain.clone()), ("L1".to_string(), strain)].into(),
            psds: [("H1".to_string(), psd.clone()), ("L1".to_string(), psd)].into(),
        }
    }

    #[test]
    fn valid_file_loads() {
        let ds = EventDataset::try_from(sample_file(256, 64.0)).unwrap();
        assert_eq!(ds.len(), 256);
        assert_eq!(ds.center_index(), 128);
        assert_eq!(ds.duration(), 4.0);
        assert_eq!(ds.strain(Detector::L1).strain.len(), 256);
    }

    #[test]
    fn short_series_rejects_whole_dataset() {
        let mut file = sample_file(64, 16.0);
        if let Some(l1) = file.detectors.get_mut("L1") {
            l1.strain_whitenbp.pop();
        }
        let err = EventDataset::try_from(file).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::LengthMismatch { detector: Detector::L1, series: "strain_whitenbp", expected: 64, found: 63 }
        ));
    }

    #[test]
    fn detector_keys_must_be_exact() {
        let mut file = sample_file(64, 16.0);
        let v1 = file.detectors["H1"].clone();
        file.detectors.insert("V1".into(), v1);
        assert!(matches!(EventDataset::try_from(file), Err(RegistryError::UnknownDetector(k)) if k == "V1"));

        let mut file = sample_file(64, 16.0);
        file.psds.remove("L1");
        assert!(matches!(
            EventDataset::try_from(file),
            Err(RegistryError::MissingDetector { section: "psds", detector: Detector::L1 })
        ));
    }

    #[test]
    fn descending_psd_rejected() {
        let mut file = sample_file(64, 16.0);
        file.psds.insert(
            "H1".into(),
            PsdTable {
                frequencies: vec![8.0, 0.0],
                power: vec![1.0, 1.0],
            },
        );
        assert!(matches!(
            EventDataset::try_from(file),
            Err(RegistryError::Psd { detector: Detector::H1, .. })
        ));
    }

    #[test]
    fn timing_checked() {
        let mut file = sample_file(64, 16.0);
        file.fs = 32.0;
        assert!(matches!(EventDataset::try_from(file), Err(RegistryError::InvalidDataset(_))));

        let mut file = sample_file(64, 16.0);
        file.time_center = 0.0;
        assert!(matches!(EventDataset::try_from(file), Err(RegistryError::InvalidDataset(_))));
    }

    #[test]
    fn crop_centered_on_event() {
        let ds = EventDataset::try_from(sample_file(512, 64.0)).unwrap();
        let range = ds.crop_range(4.0).unwrap();
        assert_eq!(range, 128..384);
        let rel = ds.relative_time(range);
        assert_eq!(rel[128], 0.0);
        assert!(ds.crop_range(16.0).is_err());
        assert!(ds.crop_range(0.0).is_err());
    }

    #[test]
    fn json_round_trip() {
        let ds = EventDataset::try_from(sample_file(32, 8.0)).unwrap();
        let json = ds.to_json().unwrap();
        assert!(json.contains("\"strain_whitenbp\""));
        let back = EventDataset::from_json(&json).unwrap();
        // bit-exact, not merely close
        assert_eq!(back.strain(Detector::H1).strain[4].to_bits(), (4.0f64 * 0.05).sin().to_bits());
        assert_eq!(back, ds);
    }
}
