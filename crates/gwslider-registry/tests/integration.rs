//! Integration tests for gwslider-registry.

use gwslider_config::{EventTable, ReferenceEvent};
use gwslider_core::{InterpolatedPsd, Psd};
use gwslider_registry::{Detector, DetectorStrain, EventDataset, EventRegistry, RegistryError};
use tempfile::TempDir;

fn write_dataset(path: &std::path::Path, n: usize, fs: f64, tweak: impl FnOnce(&mut serde_json::Value)) {
    let dt = 1.0 / fs;
    let time: Vec<f64> = (0..n).map(|i| 1000.0 + i as f64 * dt).collect();
    let series: Vec<f64> = (0..n).map(|i| (i as f64).cos() * 1e-21).collect();
    let det = serde_json::json!({
        "strain": series, "strain_whiten": series, "strain_whitenbp": series
    });
    let psd = serde_json::json!({ "frequencies": [0.0, fs / 4.0, fs / 2.0], "power": [1e-40, 1e-46, 1e-44] });
    let mut doc = serde_json::json!({
        "time": time,
        "time_center": time[n / 2],
        "dt": dt,
        "fs": fs,
        "detectors": { "H1": det.clone(), "L1": det },
        "psds": { "H1": psd.clone(), "L1": psd },
    });
    tweak(&mut doc);
    std::fs::write(path, serde_json::to_string(&doc).unwrap()).unwrap();
}

#[test]
fn dataset_document_loads() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("event.json");
    write_dataset(&path, 128, 32.0, |_| {});

    let ds = EventDataset::load(&path).unwrap();
    assert_eq!(ds.len(), 128);
    assert_eq!(ds.sample_rate(), 32.0);
    assert_eq!(ds.center_index(), 64);
    let psd: &InterpolatedPsd = ds.psd(Detector::L1);
    // between the 0 Hz and 8 Hz table entries
    let expected = 1e-40 + 5.0 / 8.0 * (1e-46 - 1e-40);
    assert!((psd.power(5.0).unwrap() - expected).abs() < 1e-52);
    assert!(psd.power(20.0).is_err());
}

#[test]
fn extra_detector_makes_event_unusable() {
    let temp = TempDir::new().unwrap();
    write_dataset(&temp.path().join("GW150914.json"), 64, 16.0, |doc| {
        let h1 = doc["detectors"]["H1"].clone();
        doc["detectors"]["V1"] = h1;
    });
    write_dataset(&temp.path().join("GW200311.json"), 64, 16.0, |_| {});

    let table = EventTable::new(vec![
        ReferenceEvent::new("GW150914", 1126259462.4, 34.6, 30.0),
        ReferenceEvent::new("GW200311", 1267963151.3, 34.2, 27.7),
    ]);
    let registry = EventRegistry::from_table(&table, temp.path(), temp.path());
    assert!(registry.get("GW200311").unwrap().is_usable());
    let rejected = registry.get("GW150914").unwrap();
    assert!(!rejected.is_usable());
    let reason = rejected.unavailable_reason().unwrap();
    assert!(reason.contains("unknown detector: V1"), "{reason}");
    assert!(matches!(
        registry.get("GW150914").unwrap().dataset(),
        Err(RegistryError::Unavailable(_))
    ));
}

#[test]
fn saved_dataset_reloads_identically() {
    let temp = TempDir::new().unwrap();
    let n = 256;
    let fs = 64.0;
    let time: Vec<f64> = (0..n).map(|i| 5000.0 + i as f64 / fs).collect();
    let strain = DetectorStrain {
        strain: vec![1.0; n],
        strain_whiten: vec![0.5; n],
        strain_whitenbp: vec![0.25; n],
    };
    let psd = InterpolatedPsd::new(vec![0.0, 32.0], vec![2.0, 2.0]).unwrap();
    let ds = EventDataset::new(
        time.clone(),
        time[100],
        1.0 / fs,
        fs,
        [strain.clone(), strain],
        [psd.clone(), psd],
    )
    .unwrap();

    let path = temp.path().join("sim.json");
    ds.save(&path).unwrap();
    let loaded = EventDataset::load(&path).unwrap();
    assert_eq!(loaded, ds);
    assert_eq!(loaded.center_index(), 100);
    assert_eq!(loaded.strain(Detector::H1).strain_whitenbp[0], 0.25);
}
