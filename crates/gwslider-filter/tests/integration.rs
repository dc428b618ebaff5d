//! End-to-end analyses on simulated and (optionally) real events.

use gwslider_config::{AnalysisConfig, EventTable, ReferenceEvent, factory_events};
use gwslider_filter::{
    Explorer, FilterSettings, SIMULATED_EVENT_NAME, Session, StateUpdate, calculate_matched_filter,
    simulate_dataset,
};
use gwslider_registry::{Detector, EventDataset, EventRegistry};
use gwslider_waveform::WaveformSynthesizer;

#[test]
fn injection_recovered_at_reference_parameters() {
    let config = AnalysisConfig::default();
    let synth = WaveformSynthesizer::new(config.waveform).unwrap();
    let dataset = simulate_dataset(&config, &synth).unwrap();
    assert_eq!(dataset.len(), 32 * 4096);
    assert_eq!(dataset.time_center(), config.simulation.gps_center);

    let template = synth
        .render_padded_template(&config.simulation.injection, &config.render, dataset.sample_rate(), dataset.len(), dataset.center_index())
        .unwrap();
    let report = calculate_matched_filter(&template, &dataset, &FilterSettings::from(&config.filter)).unwrap();

    let target = config.simulation.snr;
    for result in report.iter() {
        let snr = result.filter.snr;
        assert!(snr > 0.7 * target && snr < 1.3 * target, "{}: SNR {snr}", result.detector);
        assert!(result.filter.offset.abs() <= 2, "{}: offset {}", result.detector, result.filter.offset);
        assert!(
            (result.amplitude() * result.filter.sigma / target - 1.0).abs() < 0.3,
            "{}: amplitude {}",
            result.detector,
            result.amplitude()
        );
    }
    assert!(report.network_snr() > target);
}

#[test]
fn simulated_dataset_survives_json() {
    let config = AnalysisConfig::default();
    let synth = WaveformSynthesizer::new(config.waveform).unwrap();
    let dataset = simulate_dataset(&config, &synth).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("SIMULATED.json");
    dataset.save(&path).unwrap();
    let reloaded = EventDataset::load(&path).unwrap();
    assert_eq!(reloaded.len(), dataset.len());
    assert_eq!(reloaded.strain(Detector::L1).strain, dataset.strain(Detector::L1).strain);
}

#[test]
fn wrong_parameters_match_worse() {
    let config = AnalysisConfig::default();
    let synth = WaveformSynthesizer::new(config.waveform).unwrap();
    let dataset = simulate_dataset(&config, &synth).unwrap();
    let settings = FilterSettings::from(&config.filter);

    let snr_for = |mass1: f64, mass2: f64| {
        let mut params = config.simulation.injection;
        params.mass1 = mass1;
        params.mass2 = mass2;
        let template = synth
            .render_padded_template(&params, &config.render, dataset.sample_rate(), dataset.len(), dataset.center_index())
            .unwrap();
        calculate_matched_filter(&template, &dataset, &settings).unwrap().network_snr()
    };
    assert!(snr_for(50.0, 30.0) > snr_for(20.0, 12.0));
}

#[test]
fn session_explores_simulated_event() {
    let session = Session::load(
        AnalysisConfig::default(),
        &EventTable::default(),
        std::path::Path::new("."),
        std::path::Path::new("."),
    )
    .unwrap();
    assert_eq!(session.registry().len(), 1);
    let event = session.default_event().unwrap();
    assert_eq!(event.name(), SIMULATED_EVENT_NAME);
    assert!(event.is_simulated());

    let mut explorer = Explorer::new(&session).unwrap();
    let at_reference = explorer.render().unwrap().snr;
    explorer.apply(StateUpdate::SetSlider { index: 0, value: 45.0 }).unwrap();
    assert!(explorer.render().unwrap().snr <= at_reference * 1.05);
    explorer.apply(StateUpdate::GoToReference).unwrap();
    assert_eq!(explorer.render().unwrap().snr, at_reference);
}

#[test]
fn missing_datasets_leave_only_simulation() {
    let dir = tempfile::tempdir().unwrap();
    let table = factory_events();
    let session = Session::load(AnalysisConfig::default(), &table, dir.path(), dir.path()).unwrap();
    assert_eq!(session.registry().len(), table.len() + 1);
    assert_eq!(session.registry().usable().count(), 1);
    assert_eq!(session.default_event().unwrap().name(), SIMULATED_EVENT_NAME);
}

/// Requires a GW150914 dataset; point `GWSLIDER_GW150914` at its JSON file.
#[test]
#[ignore]
fn gw150914_hanford_snr() {
    let Ok(path) = std::env::var("GWSLIDER_GW150914") else {
        eprintln!("GWSLIDER_GW150914 not set, skipping");
        return;
    };
    let path = std::path::PathBuf::from(path);
    let table = EventTable::new(vec![ReferenceEvent::new("GW150914", 1126259462.4, 34.6, 30.0).with_dataset(path)]);
    let registry = EventRegistry::from_table(&table, std::path::Path::new("."), std::path::Path::new("."));
    let config = AnalysisConfig {
        simulation: gwslider_config::SimulationConfig {
            enabled: false,
            ..Default::default()
        },
        ..Default::default()
    };
    let session = Session::new(config, registry).unwrap();
    let event = session.registry().get("GW150914").unwrap();
    let report = session.analyze(event, event.reference()).unwrap();
    let snr = report.detector(Detector::H1).filter.snr;
    assert!((15.0..30.0).contains(&snr), "H1 SNR {snr}");
}
