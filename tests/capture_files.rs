use std::path::PathBuf;
use tenbaset_rs::capture::{self, LoadOptions};
use tenbaset_rs::phy::{SynthOptions, synthesize};
use tenbaset_rs::{DecodeError, DecoderConfig, run};

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("tenbaset-{}-{}", std::process::id(), name))
}

#[test]
fn csv_capture_decodes_from_disk() {
    let payload = b"\x08\x00\x45\x00 scope export";
    let voltages = synthesize(
        payload,
        &SynthOptions {
            noise: 80.0,
            seed: 5,
            ..SynthOptions::default()
        },
    )
    .unwrap();

    let path = temp_path("capture.csv");
    capture::write_csv(&path, &voltages, 250.0).unwrap();
    let waveform = capture::load_capture(&path, &LoadOptions::default()).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(waveform.len(), voltages.len());
    let report = run(&waveform, &DecoderConfig::default()).unwrap();
    assert_eq!(report.bytes(), payload.to_vec());
}

#[test]
fn wav_capture_decodes_from_disk() {
    let payload = b"wav";
    let voltages = synthesize(payload, &SynthOptions::default()).unwrap();

    let path = temp_path("capture.wav");
    capture::write_wav(&path, &voltages, 250_000_000, 1000.0).unwrap();
    let waveform = capture::load_capture(&path, &LoadOptions::default()).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(waveform.len(), voltages.len());
    assert!(waveform.voltages().iter().all(|v| v.abs() <= 1000.0));
    let report = run(&waveform, &DecoderConfig::default()).unwrap();
    assert_eq!(report.bytes(), payload.to_vec());
}

#[test]
fn csv_without_header_is_a_format_error() {
    let path = temp_path("no-header.csv");
    std::fs::write(&path, "Model,X\n0,-600\n1,600\n").unwrap();
    let err = capture::load_capture(&path, &LoadOptions::default()).unwrap_err();
    std::fs::remove_file(&path).ok();

    assert!(err.is_format_error());
    assert!(matches!(err, DecodeError::MissingHeader { sentinel: "index" }));
}

#[test]
fn missing_file_is_an_io_error() {
    let err = capture::load_capture(&temp_path("absent.csv"), &LoadOptions::default()).unwrap_err();
    assert!(matches!(err, DecodeError::Io(_)));
}
