mod common;

use common::{write_file, SegyBuilder};
use seis_duper_core::segy::{
    ByteOrder, Domain, MeasurementSystem, SampleFormat, SegyError, SegyFile, TextEncoding,
};
use seis_duper_core::survey::{self, fingerprint_file, inspect_file};
use seis_duper_core::SilentReporter;
use std::fs;
use tempfile::tempdir;

fn sample_traces() -> Vec<Vec<f64>> {
    vec![
        vec![0.0, 1.5, -3.0, 2.0],
        vec![10.0, -0.5, 4.0, 7.25],
        vec![-12.0, 0.25, 0.0, 3.0],
    ]
}

#[test]
fn test_open_reads_layout() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("line.sgy");
    SegyBuilder::new(sample_traces()).write(&path);

    let mut segy = SegyFile::open(&path).unwrap();
    assert_eq!(segy.trace_count(), 3);
    assert_eq!(segy.samples_per_trace(), 4);
    assert_eq!(segy.sample_format(), SampleFormat::IeeeFloat32);
    assert_eq!(segy.byte_order(), ByteOrder::Big);
    assert_eq!(segy.textual_header().encoding(), TextEncoding::Ebcdic);
    assert_eq!(segy.textual_header().lines()[0], "C 1 CLIENT: TEST SURVEY");
    assert_eq!(segy.file_size(), 3600 + 3 * (240 + 16));
    assert_eq!(segy.textual_header().raw().len(), 3200);
    assert_eq!(segy.read_trace(1).unwrap(), vec![10.0, -0.5, 4.0, 7.25]);
    assert!(matches!(
        segy.read_trace(3),
        Err(SegyError::TraceOutOfRange { index: 3, count: 3 })
    ));
}

#[test]
fn test_amplitude_range_for_every_format() {
    let tmp = tempdir().unwrap();
    let formats = [
        SampleFormat::IbmFloat32,
        SampleFormat::Int32,
        SampleFormat::Int16,
        SampleFormat::IeeeFloat32,
        SampleFormat::IeeeFloat64,
        SampleFormat::Int8,
    ];
    let traces = vec![vec![3.0, -7.0, 12.0], vec![-20.0, 5.0, 0.0]];

    for format in formats {
        let path = tmp.path().join(format!("f{}.sgy", format.code()));
        SegyBuilder::new(traces.clone()).format(format).write(&path);

        let fingerprint = fingerprint_file(&path).unwrap();
        let range = fingerprint.amplitude.unwrap();
        assert_eq!(range.min, -20.0, "format {}", format);
        assert_eq!(range.max, 12.0, "format {}", format);
        assert_eq!(fingerprint.sample_format, format);
    }
}

#[test]
fn test_little_endian_file_is_detected() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("le.sgy");
    SegyBuilder::new(sample_traces()).little_endian().write(&path);

    let mut segy = SegyFile::open(&path).unwrap();
    assert_eq!(segy.byte_order(), ByteOrder::Little);
    let range = segy.amplitude_range().unwrap().unwrap();
    assert_eq!(range.min, -12.0);
    assert_eq!(range.max, 10.0);
}

#[test]
fn test_fingerprint_fields() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("survey_a.sgy");
    SegyBuilder::new(sample_traces())
        .sample_interval_us(2000)
        .write(&path);

    let fingerprint = fingerprint_file(&path).unwrap();
    assert_eq!(fingerprint.filename, "survey_a.sgy");
    assert_eq!(fingerprint.trace_count, 3);
    assert_eq!(fingerprint.sample_interval_ms, 2.0);
    assert_eq!(fingerprint.domain, Domain::Time);
    assert_eq!(fingerprint.measurement_system, MeasurementSystem::Meters);
    assert_eq!(fingerprint.record_length_secs, 0.008);
    assert_eq!(fingerprint.file_size_bytes, fs::metadata(&path).unwrap().len());
    assert!(fingerprint.min_amplitude().unwrap() <= fingerprint.max_amplitude().unwrap());
}

#[test]
fn test_zero_interval_is_depth() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("depth.sgy");
    SegyBuilder::new(sample_traces())
        .sample_interval_us(0)
        .write(&path);

    let fingerprint = fingerprint_file(&path).unwrap();
    assert_eq!(fingerprint.domain, Domain::Depth);
}

#[test]
fn test_no_traces_has_no_amplitude() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("empty.sgy");
    SegyBuilder::new(vec![]).binary_samples(100).write(&path);

    let fingerprint = fingerprint_file(&path).unwrap();
    assert_eq!(fingerprint.trace_count, 0);
    assert!(fingerprint.amplitude.is_none());
}

#[test]
fn test_samples_fall_back_to_trace_header() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("no_bin_ns.sgy");
    SegyBuilder::new(sample_traces()).binary_samples(0).write(&path);

    let segy = SegyFile::open(&path).unwrap();
    assert_eq!(segy.samples_per_trace(), 4);
    assert_eq!(segy.trace_count(), 3);
}

#[test]
fn test_header_hash_identity_and_difference() {
    let tmp = tempdir().unwrap();
    let a = tmp.path().join("a.sgy");
    let b = tmp.path().join("b.sgy");
    let c = tmp.path().join("c.sgy");
    SegyBuilder::new(sample_traces()).write(&a);
    fs::copy(&a, &b).unwrap();
    SegyBuilder::new(sample_traces())
        .text("C 1 CLIENT: TEST SURVEZ")
        .write(&c);

    let ha = fingerprint_file(&a).unwrap().header_hash;
    let hb = fingerprint_file(&b).unwrap().header_hash;
    let hc = fingerprint_file(&c).unwrap().header_hash;
    assert_eq!(ha, hb);
    assert_ne!(ha, hc);
}

#[test]
fn test_truncated_trace_data_is_rejected() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("cut.sgy");
    let mut bytes = SegyBuilder::new(sample_traces()).build();
    bytes.truncate(bytes.len() - 3);
    write_file(&path, &bytes);

    let err = SegyFile::open(&path).unwrap_err();
    assert!(matches!(err, SegyError::InconsistentSize { .. }));
}

#[test]
fn test_unsupported_format_is_rejected() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("fmt.sgy");
    let mut bytes = SegyBuilder::new(sample_traces()).build();
    bytes[3224..3226].copy_from_slice(&4i16.to_be_bytes());
    write_file(&path, &bytes);

    let err = SegyFile::open(&path).unwrap_err();
    assert!(matches!(err, SegyError::UnsupportedFormat(4)));
}

#[test]
fn test_survey_directory_continues_past_failures() {
    let tmp = tempdir().unwrap();
    let dir = tmp.path().join("repeated_files");
    SegyBuilder::new(sample_traces()).write(&dir.join("line_1.sgy"));
    write_file(&dir.join("line_2.sgy"), b"corrupt");
    SegyBuilder::new(sample_traces()).ascii().write(&dir.join("line_3.sgy"));

    let report = survey::survey_directory(&dir, &SilentReporter).unwrap();
    assert_eq!(report.outcomes.len(), 3);
    assert_eq!(report.fingerprints().count(), 2);

    let failures: Vec<_> = report.failures().collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].filename, "line_2.sgy");

    assert!(report.fingerprint_for("line_1.sgy").is_some());
    assert!(report.fingerprint_for("line_3.sgy").is_some());
    assert!(report.fingerprint_for("line_2.sgy").is_none());
}

#[test]
fn test_inspect_reads_first_trace_headers() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("inspect.sgy");
    let traces: Vec<Vec<f64>> = (0..8).map(|i| vec![i as f64; 5]).collect();
    SegyBuilder::new(traces).write(&path);

    let inspection = inspect_file(&path).unwrap();
    assert_eq!(inspection.trace_headers.len(), 5);
    assert_eq!(inspection.trace_headers[0].trace_sequence_line, 1);
    assert_eq!(inspection.trace_headers[4].cdp, 1004);
    assert_eq!(inspection.trace_headers[2].samples, 5);
    assert_eq!(inspection.textual_lines.len(), 40);
    assert_eq!(inspection.binary_header.format_code, 5);
    assert_eq!(inspection.fingerprint.trace_count, 8);
}
