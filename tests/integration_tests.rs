mod common;

use ad2cp::nmea::{self, SentenceKind};
use ad2cp::record::series;
use ad2cp::{decode, Diagnostic, Error, Record};
use common::{average_profile_body, record, string_record};

#[test]
fn two_record_stream_end_to_end() {
    let body = average_profile_body(
        3,
        1,
        -3,
        &[1000, 2000, 3000],
        &[20, 40, 60],
        &[90, 91, 92],
    );
    let mut buf = record(series::AVERAGE, &body);
    buf.extend(string_record("HELLO"));

    let decoded = decode(&buf).unwrap();
    assert_eq!(decoded.records.len(), 2);
    assert!(decoded.diagnostics.is_empty());

    let profile = match &decoded.records[0] {
        Record::CurrentProfile(p) => p,
        other => panic!("unexpected record {other:?}"),
    };
    assert_eq!(profile.number_of_beams, 3);
    assert_eq!(profile.number_of_cells, 1);
    assert_eq!(profile.profile.common.serial_number, 123456);
    assert_eq!(profile.profile.common.ensemble_counter, 42);
    assert_eq!(profile.velocity, vec![1.0, 2.0, 3.0]);
    assert_eq!(profile.amplitude, vec![10.0, 20.0, 30.0]);
    assert_eq!(profile.correlation, vec![90, 91, 92]);
    assert_eq!(profile.profile.blanking_distance, 0.5);
    let ts = profile.profile.common.datetime.timestamp().unwrap();
    assert_eq!(ts.to_string(), "2021-06-08 12:30:45");

    match &decoded.records[1] {
        Record::RawString(s) => assert_eq!(s.text, "HELLO"),
        other => panic!("unexpected record {other:?}"),
    }
}

#[test]
fn unknown_series_resynchronizes_to_next_record() {
    let mut buf = record(0x99, &[0xde, 0xad, 0xbe, 0xef]);
    buf.extend(string_record("AFTER"));

    let decoded = decode(&buf).unwrap();
    assert_eq!(decoded.records.len(), 2);
    assert!(matches!(decoded.records[0], Record::Unknown(_)));
    assert_eq!(
        decoded.diagnostics,
        vec![Diagnostic::UnknownSeries {
            offset: 0,
            series_id: 0x99
        }]
    );
    match &decoded.records[1] {
        Record::RawString(s) => assert_eq!(s.text, "AFTER"),
        other => panic!("unexpected record {other:?}"),
    }
}

#[test]
fn truncated_final_record_is_dropped_silently() {
    let mut buf = string_record("WHOLE");
    let tail = record(series::AVERAGE, &average_profile_body(3, 1, -3, &[], &[], &[]));
    buf.extend(&tail[..tail.len() - 5]);

    let decoded = decode(&buf).unwrap();
    assert_eq!(decoded.records.len(), 1);
    assert!(decoded.diagnostics.is_empty());
}

#[test]
fn length_drift_is_reported_but_not_fatal() {
    // Two slack bytes the body decoder never consumes.
    let mut body = average_profile_body(2, 2, -3, &[], &[], &[]);
    body.extend([0u8, 0u8]);
    let mut buf = record(series::AVERAGE, &body);
    buf.extend(string_record("NEXT"));

    let decoded = decode(&buf).unwrap();
    assert_eq!(decoded.records.len(), 2);
    assert_eq!(
        decoded.diagnostics,
        vec![Diagnostic::LengthDrift {
            offset: 0,
            series_id: series::AVERAGE,
            drift: 2
        }]
    );
}

#[test]
fn correlation_flag_gates_velocity_and_amplitude() {
    // velocity and amplitude flags set, correlation clear: all three
    // sample arrays contribute nothing to the record length
    let mut body = average_profile_body(3, 2, -3, &[], &[], &[]);
    body[2..4].copy_from_slice(&((1u16 << 5) | (1 << 6)).to_le_bytes());
    let buf = record(series::AVERAGE, &body);

    let decoded = decode(&buf).unwrap();
    assert!(decoded.diagnostics.is_empty());
    let profile = match &decoded.records[0] {
        Record::CurrentProfile(p) => p,
        other => panic!("unexpected record {other:?}"),
    };
    assert!(profile.profile.flags.has_velocity_data);
    assert!(profile.profile.flags.has_amplitude_data);
    assert!(!profile.profile.flags.has_correlation_data);
    assert!(profile.velocity.is_empty());
    assert!(profile.amplitude.is_empty());
    assert!(profile.correlation.is_empty());
}

#[test]
fn oversized_altimeter_raw_count_fails_cleanly() {
    let mut body = average_profile_body(2, 2, -3, &[], &[], &[]);
    body[2..4].copy_from_slice(&(1u16 << 9).to_le_bytes()); // altimeter raw
    body.extend(0x4000_0000u32.to_le_bytes());
    body.extend(10u16.to_le_bytes());
    let buf = record(series::AVERAGE, &body);

    let err = decode(&buf).unwrap_err();
    assert!(matches!(err.source, Error::BufferUnderrun { .. }));
}

#[test]
fn invalid_sync_fails_with_partial_results() {
    let mut buf = string_record("OK");
    buf.extend([0x00, 0x00]);

    let err = decode(&buf).unwrap_err();
    assert!(matches!(err.source, Error::InvalidSync { .. }));
    assert_eq!(err.offset, 12);
    assert_eq!(err.partial.records.len(), 1);
}

#[test]
fn pnorc_sentence_from_decoded_stream() {
    let body = average_profile_body(
        3,
        1,
        -3,
        &[1000, 2000, 3000],
        &[20, 40, 60],
        &[90, 91, 92],
    );
    let buf = record(series::AVERAGE, &body);
    let decoded = decode(&buf).unwrap();

    let lines = nmea::encode(&decoded.records, &[SentenceKind::Pnorc]);
    assert_eq!(lines.len(), 1);
    let line = &lines[0];

    assert!(line.starts_with("$PNORC,060821,123045,1,1.000,2.000,3.000,"));
    assert!(line.contains(",10.0,20.0,30.0,"));

    let (body, sum) = line
        .strip_prefix('$')
        .and_then(|s| s.rsplit_once('*'))
        .unwrap();
    let want: u8 = body.bytes().fold(0, |acc, b| acc ^ b);
    assert_eq!(sum, format!("{want:02X}"));
}
