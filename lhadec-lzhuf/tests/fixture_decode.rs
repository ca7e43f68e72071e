//! Integration tests decoding captured payloads for every method.
//!
//! Each compressed fixture under `tests/fixtures/` decodes to one of the
//! plain files next to it. The decoder is driven with several output
//! buffer sizes so that drains straddle match boundaries and window wraps.

use lhadec_core::error::LhaError;
use lhadec_core::traits::{Decompressor, ReadStatus};
use lhadec_lzhuf::{DecoderConfig, DecoderState, LzhDecoder, LzhMethod, decode_lzh};
use std::io::{self, Read};

const SAMPLE: &[u8] = include_bytes!("fixtures/sample.txt");
const MIXED: &[u8] = include_bytes!("fixtures/mixed.bin");
const TOKENS: &[u8] = include_bytes!("fixtures/tokens.bin");

/// (name, method, payload, expected output)
const FIXTURES: &[(&str, LzhMethod, &[u8], &[u8])] = &[
    ("sample.lh1", LzhMethod::Lh1, include_bytes!("fixtures/sample.lh1"), SAMPLE),
    ("sample.lh2", LzhMethod::Lh2, include_bytes!("fixtures/sample.lh2"), SAMPLE),
    ("sample.lh3", LzhMethod::Lh3, include_bytes!("fixtures/sample.lh3"), SAMPLE),
    ("sample_blocks.lh3", LzhMethod::Lh3, include_bytes!("fixtures/sample_blocks.lh3"), SAMPLE),
    ("sample_fixed.lh3", LzhMethod::Lh3, include_bytes!("fixtures/sample_fixed.lh3"), SAMPLE),
    ("sample.lh4", LzhMethod::Lh4, include_bytes!("fixtures/sample.lh4"), SAMPLE),
    ("sample.lh5", LzhMethod::Lh5, include_bytes!("fixtures/sample.lh5"), SAMPLE),
    ("sample_blocks.lh5", LzhMethod::Lh5, include_bytes!("fixtures/sample_blocks.lh5"), SAMPLE),
    ("sample.lh6", LzhMethod::Lh6, include_bytes!("fixtures/sample.lh6"), SAMPLE),
    ("sample.lh7", LzhMethod::Lh7, include_bytes!("fixtures/sample.lh7"), SAMPLE),
    ("sample.lzs", LzhMethod::Lzs, include_bytes!("fixtures/sample.lzs"), SAMPLE),
    ("sample.lz5", LzhMethod::Lz5, include_bytes!("fixtures/sample.lz5"), SAMPLE),
    ("mixed.lh2", LzhMethod::Lh2, include_bytes!("fixtures/mixed.lh2"), MIXED),
    ("mixed.lh6", LzhMethod::Lh6, include_bytes!("fixtures/mixed.lh6"), MIXED),
    ("mixed.lh7", LzhMethod::Lh7, include_bytes!("fixtures/mixed.lh7"), MIXED),
    ("tokens.lh1", LzhMethod::Lh1, include_bytes!("fixtures/tokens.lh1"), TOKENS),
    ("tokens.lh2", LzhMethod::Lh2, include_bytes!("fixtures/tokens.lh2"), TOKENS),
];

fn decoder(method: LzhMethod, payload: &[u8], size: u64) -> LzhDecoder<&[u8]> {
    LzhDecoder::new(payload, DecoderConfig::new(method, size)).expect("supported method")
}

/// Drain a decoder with a fixed buffer size, checking the end marker.
fn drain(decoder: &mut LzhDecoder<&[u8]>, chunk: usize) -> Vec<u8> {
    let mut output = Vec::new();
    let mut buffer = vec![0u8; chunk];
    loop {
        match decoder.decompress(&mut buffer).expect("decode failed") {
            ReadStatus::Produced(n) => {
                assert!(n > 0 && n <= chunk);
                output.extend_from_slice(&buffer[..n]);
            }
            ReadStatus::EndOfEntry => break,
        }
    }
    output
}

// ============================================================================
// Round trips
// ============================================================================

#[test]
fn test_every_fixture_decodes() {
    for &(name, method, payload, expected) in FIXTURES {
        let output = decode_lzh(payload, method, expected.len() as u64)
            .unwrap_or_else(|e| panic!("{}: {}", name, e));
        assert!(output == expected, "{}: output differs", name);
    }
}

#[test]
fn test_buffer_sizes_do_not_matter() {
    for &(name, method, payload, expected) in FIXTURES {
        for chunk in [1, 7, 4096, 70_000] {
            let mut d = decoder(method, payload, expected.len() as u64);
            let output = drain(&mut d, chunk);
            assert!(output == expected, "{} with {}-byte reads", name, chunk);
            assert_eq!(d.bytes_delivered(), expected.len() as u64);
            assert!(d.is_finished());
        }
    }
}

#[test]
fn test_end_of_entry_exactly_at_declared_size() {
    let (_, method, payload, expected) = FIXTURES[6];
    let mut d = decoder(method, payload, expected.len() as u64);
    let mut buffer = vec![0u8; expected.len()];
    assert_eq!(
        d.decompress(&mut buffer).unwrap(),
        ReadStatus::Produced(expected.len())
    );
    assert_eq!(d.state(), DecoderState::Exhausted);
    assert_eq!(d.decompress(&mut buffer).unwrap(), ReadStatus::EndOfEntry);
}

#[test]
fn test_shorter_declared_size_stops_early() {
    for &(name, method, payload, expected) in FIXTURES {
        let output = decode_lzh(payload, method, 1000).unwrap();
        assert!(output == expected[..1000], "{}", name);
    }
}

#[test]
fn test_io_read_path() {
    let (_, method, payload, expected) = FIXTURES[1];
    let mut d = decoder(method, payload, expected.len() as u64);
    let mut output = Vec::new();
    d.read_to_end(&mut output).unwrap();
    assert_eq!(output, expected);
}

#[test]
fn test_signature_lookup_drives_decoder() {
    let payload = include_bytes!("fixtures/sample.lzs");
    let config = DecoderConfig::from_signature(b"-lzs-", SAMPLE.len() as u64).unwrap();
    let mut d = LzhDecoder::new(&payload[..], config).unwrap();
    assert_eq!(d.decompress_all().unwrap(), SAMPLE);
}

#[test]
fn test_lh6_and_lh7_share_a_format() {
    // a stream whose matches fit 32KB decodes identically under either name
    let lh6 = include_bytes!("fixtures/sample.lh6");
    let size = SAMPLE.len() as u64;
    assert_eq!(
        decode_lzh(lh6, LzhMethod::Lh6, size).unwrap(),
        decode_lzh(lh6, LzhMethod::Lh7, size).unwrap()
    );
}

#[test]
fn test_seeded_dictionary_fixture() {
    let payload = include_bytes!("fixtures/seed_run.lz5");
    let output = decode_lzh(payload, LzhMethod::Lz5, 13).unwrap();
    assert_eq!(output, b"AAAAAAAAAAAAA");
}

#[test]
fn test_stored_methods() {
    for method in [LzhMethod::Lh0, LzhMethod::Lz4] {
        let mut d = decoder(method, SAMPLE, SAMPLE.len() as u64);
        assert_eq!(drain(&mut d, 333), SAMPLE);
    }
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn test_truncated_payloads_fail_then_stay_failed() {
    for &(name, method, payload, expected) in FIXTURES {
        let cut = &payload[..payload.len() / 2];
        let mut d = decoder(method, cut, expected.len() as u64);
        let mut buffer = vec![0u8; 4096];
        let err = loop {
            match d.decompress(&mut buffer) {
                Ok(ReadStatus::Produced(_)) => continue,
                Ok(ReadStatus::EndOfEntry) => panic!("{}: decoded a truncated payload", name),
                Err(err) => break err,
            }
        };
        assert!(
            matches!(err, LhaError::PrematureEndOfInput { .. }),
            "{}: {}",
            name,
            err
        );
        assert_eq!(d.state(), DecoderState::Failed);
        assert!(matches!(
            d.decompress(&mut buffer),
            Err(LhaError::DecoderFailed)
        ));
    }
}

#[test]
fn test_truncation_surfaces_as_unexpected_eof() {
    let (_, method, payload, expected) = FIXTURES[0];
    let mut d = decoder(method, &payload[..100], expected.len() as u64);
    let err = io::copy(&mut d, &mut io::sink()).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
}

#[test]
fn test_oversubscribed_header_is_bad_table() {
    // block of 1, three length-code lengths of 1 bit each
    let payload = [0x00, 0x01, 0x19, 0x24, 0x00, 0x00, 0x00, 0x00];
    let err = decode_lzh(&payload, LzhMethod::Lh5, 100).unwrap_err();
    assert!(matches!(err, LhaError::BadTable { .. }));
    assert!(err.is_corruption());
}

#[test]
fn test_corrupted_lh3_header_is_rejected() {
    // every code present with length 16
    let payload = [0xFF; 200];
    let err = decode_lzh(&payload, LzhMethod::Lh3, 100).unwrap_err();
    assert!(matches!(err, LhaError::BadTable { .. }));
}

#[test]
fn test_unknown_and_unsupported_methods() {
    assert!(matches!(
        DecoderConfig::from_signature(b"-zip-", 1),
        Err(LhaError::UnknownMethod { .. })
    ));

    let config = DecoderConfig::from_signature(b"-pm1-", 1).unwrap();
    assert!(matches!(
        LzhDecoder::new(&b""[..], config),
        Err(LhaError::UnsupportedMethod { .. })
    ));
}

#[test]
fn test_directory_and_empty_entries() {
    let mut d = decoder(LzhMethod::Lhd, b"", 0);
    assert_eq!(d.decompress_all().unwrap(), Vec::<u8>::new());

    // the payload is garbage, but a zero-size entry never looks at it
    let mut d = decoder(LzhMethod::Lh7, &[0xFF; 3], 0);
    let mut buffer = [0u8; 8];
    assert_eq!(d.decompress(&mut buffer).unwrap(), ReadStatus::EndOfEntry);
    assert_eq!(d.into_inner(), &[0xFF; 3]);
}
