//! Record and Scan Tests
//!
//! Tests verify:
//! - Key-only record ordering and sentinels
//! - Checked record decoding
//! - find_next walks keys in increasing order
//! - Duplicate keys are produced once each, in position order
//! - Scan I/O cost per call

use std::time::Duration;

use bytes::Bytes;
use sortsim::datagen::{decode_offset_key, encode_offset_key, DuplicateGenerator};
use sortsim::{find_next, Config, File, Node, Record, RecordLayout, RecordOffset, SimError};

const LAYOUT: RecordLayout = RecordLayout {
    key_size: 10,
    value_size: 90,
};

// =============================================================================
// Helper Functions
// =============================================================================

fn setup(records: u64, capacity: usize) -> (Node, File) {
    let config = Config::builder()
        .cache_capacity(capacity)
        .records(records)
        .build();
    let node = Node::new(config).unwrap();
    let file = node.open_file();
    (node, file)
}

fn setup_duplicates(records: u64, distinct: u64) -> (Node, File) {
    let config = Config::builder().records(records).build();
    let generator = DuplicateGenerator::new(config.record_size(), distinct);
    let node = Node::with_generator(config, Box::new(generator)).unwrap();
    let file = node.open_file();
    (node, file)
}

fn step(file: &File, after: &RecordOffset) -> RecordOffset {
    file.rewind();
    find_next(file, after, LAYOUT).unwrap()
}

fn key_of(offset: u64) -> Vec<u8> {
    let mut key = encode_offset_key(offset);
    key.resize(LAYOUT.key_size, 0);
    key
}

fn record(key: &[u8]) -> Record {
    Record::new(key.to_vec(), vec![0u8; LAYOUT.value_size])
}

// =============================================================================
// Record Comparator Tests
// =============================================================================

#[test]
fn test_compare_uses_key_bytes_only() {
    let a = Record::new(vec![1u8, 2, 3], vec![9u8, 9]);
    let b = Record::new(vec![1u8, 2, 3], vec![0u8, 0]);
    let c = Record::new(vec![1u8, 2, 4], vec![0u8, 0]);

    assert_eq!(a.compare(&b), std::cmp::Ordering::Equal);
    assert!(a.less_than(&c));
    assert!(!c.less_than(&a));
    assert!(a.less_or_equal(&b));
    assert!(!a.less_than(&b));
}

#[test]
fn test_compare_is_unsigned() {
    let low = record(&[0x7F; 10]);
    let high = record(&[0x80; 10]);

    assert!(low.less_than(&high));
}

#[test]
fn test_sentinels_bound_every_key() {
    let min = Record::min(LAYOUT);
    let max = Record::max(LAYOUT);

    for offset in [0u64, 100, 99_900, u64::MAX] {
        let r = record(&key_of(offset));
        assert!(min.less_or_equal(&r));
        assert!(r.less_than(&max));
    }
    assert_eq!(min.key(), &[0u8; 10]);
    assert_eq!(max.key(), &[0xFFu8; 10]);
}

#[test]
fn test_decode_splits_key_and_value() {
    let mut raw = key_of(300);
    raw.extend(std::iter::repeat(7u8).take(90));
    let bytes = Bytes::from(raw);

    let r = Record::decode(&bytes, LAYOUT).unwrap();
    assert_eq!(r.key(), &key_of(300)[..]);
    assert_eq!(r.value(), &[7u8; 90][..]);
}

#[test]
fn test_decode_rejects_wrong_length() {
    let bytes = Bytes::from(vec![0u8; 99]);

    let err = Record::decode(&bytes, LAYOUT).unwrap_err();
    assert_eq!(
        err,
        SimError::RecordSize {
            expected: 100,
            actual: 99
        }
    );
}

#[test]
fn test_end_marker_detection() {
    assert!(RecordOffset::end(LAYOUT).is_end());
    assert!(!RecordOffset::start(LAYOUT).is_end());
    assert!(!RecordOffset::new(Record::max(LAYOUT), 3).is_end());
}

// =============================================================================
// Scan Progression Tests
// =============================================================================

#[test]
fn test_first_step_returns_offset_zero() {
    let (_node, file) = setup(50, 64);

    let first = step(&file, &RecordOffset::start(LAYOUT));

    assert_eq!(first.position, 1);
    assert_eq!(decode_offset_key(first.record.key()), Some(0));
}

#[test]
fn test_steps_walk_offsets_in_order_then_end() {
    let (_node, file) = setup(50, 64);

    let mut cursor = RecordOffset::start(LAYOUT);
    for i in 0..50u64 {
        let next = step(&file, &cursor);
        assert_eq!(next.position, i + 1);
        assert_eq!(decode_offset_key(next.record.key()), Some(i * 100));
        assert!(cursor.record.less_or_equal(&next.record));
        cursor = next;
    }

    let end = step(&file, &cursor);
    assert!(end.is_end());
    assert_eq!(end, RecordOffset::end(LAYOUT));
}

#[test]
fn test_scan_from_unrewound_file_finds_nothing() {
    let (_node, file) = setup(10, 64);

    step(&file, &RecordOffset::start(LAYOUT));
    let stale = find_next(&file, &RecordOffset::start(LAYOUT), LAYOUT).unwrap();

    assert!(stale.is_end());
}

#[test]
fn test_empty_file_has_no_next_record() {
    let (_node, file) = setup(0, 4);

    assert!(step(&file, &RecordOffset::start(LAYOUT)).is_end());
}

#[test]
fn test_cursor_between_keys() {
    let (_node, file) = setup(20, 64);

    // A key that is not in the file: next is the smallest key above it
    let cursor = RecordOffset::new(record(&key_of(550)), 0);
    let next = step(&file, &cursor);

    assert_eq!(decode_offset_key(next.record.key()), Some(600));
    assert_eq!(next.position, 7);
}

// =============================================================================
// Duplicate Key Tests
// =============================================================================

#[test]
fn test_duplicate_tie_break_moves_to_later_position() {
    // Keys by position: 0, 100, 200, 0, 100, 200, 0, 100, 200
    let (_node, file) = setup_duplicates(9, 3);

    let cursor = RecordOffset::new(record(&key_of(0)), 1);
    let next = step(&file, &cursor);

    assert_eq!(decode_offset_key(next.record.key()), Some(0));
    assert_eq!(next.position, 4);
}

#[test]
fn test_duplicates_produced_once_each() {
    let (_node, file) = setup_duplicates(9, 3);

    let mut cursor = RecordOffset::start(LAYOUT);
    let mut produced = Vec::new();
    loop {
        let next = step(&file, &cursor);
        if next.is_end() {
            break;
        }
        produced.push((decode_offset_key(next.record.key()).unwrap(), next.position));
        cursor = next;
    }

    assert_eq!(
        produced,
        vec![
            (0, 1),
            (0, 4),
            (0, 7),
            (100, 2),
            (100, 5),
            (100, 8),
            (200, 3),
            (200, 6),
            (200, 9),
        ]
    );
}

#[test]
fn test_last_duplicate_moves_to_next_key() {
    let (_node, file) = setup_duplicates(9, 3);

    let cursor = RecordOffset::new(record(&key_of(100)), 8);
    let next = step(&file, &cursor);

    assert_eq!(decode_offset_key(next.record.key()), Some(200));
    assert_eq!(next.position, 3);
}

// =============================================================================
// Scan Cost Tests
// =============================================================================

#[test]
fn test_each_scan_pays_full_pass_when_cache_is_small() {
    let (node, file) = setup(1000, 4);

    let mut cursor = RecordOffset::start(LAYOUT);
    for i in 1..=3u32 {
        cursor = step(&file, &cursor);
        assert_eq!(node.get_time(), Duration::from_millis(250) * i);
    }
}

#[test]
fn test_later_scans_are_free_when_file_is_cached() {
    let (node, file) = setup(1000, 64);

    let mut cursor = RecordOffset::start(LAYOUT);
    for _ in 0..3 {
        cursor = step(&file, &cursor);
    }

    assert_eq!(node.get_time(), Duration::from_millis(250));
}
