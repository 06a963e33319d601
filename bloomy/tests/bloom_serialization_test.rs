// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::error::Error as _;

use bloomy::bloom::BloomFilter;
use bloomy::bloom::BloomFilterBuilder;
use bloomy::bloom::serialization::HEADER_BYTES;
use bloomy::error::ErrorKind;
use googletest::assert_that;
use googletest::prelude::contains_substring;

fn build(capacity: u64, error_rate: f64, seed: u64) -> BloomFilter {
    BloomFilterBuilder::with_accuracy(capacity, error_rate)
        .seed(seed)
        .build()
        .unwrap()
}

#[test]
fn test_round_trip_restores_state() {
    let mut original = build(1000, 0.01, 42);
    for i in 0..500 {
        original.insert(&format!("foo{i}"));
    }

    // target uses a different seed; loading replaces its salts
    let mut restored = build(1000, 0.01, 99);
    restored.deserialize_into(&original.serialize()).unwrap();

    assert_eq!(restored, original);
    assert_eq!(restored.salts(), original.salts());
    assert_eq!(restored.num_elements(), 500);
    assert_eq!(restored.bit_array(), original.bit_array());
    for i in 0..500 {
        assert!(restored.contains(&format!("foo{i}")));
    }

    restored.insert("after load");
    assert!(restored.contains("after load"));
    assert_eq!(restored.num_elements(), 501);
}

#[test]
fn test_round_trip_empty_filter() {
    let original = build(100, 0.01, 1);
    let mut restored = build(100, 0.01, 2);
    restored.deserialize_into(&original.serialize()).unwrap();
    assert_eq!(restored, original);
    assert!(restored.is_empty());
}

#[test]
fn test_serialized_size() {
    let filter = build(1000, 0.01, 42);
    assert_eq!(HEADER_BYTES, 16);
    assert_eq!(filter.serialized_size(), 16 + 1199);
    assert_eq!(filter.serialize().len(), filter.serialized_size());
}

#[test]
fn test_truncated_header_is_rejected() {
    let mut filter = build(100, 0.01, 42);
    filter.insert("kept");
    let before = filter.clone();

    let bytes = build(100, 0.01, 7).serialize();
    for (len, field) in [(0, "salt1"), (6, "salt2"), (12, "num_elements")] {
        let err = filter.deserialize_into(&bytes[..len]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedData);
        assert_that!(err.message(), contains_substring(field));
        assert!(err.source().is_some());
    }
    assert_eq!(filter, before);
}

#[test]
fn test_truncated_bit_array_is_rejected() {
    let mut filter = build(100, 0.01, 42);
    let before = filter.clone();

    let bytes = build(100, 0.01, 7).serialize();
    let err = filter
        .deserialize_into(&bytes[..bytes.len() - 1])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedData);
    assert_that!(err.message(), contains_substring("bit_array"));
    assert_that!(err.to_string(), contains_substring("expected_bytes: 120"));
    assert_eq!(filter, before);
}

#[test]
fn test_trailing_bytes_are_rejected() {
    let mut filter = build(100, 0.01, 42);
    let mut bytes = build(100, 0.01, 7).serialize();
    bytes.push(0);

    let err = filter.deserialize_into(&bytes).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedData);
    assert_that!(err.message(), contains_substring("trailing bytes"));
}

#[test]
fn test_mismatched_geometry_is_rejected() {
    let small = build(100, 0.01, 42);
    let mut large = build(1000, 0.01, 42);
    let err = large.deserialize_into(&small.serialize()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedData);

    let mut small = build(100, 0.01, 42);
    let err = small.deserialize_into(&large.serialize()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedData);
}
