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

use bloomy::bloom::BloomFilter;
use bloomy::bloom::BloomFilterBuilder;
use bloomy::bloom::FilterInfo;
use googletest::assert_that;
use googletest::prelude::eq;
use googletest::prelude::ge;
use googletest::prelude::le;
use googletest::prelude::near;

fn seeded(capacity: u64, error_rate: f64, seed: u64) -> BloomFilter {
    BloomFilterBuilder::with_accuracy(capacity, error_rate)
        .seed(seed)
        .build()
        .unwrap()
}

#[test]
fn test_reference_scenario() {
    let mut filter = seeded(1000, 0.01, 42);
    assert_eq!(filter.filter_size(), 9586);
    assert_eq!(filter.num_hashes(), 7);

    filter.insert("apple");
    assert!(filter.contains("apple"));
    assert!(!filter.contains("banana"));
}

#[test]
fn test_empty_filter_contains_nothing() {
    let filter = seeded(1000, 0.01, 42);
    assert!(filter.is_empty());
    for i in 0..1000 {
        assert!(!filter.contains(&format!("item_{i}")));
    }
    assert!(!filter.contains(""));
}

#[test]
fn test_no_false_negatives() {
    let mut filter = seeded(10_000, 0.01, 7);
    let items: Vec<String> = (0..10_000).map(|i| format!("foo{i}")).collect();
    for item in &items {
        filter.insert(item);
    }
    for item in &items {
        assert!(filter.contains(item), "false negative for {item}");
    }
    assert_eq!(filter.num_elements(), 10_000);
}

#[test]
fn test_false_positive_rate_at_capacity() {
    let mut filter = seeded(10_000, 0.01, 9001);
    for i in 0..10_000u64 {
        filter.insert(&i.to_le_bytes());
    }

    let trials = 100_000u64;
    let false_positives = (10_000..10_000 + trials)
        .filter(|i| filter.contains(&i.to_le_bytes()))
        .count();
    let observed = false_positives as f64 / trials as f64;

    assert_that!(observed, le(0.02));
    assert_that!(filter.load_factor(), near(0.5, 0.05));
    assert_that!(filter.estimated_fpp(), near(0.01, 0.005));
}

#[test]
fn test_bits_are_never_cleared() {
    let mut filter = seeded(500, 0.01, 3);
    let mut previous = filter.bit_array().to_vec();
    for i in 0..2000u32 {
        filter.insert(&i.to_be_bytes());
        let current = filter.bit_array();
        assert!(
            previous.iter().zip(current).all(|(p, c)| p & !c == 0),
            "insert {i} cleared a bit"
        );
        assert_that!(
            filter.bits_used(),
            ge(previous.iter().map(|b| b.count_ones() as u64).sum::<u64>())
        );
        previous = current.to_vec();
    }
}

#[test]
fn test_same_seed_builds_identical_filters() {
    let mut f1 = seeded(1000, 0.01, 123);
    let mut f2 = seeded(1000, 0.01, 123);
    for word in ["a", "b", "c"] {
        f1.insert(word);
        f2.insert(word);
    }
    assert_eq!(f1, f2);

    let f3 = seeded(1000, 0.01, 456);
    assert_ne!(f1.salts(), f3.salts());
}

#[test]
fn test_random_seeds_differ() {
    let f1 = BloomFilter::builder(1000).build().unwrap();
    std::thread::sleep(std::time::Duration::from_millis(1));
    let f2 = BloomFilter::builder(1000).build().unwrap();
    assert_ne!(f1.salts(), f2.salts());
}

#[test]
fn test_info_reports_configuration() {
    let mut filter = seeded(20_000_000, 0.000001, 1);
    filter.insert("foo");
    filter.insert("foo");

    assert_that!(
        filter.info(),
        eq(FilterInfo {
            error_rate: 0.000001,
            num_hashes: 20,
            filter_size: 575_103_503,
            filter_size_in_bytes: 71_887_938,
            num_items: 2,
        })
    );
}
