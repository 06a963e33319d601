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

//! Example demonstrating Bloom filter usage and persistence

use std::time::Instant;

use bloomy::bloom::BloomFilterBuilder;
use bloomy::handle::BloomFilterHandle;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Bloom Filter Example ===\n");

    // Example 1: Basic usage
    println!("1. Basic Bloom Filter Usage:");
    let mut filter = BloomFilterBuilder::with_accuracy(1000, 0.01)
        .seed(42)
        .build()
        .unwrap();
    filter.insert("apple");
    println!("   has(\"apple\"): {}", filter.contains("apple"));
    println!("   has(\"banana\"): {}", filter.contains("banana"));
    println!("   Info: {:?}", filter.info());
    println!();

    // Example 2: Load a filter to capacity
    println!("2. Loading 2,000,000 items:");
    let mut handle = BloomFilterHandle::default();
    handle.construct(2_000_000, Some(0.000001), None).unwrap();
    let start = Instant::now();
    for i in 1..2_000_000 {
        handle.add(&format!("foo{i}")).unwrap();
    }
    println!("   Inserted in {:?}", start.elapsed());
    println!("   has(\"foo\"): {}", handle.has("foo").unwrap());
    println!("   has(\"foo232323\"): {}", handle.has("foo232323").unwrap());
    println!("   has(\"foo1212121\"): {}", handle.has("foo1212121").unwrap());
    println!();

    // Example 3: Write and read back
    println!("3. Serialize into a second filter:");
    let start = Instant::now();
    let bytes = handle.write().unwrap();
    println!("   Serialized {} bytes in {:?}", bytes.len(), start.elapsed());

    let mut copy = BloomFilterHandle::default();
    copy.construct(2_000_000, Some(0.000001), None).unwrap();
    let start = Instant::now();
    copy.read(&bytes).unwrap();
    println!("   Read back in {:?}", start.elapsed());
    println!("   has(\"foo232323\"): {}", copy.has("foo232323").unwrap());

    copy.add("test after read").unwrap();
    println!(
        "   has(\"test after read\"): {}",
        copy.has("test after read").unwrap()
    );
    println!();

    println!("   Original: {:?}", handle.info().unwrap());
    println!("   Copy:     {:?}", copy.info().unwrap());
}
