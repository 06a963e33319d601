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

//! Bloom filter implementation for probabilistic set membership testing.
//!
//! A Bloom filter is a space-efficient probabilistic data structure used to test whether
//! an element is a member of a set. False positive matches are possible, but false negatives
//! are not. In other words, a query returns either "possibly in set" or "definitely not in set".
//!
//! # Properties
//!
//! - **No false negatives**: If an item was inserted, `contains()` will always return `true`
//! - **Possible false positives**: `contains()` may return `true` for items never inserted
//! - **Fixed size**: the filter never resizes, and bits are never cleared
//! - **Reproducible**: the hash salts derive from a seed, so equal seeds give equal filters
//!
//! # Usage
//!
//! ```rust
//! use bloomy::bloom::BloomFilterBuilder;
//!
//! // Create a filter sized for 1000 items with a 1% false positive rate
//! let mut filter = BloomFilterBuilder::with_accuracy(1000, 0.01)
//!     .seed(42)
//!     .build()
//!     .unwrap();
//!
//! filter.insert("apple");
//! filter.insert("banana");
//!
//! assert!(filter.contains("apple")); // true - definitely inserted
//! assert!(!filter.contains("grape")); // false - never inserted (probably)
//!
//! println!("Filter size: {} bits", filter.filter_size());
//! println!("Bits used: {}", filter.bits_used());
//! println!("Est. FPP: {:.4}%", filter.estimated_fpp() * 100.0);
//! ```
//!
//! # Sizing
//!
//! For `n` expected items and a target error rate `p`, the filter uses
//! `m = ceil(-n * ln(p) / ln(2)^2)` bits and `k = round(m / n * ln(2))` hash rounds.
//! Bit positions come from double hashing: round `i` sets bit `(h1 + i * h2) mod m`, where
//! `h1` and `h2` are MurmurHash3 digests of the item under the filter's two salts.
//!
//! # Persistence
//!
//! [`BloomFilter::serialize`] produces the salts, the insertion counter and the raw bit array.
//! [`BloomFilter::deserialize_into`] loads such bytes into a filter built with the same
//! capacity and error rate. See [`serialization`] for the byte layout.

mod builder;
pub mod serialization;
mod sketch;
mod spec;

pub use self::builder::BloomFilterBuilder;
pub use self::builder::DEFAULT_ERROR_RATE;
pub use self::sketch::BloomFilter;
pub use self::spec::FilterSpec;
pub use self::spec::suggest_num_bits;
pub use self::spec::suggest_num_hashes;

/// Read-only snapshot of a filter's configuration and insertion counter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterInfo {
    /// False positive rate requested at construction.
    pub error_rate: f64,
    /// Number of hash rounds per operation.
    pub num_hashes: u32,
    /// Number of bits in the filter.
    pub filter_size: u64,
    /// Byte length of the bit array.
    pub filter_size_in_bytes: usize,
    /// Number of insertions performed, duplicates included.
    pub num_items: u64,
}
