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

use tracing::debug;

use super::BloomFilter;
use super::FilterSpec;
use crate::common::random::RandomSource;
use crate::common::random::XorShift64;
use crate::common::random::entropy_seed;
use crate::error::Error;

/// False positive rate used when none is given.
pub const DEFAULT_ERROR_RATE: f64 = 0.01;

/// Builder for creating [`BloomFilter`] instances.
///
/// Parameters are validated in [`build()`](Self::build), which either returns a
/// fully initialized filter or an error; no partially built filter is observable.
#[derive(Debug, Clone)]
pub struct BloomFilterBuilder {
    capacity: u64,
    error_rate: f64,
    seed: u64,
}

impl BloomFilterBuilder {
    /// Creates a builder sized for `capacity` items at a target false positive rate.
    ///
    /// # Arguments
    ///
    /// - `capacity`: Expected number of inserted items
    /// - `error_rate`: Target false positive probability (e.g., 0.01 for 1%)
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomy::bloom::BloomFilterBuilder;
    /// // Optimal for 10,000 items with 1% error rate
    /// let filter = BloomFilterBuilder::with_accuracy(10_000, 0.01)
    ///     .seed(42)
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(filter.num_hashes(), 7);
    /// ```
    pub fn with_accuracy(capacity: u64, error_rate: f64) -> Self {
        BloomFilterBuilder {
            capacity,
            error_rate,
            seed: 0,
        }
    }

    /// Creates a builder sized for `capacity` items at [`DEFAULT_ERROR_RATE`].
    pub fn with_capacity(capacity: u64) -> Self {
        Self::with_accuracy(capacity, DEFAULT_ERROR_RATE)
    }

    /// Sets the seed the hash salts are derived from (default: 0, random).
    ///
    /// The same non-zero seed always yields the same salts, which makes filters
    /// reproducible. A seed of 0 draws a fresh seed from process entropy.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomy::bloom::BloomFilterBuilder;
    /// let a = BloomFilterBuilder::with_accuracy(100, 0.01).seed(12345).build().unwrap();
    /// let b = BloomFilterBuilder::with_accuracy(100, 0.01).seed(12345).build().unwrap();
    /// assert_eq!(a.salts(), b.salts());
    /// ```
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Builds the Bloom filter.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidArgument`](crate::error::ErrorKind::InvalidArgument)
    /// if the capacity or error rate is rejected by [`FilterSpec::compute`].
    pub fn build(self) -> Result<BloomFilter, Error> {
        let spec = FilterSpec::compute(self.capacity, self.error_rate)?;

        let seed = match self.seed {
            0 => entropy_seed(),
            seed => seed,
        };
        let mut rng = XorShift64::seeded(seed);
        let salt1 = rng.next_u32();
        let salt2 = rng.next_u32();

        debug!(
            capacity = self.capacity,
            error_rate = self.error_rate,
            num_hashes = spec.num_hashes(),
            filter_size = spec.filter_size(),
            size_bytes = spec.size_bytes(),
            "built bloom filter"
        );
        Ok(BloomFilter::from_parts(spec, self.error_rate, salt1, salt2))
    }
}
