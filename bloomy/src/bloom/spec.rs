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

use std::f64::consts::LN_2;

use crate::error::Error;

/// Largest bit array, in bytes, a filter may allocate.
const MAX_SIZE_BYTES: u64 = isize::MAX as u64;

/// Geometry of a Bloom filter: how many bits it has and how many hash rounds it runs.
///
/// Computed once from a target capacity and false positive rate, and fixed for the
/// lifetime of the filter.
///
/// # Examples
///
/// ```
/// # use bloomy::bloom::FilterSpec;
/// let spec = FilterSpec::compute(1000, 0.01).unwrap();
/// assert_eq!(spec.filter_size(), 9586);
/// assert_eq!(spec.num_hashes(), 7);
/// assert_eq!(spec.size_bytes(), 1199);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FilterSpec {
    num_hashes: u32,
    filter_size: u64,
    size_bytes: usize,
}

impl FilterSpec {
    /// Computes the optimal geometry for `capacity` items at `error_rate`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidArgument`](crate::error::ErrorKind::InvalidArgument) if:
    /// - `capacity` is 0 or does not fit in `usize`
    /// - `error_rate` is not strictly between 0.0 and 1.0
    /// - the resulting bit array would be too large to allocate
    pub fn compute(capacity: u64, error_rate: f64) -> Result<Self, Error> {
        if capacity == 0 || usize::try_from(capacity).is_err() {
            return Err(Error::invalid_argument("bad filter parameters")
                .with_context("capacity", capacity)
                .with_context("error_rate", error_rate));
        }
        // written so that NaN is rejected too
        if !(error_rate > 0.0 && error_rate < 1.0) {
            return Err(Error::invalid_argument("bad filter parameters")
                .with_context("capacity", capacity)
                .with_context("error_rate", error_rate));
        }

        let raw_bits = optimal_num_bits(capacity, error_rate);
        if !raw_bits.is_finite() || raw_bits >= u64::MAX as f64 {
            return Err(Error::invalid_argument("filter is too large")
                .with_context("capacity", capacity)
                .with_context("error_rate", error_rate));
        }
        let filter_size = (raw_bits as u64).max(1);

        let size_bytes = filter_size.div_ceil(8);
        if size_bytes > MAX_SIZE_BYTES {
            return Err(Error::invalid_argument("filter is too large")
                .with_context("filter_size", filter_size));
        }

        Ok(FilterSpec {
            num_hashes: suggest_num_hashes(capacity, filter_size),
            filter_size,
            size_bytes: size_bytes as usize,
        })
    }

    /// Returns the number of hash rounds per insert or lookup (k).
    pub fn num_hashes(&self) -> u32 {
        self.num_hashes
    }

    /// Returns the number of addressable bits (m).
    pub fn filter_size(&self) -> u64 {
        self.filter_size
    }

    /// Returns the byte length of the packed bit array, `ceil(m / 8)`.
    pub fn size_bytes(&self) -> usize {
        self.size_bytes
    }
}

fn optimal_num_bits(capacity: u64, error_rate: f64) -> f64 {
    (-(capacity as f64) * error_rate.ln() / (LN_2 * LN_2)).ceil()
}

/// Suggests the number of bits for `capacity` items at `error_rate`.
///
/// Formula: `m = ceil(-n * ln(p) / (ln(2)^2))`
///
/// Inputs are not validated; the result saturates at `u64::MAX`. Use
/// [`FilterSpec::compute`] for checked sizing.
///
/// # Examples
///
/// ```
/// # use bloomy::bloom::suggest_num_bits;
/// assert_eq!(suggest_num_bits(1000, 0.01), 9586);
/// ```
pub fn suggest_num_bits(capacity: u64, error_rate: f64) -> u64 {
    optimal_num_bits(capacity, error_rate) as u64
}

/// Suggests the number of hash rounds given the capacity and bit count.
///
/// Formula: `k = round(m / n * ln(2))`, at least 1.
///
/// # Examples
///
/// ```
/// # use bloomy::bloom::suggest_num_hashes;
/// assert_eq!(suggest_num_hashes(1000, 9586), 7); // k ≈ 6.64
/// ```
pub fn suggest_num_hashes(capacity: u64, num_bits: u64) -> u32 {
    let m = num_bits as f64;
    let n = capacity.max(1) as f64;
    ((m / n * LN_2).round() as u32).max(1)
}
