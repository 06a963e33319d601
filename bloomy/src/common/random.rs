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

//! Seeded random source used to derive filter salts.

use std::time::SystemTime;
use std::time::UNIX_EPOCH;

const NONZERO_STATE: u64 = 0x9e3779b97f4a7c15;

/// Random number source for filter construction.
pub(crate) trait RandomSource {
    /// Returns the next random 64-bit value.
    fn next_u64(&mut self) -> u64;

    /// Returns the high 32 bits of the next random value.
    fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }
}

/// Xorshift-based random generator.
///
/// A generator built with [`XorShift64::seeded`] always yields the same sequence,
/// which is what makes explicitly seeded filters reproducible.
#[derive(Debug, Clone, Copy)]
pub(crate) struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    /// Creates a new generator using the provided seed.
    pub fn seeded(seed: u64) -> Self {
        let state = if seed == 0 { NONZERO_STATE } else { seed };
        Self { state }
    }
}

impl Default for XorShift64 {
    /// Seeds the generator from process entropy (wall clock and process id).
    fn default() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        Self::seeded(nanos as u64 ^ (std::process::id() as u64))
    }
}

impl RandomSource for XorShift64 {
    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }
}

/// Returns a non-zero seed drawn from process entropy.
pub(crate) fn entropy_seed() -> u64 {
    // xorshift never maps a non-zero state to zero
    XorShift64::default().next_u64()
}
