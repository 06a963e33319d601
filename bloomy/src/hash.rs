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

//! Salted hashing shared by insert and membership tests.
//!
//! Every item is hashed twice with MurmurHash3 x64/128, once per salt. Only the
//! first 64-bit half of each digest is used; the pair feeds the double hashing
//! scheme in the filter.

/// Hashes `data` with MurmurHash3 x64/128 seeded by `salt`, returning the low half.
#[inline]
pub(crate) fn salted_hash(salt: u32, data: &[u8]) -> u64 {
    let (h1, _) = mur3::murmurhash3_x64_128(data, salt);
    h1
}

/// Computes both base hashes for an item.
#[inline]
pub(crate) fn base_hashes(salt1: u32, salt2: u32, data: &[u8]) -> (u64, u64) {
    (salted_hash(salt1, data), salted_hash(salt2, data))
}
