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

//! Binary layout of a serialized filter.
//!
//! All integers are little-endian, independent of the producing platform:
//!
//! ```text
//! offset 0..4   : salt1        (u32)
//! offset 4..8   : salt2        (u32)
//! offset 8..16  : num_elements (u64)
//! offset 16..   : bit array    (size_bytes bytes, bit b at byte b / 8, position b % 8)
//! ```

pub(super) const SALT_BYTES: usize = size_of::<u32>();
pub(super) const NUM_ELEMENTS_BYTES: usize = size_of::<u64>();

/// Number of bytes preceding the bit array.
pub const HEADER_BYTES: usize = 2 * SALT_BYTES + NUM_ELEMENTS_BYTES;
