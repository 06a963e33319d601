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

use std::io::Cursor;

use byteorder::LE;
use byteorder::ReadBytesExt;
use tracing::debug;

use super::BloomFilterBuilder;
use super::FilterInfo;
use super::FilterSpec;
use super::serialization::HEADER_BYTES;
use crate::codec::FilterBytes;
use crate::error::Error;
use crate::hash::base_hashes;

/// A Bloom filter for probabilistic set membership testing over byte strings.
///
/// Provides:
/// - No false negatives (inserted items always test as present)
/// - A false positive rate close to the configured target at design capacity
/// - A fixed-size bit array that only ever gains set bits
///
/// Use [`BloomFilterBuilder`] to construct instances.
#[derive(Debug, Clone, PartialEq)]
pub struct BloomFilter {
    /// Geometry fixed at construction
    spec: FilterSpec,
    /// False positive rate requested at construction (reporting only)
    max_error_rate: f64,
    /// Seed of the first base hash
    salt1: u32,
    /// Seed of the second base hash
    salt2: u32,
    /// Number of insert calls, duplicates included
    num_elements: u64,
    /// Packed bit array, `spec.size_bytes()` long
    bits: Vec<u8>,
}

impl BloomFilter {
    /// Returns a builder for a filter sized for `capacity` items at the default error rate.
    ///
    /// # Examples
    ///
    /// ```
    /// use bloomy::bloom::BloomFilter;
    ///
    /// let filter = BloomFilter::builder(1000).seed(42).build().unwrap();
    /// assert_eq!(filter.max_error_rate(), 0.01);
    /// ```
    pub fn builder(capacity: u64) -> BloomFilterBuilder {
        BloomFilterBuilder::with_capacity(capacity)
    }

    pub(super) fn from_parts(
        spec: FilterSpec,
        max_error_rate: f64,
        salt1: u32,
        salt2: u32,
    ) -> Self {
        BloomFilter {
            spec,
            max_error_rate,
            salt1,
            salt2,
            num_elements: 0,
            bits: vec![0u8; spec.size_bytes()],
        }
    }

    // ========================================================================
    // Query Operations
    // ========================================================================

    /// Tests whether an item is possibly in the set.
    ///
    /// Returns:
    /// - `true`: Item was **possibly** inserted (or false positive)
    /// - `false`: Item was **definitely not** inserted
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomy::bloom::BloomFilterBuilder;
    /// let mut filter = BloomFilterBuilder::with_accuracy(100, 0.01).build().unwrap();
    /// filter.insert("apple");
    ///
    /// assert!(filter.contains("apple")); // true - was inserted
    /// assert!(!filter.contains("grape")); // false - never inserted (probably)
    /// ```
    pub fn contains<T: AsRef<[u8]> + ?Sized>(&self, item: &T) -> bool {
        let (h1, h2) = base_hashes(self.salt1, self.salt2, item.as_ref());
        self.check_bits(h1, h2)
    }

    /// Tests and inserts an item in a single operation.
    ///
    /// Returns whether the item was possibly already in the set before insertion.
    /// The insertion counter is incremented either way.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomy::bloom::BloomFilterBuilder;
    /// let mut filter = BloomFilterBuilder::with_accuracy(100, 0.01).build().unwrap();
    ///
    /// assert!(!filter.test_and_insert("apple")); // First insertion
    /// assert!(filter.test_and_insert("apple")); // Now it's in the set
    /// assert_eq!(filter.num_elements(), 2);
    /// ```
    pub fn test_and_insert<T: AsRef<[u8]> + ?Sized>(&mut self, item: &T) -> bool {
        let (h1, h2) = base_hashes(self.salt1, self.salt2, item.as_ref());
        let was_present = self.check_bits(h1, h2);
        self.set_bits(h1, h2);
        self.num_elements = self.num_elements.saturating_add(1);
        was_present
    }

    // ========================================================================
    // Update Operations
    // ========================================================================

    /// Inserts an item into the filter.
    ///
    /// After insertion, `contains(item)` will always return `true`. Inserting the
    /// same item again sets no new bits but still counts as an insertion in
    /// [`num_elements()`](Self::num_elements).
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomy::bloom::BloomFilterBuilder;
    /// let mut filter = BloomFilterBuilder::with_accuracy(100, 0.01).build().unwrap();
    ///
    /// filter.insert("apple");
    /// filter.insert(&[1u8, 2, 3]);
    /// filter.insert(&42u64.to_le_bytes());
    ///
    /// assert!(filter.contains("apple"));
    /// ```
    pub fn insert<T: AsRef<[u8]> + ?Sized>(&mut self, item: &T) {
        let (h1, h2) = base_hashes(self.salt1, self.salt2, item.as_ref());
        self.set_bits(h1, h2);
        self.num_elements = self.num_elements.saturating_add(1);
    }

    // ========================================================================
    // Statistics and Properties
    // ========================================================================

    /// Returns a snapshot of the filter configuration and counters.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomy::bloom::BloomFilterBuilder;
    /// let mut filter = BloomFilterBuilder::with_accuracy(1000, 0.01).build().unwrap();
    /// filter.insert("apple");
    ///
    /// let info = filter.info();
    /// assert_eq!(info.error_rate, 0.01);
    /// assert_eq!(info.num_hashes, 7);
    /// assert_eq!(info.filter_size, 9586);
    /// assert_eq!(info.filter_size_in_bytes, 1199);
    /// assert_eq!(info.num_items, 1);
    /// ```
    pub fn info(&self) -> FilterInfo {
        FilterInfo {
            error_rate: self.max_error_rate,
            num_hashes: self.spec.num_hashes(),
            filter_size: self.spec.filter_size(),
            filter_size_in_bytes: self.spec.size_bytes(),
            num_items: self.num_elements,
        }
    }

    /// Returns the geometry computed at construction.
    pub fn spec(&self) -> &FilterSpec {
        &self.spec
    }

    /// Returns the number of hash rounds (k).
    pub fn num_hashes(&self) -> u32 {
        self.spec.num_hashes()
    }

    /// Returns the number of addressable bits (m).
    pub fn filter_size(&self) -> u64 {
        self.spec.filter_size()
    }

    /// Returns the byte length of the bit array.
    pub fn size_bytes(&self) -> usize {
        self.spec.size_bytes()
    }

    /// Returns the false positive rate requested at construction.
    pub fn max_error_rate(&self) -> f64 {
        self.max_error_rate
    }

    /// Returns the two hash salts.
    pub fn salts(&self) -> (u32, u32) {
        (self.salt1, self.salt2)
    }

    /// Returns the number of insertions performed.
    ///
    /// This counts insert calls, not distinct items: inserting an item twice counts twice.
    pub fn num_elements(&self) -> u64 {
        self.num_elements
    }

    /// Returns the raw packed bit array.
    pub fn bit_array(&self) -> &[u8] {
        &self.bits
    }

    /// Returns whether no bit is set.
    pub fn is_empty(&self) -> bool {
        self.bits.iter().all(|&byte| byte == 0)
    }

    /// Returns the number of bits set to 1.
    ///
    /// Useful for monitoring filter saturation.
    pub fn bits_used(&self) -> u64 {
        self.bits.iter().map(|byte| byte.count_ones() as u64).sum()
    }

    /// Returns the fraction of bits set.
    pub fn load_factor(&self) -> f64 {
        self.bits_used() as f64 / self.spec.filter_size() as f64
    }

    /// Estimates the current false positive probability.
    ///
    /// A never-inserted item is reported present when all of its k bits happen to be
    /// set, so the estimate is `load_factor ^ k`. This assumes uniform bit distribution.
    pub fn estimated_fpp(&self) -> f64 {
        self.load_factor().powi(self.spec.num_hashes() as i32)
    }

    // ========================================================================
    // Serialization
    // ========================================================================

    /// Returns the exact length of [`serialize()`](Self::serialize) output.
    pub fn serialized_size(&self) -> usize {
        HEADER_BYTES + self.spec.size_bytes()
    }

    /// Serializes the salts, insertion counter and bit array.
    ///
    /// See [`serialization`](crate::bloom::serialization) for the layout.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomy::bloom::BloomFilterBuilder;
    /// let mut filter = BloomFilterBuilder::with_accuracy(100, 0.01).build().unwrap();
    /// filter.insert("test");
    ///
    /// let bytes = filter.serialize();
    /// assert_eq!(bytes.len(), 16 + filter.size_bytes());
    /// ```
    pub fn serialize(&self) -> Vec<u8> {
        let mut bytes = FilterBytes::with_capacity(self.serialized_size());
        bytes.write_u32_le(self.salt1);
        bytes.write_u32_le(self.salt2);
        bytes.write_u64_le(self.num_elements);
        bytes.write(&self.bits);
        bytes.into_bytes()
    }

    /// Overwrites this filter's salts, insertion counter and bits with serialized state.
    ///
    /// The filter keeps its own geometry, so the bytes must come from a filter built
    /// with the same capacity and error rate. Nothing is modified on error.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::MalformedData`](crate::error::ErrorKind::MalformedData) if:
    /// - The data is shorter or longer than [`serialized_size()`](Self::serialized_size)
    /// - Padding bits past the end of the bit array are set
    ///
    /// # Examples
    ///
    /// ```
    /// # use bloomy::bloom::BloomFilterBuilder;
    /// let mut original = BloomFilterBuilder::with_accuracy(100, 0.01).build().unwrap();
    /// original.insert("test");
    ///
    /// let mut restored = BloomFilterBuilder::with_accuracy(100, 0.01).build().unwrap();
    /// restored.deserialize_into(&original.serialize()).unwrap();
    /// assert_eq!(original, restored);
    /// ```
    pub fn deserialize_into(&mut self, bytes: &[u8]) -> Result<(), Error> {
        fn make_error(tag: &'static str) -> impl FnOnce(std::io::Error) -> Error {
            move |err| Error::insufficient_data(tag).set_source(err)
        }

        let mut cursor = Cursor::new(bytes);
        let salt1 = cursor.read_u32::<LE>().map_err(make_error("salt1"))?;
        let salt2 = cursor.read_u32::<LE>().map_err(make_error("salt2"))?;
        let num_elements = cursor
            .read_u64::<LE>()
            .map_err(make_error("num_elements"))?;

        let bit_array = &bytes[HEADER_BYTES..];
        let size_bytes = self.spec.size_bytes();
        if bit_array.len() < size_bytes {
            return Err(Error::insufficient_data("bit_array")
                .with_context("expected_bytes", size_bytes)
                .with_context("actual_bytes", bit_array.len()));
        }
        if bit_array.len() > size_bytes {
            return Err(Error::malformed("trailing bytes after bit array")
                .with_context("expected_bytes", size_bytes)
                .with_context("actual_bytes", bit_array.len()));
        }
        if let Some(&last) = bit_array.last() {
            if last & self.padding_mask() != 0 {
                return Err(Error::malformed("bits set past the end of the filter")
                    .with_context("filter_size", self.spec.filter_size()));
            }
        }

        self.salt1 = salt1;
        self.salt2 = salt2;
        self.num_elements = num_elements;
        self.bits.copy_from_slice(bit_array);

        debug!(num_elements, size_bytes, "loaded bloom filter state");
        Ok(())
    }

    // ========================================================================
    // Internal Helpers
    // ========================================================================

    /// Checks if all k bits are set for the given hash values.
    fn check_bits(&self, h1: u64, h2: u64) -> bool {
        (0..self.spec.num_hashes()).all(|i| self.get_bit(self.compute_bit_index(h1, h2, i)))
    }

    /// Sets all k bits for the given hash values.
    fn set_bits(&mut self, h1: u64, h2: u64) {
        for i in 0..self.spec.num_hashes() {
            let bit_index = self.compute_bit_index(h1, h2, i);
            self.set_bit(bit_index);
        }
    }

    /// Computes a bit index using double hashing (Kirsch-Mitzenmacher).
    /// Formula: (h1 + i * h2) mod filter_size
    fn compute_bit_index(&self, h1: u64, h2: u64, i: u32) -> u64 {
        let hash = h1.wrapping_add(u64::from(i).wrapping_mul(h2));
        hash % self.spec.filter_size()
    }

    fn get_bit(&self, bit_index: u64) -> bool {
        let byte_index = (bit_index / 8) as usize;
        let mask = 1u8 << (bit_index % 8);
        (self.bits[byte_index] & mask) != 0
    }

    fn set_bit(&mut self, bit_index: u64) {
        let byte_index = (bit_index / 8) as usize;
        let mask = 1u8 << (bit_index % 8);
        self.bits[byte_index] |= mask;
    }

    /// Mask of the unused high bits in the last byte of the array.
    fn padding_mask(&self) -> u8 {
        match self.spec.filter_size() % 8 {
            0 => 0,
            used => !((1u8 << used) - 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn filter(capacity: u64, error_rate: f64) -> BloomFilter {
        BloomFilterBuilder::with_accuracy(capacity, error_rate)
            .seed(42)
            .build()
            .unwrap()
    }

    #[test]
    fn test_insert_and_contains() {
        let mut filter = filter(100, 0.01);

        assert!(!filter.contains("apple"));
        filter.insert("apple");
        assert!(filter.contains("apple"));
        assert!(!filter.is_empty());
        assert_eq!(filter.num_elements(), 1);
    }

    #[test]
    fn test_duplicate_inserts_are_counted() {
        let mut filter = filter(100, 0.01);
        filter.insert("apple");
        let bits = filter.bits_used();

        filter.insert("apple");
        assert_eq!(filter.bits_used(), bits);
        assert_eq!(filter.num_elements(), 2);
    }

    #[test]
    fn test_bit_indices_stay_in_range() {
        let filter = filter(1000, 0.01);
        let m = filter.filter_size();
        for i in 0..filter.num_hashes() {
            assert!(filter.compute_bit_index(u64::MAX, u64::MAX, i) < m);
        }
    }

    #[test]
    fn test_padding_mask() {
        // 959 bits: 7 bits used in the last byte
        let filter = filter(100, 0.01);
        assert_eq!(filter.filter_size() % 8, 7);
        assert_eq!(filter.padding_mask(), 0b1000_0000);
    }

    #[test]
    fn test_inserts_never_touch_padding() {
        let mut filter = filter(100, 0.01);
        for i in 0..1000u32 {
            filter.insert(&i.to_le_bytes());
        }
        let last = *filter.bit_array().last().unwrap();
        assert_eq!(last & filter.padding_mask(), 0);
    }

    #[test]
    fn test_statistics() {
        let mut filter = filter(1000, 0.01);
        assert_eq!(filter.bits_used(), 0);
        assert_eq!(filter.load_factor(), 0.0);
        assert_eq!(filter.estimated_fpp(), 0.0);

        filter.insert("test");
        assert!(filter.bits_used() > 0);
        assert!(filter.bits_used() <= filter.num_hashes() as u64);
        assert!(filter.load_factor() > 0.0);
        assert!(filter.estimated_fpp() > 0.0);
    }

    #[test]
    fn test_serialize_layout() {
        let mut filter = filter(100, 0.01);
        filter.insert("a");
        filter.insert("b");

        let bytes = filter.serialize();
        let (salt1, salt2) = filter.salts();
        assert_eq!(bytes.len(), HEADER_BYTES + 120);
        assert_eq!(&bytes[0..4], &salt1.to_le_bytes());
        assert_eq!(&bytes[4..8], &salt2.to_le_bytes());
        assert_eq!(&bytes[8..16], &2u64.to_le_bytes());
        assert_eq!(&bytes[16..], filter.bit_array());
    }

    #[test]
    fn test_deserialize_into_rejects_dirty_padding() {
        let source = filter(100, 0.01);
        let mut bytes = source.serialize();
        *bytes.last_mut().unwrap() |= 0b1000_0000;

        let mut target = filter(100, 0.01);
        let err = target.deserialize_into(&bytes).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedData);
        assert!(target.is_empty());
    }
}
