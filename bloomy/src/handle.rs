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

//! An owning slot for a single filter, for embedding in host object systems.
//!
//! Host runtimes typically allocate an object first and run its constructor later,
//! so the object may be observed before (or without) a filter being built. A
//! [`BloomFilterHandle`] models that lifecycle: it starts out empty, is constructed
//! exactly once, and every operation on an empty handle fails with
//! [`ErrorKind::NotInitialized`](crate::error::ErrorKind::NotInitialized) instead of
//! touching absent state. Dropping the handle releases the filter.
//!
//! The handle performs no locking. Hosts sharing a handle across threads wrap it in
//! a [`Mutex`](std::sync::Mutex) or confine it to one worker.
//!
//! # Usage
//!
//! ```rust
//! use bloomy::handle::BloomFilterHandle;
//!
//! let mut handle = BloomFilterHandle::default();
//! assert!(handle.has("apple").is_err()); // not constructed yet
//!
//! handle.construct(1000, None, Some(42)).unwrap();
//! handle.add("apple").unwrap();
//! assert!(handle.has("apple").unwrap());
//!
//! let bytes = handle.write().unwrap();
//! let mut copy = BloomFilterHandle::default();
//! copy.construct(1000, None, None).unwrap();
//! copy.read(&bytes).unwrap();
//! assert!(copy.has("apple").unwrap());
//! ```

use crate::bloom::BloomFilter;
use crate::bloom::BloomFilterBuilder;
use crate::bloom::DEFAULT_ERROR_RATE;
use crate::bloom::FilterInfo;
use crate::error::Error;

/// A slot owning at most one [`BloomFilter`].
#[derive(Debug, Clone, Default)]
pub struct BloomFilterHandle {
    filter: Option<BloomFilter>,
}

impl BloomFilterHandle {
    /// Builds the filter owned by this handle.
    ///
    /// `error_rate` defaults to [`DEFAULT_ERROR_RATE`]; `seed` defaults to 0, which
    /// draws a random seed.
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::AlreadyInitialized`](crate::error::ErrorKind::AlreadyInitialized)
    ///   if the handle already owns a filter
    /// - [`ErrorKind::InvalidArgument`](crate::error::ErrorKind::InvalidArgument) if the
    ///   parameters are rejected; the handle stays uninitialized
    pub fn construct(
        &mut self,
        capacity: u64,
        error_rate: Option<f64>,
        seed: Option<u64>,
    ) -> Result<(), Error> {
        if self.filter.is_some() {
            return Err(Error::already_initialized());
        }
        let filter =
            BloomFilterBuilder::with_accuracy(capacity, error_rate.unwrap_or(DEFAULT_ERROR_RATE))
                .seed(seed.unwrap_or(0))
                .build()?;
        self.filter = Some(filter);
        Ok(())
    }

    /// Returns whether a filter has been constructed in this handle.
    pub fn is_initialized(&self) -> bool {
        self.filter.is_some()
    }

    /// Inserts an item into the owned filter.
    pub fn add<T: AsRef<[u8]> + ?Sized>(&mut self, item: &T) -> Result<(), Error> {
        self.filter_mut()?.insert(item);
        Ok(())
    }

    /// Tests whether an item is possibly in the owned filter.
    pub fn has<T: AsRef<[u8]> + ?Sized>(&self, item: &T) -> Result<bool, Error> {
        Ok(self.filter()?.contains(item))
    }

    /// Serializes the owned filter.
    pub fn write(&self) -> Result<Vec<u8>, Error> {
        Ok(self.filter()?.serialize())
    }

    /// Loads serialized state into the owned filter.
    ///
    /// See [`BloomFilter::deserialize_into`].
    pub fn read(&mut self, bytes: &[u8]) -> Result<(), Error> {
        self.filter_mut()?.deserialize_into(bytes)
    }

    /// Returns a snapshot of the owned filter's configuration and counters.
    pub fn info(&self) -> Result<FilterInfo, Error> {
        Ok(self.filter()?.info())
    }

    /// Returns the owned filter.
    pub fn filter(&self) -> Result<&BloomFilter, Error> {
        self.filter.as_ref().ok_or_else(Error::not_initialized)
    }

    /// Returns the owned filter mutably.
    pub fn filter_mut(&mut self) -> Result<&mut BloomFilter, Error> {
        self.filter.as_mut().ok_or_else(Error::not_initialized)
    }

    /// Takes the filter out of the handle, leaving it uninitialized.
    pub fn release(&mut self) -> Option<BloomFilter> {
        self.filter.take()
    }
}

impl From<BloomFilter> for BloomFilterHandle {
    fn from(filter: BloomFilter) -> Self {
        BloomFilterHandle {
            filter: Some(filter),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_uninitialized_handle_fails_fast() {
        let mut handle = BloomFilterHandle::default();
        assert!(!handle.is_initialized());
        assert_eq!(
            handle.add("a").unwrap_err().kind(),
            ErrorKind::NotInitialized
        );
        assert_eq!(
            handle.has("a").unwrap_err().kind(),
            ErrorKind::NotInitialized
        );
        assert_eq!(handle.write().unwrap_err().kind(), ErrorKind::NotInitialized);
        assert_eq!(
            handle.read(&[0u8; 32]).unwrap_err().kind(),
            ErrorKind::NotInitialized
        );
        assert_eq!(handle.info().unwrap_err().kind(), ErrorKind::NotInitialized);
    }

    #[test]
    fn test_failed_construct_leaves_handle_uninitialized() {
        let mut handle = BloomFilterHandle::default();
        let err = handle.construct(0, None, None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(!handle.is_initialized());
    }

    #[test]
    fn test_construct_twice_is_rejected() {
        let mut handle = BloomFilterHandle::default();
        handle.construct(100, Some(0.05), Some(7)).unwrap();
        handle.add("kept").unwrap();

        let err = handle.construct(100, None, None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyInitialized);
        assert!(handle.has("kept").unwrap());
    }

    #[test]
    fn test_release_returns_filter() {
        let mut handle = BloomFilterHandle::default();
        handle.construct(100, None, Some(7)).unwrap();
        handle.add("a").unwrap();

        let filter = handle.release().unwrap();
        assert!(filter.contains("a"));
        assert!(!handle.is_initialized());
        assert!(handle.release().is_none());

        // a released handle may be constructed again
        handle.construct(100, None, Some(7)).unwrap();
        assert!(!handle.has("a").unwrap());
    }

    #[test]
    fn test_info_defaults() {
        let mut handle = BloomFilterHandle::default();
        handle.construct(1000, None, None).unwrap();
        let info = handle.info().unwrap();
        assert_eq!(info.error_rate, DEFAULT_ERROR_RATE);
        assert_eq!(info.num_items, 0);
    }
}
