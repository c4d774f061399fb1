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

use crate::minhash::Signature;

/// A domain: a key, the cardinality of its set, and the set's signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainRecord {
    pub(super) key: String,
    pub(super) size: usize,
    pub(super) signature: Signature,
}

impl DomainRecord {
    /// Creates a domain record.
    pub fn new(key: impl Into<String>, size: usize, signature: Signature) -> Self {
        DomainRecord {
            key: key.into(),
            size,
            signature,
        }
    }

    /// Returns the domain key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the number of distinct values in the domain.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the domain's MinHash signature.
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Consumes the record and returns its key, size and signature.
    pub fn into_parts(self) -> (String, usize, Signature) {
        (self.key, self.size, self.signature)
    }
}

/// Ordering and range selection of domains by size.
///
/// # Examples
///
/// ```
/// # use lshensemble::domain::BySize;
/// # use lshensemble::domain::DomainRecord;
/// # use lshensemble::minhash::Signature;
/// let mut domains: Vec<DomainRecord> = [20, 5, 1, 9, 5]
///     .into_iter()
///     .enumerate()
///     .map(|(i, size)| DomainRecord::new(format!("d{i}"), size, Signature::zeroed(4)))
///     .collect();
/// domains.sort_by_size();
/// let sizes: Vec<usize> = domains.subset(5, 9).iter().map(|d| d.size()).collect();
/// assert_eq!(sizes, vec![5, 5, 9]);
/// ```
pub trait BySize {
    /// Sorts domains by size, ascending. Ties are left in no particular order.
    fn sort_by_size(&mut self);

    /// Returns true if the domains are sorted by size, ascending.
    fn is_sorted_by_size(&self) -> bool;

    /// Returns the contiguous run of domains with a size in `[lower, upper]`.
    ///
    /// # Panics
    ///
    /// Panics if the domains are not sorted by size, or if no domain falls in the range. Both are
    /// caller bugs: the range is expected to be known non-empty.
    fn subset(&self, lower: usize, upper: usize) -> &[DomainRecord];
}

impl BySize for [DomainRecord] {
    fn sort_by_size(&mut self) {
        self.sort_unstable_by_key(|d| d.size);
    }

    fn is_sorted_by_size(&self) -> bool {
        self.is_sorted_by_key(|d| d.size)
    }

    fn subset(&self, lower: usize, upper: usize) -> &[DomainRecord] {
        assert!(self.is_sorted_by_size(), "domains must be sorted by size first");
        let start = self.partition_point(|d| d.size < lower);
        let end = self.partition_point(|d| d.size <= upper);
        assert!(start < end, "no domain has a size in [{lower}, {upper}]");
        &self[start..end]
    }
}
