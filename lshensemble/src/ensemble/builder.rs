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

use crate::domain::BySize;
use crate::domain::DomainRecord;
use crate::ensemble::LshEnsemble;
use crate::ensemble::Partition;
use crate::ensemble::partition::equi_depth;
use crate::forest::BandIndex;

/// Default number of size partitions.
pub const DEFAULT_NUM_PARTITIONS: usize = 8;

/// Default signature length.
pub const DEFAULT_NUM_HASH: usize = 256;

/// Default largest band width.
pub const DEFAULT_MAX_K: usize = 4;

/// Builder for [`LshEnsemble`].
///
/// # Examples
///
/// ```
/// # use lshensemble::ensemble::LshEnsembleBuilder;
/// # use lshensemble::ensemble::Partition;
/// # use lshensemble::ensemble::LshEnsemble;
/// let ensemble: LshEnsemble = LshEnsembleBuilder::new()
///     .num_hash(64)
///     .max_k(8)
///     .build(vec![Partition::new(1, 100), Partition::new(101, 1000)]);
/// assert_eq!(ensemble.partitions().len(), 2);
/// assert_eq!(ensemble.max_k(), 8);
/// ```
#[derive(Debug, Clone)]
pub struct LshEnsembleBuilder {
    num_partitions: usize,
    num_hash: usize,
    max_k: usize,
}

impl Default for LshEnsembleBuilder {
    fn default() -> Self {
        Self {
            num_partitions: DEFAULT_NUM_PARTITIONS,
            num_hash: DEFAULT_NUM_HASH,
            max_k: DEFAULT_MAX_K,
        }
    }
}

impl LshEnsembleBuilder {
    /// Creates a builder with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of partitions used by [`LshEnsembleBuilder::build_equi_depth`].
    ///
    /// # Panics
    ///
    /// Panics if `num_partitions` is 0.
    pub fn num_partitions(mut self, num_partitions: usize) -> Self {
        assert!(num_partitions > 0, "num_partitions must be at least 1");
        self.num_partitions = num_partitions;
        self
    }

    /// Set the signature length. Every indexed and queried signature must have this length.
    ///
    /// # Panics
    ///
    /// Panics if `num_hash` is 0.
    pub fn num_hash(mut self, num_hash: usize) -> Self {
        assert!(num_hash > 0, "num_hash must be at least 1");
        self.num_hash = num_hash;
        self
    }

    /// Set the largest band width.
    ///
    /// # Panics
    ///
    /// Panics if `max_k` is 0.
    pub fn max_k(mut self, max_k: usize) -> Self {
        assert!(max_k > 0, "max_k must be at least 1");
        self.max_k = max_k;
        self
    }

    /// Builds an empty, unindexed ensemble over the given partitions.
    ///
    /// # Panics
    ///
    /// Panics if `max_k` exceeds `num_hash`.
    pub fn build<B: BandIndex>(self, partitions: Vec<Partition>) -> LshEnsemble<B> {
        LshEnsemble::new(partitions, self.num_hash, self.max_k)
    }

    /// Builds and indexes an ensemble over the given partitions from size-sorted records.
    ///
    /// Each partition receives the records [`BySize::subset`] selects for its range.
    ///
    /// # Panics
    ///
    /// Panics if the records are not sorted by size or some partition holds no record.
    pub fn build_with_partitions<B: BandIndex>(
        self,
        partitions: Vec<Partition>,
        sorted: &[DomainRecord],
    ) -> LshEnsemble<B> {
        let mut ensemble = self.build(partitions);
        for (i, array) in ensemble.arrays.iter_mut().enumerate() {
            let partition = ensemble.partitions[i];
            let members = sorted.subset(partition.lower, partition.upper);
            debug!(%partition, domains = members.len(), "bootstrapping partition");
            array.add_records(members);
        }
        ensemble.index();
        ensemble
    }

    /// Builds and indexes an ensemble with equi-depth partitions over size-sorted records.
    ///
    /// Partitions hold roughly equal numbers of records, and records of equal size always share
    /// a partition.
    ///
    /// # Panics
    ///
    /// Panics if the records are not sorted by size.
    pub fn build_equi_depth<B: BandIndex>(self, sorted: &[DomainRecord]) -> LshEnsemble<B> {
        let partitions = equi_depth(sorted, self.num_partitions);
        debug!(
            requested = self.num_partitions,
            actual = partitions.len(),
            domains = sorted.len(),
            "computed equi-depth partitions"
        );
        self.build_with_partitions(partitions, sorted)
    }
}
