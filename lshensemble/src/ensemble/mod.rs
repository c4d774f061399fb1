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

//! LSH Ensemble: containment search across domains of very different sizes.
//!
//! The false positive/negative model depends on the indexed domain size `x`. Rather than tune a
//! single index for one `x`, the ensemble partitions domains by size and gives each partition
//! its own [`LshForestArray`]. A query picks `(k, l)` per partition using the partition's upper
//! size bound as `x`, searches all partitions in parallel and merges their candidates.
//!
//! # Usage
//!
//! ```rust
//! use lshensemble::domain::BySize;
//! use lshensemble::domain::DomainRecord;
//! use lshensemble::ensemble::LshEnsemble;
//! use lshensemble::ensemble::LshEnsembleBuilder;
//! use lshensemble::minhash::MinHash;
//!
//! let domain = |key: &str, values: std::ops::Range<u32>| {
//!     let mut mh = MinHash::new(7, 128);
//!     for v in values.clone() {
//!         mh.push(&v.to_be_bytes());
//!     }
//!     DomainRecord::new(key, values.len(), mh.signature())
//! };
//!
//! let mut records = vec![
//!     domain("small", 0..10),
//!     domain("medium", 0..100),
//!     domain("large", 0..1000),
//!     domain("other", 5000..6000),
//! ];
//! records.sort_by_size();
//!
//! let ensemble: LshEnsemble = LshEnsembleBuilder::new()
//!     .num_partitions(2)
//!     .num_hash(128)
//!     .max_k(4)
//!     .build_equi_depth(&records);
//!
//! let query = domain("query", 0..90);
//! let candidates = ensemble.candidates(query.signature(), query.size(), 0.5);
//! assert!(candidates.iter().any(|key| &**key == "medium"));
//! ```

mod builder;
mod partition;

use std::collections::HashMap;
use std::sync::Arc;
use std::thread;

use crossbeam_channel::Receiver;
use crossbeam_channel::Sender;
use crossbeam_channel::bounded;
use crossbeam_channel::select;
use parking_lot::Mutex;
use rayon::prelude::*;
use tracing::debug;
use tracing::trace;
use tracing::warn;

pub use self::builder::LshEnsembleBuilder;
pub use self::partition::Partition;
use crate::array::LshForestArray;
use crate::array::OptimalParams;
use crate::array::optimal_kl;
use crate::error::Error;
use crate::forest::BandIndex;
use crate::forest::LshForest;
use crate::forest::is_cancelled;
use crate::minhash::Signature;

/// Cache key for optimal parameters: indexed size, query size and threshold bits.
type ParamKey = (usize, usize, u64);

/// How one partition took part in a query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartitionPlan {
    /// The partition.
    pub partition: Partition,
    /// The parameters it was searched with, or `None` if its domains are too small to reach the
    /// threshold and it was skipped.
    pub params: Option<OptimalParams>,
}

/// Size-partitioned LSH index for containment search.
///
/// Optimal `(k, l)` parameters are cached per distinct indexed size, query size and threshold
/// for the life of the ensemble. The cache is unbounded, so workloads with many distinct query
/// sizes or thresholds grow it without limit; [`LshEnsemble::clear_param_cache`] empties it.
#[derive(Debug)]
pub struct LshEnsemble<B = LshForest> {
    partitions: Vec<Partition>,
    arrays: Vec<LshForestArray<B>>,
    max_k: usize,
    num_hash: usize,
    param_cache: Mutex<HashMap<ParamKey, OptimalParams>>,
}

impl<B: BandIndex> LshEnsemble<B> {
    /// Creates an empty ensemble with one band index array per partition.
    ///
    /// # Panics
    ///
    /// Panics if `max_k` is 0 or greater than `num_hash`.
    pub fn new(partitions: Vec<Partition>, num_hash: usize, max_k: usize) -> Self {
        let arrays = partitions
            .iter()
            .map(|_| LshForestArray::new(max_k, num_hash))
            .collect();
        LshEnsemble {
            partitions,
            arrays,
            max_k,
            num_hash,
            param_cache: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the partitions, in construction order.
    pub fn partitions(&self) -> &[Partition] {
        &self.partitions
    }

    /// Returns the largest band width.
    pub fn max_k(&self) -> usize {
        self.max_k
    }

    /// Returns the signature length.
    pub fn num_hash(&self) -> usize {
        self.num_hash
    }

    /// Adds a domain to the partition at `partition`.
    ///
    /// # Panics
    ///
    /// Panics if `partition` is out of range.
    pub fn add(&mut self, key: impl Into<Arc<str>>, signature: &Signature, partition: usize) {
        self.arrays[partition].add(key, signature);
    }

    /// Adds a domain to the first partition whose size range holds `size`.
    pub fn prepare(
        &mut self,
        key: impl Into<Arc<str>>,
        signature: &Signature,
        size: usize,
    ) -> Result<(), Error> {
        let key = key.into();
        match self.partitions.iter().position(|p| p.contains(size)) {
            Some(partition) => {
                self.arrays[partition].add(key, signature);
                Ok(())
            }
            None => {
                warn!(key = &*key, size, "domain size falls outside every partition");
                Err(Error::invalid_argument(format!(
                    "no partition holds domain size {size}"
                ))
                .with_context("key", key))
            }
        }
    }

    /// Makes every added domain searchable, sealing all partitions in parallel.
    pub fn index(&mut self) {
        self.arrays.par_iter_mut().for_each(|array| array.index());
        debug!(partitions = self.partitions.len(), "indexed lsh ensemble");
    }

    /// Streams keys of domains likely to contain at least `threshold` of the query onto `out`.
    ///
    /// `size` is the number of distinct values in the query. Partitions are searched in
    /// parallel and the call blocks until all of them finish, `done` is signaled or
    /// disconnected, or `out` is disconnected, so `out` must be drained by another thread or be
    /// unbounded. Returns how each partition was searched.
    ///
    /// A value sent on `done` stops every partition, and is consumed by the call.
    ///
    /// # Panics
    ///
    /// Panics if `size` is 0 or `threshold` is not in `(0, 1]`.
    pub fn query(
        &self,
        signature: &Signature,
        size: usize,
        threshold: f64,
        out: &Sender<Arc<str>>,
        done: &Receiver<()>,
    ) -> Vec<PartitionPlan> {
        assert!(size > 0, "query size must be at least 1");
        assert!(
            threshold > 0.0 && threshold <= 1.0,
            "containment threshold must be in (0, 1], got {threshold}"
        );

        // Partition producers share `stop`, which disconnects once `done` fires. A value on
        // `done` can be received only once, a disconnect is seen by every receiver.
        let (stop_tx, stop) = bounded::<()>(0);
        let (finished_tx, finished) = bounded::<()>(0);
        thread::scope(|s| {
            if is_cancelled(done) {
                drop(stop_tx);
            } else {
                s.spawn(move || {
                    select! {
                        recv(done) -> _ => trace!("query cancelled"),
                        recv(finished) -> _ => {}
                    }
                    drop(stop_tx);
                });
            }
            let plans = self.search_partitions(signature, size, threshold, out, &stop);
            drop(finished_tx);
            plans
        })
    }

    fn search_partitions(
        &self,
        signature: &Signature,
        size: usize,
        threshold: f64,
        out: &Sender<Arc<str>>,
        stop: &Receiver<()>,
    ) -> Vec<PartitionPlan> {
        self.partitions
            .par_iter()
            .zip(self.arrays.par_iter())
            .map(|(partition, array)| {
                if (partition.upper as f64) < size as f64 * threshold {
                    trace!(%partition, "skipping partition below threshold");
                    return PartitionPlan {
                        partition: *partition,
                        params: None,
                    };
                }
                let params = self.params(partition.upper, size, threshold);
                trace!(%partition, k = params.k, l = params.l, "querying partition");
                if !is_cancelled(stop) {
                    array.query(signature, params.k, params.l, out, stop);
                }
                PartitionPlan {
                    partition: *partition,
                    params: Some(params),
                }
            })
            .collect()
    }

    /// Collects every candidate of [`LshEnsemble::query`], sorted.
    pub fn candidates(&self, signature: &Signature, size: usize, threshold: f64) -> Vec<Arc<str>> {
        let (out, results) = crossbeam_channel::unbounded();
        let (_cancel, done) = bounded::<()>(1);
        self.query(signature, size, threshold, &out, &done);
        drop(out);
        let mut keys: Vec<Arc<str>> = results.into_iter().collect();
        keys.sort_unstable();
        keys
    }

    /// Drops every cached `(k, l)` choice.
    pub fn clear_param_cache(&self) {
        self.param_cache.lock().clear();
    }

    /// Returns the number of cached `(k, l)` choices.
    pub fn param_cache_len(&self) -> usize {
        self.param_cache.lock().len()
    }

    /// Returns the optimal parameters for indexed size `x`, query size `q` and threshold `t`,
    /// computing them at most once per distinct triple.
    fn params(&self, x: usize, q: usize, t: f64) -> OptimalParams {
        let key = (x, q, t.to_bits());
        if let Some(params) = self.param_cache.lock().get(&key) {
            return *params;
        }
        // The search runs unlocked so partitions do not serialize on the cache. Two queries
        // racing on the same key both compute it and store the same value.
        let params = optimal_kl(self.max_k, self.num_hash, x, q, t);
        self.param_cache.lock().insert(key, params);
        params
    }
}
