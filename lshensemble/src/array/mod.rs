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

//! An array of band indexes, one per band width, with the optimizer choosing among them.
//!
//! A single banded index fixes `k` at build time. [`LshForestArray`] keeps one index for every
//! `k` in `1..=max_k`, so a query can pick whichever `(k, l)` the false positive/negative model
//! favors for its size and threshold. The `k`-th index holds `num_hash / k` bands; the remaining
//! `num_hash % k` hash values are unused for that `k`.
//!
//! # Usage
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use lshensemble::array::LshForestArray;
//! use lshensemble::minhash::MinHash;
//!
//! let signature = |words: &[&str]| {
//!     let mut mh = MinHash::new(1, 64);
//!     for w in words {
//!         mh.push(w.as_bytes());
//!     }
//!     mh.signature()
//! };
//!
//! let mut array: LshForestArray = LshForestArray::new(4, 64);
//! array.add("fruits", &signature(&["apple", "banana", "cherry"]));
//! array.index();
//!
//! let params = array.optimal_kl(3, 2, 0.9);
//! let (out, results) = crossbeam_channel::unbounded::<Arc<str>>();
//! let (_cancel, done) = crossbeam_channel::bounded::<()>(1);
//! array.query(&signature(&["apple", "banana"]), params.k, params.l, &out, &done);
//! drop(out);
//! for key in results {
//!     println!("candidate: {key}");
//! }
//! ```

mod probability;

use std::sync::Arc;

use crossbeam_channel::Receiver;
use crossbeam_channel::Sender;
use rayon::prelude::*;
use tracing::debug;
use tracing::trace;

pub use self::probability::INTEGRATION_PRECISION;
pub use self::probability::false_negative_probability;
pub use self::probability::false_positive_probability;
use crate::domain::DomainRecord;
use crate::forest::BandIndex;
use crate::forest::LshForest;
use crate::minhash::Signature;

/// The `(k, l)` pair minimizing the estimated error, with its error estimates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptimalParams {
    /// Band width.
    pub k: usize,
    /// Number of bands to search.
    pub l: usize,
    /// Estimated false positive probability.
    pub false_positive: f64,
    /// Estimated false negative probability.
    pub false_negative: f64,
}

/// One band index per band width `1..=max_k`, all fed the same domains.
#[derive(Debug)]
pub struct LshForestArray<B = LshForest> {
    max_k: usize,
    num_hash: usize,
    array: Vec<B>,
}

impl<B: BandIndex> LshForestArray<B> {
    /// Creates an array of `max_k` empty band indexes for signatures of `num_hash` values.
    ///
    /// # Panics
    ///
    /// Panics if `max_k` is 0 or greater than `num_hash`.
    pub fn new(max_k: usize, num_hash: usize) -> Self {
        assert!(max_k > 0, "max_k must be at least 1");
        assert!(
            num_hash >= max_k,
            "num_hash must be at least max_k ({max_k}), got {num_hash}"
        );
        let array = (1..=max_k).map(|k| B::new(k, num_hash / k)).collect();
        LshForestArray {
            max_k,
            num_hash,
            array,
        }
    }

    /// Returns the largest band width.
    pub fn max_k(&self) -> usize {
        self.max_k
    }

    /// Returns the signature length.
    pub fn num_hash(&self) -> usize {
        self.num_hash
    }

    /// Returns the band index for band width `k`.
    ///
    /// # Panics
    ///
    /// Panics if `k` is not in `[1, max_k]`.
    pub fn band_index(&self, k: usize) -> &B {
        self.check_k(k);
        &self.array[k - 1]
    }

    /// Adds a key to every band index, one task per index, and waits for all of them.
    ///
    /// The key is not searchable until [`LshForestArray::index`] is called.
    pub fn add(&mut self, key: impl Into<Arc<str>>, signature: &Signature) {
        let key = key.into();
        self.array
            .par_iter_mut()
            .for_each(|index| index.add(&key, signature));
    }

    /// Adds every record to every band index, one task per index, and waits for all of them.
    pub fn add_records(&mut self, records: &[DomainRecord]) {
        let keys: Vec<Arc<str>> = records.iter().map(|r| Arc::from(r.key())).collect();
        self.array.par_iter_mut().for_each(|index| {
            for (key, record) in keys.iter().zip(records) {
                index.add(key, record.signature());
            }
        });
    }

    /// Makes every added key searchable, one task per band index.
    pub fn index(&mut self) {
        self.array.par_iter_mut().for_each(|index| index.index());
        debug!(
            max_k = self.max_k,
            num_hash = self.num_hash,
            "indexed band index array"
        );
    }

    /// Streams candidate keys from the band index of width `k`, searching `l` bands.
    ///
    /// Keys are sent on `out` as they are found. The call returns once the search is exhausted,
    /// `done` is signaled or disconnected, or `out` is disconnected.
    ///
    /// # Panics
    ///
    /// Panics if `k` is not in `[1, max_k]` or `l` is not in `[1, num_hash / k]`.
    pub fn query(
        &self,
        signature: &Signature,
        k: usize,
        l: usize,
        out: &Sender<Arc<str>>,
        done: &Receiver<()>,
    ) {
        self.check_k(k);
        let max_l = self.num_hash / k;
        assert!(
            (1..=max_l).contains(&l),
            "l must be in [1, {max_l}] for k = {k}, got {l}"
        );
        trace!(k, l, "routing query");
        self.array[k - 1].query(signature, None, l, out, done);
    }

    /// Returns the `(k, l)` minimizing the sum of false positive and false negative probability.
    ///
    /// `x` is the indexed domain size, `q` the query size and `t` the containment threshold.
    /// Every `l` in `1..=num_hash` and, within it, every `k` in `1..=max_k` with
    /// `k * l <= num_hash` is tried in that order; on equal error the first pair wins.
    ///
    /// # Panics
    ///
    /// Panics if `q` is 0 or `t` is not in `(0, 1]`.
    pub fn optimal_kl(&self, x: usize, q: usize, t: f64) -> OptimalParams {
        optimal_kl(self.max_k, self.num_hash, x, q, t)
    }

    fn check_k(&self, k: usize) {
        assert!(
            (1..=self.max_k).contains(&k),
            "k must be in [1, {}], got {k}",
            self.max_k
        );
    }
}

/// The grid search behind [`LshForestArray::optimal_kl`], for callers without an array.
///
/// # Panics
///
/// Panics if `q` is 0 or `t` is not in `(0, 1]`.
pub fn optimal_kl(max_k: usize, num_hash: usize, x: usize, q: usize, t: f64) -> OptimalParams {
    assert!(q > 0, "query size must be at least 1");
    assert!(
        t > 0.0 && t <= 1.0,
        "containment threshold must be in (0, 1], got {t}"
    );
    let mut min_error = f64::MAX;
    let mut best = OptimalParams {
        k: 1,
        l: 1,
        false_positive: 0.0,
        false_negative: 0.0,
    };
    for l in 1..=num_hash {
        for k in 1..=max_k {
            if k * l > num_hash {
                continue;
            }
            let fp = false_positive_probability(x, q, l, k, t, INTEGRATION_PRECISION);
            let fn_ = false_negative_probability(x, q, l, k, t, INTEGRATION_PRECISION);
            let error = fp + fn_;
            if min_error > error {
                min_error = error;
                best = OptimalParams {
                    k,
                    l,
                    false_positive: fp,
                    false_negative: fn_,
                };
            }
        }
    }
    best
}
