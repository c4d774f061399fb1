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

//! Banded LSH indexes over MinHash signatures.
//!
//! A band of width `k` is `k` consecutive signature values. Two signatures that agree on every
//! value of a band collide on it, which happens with probability `J^k` for Jaccard similarity
//! `J`. Searching `l` bands raises recall to `1 - (1 - J^k)^l`.
//!
//! [`LshForest`] additionally keeps each band table sorted, so a query can match on a prefix of a
//! band and act as an index with a smaller `k` without rebuilding anything.

mod lsh_forest;

use std::sync::Arc;

use crossbeam_channel::Receiver;
use crossbeam_channel::Sender;
use crossbeam_channel::TryRecvError;
use crossbeam_channel::select;

pub use self::lsh_forest::LshForest;
use crate::minhash::Signature;

/// The contract an ensemble needs from a per-`k` band index.
///
/// Adds happen before [`BandIndex::index`]; queries happen after it. Adding after indexing is a
/// caller error with unspecified results.
pub trait BandIndex: Send + Sync {
    /// Creates an empty index of `num_bands` bands, each `band_size` hash values wide.
    fn new(band_size: usize, num_bands: usize) -> Self
    where
        Self: Sized;

    /// Returns the band width `k`.
    fn band_size(&self) -> usize;

    /// Returns the number of bands `l`.
    fn num_bands(&self) -> usize;

    /// Registers a key with its signature.
    fn add(&mut self, key: &Arc<str>, signature: &Signature);

    /// Makes every added key searchable.
    fn index(&mut self);

    /// Streams the keys colliding with `signature` in any of the first `num_bands` bands onto
    /// `out`, each key at most once.
    ///
    /// `prefix` is how many leading values of each band must match; `None` means the whole band.
    /// Returns early, without error, once `done` receives a value or is disconnected, or once
    /// `out` is disconnected. A value is consumed by the first producer to see it, so callers
    /// stopping several producers at once disconnect `done` instead.
    fn query(
        &self,
        signature: &Signature,
        prefix: Option<usize>,
        num_bands: usize,
        out: &Sender<Arc<str>>,
        done: &Receiver<()>,
    );
}

/// Sends `key` unless the query was cancelled first.
///
/// Returns false if the producer should stop.
pub(crate) fn send_or_cancel(out: &Sender<Arc<str>>, done: &Receiver<()>, key: Arc<str>) -> bool {
    if is_cancelled(done) {
        return false;
    }
    select! {
        send(out, key) -> res => res.is_ok(),
        recv(done) -> _ => false,
    }
}

/// Returns true once `done` has a value or all of its senders are gone.
pub(crate) fn is_cancelled(done: &Receiver<()>) -> bool {
    !matches!(done.try_recv(), Err(TryRecvError::Empty))
}
