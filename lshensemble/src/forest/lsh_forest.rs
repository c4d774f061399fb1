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

use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::Arc;

use crossbeam_channel::Receiver;
use crossbeam_channel::Sender;

use crate::forest::BandIndex;
use crate::forest::send_or_cancel;
use crate::hash::HASH_VALUE_SIZE;
use crate::minhash::Signature;

/// One stored band key with every domain key that produced it.
#[derive(Debug)]
struct Bucket {
    band_key: Vec<u8>,
    keys: Vec<Arc<str>>,
}

/// An LSH forest: `l` band tables of width `k`, sorted by band key once indexed.
///
/// Band keys are the big-endian bytes of the band's hash values, so the sort order of the bytes
/// groups every band sharing a prefix of values together.
///
/// # Examples
///
/// ```
/// # use std::sync::Arc;
/// # use lshensemble::forest::BandIndex;
/// # use lshensemble::forest::LshForest;
/// # use lshensemble::minhash::Signature;
/// let mut forest = LshForest::new(2, 2);
/// forest.add(&Arc::from("a"), &Signature::new(vec![1, 2, 3, 4]));
/// forest.add(&Arc::from("b"), &Signature::new(vec![1, 9, 9, 9]));
/// forest.index();
///
/// let (out, results) = crossbeam_channel::unbounded();
/// let (_cancel, done) = crossbeam_channel::bounded::<()>(1);
/// forest.query(&Signature::new(vec![1, 5, 5, 5]), Some(1), 2, &out, &done);
/// drop(out);
/// let mut keys: Vec<Arc<str>> = results.iter().collect();
/// keys.sort();
/// assert_eq!(keys, vec![Arc::from("a"), Arc::from("b")]);
/// ```
#[derive(Debug)]
pub struct LshForest {
    k: usize,
    l: usize,
    staging: Vec<HashMap<Vec<u8>, Vec<Arc<str>>>>,
    tables: Vec<Vec<Bucket>>,
}

impl LshForest {
    /// Returns the number of distinct band keys stored in band `band`, indexed or not.
    pub fn num_band_keys(&self, band: usize) -> usize {
        self.tables[band].len() + self.staging[band].len()
    }

    fn band_range(&self, band: usize, width: usize) -> std::ops::Range<usize> {
        let start = band * self.k;
        start..start + width
    }
}

impl BandIndex for LshForest {
    /// # Panics
    ///
    /// Panics if `band_size` or `num_bands` is 0.
    fn new(band_size: usize, num_bands: usize) -> Self {
        assert!(band_size > 0, "band_size must be at least 1");
        assert!(num_bands > 0, "num_bands must be at least 1");
        LshForest {
            k: band_size,
            l: num_bands,
            staging: (0..num_bands).map(|_| HashMap::new()).collect(),
            tables: (0..num_bands).map(|_| Vec::new()).collect(),
        }
    }

    fn band_size(&self) -> usize {
        self.k
    }

    fn num_bands(&self) -> usize {
        self.l
    }

    /// # Panics
    ///
    /// Panics if the signature is shorter than `band_size * num_bands`.
    fn add(&mut self, key: &Arc<str>, signature: &Signature) {
        assert!(
            signature.len() >= self.k * self.l,
            "signature of {} values is too short for {} bands of {}",
            signature.len(),
            self.l,
            self.k
        );
        for band in 0..self.l {
            let band_key = band_key(&signature[self.band_range(band, self.k)]);
            self.staging[band]
                .entry(band_key)
                .or_default()
                .push(Arc::clone(key));
        }
    }

    fn index(&mut self) {
        for (staging, table) in self.staging.iter_mut().zip(self.tables.iter_mut()) {
            table.extend(
                staging
                    .drain()
                    .map(|(band_key, keys)| Bucket { band_key, keys }),
            );
            table.sort_unstable_by(|a, b| a.band_key.cmp(&b.band_key));
        }
    }

    /// # Panics
    ///
    /// Panics if `prefix` is 0 or wider than the band, if `num_bands` is 0 or more than the
    /// forest holds, or if the signature is too short.
    fn query(
        &self,
        signature: &Signature,
        prefix: Option<usize>,
        num_bands: usize,
        out: &Sender<Arc<str>>,
        done: &Receiver<()>,
    ) {
        let prefix = prefix.unwrap_or(self.k);
        assert!(
            (1..=self.k).contains(&prefix),
            "prefix must be in [1, {}], got {prefix}",
            self.k
        );
        assert!(
            (1..=self.l).contains(&num_bands),
            "num_bands must be in [1, {}], got {num_bands}",
            self.l
        );
        assert!(
            signature.len() >= self.k * num_bands,
            "signature of {} values is too short for {num_bands} bands of {}",
            signature.len(),
            self.k
        );

        let prefix_bytes = prefix * HASH_VALUE_SIZE;
        let mut seen: HashSet<Arc<str>> = HashSet::new();
        for (band, table) in self.tables.iter().take(num_bands).enumerate() {
            let query_key = band_key(&signature[self.band_range(band, prefix)]);
            let start = table.partition_point(|b| b.band_key[..prefix_bytes] < query_key[..]);
            let matches = table[start..]
                .iter()
                .take_while(|b| b.band_key.starts_with(&query_key));
            for bucket in matches {
                for key in &bucket.keys {
                    if !seen.insert(Arc::clone(key)) {
                        continue;
                    }
                    if !send_or_cancel(out, done, Arc::clone(key)) {
                        return;
                    }
                }
            }
        }
    }
}

fn band_key(values: &[u64]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(values.len() * HASH_VALUE_SIZE);
    for value in values {
        bytes.extend_from_slice(&value.to_be_bytes());
    }
    bytes
}
