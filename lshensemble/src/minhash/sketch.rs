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

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::hash::DEFAULT_SEED;
use crate::hash::SaltedHash;
use crate::minhash::MinWise;
use crate::minhash::Signature;

type SketchFn = Box<dyn Fn(&[u8]) -> u64 + Send + Sync>;

/// Builds a MinHash [`Signature`] from a stream of serialized elements.
///
/// # Examples
///
/// ```
/// # use lshensemble::minhash::MinHash;
/// let mut mh = MinHash::new(1, 128);
/// for word in ["a", "b", "c"] {
///     mh.push(word.as_bytes());
/// }
/// assert_eq!(mh.signature().len(), 128);
/// ```
pub struct MinHash {
    seed: u64,
    sketch: MinWise<SketchFn, SketchFn>,
}

impl MinHash {
    /// Creates a MinHash with `num_hash` hash values.
    ///
    /// The two underlying hash functions are FNV-1a, each salted with a 63-bit value drawn from a
    /// generator seeded by `seed`. Equal seeds give identical hash functions.
    ///
    /// # Panics
    ///
    /// Panics if `num_hash` is 0.
    pub fn new(seed: u64, num_hash: usize) -> Self {
        assert!(num_hash > 0, "num_hash must be at least 1");
        let mut rng = StdRng::seed_from_u64(seed);
        let h1 = SaltedHash::new(rng.random::<u64>() >> 1);
        let h2 = SaltedHash::new(rng.random::<u64>() >> 1);
        let sketch = MinWise::new(
            Box::new(move |b: &[u8]| h1.hash(b)) as SketchFn,
            Box::new(move |b: &[u8]| h2.hash(b)) as SketchFn,
            num_hash,
        );
        MinHash { seed, sketch }
    }

    /// Pushes one serialized element into the sketch.
    pub fn push(&mut self, bytes: &[u8]) {
        self.sketch.push(bytes);
    }

    /// Returns a snapshot of the current signature.
    ///
    /// Later pushes do not affect the returned value.
    pub fn signature(&self) -> Signature {
        self.sketch.signature()
    }

    /// Returns the seed the hash functions were derived from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns the signature length.
    pub fn num_hash(&self) -> usize {
        self.sketch.num_hash()
    }
}

impl Default for MinHash {
    /// A 256-value MinHash using [`DEFAULT_SEED`].
    fn default() -> Self {
        MinHash::new(DEFAULT_SEED, 256)
    }
}

impl std::fmt::Debug for MinHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MinHash")
            .field("seed", &self.seed)
            .field("num_hash", &self.num_hash())
            .finish()
    }
}
