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

/// A min-wise sketch driven by two hash functions.
///
/// The i-th slot keeps the minimum of `h1(x) + i * h2(x)` over every element pushed so far,
/// which simulates `num_hash` independent hash functions from two.
#[derive(Debug, Clone)]
pub struct MinWise<H1, H2> {
    h1: H1,
    h2: H2,
    minimums: Vec<u64>,
}

impl<H1, H2> MinWise<H1, H2>
where
    H1: Fn(&[u8]) -> u64,
    H2: Fn(&[u8]) -> u64,
{
    /// Creates an empty sketch with `num_hash` slots.
    pub fn new(h1: H1, h2: H2, num_hash: usize) -> Self {
        MinWise {
            h1,
            h2,
            minimums: vec![u64::MAX; num_hash],
        }
    }

    /// Pushes one serialized element.
    pub fn push(&mut self, bytes: &[u8]) {
        let v1 = (self.h1)(bytes);
        let v2 = (self.h2)(bytes);
        for (i, min) in self.minimums.iter_mut().enumerate() {
            let hv = v1.wrapping_add((i as u64).wrapping_mul(v2));
            if hv < *min {
                *min = hv;
            }
        }
    }

    /// Returns a copy of the current minimums.
    pub fn signature(&self) -> Signature {
        Signature::new(self.minimums.clone())
    }

    /// Returns the number of slots.
    pub fn num_hash(&self) -> usize {
        self.minimums.len()
    }
}
