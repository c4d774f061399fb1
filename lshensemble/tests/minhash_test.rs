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

use googletest::assert_that;
use googletest::prelude::near;
use lshensemble::minhash::MinHash;
use lshensemble::minhash::Signature;

fn sketch(seed: u64, values: impl IntoIterator<Item = u32>) -> Signature {
    let mut mh = MinHash::new(seed, 256);
    for value in values {
        mh.push(&value.to_be_bytes());
    }
    mh.signature()
}

fn estimate_jaccard(a: &Signature, b: &Signature) -> f64 {
    let equal = a.iter().zip(b.iter()).filter(|(x, y)| x == y).count();
    equal as f64 / a.len() as f64
}

#[test]
fn test_same_seed_same_signature() {
    assert_eq!(sketch(1, 0..100), sketch(1, 0..100));
    assert_ne!(sketch(1, 0..100), sketch(2, 0..100));
}

#[test]
fn test_order_and_duplicates_do_not_matter() {
    let forward = sketch(3, 0..100);
    assert_eq!(forward, sketch(3, (0..100).rev()));
    assert_eq!(forward, sketch(3, (0..100).chain(0..100)));
}

#[test]
fn test_signature_estimates_jaccard() {
    let a = sketch(11, 0..1000);

    // |A ∩ B| / |A ∪ B| = 500 / 1500
    let b = sketch(11, 500..1500);
    assert_that!(estimate_jaccard(&a, &b), near(1.0 / 3.0, 0.1));

    let c = sketch(11, 0..900);
    assert_that!(estimate_jaccard(&a, &c), near(0.9, 0.1));

    let d = sketch(11, 5000..6000);
    assert_that!(estimate_jaccard(&a, &d), near(0.0, 0.05));
}

#[test]
fn test_empty_and_default_sketch() {
    let mh = MinHash::default();
    assert_eq!(mh.num_hash(), 256);
    assert_eq!(mh.seed(), 42);
    assert!(mh.signature().iter().all(|&v| v == u64::MAX));
}

#[test]
#[should_panic(expected = "num_hash must be at least 1")]
fn test_zero_hashes() {
    MinHash::new(1, 0);
}
