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

use std::ops::Range;

use lshensemble::domain::DomainRecord;
use lshensemble::minhash::MinHash;
use lshensemble::minhash::Signature;

pub const NUM_HASH: usize = 128;
pub const SEED: u64 = 7;

#[allow(dead_code)] // false-positive
pub fn signature(values: Range<u32>) -> Signature {
    let mut mh = MinHash::new(SEED, NUM_HASH);
    for value in values {
        mh.push(&value.to_be_bytes());
    }
    mh.signature()
}

#[allow(dead_code)] // false-positive
pub fn domain(key: &str, values: Range<u32>) -> DomainRecord {
    DomainRecord::new(key, values.len(), signature(values))
}

#[allow(dead_code)] // false-positive
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
