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

//! MinHash signatures for set similarity and containment estimation.
//!
//! For a random hash function `h`, the probability that `min h(A) == min h(B)` equals the Jaccard
//! similarity of `A` and `B`. A [`Signature`] keeps one such minimum per hash function, so the
//! fraction of equal positions between two signatures estimates their Jaccard similarity.
//!
//! [`MinHash`] builds signatures from serialized elements. Every signature that is indexed or
//! queried together must come from a `MinHash` with the same seed and length.
//!
//! # Usage
//!
//! ```rust
//! use lshensemble::minhash::MinHash;
//! use lshensemble::minhash::Signature;
//!
//! let mut mh = MinHash::new(42, 64);
//! mh.push(b"apple");
//! mh.push(b"banana");
//! let sig = mh.signature();
//!
//! let mut bytes = vec![];
//! sig.write(&mut bytes).unwrap();
//!
//! let mut decoded = Signature::zeroed(64);
//! decoded.read(&mut bytes.as_slice()).unwrap();
//! assert_eq!(sig, decoded);
//! ```

mod minwise;
mod signature;
mod sketch;

pub use self::minwise::MinWise;
pub use self::signature::Signature;
pub use self::sketch::MinHash;
