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

//! Hash functions behind MinHash signatures.

mod fnv;

pub use self::fnv::Fnv1a64;
pub use self::fnv::SaltedHash;

/// Number of bytes in one MinHash value.
pub const HASH_VALUE_SIZE: usize = 8;

/// The seed used by [`crate::minhash::MinHash::default`] when no seed is given.
///
/// Signatures are only comparable when they were produced from the same seed, so once a
/// collection of signatures has been persisted the seed that produced them is fixed with it.
pub const DEFAULT_SEED: u64 = 42;
