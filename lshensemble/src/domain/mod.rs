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

//! Domains: named sets summarized by their size and MinHash signature.
//!
//! A [`DomainRecord`] is what gets indexed. Its `size` is the cardinality of the underlying set;
//! it drives both partitioning and the false positive/negative model, and is never validated, so
//! a wrong size silently degrades search quality.
//!
//! # Binary format
//!
//! All integers are big-endian.
//!
//! ```text
//! [key length: 1, 2, 4 or 8 bytes][key bytes][size: u64][num_hash x u64 signature values]
//! ```
//!
//! The key length prefix is 4 bytes unless the caller picks another [`PrefixWidth`], and the key
//! bytes come from a caller-supplied encoder.
//!
//! [`PrefixWidth`]: crate::codec::PrefixWidth

mod record;
mod serialization;

pub use self::record::BySize;
pub use self::record::DomainRecord;
