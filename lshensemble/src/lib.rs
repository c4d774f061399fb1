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

//! # LSH Ensemble
//!
//! An approximate index for set containment search. Every indexed domain (a named set of values)
//! is summarized by a fixed-size MinHash signature; given a query signature, its set size and a
//! containment threshold, the index returns domains likely to contain at least that fraction of
//! the query, without computing any exact overlap.
//!
//! The crate is organized bottom-up:
//!
//! - [`minhash`]: signatures and the MinHash sketch that builds them.
//! - [`domain`]: domain records, their binary format and size ordering.
//! - [`forest`]: the banded LSH index answering prefix band queries.
//! - [`array`]: one banded index per band width, and the optimizer choosing `(k, l)`.
//! - [`ensemble`]: size partitions, each backed by an array.
//!
//! Signatures are only comparable when produced with the same seed and length; nothing checks
//! this.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]

pub mod array;
pub mod codec;
pub mod domain;
pub mod ensemble;
pub mod error;
pub mod forest;
pub mod hash;
pub mod minhash;
