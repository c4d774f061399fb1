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

use std::io::Read;
use std::io::Write;
use std::ops::Deref;

use byteorder::BE;
use byteorder::ReadBytesExt;
use byteorder::WriteBytesExt;

use crate::error::Error;
use crate::hash::HASH_VALUE_SIZE;

/// A MinHash signature: one minimum hash value per hash function.
///
/// Signatures are only comparable when they have the same length and were produced by sketches
/// sharing a seed. Nothing here checks that.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Signature {
    values: Vec<u64>,
}

impl Signature {
    /// Wraps the given hash values.
    pub fn new(values: Vec<u64>) -> Self {
        Signature { values }
    }

    /// Creates a signature of `num_hash` zero values, ready to be filled by [`Signature::read`].
    pub fn zeroed(num_hash: usize) -> Self {
        Signature {
            values: vec![0; num_hash],
        }
    }

    /// Returns the hash values.
    pub fn values(&self) -> &[u64] {
        &self.values
    }

    /// Consumes the signature and returns the hash values.
    pub fn into_values(self) -> Vec<u64> {
        self.values
    }

    /// Returns the serialized length in bytes.
    ///
    /// # Examples
    ///
    /// ```
    /// # use lshensemble::minhash::Signature;
    /// assert_eq!(Signature::zeroed(128).byte_len(), 1024);
    /// ```
    pub fn byte_len(&self) -> usize {
        self.values.len() * HASH_VALUE_SIZE
    }

    /// Writes every hash value as a big-endian `u64`, in order.
    ///
    /// A failed write leaves whatever was already written in `writer`.
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<(), Error> {
        for value in &self.values {
            writer
                .write_u64::<BE>(*value)
                .map_err(|err| Error::write_failed("signature", err))?;
        }
        Ok(())
    }

    /// Fills this signature with big-endian `u64` values read from `reader`.
    ///
    /// Exactly `self.len()` values are read; the length is never changed.
    pub fn read<R: Read>(&mut self, reader: &mut R) -> Result<(), Error> {
        for (index, value) in self.values.iter_mut().enumerate() {
            *value = reader
                .read_u64::<BE>()
                .map_err(|err| Error::read_failed("signature", err).with_context("index", index))?;
        }
        Ok(())
    }
}

impl Deref for Signature {
    type Target = [u64];

    fn deref(&self) -> &[u64] {
        &self.values
    }
}

impl From<Vec<u64>> for Signature {
    fn from(values: Vec<u64>) -> Self {
        Signature::new(values)
    }
}
