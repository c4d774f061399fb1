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

use byteorder::BE;
use byteorder::ReadBytesExt;
use byteorder::WriteBytesExt;

use crate::error::Error;

/// Width of the big-endian length prefix written ahead of a domain key.
///
/// # Examples
///
/// ```
/// # use lshensemble::codec::PrefixWidth;
/// assert_eq!(PrefixWidth::default(), PrefixWidth::U32);
/// assert_eq!(PrefixWidth::U16.bytes(), 2);
/// assert_eq!(PrefixWidth::U8.max_len(), 255);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrefixWidth {
    /// One byte; keys up to 255 bytes.
    U8,
    /// Two bytes.
    U16,
    /// Four bytes.
    #[default]
    U32,
    /// Eight bytes.
    U64,
}

impl PrefixWidth {
    /// Returns the prefix width for a byte count of 1, 2, 4 or 8.
    pub fn from_bytes(bytes: usize) -> Result<Self, Error> {
        match bytes {
            1 => Ok(PrefixWidth::U8),
            2 => Ok(PrefixWidth::U16),
            4 => Ok(PrefixWidth::U32),
            8 => Ok(PrefixWidth::U64),
            _ => Err(Error::invalid_argument(format!(
                "key length prefix must be 1, 2, 4 or 8 bytes, got {bytes}"
            ))),
        }
    }

    /// Returns the number of bytes the prefix occupies.
    pub fn bytes(self) -> usize {
        match self {
            PrefixWidth::U8 => 1,
            PrefixWidth::U16 => 2,
            PrefixWidth::U32 => 4,
            PrefixWidth::U64 => 8,
        }
    }

    /// Returns the longest key length this prefix can express.
    pub fn max_len(self) -> u64 {
        match self {
            PrefixWidth::U8 => u8::MAX as u64,
            PrefixWidth::U16 => u16::MAX as u64,
            PrefixWidth::U32 => u32::MAX as u64,
            PrefixWidth::U64 => u64::MAX,
        }
    }

    pub(crate) fn write_len<W: Write>(self, writer: &mut W, len: usize) -> Result<(), Error> {
        let len = len as u64;
        if len > self.max_len() {
            return Err(Error::invalid_argument(format!(
                "key of {len} bytes does not fit a {}-byte length prefix",
                self.bytes()
            )));
        }
        let result = match self {
            PrefixWidth::U8 => writer.write_u8(len as u8),
            PrefixWidth::U16 => writer.write_u16::<BE>(len as u16),
            PrefixWidth::U32 => writer.write_u32::<BE>(len as u32),
            PrefixWidth::U64 => writer.write_u64::<BE>(len),
        };
        result.map_err(|err| Error::write_failed("key_length", err))
    }

    pub(crate) fn read_len<R: Read>(self, reader: &mut R) -> Result<usize, Error> {
        let len = match self {
            PrefixWidth::U8 => reader.read_u8().map(u64::from),
            PrefixWidth::U16 => reader.read_u16::<BE>().map(u64::from),
            PrefixWidth::U32 => reader.read_u32::<BE>().map(u64::from),
            PrefixWidth::U64 => reader.read_u64::<BE>(),
        }
        .map_err(|err| Error::read_failed("key_length", err))?;
        usize::try_from(len)
            .map_err(|_| Error::deserial(format!("key length {len} does not fit in memory")))
    }
}
