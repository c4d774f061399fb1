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

use crate::codec::PrefixWidth;
use crate::domain::DomainRecord;
use crate::error::Error;
use crate::minhash::Signature;

const SIZE_BYTES: usize = 8;

impl DomainRecord {
    /// Serializes the record with a 4-byte key length prefix.
    ///
    /// Returns the number of bytes written. On error the writer may hold a partial record and
    /// should be discarded.
    ///
    /// # Examples
    ///
    /// ```
    /// # use lshensemble::codec::encode_utf8;
    /// # use lshensemble::domain::DomainRecord;
    /// # use lshensemble::minhash::Signature;
    /// let record = DomainRecord::new("abcd", 3, Signature::new(vec![1, 2]));
    /// let mut bytes = vec![];
    /// let n = record.write(&mut bytes, encode_utf8).unwrap();
    /// assert_eq!(n, 4 + 4 + 8 + 16);
    /// assert_eq!(n, bytes.len());
    /// ```
    pub fn write<W, E>(&self, writer: &mut W, encode: E) -> Result<usize, Error>
    where
        W: Write,
        E: FnOnce(&str) -> Result<Vec<u8>, Error>,
    {
        self.write_with_prefix(writer, PrefixWidth::default(), encode)
    }

    /// Serializes the record with a key length prefix of the given width.
    pub fn write_with_prefix<W, E>(
        &self,
        writer: &mut W,
        prefix: PrefixWidth,
        encode: E,
    ) -> Result<usize, Error>
    where
        W: Write,
        E: FnOnce(&str) -> Result<Vec<u8>, Error>,
    {
        let key_bytes = encode(&self.key).map_err(|err| err.with_context("field", "key"))?;
        prefix.write_len(writer, key_bytes.len())?;
        writer
            .write_all(&key_bytes)
            .map_err(|err| Error::write_failed("key", err))?;
        writer
            .write_u64::<BE>(self.size as u64)
            .map_err(|err| Error::write_failed("size", err))?;
        self.signature.write(writer)?;
        Ok(prefix.bytes() + key_bytes.len() + SIZE_BYTES + self.signature.byte_len())
    }

    /// Deserializes a record whose signature holds `num_hash` values.
    ///
    /// `prefix` must be the width the record was written with, and `decode` turns the key bytes
    /// back into a key. A decoder failure or a stream that ends early is an error.
    ///
    /// # Examples
    ///
    /// ```
    /// # use lshensemble::codec::PrefixWidth;
    /// # use lshensemble::codec::decode_utf8;
    /// # use lshensemble::codec::encode_utf8;
    /// # use lshensemble::domain::DomainRecord;
    /// # use lshensemble::minhash::Signature;
    /// let record = DomainRecord::new("abcd", 3, Signature::new(vec![1, 2]));
    /// let mut bytes = vec![];
    /// record.write(&mut bytes, encode_utf8).unwrap();
    ///
    /// let decoded =
    ///     DomainRecord::read(&mut bytes.as_slice(), 2, PrefixWidth::U32, decode_utf8).unwrap();
    /// assert_eq!(decoded, record);
    /// ```
    pub fn read<R, D>(
        reader: &mut R,
        num_hash: usize,
        prefix: PrefixWidth,
        decode: D,
    ) -> Result<Self, Error>
    where
        R: Read,
        D: FnOnce(Vec<u8>) -> Result<String, Error>,
    {
        let key_len = prefix.read_len(reader)?;
        let mut key_bytes = Vec::new();
        let read = reader
            .by_ref()
            .take(key_len as u64)
            .read_to_end(&mut key_bytes)
            .map_err(|err| Error::read_failed("key", err))?;
        if read != key_len {
            return Err(Error::insufficient_data("key")
                .with_context("expected", key_len)
                .with_context("actual", read));
        }
        let key = decode(key_bytes).map_err(|err| err.with_context("field", "key"))?;

        let size = reader
            .read_u64::<BE>()
            .map_err(|err| Error::read_failed("size", err))?;
        let size = usize::try_from(size)
            .map_err(|_| Error::deserial(format!("domain size {size} does not fit in memory")))?;

        let mut signature = Signature::zeroed(num_hash);
        signature.read(reader)?;

        Ok(DomainRecord {
            key,
            size,
            signature,
        })
    }

    /// Returns the number of bytes [`DomainRecord::write_with_prefix`] emits for an encoded key of
    /// `key_len` bytes.
    pub fn serialized_len(&self, prefix: PrefixWidth, key_len: usize) -> usize {
        prefix.bytes() + key_len + SIZE_BYTES + self.signature.byte_len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::decode_utf8;
    use crate::codec::encode_utf8;
    use crate::error::ErrorKind;

    fn sample() -> DomainRecord {
        DomainRecord::new("abcd", 1234, Signature::new(vec![9, 8, 7]))
    }

    #[test]
    fn test_layout() {
        let mut bytes = vec![];
        let n = sample().write(&mut bytes, encode_utf8).unwrap();
        assert_eq!(n, bytes.len());
        assert_eq!(n, sample().serialized_len(PrefixWidth::U32, 4));
        assert_eq!(&bytes[..4], &[0, 0, 0, 4]);
        assert_eq!(&bytes[4..8], b"abcd");
        assert_eq!(&bytes[8..16], &1234u64.to_be_bytes());
        assert_eq!(&bytes[16..24], &9u64.to_be_bytes());
    }

    #[test]
    fn test_short_prefix_round_trip() {
        let mut bytes = vec![];
        let n = sample()
            .write_with_prefix(&mut bytes, PrefixWidth::U8, encode_utf8)
            .unwrap();
        assert_eq!(n, 1 + 4 + 8 + 24);
        let decoded =
            DomainRecord::read(&mut bytes.as_slice(), 3, PrefixWidth::U8, decode_utf8).unwrap();
        assert_eq!(decoded, sample());
    }

    #[test]
    fn test_truncated_key() {
        let mut bytes = vec![];
        sample().write(&mut bytes, encode_utf8).unwrap();
        bytes.truncate(6);
        let err = DomainRecord::read(&mut bytes.as_slice(), 3, PrefixWidth::U32, decode_utf8)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
        assert_eq!(err.message(), "insufficient data: key");
    }

    #[test]
    fn test_truncated_signature() {
        let mut bytes = vec![];
        sample().write(&mut bytes, encode_utf8).unwrap();
        bytes.pop();
        let err = DomainRecord::read(&mut bytes.as_slice(), 3, PrefixWidth::U32, decode_utf8)
            .unwrap_err();
        assert_eq!(err.message(), "insufficient data: signature");
    }

    /// Serves its bytes, then fails instead of reporting end of stream.
    struct ResetAfter<'a>(&'a [u8]);

    impl Read for ResetAfter<'_> {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.0.is_empty() {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::ConnectionReset,
                    "connection reset",
                ));
            }
            self.0.read(buf)
        }
    }

    #[test]
    fn test_stream_failure_keeps_cause() {
        let mut bytes = vec![];
        sample().write(&mut bytes, encode_utf8).unwrap();
        // Key length and key arrive, then the stream breaks.
        let mut reader = ResetAfter(&bytes[..8]);
        let err = DomainRecord::read(&mut reader, 3, PrefixWidth::U32, decode_utf8).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert_eq!(err.message(), "failed to read size: connection reset");
    }

    #[test]
    fn test_decoder_failure() {
        let mut bytes = vec![];
        sample().write(&mut bytes, encode_utf8).unwrap();
        let err = DomainRecord::read(&mut bytes.as_slice(), 3, PrefixWidth::U32, |_| {
            Err(Error::deserial("unknown interned key"))
        })
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
        assert_eq!(err.message(), "unknown interned key");
    }

    #[test]
    fn test_encoder_failure_writes_nothing() {
        let mut bytes = vec![];
        let err = sample()
            .write(&mut bytes, |_| Err(Error::invalid_argument("key not interned")))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(bytes.is_empty());
    }
}
