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

//! Key codecs and the key length prefix of the domain record format.
//!
//! The binary record format does not fix how a domain key becomes bytes. Callers pass an encoder
//! to [`crate::domain::DomainRecord::write`] and a decoder to
//! [`crate::domain::DomainRecord::read`], which lets them intern or compress keys. The functions
//! here are the plain UTF-8 pair.

mod prefix;

pub use self::prefix::PrefixWidth;
use crate::error::Error;

/// Encodes a key as its raw UTF-8 bytes.
pub fn encode_utf8(key: &str) -> Result<Vec<u8>, Error> {
    Ok(key.as_bytes().to_vec())
}

/// Decodes raw UTF-8 bytes into a key.
///
/// # Examples
///
/// ```
/// # use lshensemble::codec::decode_utf8;
/// # use lshensemble::error::ErrorKind;
/// assert_eq!(decode_utf8(b"abcd".to_vec()).unwrap(), "abcd");
/// assert_eq!(decode_utf8(vec![0xff]).unwrap_err().kind(), ErrorKind::InvalidData);
/// ```
pub fn decode_utf8(bytes: Vec<u8>) -> Result<String, Error> {
    String::from_utf8(bytes).map_err(|err| {
        Error::deserial("key is not valid UTF-8")
            .with_context("valid_up_to", err.utf8_error().valid_up_to())
    })
}
