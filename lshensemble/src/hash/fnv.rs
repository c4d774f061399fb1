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

use std::hash::Hasher;

const OFFSET_BASIS: u64 = 0xcbf29ce484222325;
const PRIME: u64 = 0x00000100000001b3;

/// The 64-bit FNV-1a hash function.
///
/// The output is stable across platforms and releases, which `std`'s `DefaultHasher` does not
/// promise.
#[derive(Debug, Clone, Copy)]
pub struct Fnv1a64 {
    state: u64,
}

impl Fnv1a64 {
    /// Creates a hasher at the FNV offset basis.
    pub fn new() -> Self {
        Fnv1a64 {
            state: OFFSET_BASIS,
        }
    }
}

impl Default for Fnv1a64 {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher for Fnv1a64 {
    fn finish(&self) -> u64 {
        self.state
    }

    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.state ^= b as u64;
            self.state = self.state.wrapping_mul(PRIME);
        }
    }
}

/// FNV-1a keyed by an 8-byte salt that is hashed ahead of every input, then finalized with the
/// MurmurHash3 64-bit mix.
///
/// Two `SaltedHash` values with different salts behave as independent hash functions, which is
/// what the min-wise sketch needs from its pair of hashes. Raw FNV-1a barely disperses inputs
/// that differ only in their last bytes, and the finalizer spreads those differences over the
/// whole word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaltedHash {
    salt: [u8; 8],
}

impl SaltedHash {
    /// Creates a hash function salted with the big-endian bytes of `salt`.
    pub fn new(salt: u64) -> Self {
        SaltedHash {
            salt: salt.to_be_bytes(),
        }
    }

    /// Returns the salt bytes.
    pub fn salt(&self) -> [u8; 8] {
        self.salt
    }

    /// Hashes `bytes` after the salt.
    pub fn hash(&self, bytes: &[u8]) -> u64 {
        let mut hasher = Fnv1a64::new();
        hasher.write(&self.salt);
        hasher.write(bytes);
        fmix64(hasher.finish())
    }
}

fn fmix64(mut k: u64) -> u64 {
    k ^= k >> 33;
    k = k.wrapping_mul(0xff51afd7ed558ccd);
    k ^= k >> 33;
    k = k.wrapping_mul(0xc4ceb9fe1a85ec53);
    k ^ (k >> 33)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fnv1a_reference_values() {
        let hash = |input: &[u8]| {
            let mut hasher = Fnv1a64::new();
            hasher.write(input);
            hasher.finish()
        };
        assert_eq!(hash(b""), 0xcbf29ce484222325);
        assert_eq!(hash(b"a"), 0xaf63dc4c8601ec8c);
        assert_eq!(hash(b"foobar"), 0x85944171f73967e8);
    }

    #[test]
    fn test_salt_changes_hash() {
        let h1 = SaltedHash::new(1);
        let h2 = SaltedHash::new(2);
        assert_ne!(h1.hash(b"value"), h2.hash(b"value"));
        assert_eq!(h1.hash(b"value"), SaltedHash::new(1).hash(b"value"));
    }

    #[test]
    fn test_salt_is_hashed_first() {
        let salted = SaltedHash::new(7);
        let mut hasher = Fnv1a64::new();
        hasher.write(&7u64.to_be_bytes());
        hasher.write(b"abc");
        assert_eq!(salted.hash(b"abc"), fmix64(hasher.finish()));
    }

    #[test]
    fn test_fmix64_avalanche() {
        assert_eq!(fmix64(0), 0);
        let a = SaltedHash::new(7).hash(&1u32.to_be_bytes());
        let b = SaltedHash::new(7).hash(&2u32.to_be_bytes());
        assert!((a ^ b).count_ones() > 16, "{a:016x} vs {b:016x}");
    }
}
