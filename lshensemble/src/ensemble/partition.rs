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

use std::fmt;

use crate::domain::BySize;
use crate::domain::DomainRecord;

/// An inclusive range of domain sizes served by one band index array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Partition {
    /// Smallest domain size in the partition.
    pub lower: usize,
    /// Largest domain size in the partition.
    pub upper: usize,
}

impl Partition {
    /// Creates a partition covering `[lower, upper]`.
    ///
    /// # Panics
    ///
    /// Panics if `lower > upper`.
    pub fn new(lower: usize, upper: usize) -> Self {
        assert!(
            lower <= upper,
            "partition lower bound {lower} exceeds upper bound {upper}"
        );
        Partition { lower, upper }
    }

    /// Returns true if `size` lies in the partition.
    pub fn contains(&self, size: usize) -> bool {
        self.lower <= size && size <= self.upper
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.lower, self.upper)
    }
}

/// Splits size-sorted records into at most `num_part` partitions of roughly equal count.
///
/// Records of equal size always land in the same partition, so partitions never overlap and
/// there may be fewer than `num_part` of them.
///
/// # Panics
///
/// Panics if the records are not sorted by size or `num_part` is 0.
pub(crate) fn equi_depth(sorted: &[DomainRecord], num_part: usize) -> Vec<Partition> {
    assert!(num_part > 0, "num_partitions must be at least 1");
    assert!(sorted.is_sorted_by_size(), "domains must be sorted by size first");
    let Some(first) = sorted.first() else {
        return vec![];
    };
    let depth = (sorted.len() / num_part).max(1);

    let mut partitions = Vec::with_capacity(num_part);
    let mut lower = first.size();
    let mut upper = first.size();
    let mut count = 0;
    for record in sorted {
        let size = record.size();
        if count >= depth && size != upper && partitions.len() < num_part - 1 {
            partitions.push(Partition::new(lower, upper));
            lower = size;
            count = 0;
        }
        upper = size;
        count += 1;
    }
    partitions.push(Partition::new(lower, upper));
    partitions
}
