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

//! The false positive/negative model behind the choice of `k` and `l`.
//!
//! For a query of size `q` and an indexed domain of size `x`, containment `t` of the query in
//! the domain corresponds to Jaccard similarity `t / (1 + x/q - t)`. A domain at that similarity
//! becomes a candidate with probability `1 - (1 - J^k)^l`. Integrating that curve below the
//! containment threshold gives the false positive mass; integrating its complement above the
//! threshold gives the false negative mass. Containment can never exceed `x/q`, which bounds
//! both integrals.

/// Step of the midpoint rule used by every integral here.
pub const INTEGRATION_PRECISION: f64 = 0.01;

/// Midpoint-rule integral of `f` over `[a, b)` with the given step.
fn integral(f: impl Fn(f64) -> f64, a: f64, b: f64, precision: f64) -> f64 {
    let mut area = 0.0;
    let mut x = a;
    while x < b {
        area += f(x + 0.5 * precision) * precision;
        x += precision;
    }
    area
}

/// Probability that a domain at containment `t` collides with the query in at least one band.
fn candidate_probability(xq: f64, l: usize, k: usize) -> impl Fn(f64) -> f64 {
    move |t| {
        let jaccard = t / (1.0 + xq - t);
        1.0 - (1.0 - jaccard.powi(k as i32)).powi(l as i32)
    }
}

/// False positive mass of `l` bands of width `k` for containment threshold `t`.
pub fn false_positive_probability(
    x: usize,
    q: usize,
    l: usize,
    k: usize,
    t: f64,
    precision: f64,
) -> f64 {
    let xq = x as f64 / q as f64;
    let upper = if xq >= t { t } else { xq };
    integral(candidate_probability(xq, l, k), 0.0, upper, precision)
}

/// False negative mass of `l` bands of width `k` for containment threshold `t`.
pub fn false_negative_probability(
    x: usize,
    q: usize,
    l: usize,
    k: usize,
    t: f64,
    precision: f64,
) -> f64 {
    let xq = x as f64 / q as f64;
    let upper = if xq >= 1.0 {
        1.0
    } else if xq >= t {
        xq
    } else {
        return 0.0;
    };
    let candidate = candidate_probability(xq, l, k);
    integral(|t| 1.0 - candidate(t), t, upper, precision)
}
