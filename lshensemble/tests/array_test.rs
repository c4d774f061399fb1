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

mod common;

use std::sync::Arc;
use std::thread;

use common::NUM_HASH;
use common::domain;
use common::signature;
use crossbeam_channel::Receiver;
use crossbeam_channel::Sender;
use crossbeam_channel::bounded;
use crossbeam_channel::unbounded;
use googletest::assert_that;
use googletest::prelude::ge;
use lshensemble::array::LshForestArray;
use lshensemble::array::optimal_kl;
use lshensemble::domain::DomainRecord;
use lshensemble::forest::BandIndex;
use lshensemble::forest::LshForest;
use lshensemble::minhash::Signature;

const MAX_K: usize = 4;

fn records() -> Vec<DomainRecord> {
    (0..40u32)
        .map(|i| domain(&format!("d{i}"), i * 10..i * 10 + 50 + i))
        .collect()
}

fn drain(query: impl FnOnce(&Sender<Arc<str>>, &Receiver<()>)) -> Vec<Arc<str>> {
    let (out, results) = unbounded();
    let (_cancel, done) = bounded::<()>(1);
    query(&out, &done);
    drop(out);
    let mut keys: Vec<Arc<str>> = results.iter().collect();
    keys.sort();
    keys
}

#[test]
fn test_fan_out_matches_standalone_forests() {
    let records = records();
    let mut array: LshForestArray = LshForestArray::new(MAX_K, NUM_HASH);
    for record in &records {
        array.add(record.key(), record.signature());
    }
    array.index();

    let query = signature(95..170);
    for k in 1..=MAX_K {
        let l = NUM_HASH / k;
        let mut forest = LshForest::new(k, l);
        for record in &records {
            forest.add(&Arc::from(record.key()), record.signature());
        }
        forest.index();

        let expected = drain(|out, done| forest.query(&query, None, l, out, done));
        let actual = drain(|out, done| array.query(&query, k, l, out, done));
        assert!(!expected.is_empty(), "k = {k}");
        assert_eq!(actual, expected, "k = {k}");
    }
}

#[test]
fn test_add_records_equals_add() {
    let records = records();
    let mut one_by_one: LshForestArray = LshForestArray::new(MAX_K, NUM_HASH);
    for record in &records {
        one_by_one.add(record.key(), record.signature());
    }
    one_by_one.index();
    let mut batched: LshForestArray = LshForestArray::new(MAX_K, NUM_HASH);
    batched.add_records(&records);
    batched.index();

    let query = signature(200..260);
    for k in 1..=MAX_K {
        let l = NUM_HASH / k / 2;
        assert_eq!(
            drain(|out, done| batched.query(&query, k, l, out, done)),
            drain(|out, done| one_by_one.query(&query, k, l, out, done)),
            "k = {k}"
        );
    }
}

#[test]
fn test_cancel_stops_a_blocked_query() {
    let mut array: LshForestArray = LshForestArray::new(MAX_K, NUM_HASH);
    let sig = signature(0..100);
    for i in 0..50 {
        array.add(format!("copy{i}"), &sig);
    }
    array.index();

    // A rendezvous channel blocks the producer until someone receives.
    let (out, results) = bounded::<Arc<str>>(0);
    let (cancel, done) = bounded::<()>(1);
    let received = thread::scope(|s| {
        let producer = s.spawn(|| array.query(&sig, 1, NUM_HASH, &out, &done));
        let first = results.recv().unwrap();
        drop(cancel);
        producer.join().unwrap();
        first
    });
    assert!(received.starts_with("copy"));
    assert!(results.try_recv().is_err());
}

#[test]
fn test_signal_stops_a_blocked_query() {
    let mut array: LshForestArray = LshForestArray::new(MAX_K, NUM_HASH);
    let sig = signature(0..100);
    for i in 0..50 {
        array.add(format!("copy{i}"), &sig);
    }
    array.index();

    let (out, results) = bounded::<Arc<str>>(0);
    let (cancel, done) = bounded::<()>(1);
    thread::scope(|s| {
        let producer = s.spawn(|| array.query(&sig, 2, NUM_HASH / 2, &out, &done));
        results.recv().unwrap();
        cancel.send(()).unwrap();
        producer.join().unwrap();
    });
    assert!(results.try_recv().is_err());

    // Signaled before the query starts: nothing is emitted.
    let (out, results) = unbounded();
    cancel.send(()).unwrap();
    array.query(&sig, 1, NUM_HASH, &out, &done);
    drop(out);
    assert_eq!(results.iter().count(), 0);
}

#[test]
fn test_dropped_consumer_stops_query() {
    let mut array: LshForestArray = LshForestArray::new(MAX_K, NUM_HASH);
    let sig = signature(0..100);
    for i in 0..50 {
        array.add(format!("copy{i}"), &sig);
    }
    array.index();

    let (out, results) = bounded::<Arc<str>>(0);
    let (_cancel, done) = bounded::<()>(1);
    drop(results);
    array.query(&sig, 2, NUM_HASH / 2, &out, &done);
}

#[test]
fn test_empty_array_finds_nothing() {
    let mut array: LshForestArray = LshForestArray::new(MAX_K, NUM_HASH);
    array.index();
    let query = signature(0..10);
    assert!(drain(|out, done| array.query(&query, 1, 1, out, done)).is_empty());
}

#[test]
#[should_panic(expected = "l must be in [1, 42] for k = 3, got 43")]
fn test_too_many_bands_for_k() {
    let array: LshForestArray = LshForestArray::new(MAX_K, NUM_HASH);
    let (out, _results) = unbounded();
    let (_cancel, done) = bounded::<()>(1);
    array.query(&Signature::zeroed(NUM_HASH), 3, 43, &out, &done);
}

#[test]
fn test_optimal_kl_is_feasible() {
    for x in [0, 1, 10, 100, 1_000, 100_000] {
        for q in [1, 10, 1_000] {
            for t in [0.1, 0.5, 1.0] {
                let params = optimal_kl(MAX_K, NUM_HASH, x, q, t);
                let context = format!("x = {x}, q = {q}, t = {t}");
                assert!((1..=MAX_K).contains(&params.k), "{context}");
                assert!(params.l >= 1, "{context}");
                assert!(params.k * params.l <= NUM_HASH, "{context}");
                assert!(params.false_positive.is_finite(), "{context}");
                assert!(params.false_negative.is_finite(), "{context}");
                assert_that!(params.false_positive, ge(0.0));
                assert_that!(params.false_negative, ge(0.0));
            }
        }
    }
}

#[test]
fn test_optimal_kl_trades_recall_for_precision_as_threshold_rises() {
    for (x, q) in [(100, 100), (1_000, 100), (5_000, 10)] {
        let low = optimal_kl(MAX_K, NUM_HASH, x, q, 0.1);
        let high = optimal_kl(MAX_K, NUM_HASH, x, q, 0.9);
        assert!(high.k >= low.k, "x = {x}, q = {q}");

        // Miss rate: false negative mass over the width of the true positive range.
        let reach = (x as f64 / q as f64).min(1.0);
        let low_rate = low.false_negative / (reach - 0.1);
        let high_rate = high.false_negative / (reach - 0.9);
        assert!(
            high_rate > low_rate,
            "x = {x}, q = {q}: {low_rate} -> {high_rate}"
        );
    }
}

#[test]
fn test_optimal_kl_matches_array() {
    let array: LshForestArray = LshForestArray::new(MAX_K, NUM_HASH);
    assert_eq!(
        array.optimal_kl(1_000, 90, 0.5),
        optimal_kl(MAX_K, NUM_HASH, 1_000, 90, 0.5)
    );
    let params = array.optimal_kl(100, 90, 0.5);
    assert_eq!((params.k, params.l), (3, 28));
}
