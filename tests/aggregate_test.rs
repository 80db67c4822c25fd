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
//! Engine tests for the aggregating operations: extrema, counting, sum,
//! product, and average, across both traversal regimes.

mod common;

use common::*;
use novarocks_analytic::{
    AnalyticError, Column, FrameExtent, PhysicalType, avg, count, max, min, prod, sum,
};

fn whole() -> FrameExtent {
    FrameExtent::unbounded()
}

#[test]
fn min_max_broadcast_partition_extrema() {
    let input = i32_col(&[Some(5), None, Some(3), Some(9), Some(2), Some(2)]);
    let parts = marks(&[false, false, false, true, false, false]);

    let mut lo = Column::for_output(PhysicalType::I32, input.len());
    min(&mut lo, &input, Some(&parts), None, false, whole()).expect("min");
    assert_eq!(
        read_i32(&lo),
        vec![Some(3), Some(3), Some(3), Some(2), Some(2), Some(2)]
    );

    let mut hi = Column::for_output(PhysicalType::I32, input.len());
    max(&mut hi, &input, Some(&parts), None, false, whole()).expect("max");
    assert_eq!(
        read_i32(&hi),
        vec![Some(5), Some(5), Some(5), Some(9), Some(9), Some(9)]
    );
    assert!(hi.nonil());
}

#[test]
fn min_max_sliding_windows_rescan_from_scratch() {
    let input = i32_col(&[Some(4), Some(1), Some(7), None, Some(5)]);
    let mut out = Column::for_output(PhysicalType::I32, input.len());
    // One row back, one row ahead, forced order, single partition.
    min(
        &mut out,
        &input,
        None,
        None,
        true,
        FrameExtent::new(1, 1),
    )
    .expect("min");
    assert_eq!(
        read_i32(&out),
        vec![Some(1), Some(1), Some(1), Some(5), Some(5)]
    );
}

#[test]
fn min_all_nil_window_yields_nil() {
    let input = i32_col(&[Some(2), None, None, Some(8)]);
    let mut out = Column::for_output(PhysicalType::I32, input.len());
    min(
        &mut out,
        &input,
        None,
        None,
        true,
        FrameExtent::new(0, 1),
    )
    .expect("min");
    // Row 1's window is rows 1..=2, both nil.
    assert_eq!(
        read_i32(&out),
        vec![Some(2), None, Some(8), Some(8)]
    );
    assert!(out.nils());
}

#[test]
fn min_without_partitions_or_order_is_an_identity_copy() {
    let input = i32_col(&[Some(9), None, Some(1)]);
    let mut out = Column::for_output(PhysicalType::I32, input.len());
    min(&mut out, &input, None, None, false, whole()).expect("min");
    assert_eq!(read_i32(&out), vec![Some(9), None, Some(1)]);
    assert!(out.nils());
}

#[test]
fn min_max_over_strings_and_opaque_atoms() {
    let input = str_col(&[Some("pear"), Some("apple"), None, Some("plum")]);
    let mut out = Column::for_output(PhysicalType::Str, input.len());
    min(&mut out, &input, None, None, true, whole()).expect("min str");
    assert_eq!(read_strs(&out), vec![Some("apple".into()); 4]);

    let input = opaque_col(&[Some(17), None, Some(3), Some(90)]);
    let mut out = opaque_output(&input, input.len());
    max(&mut out, &input, None, None, true, whole()).expect("max opaque");
    assert_eq!(read_opaque(&out), vec![Some(90); 4]);
}

#[test]
fn count_all_rows_ignores_values() {
    let input = i32_col(&[Some(1), None, None, Some(4), Some(5)]);
    let parts = marks(&[false, false, true, false, false]);
    let mut out = Column::for_output(PhysicalType::I64, input.len());
    count(&mut out, &input, Some(&parts), None, false, whole()).expect("count");
    assert_eq!(
        read_i64(&out),
        vec![Some(2), Some(2), Some(3), Some(3), Some(3)]
    );
    assert!(out.nonil());
}

#[test]
fn count_non_nil_values_per_partition() {
    let input = i32_col(&[Some(1), None, None, Some(4), Some(5)]);
    let parts = marks(&[false, false, true, false, false]);
    let mut out = Column::for_output(PhysicalType::I64, input.len());
    count(&mut out, &input, Some(&parts), None, true, whole()).expect("count");
    assert_eq!(
        read_i64(&out),
        vec![Some(1), Some(1), Some(2), Some(2), Some(2)]
    );
}

#[test]
fn count_sliding_window_sizes() {
    let input = i32_col(&[Some(1), Some(2), Some(3), Some(4)]);
    let mut out = Column::for_output(PhysicalType::I64, input.len());
    count(
        &mut out,
        &input,
        None,
        None,
        false,
        FrameExtent::new(1, 1),
    )
    .expect("count");
    assert_eq!(
        read_i64(&out),
        vec![Some(2), Some(3), Some(3), Some(2)]
    );
}

#[test]
fn count_non_nil_strings_uses_the_heap_sentinel() {
    let input = str_col(&[Some("x"), None, Some(""), None, Some("y")]);
    let mut out = Column::for_output(PhysicalType::I64, input.len());
    count(&mut out, &input, None, None, true, whole()).expect("count str");
    assert_eq!(read_i64(&out), vec![Some(3); 5]);
}

#[test]
fn count_nonil_input_short_circuits_value_inspection() {
    let input = i32_col(&[Some(1), Some(2), Some(3)]);
    assert!(input.nonil());
    let mut out = Column::for_output(PhysicalType::I64, input.len());
    count(&mut out, &input, None, None, true, whole()).expect("count");
    assert_eq!(read_i64(&out), vec![Some(3); 3]);
}

#[test]
fn sum_spec_example_with_clipped_frames() {
    let input = i64_col(&[Some(10), Some(20), Some(30), Some(40), Some(50)]);
    let parts = marks(&[false, false, true, false, false]);
    let mut out = Column::for_output(PhysicalType::I64, input.len());
    sum(
        &mut out,
        &input,
        Some(&parts),
        None,
        false,
        FrameExtent::new(1, 0),
    )
    .expect("sum");
    assert_eq!(
        read_i64(&out),
        vec![Some(10), Some(30), Some(30), Some(70), Some(90)]
    );
}

#[test]
fn sum_skips_nils_without_resetting() {
    let input = i32_col(&[Some(1), None, Some(2), None, Some(4)]);
    let mut out = Column::for_output(PhysicalType::I64, input.len());
    sum(&mut out, &input, None, None, true, whole()).expect("sum");
    assert_eq!(read_i64(&out), vec![Some(7); 5]);
}

#[test]
fn sum_all_nil_partition_yields_nil() {
    let input = i32_col(&[None, None]);
    let mut out = Column::for_output(PhysicalType::I64, input.len());
    sum(&mut out, &input, None, None, true, whole()).expect("sum");
    assert_eq!(read_i64(&out), vec![None, None]);
    assert!(out.nils());
}

#[test]
fn sum_same_width_overflow_aborts() {
    let input = i64_col(&[Some(i64::MAX), Some(1)]);
    let mut out = Column::for_output(PhysicalType::I64, input.len());
    let err = sum(&mut out, &input, None, None, true, whole()).unwrap_err();
    assert_eq!(err, AnalyticError::Overflow { op: "sum" });
}

#[test]
fn sum_next_wider_accumulator_is_exact() {
    let input = i64_col(&[Some(i64::MAX), Some(1)]);
    let mut out = Column::for_output(PhysicalType::I128, input.len());
    sum(&mut out, &input, None, None, true, whole()).expect("sum");
    assert_eq!(
        read_i128(&out),
        vec![Some(i64::MAX as i128 + 1); 2]
    );
}

#[test]
fn sum_rejects_narrowing_and_cross_kind_pairs() {
    let input = i64_col(&[Some(1)]);
    let mut out = Column::for_output(PhysicalType::I8, 1);
    let err = sum(&mut out, &input, None, None, true, whole()).unwrap_err();
    assert!(matches!(err, AnalyticError::UnsupportedType { op: "sum", .. }));

    let input = f64_col(&[Some(1.0)]);
    let mut out = Column::for_output(PhysicalType::F32, 1);
    let err = sum(&mut out, &input, None, None, true, whole()).unwrap_err();
    assert!(matches!(err, AnalyticError::UnsupportedType { op: "sum", .. }));
}

#[test]
fn sum_identity_shortcut_casts_into_destination() {
    let input = i32_col(&[Some(1), None, Some(3)]);
    let mut out = Column::for_output(PhysicalType::I64, input.len());
    sum(&mut out, &input, None, None, false, whole()).expect("sum");
    assert_eq!(read_i64(&out), vec![Some(1), None, Some(3)]);
    assert!(out.nils());
}

#[test]
fn float_sum_regimes_differ_in_precision_by_design() {
    let input = f64_col(&[Some(1e16), Some(1.0), Some(-1e16)]);

    // Whole-partition regime: exact partials summation.
    let mut stable = Column::for_output(PhysicalType::F64, input.len());
    sum(&mut stable, &input, None, None, true, whole()).expect("stable sum");
    assert_eq!(read_f64(&stable), vec![Some(1.0); 3]);

    // Sliding-window regime: naive left-to-right summation loses the 1.0.
    let mut naive = Column::for_output(PhysicalType::F64, input.len());
    sum(
        &mut naive,
        &input,
        None,
        None,
        true,
        FrameExtent::new(2, 2),
    )
    .expect("naive sum");
    assert_eq!(read_f64(&naive)[1], Some(0.0));
}

#[test]
fn float_sum_overflow_is_a_hard_failure() {
    let input = f64_col(&[Some(f64::MAX), Some(f64::MAX)]);
    let mut out = Column::for_output(PhysicalType::F64, input.len());
    let err = sum(&mut out, &input, None, None, true, whole()).unwrap_err();
    assert_eq!(err, AnalyticError::FloatSum { op: "sum" });
}

#[test]
fn prod_accumulates_and_broadcasts() {
    let input = i32_col(&[Some(2), None, Some(3), Some(4)]);
    let mut out = Column::for_output(PhysicalType::I64, input.len());
    prod(&mut out, &input, None, None, true, whole()).expect("prod");
    assert_eq!(read_i64(&out), vec![Some(24); 4]);
}

#[test]
fn prod_fixed_point_overflow_aborts() {
    let input = i8_col(&[Some(16), Some(8)]);
    let mut out = Column::for_output(PhysicalType::I8, input.len());
    let err = prod(&mut out, &input, None, None, true, whole()).unwrap_err();
    assert_eq!(err, AnalyticError::Overflow { op: "prod" });
}

#[test]
fn prod_float_magnitude_precheck_aborts() {
    let input = f64_col(&[Some(1e200), Some(1e200)]);
    let mut out = Column::for_output(PhysicalType::F64, input.len());
    let err = prod(&mut out, &input, None, None, true, whole()).unwrap_err();
    assert_eq!(err, AnalyticError::Overflow { op: "prod" });
}

#[test]
fn prod_sliding_windows_recompute() {
    let input = i32_col(&[Some(2), Some(3), Some(5)]);
    let mut out = Column::for_output(PhysicalType::I64, input.len());
    prod(
        &mut out,
        &input,
        None,
        None,
        true,
        FrameExtent::new(1, 0),
    )
    .expect("prod");
    assert_eq!(read_i64(&out), vec![Some(2), Some(6), Some(15)]);
}

#[test]
fn avg_broadcasts_partition_means() {
    let input = i32_col(&[Some(1), Some(2), Some(3), Some(10), None]);
    let parts = marks(&[false, false, false, true, false]);
    let mut out = Column::for_output(PhysicalType::F64, input.len());
    avg(&mut out, &input, Some(&parts), None, false, whole()).expect("avg");
    assert_eq!(
        read_f64(&out),
        vec![Some(2.0), Some(2.0), Some(2.0), Some(10.0), Some(10.0)]
    );
}

#[test]
fn avg_all_nil_partition_yields_nil() {
    let input = i32_col(&[Some(4), None, None]);
    let parts = marks(&[false, true, false]);
    let mut out = Column::for_output(PhysicalType::F64, input.len());
    avg(&mut out, &input, Some(&parts), None, false, whole()).expect("avg");
    assert_eq!(read_f64(&out), vec![Some(4.0), None, None]);
    assert!(out.nils());
}

#[test]
fn avg_sliding_windows_recompute() {
    let input = i32_col(&[Some(2), Some(4), Some(9)]);
    let mut out = Column::for_output(PhysicalType::F64, input.len());
    avg(
        &mut out,
        &input,
        None,
        None,
        true,
        FrameExtent::new(1, 0),
    )
    .expect("avg");
    assert_eq!(read_f64(&out), vec![Some(2.0), Some(3.0), Some(6.5)]);
}

#[test]
fn avg_overflow_recovery_is_exact() {
    // 300 values of 127 overflow the i16 running sum at the 259th add; the
    // exact mean/remainder continuation must still produce 127 exactly.
    let input = i8_col(&vec![Some(127); 300]);
    let mut out = Column::for_output(PhysicalType::F64, input.len());
    avg(&mut out, &input, None, None, true, whole()).expect("avg");
    assert_eq!(read_f64(&out), vec![Some(127.0); 300]);

    let input = i8_col(&vec![Some(-127); 300]);
    let mut out = Column::for_output(PhysicalType::F64, input.len());
    avg(&mut out, &input, None, None, true, whole()).expect("avg");
    assert_eq!(read_f64(&out), vec![Some(-127.0); 300]);
}

#[test]
fn avg_float_online_mean() {
    let input = f64_col(&[Some(1.5), Some(2.5), None, Some(5.0)]);
    let mut out = Column::for_output(PhysicalType::F64, input.len());
    avg(&mut out, &input, None, None, true, whole()).expect("avg");
    assert_eq!(read_f64(&out), vec![Some(3.0); 4]);
}

#[test]
fn avg_identity_shortcut_casts_to_f64() {
    let input = i32_col(&[Some(2), None, Some(8)]);
    let mut out = Column::for_output(PhysicalType::F64, input.len());
    avg(&mut out, &input, None, None, false, whole()).expect("avg");
    assert_eq!(read_f64(&out), vec![Some(2.0), None, Some(8.0)]);
}

#[test]
fn order_presence_alone_selects_the_aggregate_path() {
    let input = i32_col(&[Some(3), Some(1), Some(2)]);
    // Contents of the order column are never consulted; presence is enough.
    let order = i32_col(&[Some(9), Some(9), Some(9)]);

    let mut copied = Column::for_output(PhysicalType::I32, input.len());
    min(&mut copied, &input, None, None, false, whole()).expect("identity");
    assert_eq!(read_i32(&copied), vec![Some(3), Some(1), Some(2)]);

    let mut aggregated = Column::for_output(PhysicalType::I32, input.len());
    min(&mut aggregated, &input, None, Some(&order), false, whole()).expect("aggregate");
    assert_eq!(read_i32(&aggregated), vec![Some(1); 3]);
}

#[test]
fn failed_calls_leave_no_finalized_flags() {
    let input = i64_col(&[Some(i64::MAX), Some(1)]);
    let mut out = Column::for_output(PhysicalType::I64, input.len());
    let _ = sum(&mut out, &input, None, None, true, whole()).unwrap_err();
    // Hard failure: neither flag was finalized, the column must not be read.
    assert!(!out.nonil() && !out.nils());
}
