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
//! Running average with exact overflow recovery.
//!
//! Integer sources keep a running sum in the next-wider signed type; the
//! moment an add would overflow, the kernel switches to the exact
//! mean/remainder representation and folds the remaining values one at a
//! time, so the final mean is emitted without ever re-overflowing. Floating
//! sources use the online incremental mean throughout. The output column is
//! always `f64`.

use std::ops::Range;

use crate::engine::column::{Column, ColumnData};
use crate::engine::error::Result;
use crate::engine::frame::FrameExtent;
use crate::engine::numeric::{
    avg_fold, avg_split, checked_add_nonnil, FixedValue, FloatValue, IntAccum, IntValue,
};
use crate::engine::ops::unsupported;
use crate::engine::partition::partition_ranges;

pub(crate) fn compute(
    out: &mut Column,
    input: &Column,
    bounds: Option<&[i8]>,
    frame: FrameExtent,
    identity: bool,
) -> Result<()> {
    let ColumnData::F64(rb) = &mut out.data else {
        return Err(unsupported(
            "avg",
            input.physical_type(),
            Some(out.physical_type()),
        ));
    };

    let has_nils = match &input.data {
        ColumnData::I8(b) => avg_int::<i8, i16>(b, rb, bounds, frame, identity),
        ColumnData::I16(b) => avg_int::<i16, i32>(b, rb, bounds, frame, identity),
        ColumnData::I32(b) => avg_int::<i32, i64>(b, rb, bounds, frame, identity),
        ColumnData::I64(b) => avg_int::<i64, i128>(b, rb, bounds, frame, identity),
        ColumnData::I128(b) => avg_int::<i128, i128>(b, rb, bounds, frame, identity),
        ColumnData::F32(b) => avg_float(b, rb, bounds, frame, identity),
        ColumnData::F64(b) => avg_float(b, rb, bounds, frame, identity),
        _ => {
            return Err(unsupported(
                "avg",
                input.physical_type(),
                Some(out.physical_type()),
            ));
        }
    };
    out.finish(has_nils);
    Ok(())
}

/// Exact mean of one range; `None` for an all-nil range.
fn avg_int_range<S: IntValue, A: IntAccum>(b: &[S], range: Range<usize>) -> Option<f64> {
    let mut sum = A::from_i128(0);
    let mut n: u64 = 0;
    let mut recovered: Option<(i128, u64)> = None;
    for &v in &b[range] {
        if v.is_nil() {
            continue;
        }
        let x = v.to_i128();
        match recovered {
            Some((a, rr)) => {
                let (a, rr, n1) = avg_fold(a, rr, n, x);
                recovered = Some((a, rr));
                n = n1;
            }
            None => match checked_add_nonnil(sum, A::from_i128(x)) {
                Some(next) => {
                    sum = next;
                    n += 1;
                }
                None => {
                    // The first add cannot overflow, so n > 0 here.
                    tracing::debug!(values = n, "avg: running sum overflowed, switching to exact recovery");
                    let (a, rr) = avg_split(sum.to_i128(), n);
                    let (a, rr, n1) = avg_fold(a, rr, n, x);
                    recovered = Some((a, rr));
                    n = n1;
                }
            },
        }
    }
    if n == 0 {
        return None;
    }
    Some(match recovered {
        Some((a, rr)) => a as f64 + rr as f64 / n as f64,
        None => sum.to_i128() as f64 / n as f64,
    })
}

fn avg_int<S: IntValue, A: IntAccum>(
    b: &[S],
    rb: &mut [f64],
    bounds: Option<&[i8]>,
    frame: FrameExtent,
    identity: bool,
) -> bool {
    let mut has_nils = false;
    if identity {
        for (r, &v) in rb.iter_mut().zip(b) {
            if v.is_nil() {
                *r = f64::NIL;
                has_nils = true;
            } else {
                *r = v.to_i128() as f64;
            }
        }
        return has_nils;
    }
    for part in partition_ranges(bounds, b.len()) {
        if frame.is_unbounded() {
            let curval = match avg_int_range::<S, A>(b, part.clone()) {
                Some(m) => m,
                None => {
                    has_nils = true;
                    f64::NIL
                }
            };
            for r in &mut rb[part] {
                *r = curval;
            }
        } else {
            for row in part.clone() {
                rb[row] = match avg_int_range::<S, A>(b, frame.bounds(row, &part)) {
                    Some(m) => m,
                    None => {
                        has_nils = true;
                        f64::NIL
                    }
                };
            }
        }
    }
    has_nils
}

/// Online incremental mean; avoids both overflow and the worst of the
/// cancellation error of sum-then-divide.
fn avg_float_range<S: FloatValue>(b: &[S], range: Range<usize>) -> Option<f64> {
    let mut a = 0.0f64;
    let mut n = 0u64;
    for &v in &b[range] {
        if v.is_nil() {
            continue;
        }
        n += 1;
        a += (v.to_f64() - a) / n as f64;
    }
    (n > 0).then_some(a)
}

fn avg_float<S: FloatValue>(
    b: &[S],
    rb: &mut [f64],
    bounds: Option<&[i8]>,
    frame: FrameExtent,
    identity: bool,
) -> bool {
    let mut has_nils = false;
    if identity {
        for (r, &v) in rb.iter_mut().zip(b) {
            if v.is_nil() {
                *r = f64::NIL;
                has_nils = true;
            } else {
                *r = v.to_f64();
            }
        }
        return has_nils;
    }
    for part in partition_ranges(bounds, b.len()) {
        if frame.is_unbounded() {
            let curval = match avg_float_range(b, part.clone()) {
                Some(m) => m,
                None => {
                    has_nils = true;
                    f64::NIL
                }
            };
            for r in &mut rb[part] {
                *r = curval;
            }
        } else {
            for row in part.clone() {
                rb[row] = match avg_float_range(b, frame.bounds(row, &part)) {
                    Some(m) => m,
                    None => {
                        has_nils = true;
                        f64::NIL
                    }
                };
            }
        }
    }
    has_nils
}
