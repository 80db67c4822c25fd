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
//! Sum and product over a wider accumulator.
//!
//! Responsibilities:
//! - Validates the (source, destination) pair against the promotion table,
//!   then accumulates with overflow-checked arithmetic; any overflow aborts
//!   the whole call with no partial output.
//! - Whole-partition aggregation broadcasts one accumulated value; sliding
//!   windows recompute from scratch per row.
//! - Floating-point sum: stable summation for whole partitions, naive
//!   left-to-right summation inside sliding windows (intentional precision
//!   asymmetry). Floating-point product guards with the magnitude pre-check
//!   before multiplying.
//!
//! Current limitations:
//! - There is no "continue with nil on overflow" mode; overflow always
//!   aborts the call.

use std::ops::Range;

use crate::engine::column::{Column, ColumnData};
use crate::engine::error::{AnalyticError, Result};
use crate::engine::frame::FrameExtent;
use crate::engine::numeric::{
    checked_add_nonnil, checked_mul_nonnil, float_mul_would_overflow, naive_sum,
    promotion_supported, stable_sum, FixedValue, FloatValue, IntAccum, IntValue,
    PROD_PROMOTIONS, SUM_PROMOTIONS,
};
use crate::engine::ops::unsupported;
use crate::engine::partition::partition_ranges;

#[derive(Copy, Clone, Debug)]
pub(crate) enum Reduce {
    Sum,
    Prod,
}

impl Reduce {
    pub(crate) fn op(self) -> &'static str {
        match self {
            Reduce::Sum => "sum",
            Reduce::Prod => "prod",
        }
    }
}

pub(crate) fn compute(
    out: &mut Column,
    input: &Column,
    bounds: Option<&[i8]>,
    frame: FrameExtent,
    which: Reduce,
    identity: bool,
    max_partials: usize,
) -> Result<()> {
    let table = match which {
        Reduce::Sum => SUM_PROMOTIONS,
        Reduce::Prod => PROD_PROMOTIONS,
    };
    if !promotion_supported(table, input.physical_type(), out.physical_type()) {
        return Err(unsupported(
            which.op(),
            input.physical_type(),
            Some(out.physical_type()),
        ));
    }

    let has_nils = match (&input.data, &mut out.data) {
        (ColumnData::I8(b), ColumnData::I8(rb)) => int_kernel(b, rb, bounds, frame, which, identity)?,
        (ColumnData::I8(b), ColumnData::I16(rb)) => int_kernel(b, rb, bounds, frame, which, identity)?,
        (ColumnData::I8(b), ColumnData::I32(rb)) => int_kernel(b, rb, bounds, frame, which, identity)?,
        (ColumnData::I8(b), ColumnData::I64(rb)) => int_kernel(b, rb, bounds, frame, which, identity)?,
        (ColumnData::I8(b), ColumnData::I128(rb)) => int_kernel(b, rb, bounds, frame, which, identity)?,
        (ColumnData::I16(b), ColumnData::I16(rb)) => int_kernel(b, rb, bounds, frame, which, identity)?,
        (ColumnData::I16(b), ColumnData::I32(rb)) => int_kernel(b, rb, bounds, frame, which, identity)?,
        (ColumnData::I16(b), ColumnData::I64(rb)) => int_kernel(b, rb, bounds, frame, which, identity)?,
        (ColumnData::I16(b), ColumnData::I128(rb)) => int_kernel(b, rb, bounds, frame, which, identity)?,
        (ColumnData::I32(b), ColumnData::I32(rb)) => int_kernel(b, rb, bounds, frame, which, identity)?,
        (ColumnData::I32(b), ColumnData::I64(rb)) => int_kernel(b, rb, bounds, frame, which, identity)?,
        (ColumnData::I32(b), ColumnData::I128(rb)) => int_kernel(b, rb, bounds, frame, which, identity)?,
        (ColumnData::I64(b), ColumnData::I64(rb)) => int_kernel(b, rb, bounds, frame, which, identity)?,
        (ColumnData::I64(b), ColumnData::I128(rb)) => int_kernel(b, rb, bounds, frame, which, identity)?,
        (ColumnData::I128(b), ColumnData::I128(rb)) => int_kernel(b, rb, bounds, frame, which, identity)?,
        (ColumnData::F32(b), ColumnData::F32(rb)) => {
            float_kernel(b, rb, bounds, frame, which, identity, max_partials)?
        }
        (ColumnData::F32(b), ColumnData::F64(rb)) => {
            float_kernel(b, rb, bounds, frame, which, identity, max_partials)?
        }
        (ColumnData::F64(b), ColumnData::F64(rb)) => {
            float_kernel(b, rb, bounds, frame, which, identity, max_partials)?
        }
        _ => {
            return Err(unsupported(
                which.op(),
                input.physical_type(),
                Some(out.physical_type()),
            ));
        }
    };
    out.finish(has_nils);
    Ok(())
}

/// One nil-seeded checked accumulation over `range`: nil inputs are skipped
/// and never reset the running value; an all-nil range stays nil.
fn accumulate_int<S: IntValue, A: IntAccum>(
    b: &[S],
    range: Range<usize>,
    which: Reduce,
    op: &'static str,
) -> Result<A> {
    let mut curval = A::NIL;
    for &v in &b[range] {
        if v.is_nil() {
            continue;
        }
        let w = A::from_i128(v.to_i128());
        curval = if curval.is_nil() {
            w
        } else {
            let next = match which {
                Reduce::Sum => checked_add_nonnil(curval, w),
                Reduce::Prod => checked_mul_nonnil(curval, w),
            };
            next.ok_or(AnalyticError::Overflow { op })?
        };
    }
    Ok(curval)
}

fn int_kernel<S: IntValue, A: IntAccum>(
    b: &[S],
    rb: &mut [A],
    bounds: Option<&[i8]>,
    frame: FrameExtent,
    which: Reduce,
    identity: bool,
) -> Result<bool> {
    let op = which.op();
    let mut has_nils = false;
    if identity {
        for (r, &v) in rb.iter_mut().zip(b) {
            if v.is_nil() {
                *r = A::NIL;
                has_nils = true;
            } else {
                *r = A::from_i128(v.to_i128());
            }
        }
        return Ok(has_nils);
    }
    for part in partition_ranges(bounds, b.len()) {
        if frame.is_unbounded() {
            let curval = accumulate_int::<S, A>(b, part.clone(), which, op)?;
            if curval.is_nil() {
                has_nils = true;
            }
            for r in &mut rb[part] {
                *r = curval;
            }
        } else {
            for row in part.clone() {
                let curval = accumulate_int::<S, A>(b, frame.bounds(row, &part), which, op)?;
                if curval.is_nil() {
                    has_nils = true;
                }
                rb[row] = curval;
            }
        }
    }
    Ok(has_nils)
}

/// Nil-seeded floating product with the pre-multiply magnitude guard.
fn accumulate_float_prod<S: FloatValue>(
    b: &[S],
    range: Range<usize>,
    max: f64,
    op: &'static str,
) -> Result<Option<f64>> {
    let mut curval: Option<f64> = None;
    for &v in &b[range] {
        if v.is_nil() {
            continue;
        }
        let v = v.to_f64();
        curval = match curval {
            None => Some(v),
            Some(acc) => {
                if float_mul_would_overflow(acc, v, max) {
                    return Err(AnalyticError::Overflow { op });
                }
                Some(acc * v)
            }
        };
    }
    Ok(curval)
}

fn float_kernel<S: FloatValue, D: FloatValue>(
    b: &[S],
    rb: &mut [D],
    bounds: Option<&[i8]>,
    frame: FrameExtent,
    which: Reduce,
    identity: bool,
    max_partials: usize,
) -> Result<bool> {
    let op = which.op();
    let mut has_nils = false;
    if identity {
        for (r, &v) in rb.iter_mut().zip(b) {
            if v.is_nil() {
                *r = D::NIL;
                has_nils = true;
            } else {
                *r = D::from_f64(v.to_f64());
            }
        }
        return Ok(has_nils);
    }

    let live = |range: Range<usize>| {
        b[range]
            .iter()
            .filter(|v| !v.is_nil())
            .map(|v| v.to_f64())
    };

    for part in partition_ranges(bounds, b.len()) {
        if frame.is_unbounded() {
            let total = match which {
                Reduce::Sum => stable_sum(live(part.clone()), D::MAX_FINITE, max_partials)
                    .map_err(|_| AnalyticError::FloatSum { op })?,
                Reduce::Prod => accumulate_float_prod(b, part.clone(), D::MAX_FINITE, op)?,
            };
            let curval = match total {
                Some(t) => D::from_f64(t),
                None => {
                    has_nils = true;
                    D::NIL
                }
            };
            for r in &mut rb[part] {
                *r = curval;
            }
        } else {
            for row in part.clone() {
                let window = frame.bounds(row, &part);
                let total = match which {
                    Reduce::Sum => naive_sum(live(window)),
                    Reduce::Prod => accumulate_float_prod(b, window, D::MAX_FINITE, op)?,
                };
                rb[row] = match total {
                    Some(t) => D::from_f64(t),
                    None => {
                        has_nils = true;
                        D::NIL
                    }
                };
            }
        }
    }
    Ok(has_nils)
}
