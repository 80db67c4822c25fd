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
//! Window extrema.
//!
//! Two regimes: whole-partition scan-and-broadcast for the `(0, 0)` frame,
//! and a per-row from-scratch rescan of the clipped window otherwise. With
//! no partition column, no order column, and no forced order the operation
//! degenerates to an identity copy of the input.

use std::cmp::Ordering;
use std::ops::Range;

use crate::engine::column::{Column, ColumnData, OpaqueColumn, StrColumn};
use crate::engine::error::Result;
use crate::engine::frame::FrameExtent;
use crate::engine::numeric::FixedValue;
use crate::engine::ops::unsupported;
use crate::engine::partition::partition_ranges;

#[derive(Copy, Clone, Debug)]
pub(crate) enum Extremum {
    Min,
    Max,
}

impl Extremum {
    pub(crate) fn op(self) -> &'static str {
        match self {
            Extremum::Min => "min",
            Extremum::Max => "max",
        }
    }

    fn prefers(self, ord: Ordering) -> bool {
        match self {
            Extremum::Min => ord == Ordering::Less,
            Extremum::Max => ord == Ordering::Greater,
        }
    }
}

pub(crate) fn compute(
    out: &mut Column,
    input: &Column,
    bounds: Option<&[i8]>,
    frame: FrameExtent,
    which: Extremum,
    identity: bool,
) -> Result<()> {
    let has_nils = match (&input.data, &mut out.data) {
        (ColumnData::Bool(b), ColumnData::Bool(rb))
        | (ColumnData::I8(b), ColumnData::I8(rb)) => {
            minmax_fixed(b, rb, bounds, frame, which, identity)
        }
        (ColumnData::I16(b), ColumnData::I16(rb)) => {
            minmax_fixed(b, rb, bounds, frame, which, identity)
        }
        (ColumnData::I32(b), ColumnData::I32(rb)) => {
            minmax_fixed(b, rb, bounds, frame, which, identity)
        }
        (ColumnData::I64(b), ColumnData::I64(rb)) => {
            minmax_fixed(b, rb, bounds, frame, which, identity)
        }
        (ColumnData::I128(b), ColumnData::I128(rb)) => {
            minmax_fixed(b, rb, bounds, frame, which, identity)
        }
        (ColumnData::F32(b), ColumnData::F32(rb)) => {
            minmax_fixed(b, rb, bounds, frame, which, identity)
        }
        (ColumnData::F64(b), ColumnData::F64(rb)) => {
            minmax_fixed(b, rb, bounds, frame, which, identity)
        }
        (ColumnData::Str(b), ColumnData::Str(rb)) => {
            minmax_str(b, rb, bounds, frame, which, identity)
        }
        (ColumnData::Opaque(b), ColumnData::Opaque(rb)) => {
            minmax_opaque(b, rb, bounds, frame, which, identity)
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

/// Nil-skipping extremum of a non-empty range. The first value seeds the
/// candidate (nil included); later non-nil values replace a nil candidate or
/// a strictly less extreme one, so ties keep the earlier value.
fn extremum_fixed<T: FixedValue>(b: &[T], range: Range<usize>, which: Extremum) -> T {
    let mut curval = b[range.start];
    for &v in &b[range.start + 1..range.end] {
        if !v.is_nil() {
            if curval.is_nil() || which.prefers(v.partial_cmp(&curval).unwrap_or(Ordering::Equal))
            {
                curval = v;
            }
        }
    }
    curval
}

fn minmax_fixed<T: FixedValue>(
    b: &[T],
    rb: &mut [T],
    bounds: Option<&[i8]>,
    frame: FrameExtent,
    which: Extremum,
    identity: bool,
) -> bool {
    let mut has_nils = false;
    if identity {
        for (r, &v) in rb.iter_mut().zip(b) {
            if v.is_nil() {
                has_nils = true;
            }
            *r = v;
        }
        return has_nils;
    }
    for part in partition_ranges(bounds, b.len()) {
        if frame.is_unbounded() {
            let curval = extremum_fixed(b, part.clone(), which);
            if curval.is_nil() {
                has_nils = true;
            }
            for r in &mut rb[part] {
                *r = curval;
            }
        } else {
            for row in part.clone() {
                let curval = extremum_fixed(b, frame.bounds(row, &part), which);
                if curval.is_nil() {
                    has_nils = true;
                }
                rb[row] = curval;
            }
        }
    }
    has_nils
}

fn extremum_str(b: &StrColumn, range: Range<usize>, which: Extremum) -> Option<usize> {
    let mut cur = range.start;
    for row in range.start + 1..range.end {
        if !b.is_nil(row) {
            if b.is_nil(cur) {
                cur = row;
            } else if which.prefers(b.get(row).cmp(&b.get(cur))) {
                cur = row;
            }
        }
    }
    (!b.is_nil(cur)).then_some(cur)
}

fn minmax_str(
    b: &StrColumn,
    rb: &mut StrColumn,
    bounds: Option<&[i8]>,
    frame: FrameExtent,
    which: Extremum,
    identity: bool,
) -> bool {
    let mut has_nils = false;
    if identity {
        for row in 0..b.len() {
            if b.is_nil(row) {
                has_nils = true;
            }
            rb.copy_from(row, b, row);
        }
        return has_nils;
    }
    for part in partition_ranges(bounds, b.len()) {
        if frame.is_unbounded() {
            let best = extremum_str(b, part.clone(), which);
            if best.is_none() {
                has_nils = true;
            }
            for row in part {
                match best {
                    Some(src) => rb.copy_from(row, b, src),
                    None => rb.set(row, None),
                }
            }
        } else {
            for row in part.clone() {
                match extremum_str(b, frame.bounds(row, &part), which) {
                    Some(src) => rb.copy_from(row, b, src),
                    None => {
                        has_nils = true;
                        rb.set(row, None);
                    }
                }
            }
        }
    }
    has_nils
}

fn extremum_opaque(b: &OpaqueColumn, range: Range<usize>, which: Extremum) -> Option<usize> {
    let mut cur = range.start;
    for row in range.start + 1..range.end {
        if !b.is_nil(row) {
            if b.is_nil(cur) {
                cur = row;
            } else if which.prefers(b.compare(b.get(row), b.get(cur))) {
                cur = row;
            }
        }
    }
    (!b.is_nil(cur)).then_some(cur)
}

fn minmax_opaque(
    b: &OpaqueColumn,
    rb: &mut OpaqueColumn,
    bounds: Option<&[i8]>,
    frame: FrameExtent,
    which: Extremum,
    identity: bool,
) -> bool {
    let mut has_nils = false;
    if identity {
        for row in 0..b.len() {
            if b.is_nil(row) {
                has_nils = true;
            }
            rb.set(row, b.get(row));
        }
        return has_nils;
    }
    for part in partition_ranges(bounds, b.len()) {
        if frame.is_unbounded() {
            let best = extremum_opaque(b, part.clone(), which);
            if best.is_none() {
                has_nils = true;
            }
            for row in part {
                match best {
                    Some(src) => rb.set(row, b.get(src)),
                    None => rb.set_nil(row),
                }
            }
        } else {
            for row in part.clone() {
                match extremum_opaque(b, frame.bounds(row, &part), which) {
                    Some(src) => rb.set(row, b.get(src)),
                    None => {
                        has_nils = true;
                        rb.set_nil(row);
                    }
                }
            }
        }
    }
    has_nils
}
