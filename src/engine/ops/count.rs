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
//! Row and value counting. Counting all rows never inspects values (window
//! arithmetic only); counting non-nil values walks the column with a
//! type-specialized nil test: a byte-level sentinel probe for the string
//! heap, the opaque comparator otherwise. The result is always non-nil.

use std::ops::Range;

use crate::engine::column::{Column, ColumnData, StrColumn, STR_NIL_BYTE};
use crate::engine::error::Result;
use crate::engine::frame::FrameExtent;
use crate::engine::numeric::FixedValue;
use crate::engine::ops::unsupported;
use crate::engine::partition::partition_ranges;

pub(crate) fn compute(
    out: &mut Column,
    input: &Column,
    bounds: Option<&[i8]>,
    frame: FrameExtent,
    ignore_nils: bool,
) -> Result<()> {
    let len = input.len();
    let ColumnData::I64(rb) = &mut out.data else {
        return Err(unsupported(
            "count",
            input.physical_type(),
            Some(out.physical_type()),
        ));
    };

    if !ignore_nils || input.nonil() {
        count_rows(rb, len, bounds, frame);
    } else {
        match &input.data {
            ColumnData::Bool(b) | ColumnData::I8(b) => {
                count_values(rb, len, bounds, frame, |row| !b[row].is_nil())
            }
            ColumnData::I16(b) => count_values(rb, len, bounds, frame, |row| !b[row].is_nil()),
            ColumnData::I32(b) => count_values(rb, len, bounds, frame, |row| !b[row].is_nil()),
            ColumnData::I64(b) => count_values(rb, len, bounds, frame, |row| !b[row].is_nil()),
            ColumnData::I128(b) => count_values(rb, len, bounds, frame, |row| !b[row].is_nil()),
            ColumnData::F32(b) => count_values(rb, len, bounds, frame, |row| !b[row].is_nil()),
            ColumnData::F64(b) => count_values(rb, len, bounds, frame, |row| !b[row].is_nil()),
            ColumnData::Str(b) => count_str(rb, b, bounds, frame),
            ColumnData::Opaque(b) => {
                count_values(rb, len, bounds, frame, |row| !b.is_nil(row))
            }
        }
    }
    out.finish(false);
    Ok(())
}

/// Count-all mode: window sizes fall out of the clipped bounds directly.
fn count_rows(rb: &mut [i64], len: usize, bounds: Option<&[i8]>, frame: FrameExtent) {
    for part in partition_ranges(bounds, len) {
        if frame.is_unbounded() {
            let n = part.len() as i64;
            for r in &mut rb[part] {
                *r = n;
            }
        } else {
            for row in part.clone() {
                rb[row] = frame.bounds(row, &part).len() as i64;
            }
        }
    }
}

fn count_values<F>(rb: &mut [i64], len: usize, bounds: Option<&[i8]>, frame: FrameExtent, live: F)
where
    F: Fn(usize) -> bool,
{
    let tally = |range: Range<usize>| range.filter(|row| live(*row)).count() as i64;
    for part in partition_ranges(bounds, len) {
        if frame.is_unbounded() {
            let n = tally(part.clone());
            for r in &mut rb[part] {
                *r = n;
            }
        } else {
            for row in part.clone() {
                rb[row] = tally(frame.bounds(row, &part));
            }
        }
    }
}

/// In-place variable-width nil test: the entry's first heap byte.
fn count_str(rb: &mut [i64], b: &StrColumn, bounds: Option<&[i8]>, frame: FrameExtent) {
    let heap = b.heap();
    let offsets = b.offsets();
    count_values(rb, offsets.len(), bounds, frame, |row| {
        heap[offsets[row] as usize] != STR_NIL_BYTE
    })
}
