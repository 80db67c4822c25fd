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
//! Offset access: `lag` copies the value `k` rows back within the
//! partition, `lead` the value `k` rows ahead; rows without a source row
//! take the caller-supplied default.

use crate::engine::column::{Column, ColumnData, OpaqueColumn, ScalarValue, StrColumn};
use crate::engine::error::Result;
use crate::engine::numeric::FixedValue;
use crate::engine::ops::unsupported;
use crate::engine::partition::partition_ranges;

#[derive(Copy, Clone, Debug)]
pub(crate) enum Shift {
    Lag,
    Lead,
}

impl Shift {
    pub(crate) fn op(self) -> &'static str {
        match self {
            Shift::Lag => "lag",
            Shift::Lead => "lead",
        }
    }
}

/// A `None` offset nil-fills the entire result. The default value's type
/// must match the input column's; mismatches are dispatch-time failures.
pub(crate) fn compute(
    out: &mut Column,
    input: &Column,
    bounds: Option<&[i8]>,
    dir: Shift,
    offset: Option<u64>,
    default: &ScalarValue,
) -> Result<()> {
    let mismatch = || {
        unsupported(
            dir.op(),
            input.physical_type(),
            Some(default.physical_type()),
        )
    };

    let Some(k) = offset else {
        nil_fill(out);
        out.finish(true);
        return Ok(());
    };
    let k = k as usize;

    let has_nils = match (&input.data, &mut out.data) {
        (ColumnData::Bool(b), ColumnData::Bool(rb)) => {
            let ScalarValue::Bool(def) = default else {
                return Err(mismatch());
            };
            shift_fixed(b, rb, bounds, dir, k, *def)
        }
        (ColumnData::I8(b), ColumnData::I8(rb)) => {
            let ScalarValue::I8(def) = default else {
                return Err(mismatch());
            };
            shift_fixed(b, rb, bounds, dir, k, *def)
        }
        (ColumnData::I16(b), ColumnData::I16(rb)) => {
            let ScalarValue::I16(def) = default else {
                return Err(mismatch());
            };
            shift_fixed(b, rb, bounds, dir, k, *def)
        }
        (ColumnData::I32(b), ColumnData::I32(rb)) => {
            let ScalarValue::I32(def) = default else {
                return Err(mismatch());
            };
            shift_fixed(b, rb, bounds, dir, k, *def)
        }
        (ColumnData::I64(b), ColumnData::I64(rb)) => {
            let ScalarValue::I64(def) = default else {
                return Err(mismatch());
            };
            shift_fixed(b, rb, bounds, dir, k, *def)
        }
        (ColumnData::I128(b), ColumnData::I128(rb)) => {
            let ScalarValue::I128(def) = default else {
                return Err(mismatch());
            };
            shift_fixed(b, rb, bounds, dir, k, *def)
        }
        (ColumnData::F32(b), ColumnData::F32(rb)) => {
            let ScalarValue::F32(def) = default else {
                return Err(mismatch());
            };
            shift_fixed(b, rb, bounds, dir, k, *def)
        }
        (ColumnData::F64(b), ColumnData::F64(rb)) => {
            let ScalarValue::F64(def) = default else {
                return Err(mismatch());
            };
            shift_fixed(b, rb, bounds, dir, k, *def)
        }
        (ColumnData::Str(b), ColumnData::Str(rb)) => {
            let ScalarValue::Str(def) = default else {
                return Err(mismatch());
            };
            shift_str(b, rb, bounds, dir, k, def.as_deref())
        }
        (ColumnData::Opaque(b), ColumnData::Opaque(rb)) => {
            let ScalarValue::Opaque(def) = default else {
                return Err(mismatch());
            };
            shift_opaque(b, rb, bounds, dir, k, def)
        }
        _ => {
            return Err(unsupported(
                dir.op(),
                input.physical_type(),
                Some(out.physical_type()),
            ));
        }
    };
    out.finish(has_nils);
    Ok(())
}

fn nil_fill(out: &mut Column) {
    match &mut out.data {
        ColumnData::Bool(rb) | ColumnData::I8(rb) => rb.fill(i8::NIL),
        ColumnData::I16(rb) => rb.fill(i16::NIL),
        ColumnData::I32(rb) => rb.fill(i32::NIL),
        ColumnData::I64(rb) => rb.fill(i64::NIL),
        ColumnData::I128(rb) => rb.fill(i128::NIL),
        ColumnData::F32(rb) => rb.fill(f32::NIL),
        ColumnData::F64(rb) => rb.fill(f64::NIL),
        ColumnData::Str(rb) => {
            for row in 0..rb.len() {
                rb.set(row, None);
            }
        }
        ColumnData::Opaque(rb) => {
            for row in 0..rb.len() {
                rb.set_nil(row);
            }
        }
    }
}

fn shift_fixed<T: FixedValue>(
    b: &[T],
    rb: &mut [T],
    bounds: Option<&[i8]>,
    dir: Shift,
    k: usize,
    def: T,
) -> bool {
    let mut has_nils = false;
    for part in partition_ranges(bounds, b.len()) {
        let fill = k.min(part.len());
        let (fill_range, copy_range) = match dir {
            Shift::Lag => (
                part.start..part.start + fill,
                part.start + fill..part.end,
            ),
            Shift::Lead => (
                part.end - fill..part.end,
                part.start..part.end - fill,
            ),
        };
        for row in fill_range {
            rb[row] = def;
        }
        if k > 0 && fill > 0 && def.is_nil() {
            has_nils = true;
        }
        for row in copy_range {
            let v = match dir {
                Shift::Lag => b[row - k],
                Shift::Lead => b[row + k],
            };
            if v.is_nil() {
                has_nils = true;
            }
            rb[row] = v;
        }
    }
    has_nils
}

fn shift_str(
    b: &StrColumn,
    rb: &mut StrColumn,
    bounds: Option<&[i8]>,
    dir: Shift,
    k: usize,
    def: Option<&str>,
) -> bool {
    let mut has_nils = false;
    for part in partition_ranges(bounds, b.len()) {
        let fill = k.min(part.len());
        let (fill_range, copy_range) = match dir {
            Shift::Lag => (
                part.start..part.start + fill,
                part.start + fill..part.end,
            ),
            Shift::Lead => (
                part.end - fill..part.end,
                part.start..part.end - fill,
            ),
        };
        for row in fill_range {
            rb.set(row, def);
        }
        if k > 0 && fill > 0 && def.is_none() {
            has_nils = true;
        }
        for row in copy_range {
            let src = match dir {
                Shift::Lag => row - k,
                Shift::Lead => row + k,
            };
            if b.is_nil(src) {
                has_nils = true;
            }
            rb.copy_from(row, b, src);
        }
    }
    has_nils
}

fn shift_opaque(
    b: &OpaqueColumn,
    rb: &mut OpaqueColumn,
    bounds: Option<&[i8]>,
    dir: Shift,
    k: usize,
    def: &[u8],
) -> bool {
    let mut has_nils = false;
    let def_is_nil = rb.compare(def, rb.nil_atom()) == std::cmp::Ordering::Equal;
    for part in partition_ranges(bounds, b.len()) {
        let fill = k.min(part.len());
        let (fill_range, copy_range) = match dir {
            Shift::Lag => (
                part.start..part.start + fill,
                part.start + fill..part.end,
            ),
            Shift::Lead => (
                part.end - fill..part.end,
                part.start..part.end - fill,
            ),
        };
        for row in fill_range {
            rb.set(row, def);
        }
        if k > 0 && fill > 0 && def_is_nil {
            has_nils = true;
        }
        for row in copy_range {
            let src = match dir {
                Shift::Lag => row - k,
                Shift::Lead => row + k,
            };
            if b.is_nil(src) {
                has_nils = true;
            }
            rb.set(row, b.get(src));
        }
    }
    has_nils
}
