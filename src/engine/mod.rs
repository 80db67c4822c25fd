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
//! Analytic window engine: one entry point per operation.
//!
//! Responsibilities:
//! - Validates argument columns and type combinations at dispatch time,
//!   before anything is written.
//! - Routes each call through the partition walker and, for frame-aware
//!   operations, the sliding-window evaluator, into the typed kernels.
//! - Finalizes the output column's nil flags on success.
//!
//! Key exported interfaces:
//! - Functions: `diff`, `ntile`, `first_value`, `last_value`, `nth_value`,
//!   `lag`, `lead`, `min`, `max`, `count`, `sum`, `prod`, `avg`.
//! - Types: `Column`, `ColumnData`, `PhysicalType`, `ScalarValue`,
//!   `FrameExtent`, `AnalyticError`.
//!
//! Current limitations:
//! - The order column is a presence-only toggle: its contents are never
//!   consulted. Callers are expected to have materialized any ordering
//!   before invoking the engine; true order-column semantics are
//!   intentionally unimplemented.
//! - One call processes one (input, output) pair fully and synchronously;
//!   cross-partition parallelism belongs to the caller.

pub mod column;
pub mod error;
pub mod frame;
pub(crate) mod numeric;
pub(crate) mod ops;
pub(crate) mod partition;

pub use column::{Column, ColumnData, OpaqueColumn, PhysicalType, ScalarValue, StrColumn};
pub use error::{AnalyticError, Result};
pub use frame::FrameExtent;

use crate::common::config;
use ops::arith::Reduce;
use ops::minmax::Extremum;
use ops::position::Pick;
use ops::shift::Shift;

fn log_dispatch(op: &'static str, input: &Column) {
    if config::kernel_dispatch() {
        tracing::debug!(
            op,
            rows = input.len(),
            src = %input.physical_type(),
            "analytic kernel dispatch"
        );
    }
}

/// Whether the call degenerates to the identity shortcut: no partitions, no
/// applied ordering, no forced order. Only the aggregating operations use
/// this.
fn preserves_input(parts: Option<&Column>, order: Option<&Column>, force_order: bool) -> bool {
    parts.is_none() && order.is_none() && !force_order
}

/// Change detection against the previous in-partition row; unchanged rows
/// copy the carry column when supplied.
pub fn diff(
    out: &mut Column,
    input: &Column,
    parts: Option<&Column>,
    carry: Option<&Column>,
) -> Result<()> {
    debug_assert_eq!(out.len(), input.len());
    log_dispatch("diff", input);
    let bounds = ops::bool_slice("diff", parts)?;
    let carry = ops::bool_slice("diff", carry)?;
    ops::diff::compute(out, input, bounds, carry)
}

/// Distributes each partition's rows over `tile` ordered buckets. Integer
/// columns only; a `None` tile yields an all-nil result. `tile` must be
/// positive.
pub fn ntile(
    out: &mut Column,
    input: &Column,
    parts: Option<&Column>,
    order: Option<&Column>,
    tile: Option<i64>,
) -> Result<()> {
    debug_assert_eq!(out.len(), input.len());
    let _ = order;
    log_dispatch("ntile", input);
    let bounds = ops::bool_slice("ntile", parts)?;
    ops::ntile::compute(out, input, bounds, tile)
}

/// Broadcasts each partition's first value to all of its rows.
pub fn first_value(
    out: &mut Column,
    input: &Column,
    parts: Option<&Column>,
    order: Option<&Column>,
) -> Result<()> {
    debug_assert_eq!(out.len(), input.len());
    let _ = order;
    log_dispatch("first_value", input);
    let bounds = ops::bool_slice("first_value", parts)?;
    ops::position::compute(out, input, bounds, Pick::First)
}

/// Broadcasts each partition's last value to all of its rows.
pub fn last_value(
    out: &mut Column,
    input: &Column,
    parts: Option<&Column>,
    order: Option<&Column>,
) -> Result<()> {
    debug_assert_eq!(out.len(), input.len());
    let _ = order;
    log_dispatch("last_value", input);
    let bounds = ops::bool_slice("last_value", parts)?;
    ops::position::compute(out, input, bounds, Pick::Last)
}

/// Broadcasts the value at 0-based offset `nth` from each partition's start;
/// offsets at or beyond the partition yield nil, a `None` offset nil-fills
/// the whole result.
pub fn nth_value(
    out: &mut Column,
    input: &Column,
    parts: Option<&Column>,
    order: Option<&Column>,
    nth: Option<u64>,
) -> Result<()> {
    debug_assert_eq!(out.len(), input.len());
    let _ = order;
    log_dispatch("nth_value", input);
    let bounds = ops::bool_slice("nth_value", parts)?;
    let pick = match nth {
        Some(n) => Pick::Nth(n),
        None => Pick::NthNone,
    };
    ops::position::compute(out, input, bounds, pick)
}

/// Copies the value `offset` rows earlier in the partition; the first
/// `offset` rows take `default`.
pub fn lag(
    out: &mut Column,
    input: &Column,
    parts: Option<&Column>,
    order: Option<&Column>,
    offset: Option<u64>,
    default: &ScalarValue,
) -> Result<()> {
    debug_assert_eq!(out.len(), input.len());
    let _ = order;
    log_dispatch("lag", input);
    let bounds = ops::bool_slice("lag", parts)?;
    ops::shift::compute(out, input, bounds, Shift::Lag, offset, default)
}

/// Copies the value `offset` rows later in the partition; the last `offset`
/// rows take `default`.
pub fn lead(
    out: &mut Column,
    input: &Column,
    parts: Option<&Column>,
    order: Option<&Column>,
    offset: Option<u64>,
    default: &ScalarValue,
) -> Result<()> {
    debug_assert_eq!(out.len(), input.len());
    let _ = order;
    log_dispatch("lead", input);
    let bounds = ops::bool_slice("lead", parts)?;
    ops::shift::compute(out, input, bounds, Shift::Lead, offset, default)
}

/// Nil-skipping minimum over the partition or the clipped frame.
pub fn min(
    out: &mut Column,
    input: &Column,
    parts: Option<&Column>,
    order: Option<&Column>,
    force_order: bool,
    frame: FrameExtent,
) -> Result<()> {
    debug_assert_eq!(out.len(), input.len());
    log_dispatch("min", input);
    let bounds = ops::bool_slice("min", parts)?;
    let identity = preserves_input(parts, order, force_order);
    ops::minmax::compute(out, input, bounds, frame, Extremum::Min, identity)
}

/// Nil-skipping maximum over the partition or the clipped frame.
pub fn max(
    out: &mut Column,
    input: &Column,
    parts: Option<&Column>,
    order: Option<&Column>,
    force_order: bool,
    frame: FrameExtent,
) -> Result<()> {
    debug_assert_eq!(out.len(), input.len());
    log_dispatch("max", input);
    let bounds = ops::bool_slice("max", parts)?;
    let identity = preserves_input(parts, order, force_order);
    ops::minmax::compute(out, input, bounds, frame, Extremum::Max, identity)
}

/// Row or non-nil-value counts into an `i64` column; the result is never
/// nil.
pub fn count(
    out: &mut Column,
    input: &Column,
    parts: Option<&Column>,
    order: Option<&Column>,
    ignore_nils: bool,
    frame: FrameExtent,
) -> Result<()> {
    debug_assert_eq!(out.len(), input.len());
    let _ = order;
    log_dispatch("count", input);
    let bounds = ops::bool_slice("count", parts)?;
    ops::count::compute(out, input, bounds, frame, ignore_nils)
}

/// Overflow-checked sum into the destination type, validated against the
/// promotion table.
pub fn sum(
    out: &mut Column,
    input: &Column,
    parts: Option<&Column>,
    order: Option<&Column>,
    force_order: bool,
    frame: FrameExtent,
) -> Result<()> {
    debug_assert_eq!(out.len(), input.len());
    log_dispatch("sum", input);
    let bounds = ops::bool_slice("sum", parts)?;
    let identity = preserves_input(parts, order, force_order);
    let max_partials = config::float_sum_max_partials();
    ops::arith::compute(out, input, bounds, frame, Reduce::Sum, identity, max_partials)
}

/// Overflow-checked product into the destination type, validated against
/// the promotion table.
pub fn prod(
    out: &mut Column,
    input: &Column,
    parts: Option<&Column>,
    order: Option<&Column>,
    force_order: bool,
    frame: FrameExtent,
) -> Result<()> {
    debug_assert_eq!(out.len(), input.len());
    log_dispatch("prod", input);
    let bounds = ops::bool_slice("prod", parts)?;
    let identity = preserves_input(parts, order, force_order);
    let max_partials = config::float_sum_max_partials();
    ops::arith::compute(out, input, bounds, frame, Reduce::Prod, identity, max_partials)
}

/// Exact-recovery average into an `f64` column.
pub fn avg(
    out: &mut Column,
    input: &Column,
    parts: Option<&Column>,
    order: Option<&Column>,
    force_order: bool,
    frame: FrameExtent,
) -> Result<()> {
    debug_assert_eq!(out.len(), input.len());
    log_dispatch("avg", input);
    let bounds = ops::bool_slice("avg", parts)?;
    let identity = preserves_input(parts, order, force_order);
    ops::avg::compute(out, input, bounds, frame, identity)
}
