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
//! Partition- and frame-aware analytic (window) function engine over dense
//! sentinel-coded columns: change detection, bucketing, positional
//! selection, offset access, extrema, counting, and checked numeric
//! aggregation, one sequential pass per call.

pub mod common;
pub mod engine;

// Convenience aliases, matching the BE-style folder layout.
pub use common::app_config as analytic_config;
pub use common::logging as analytic_logging;

pub use engine::{
    AnalyticError, Column, ColumnData, FrameExtent, OpaqueColumn, PhysicalType, Result,
    ScalarValue, StrColumn,
};
pub use engine::{
    avg, count, diff, first_value, lag, last_value, lead, max, min, nth_value, ntile, prod, sum,
};
