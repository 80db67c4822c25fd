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
use crate::common::app_config::config as analytic_app_config;

pub(crate) fn kernel_dispatch() -> bool {
    analytic_app_config()
        .ok()
        .map(|c| c.debug.kernel_dispatch)
        .unwrap_or(false)
}

pub(crate) fn float_sum_max_partials() -> usize {
    analytic_app_config()
        .ok()
        .map(|c| c.runtime.float_sum_max_partials)
        .unwrap_or(64)
}
