// Copyright 2025 JiangLong.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::collections::BTreeMap;

/// Parse `KEY=VALUE` and bare `KEY` arguments into a map.
///
/// A bare key maps to an empty value, empty keys are skipped and a repeated
/// key keeps the last value. Used for template variables and for `-o` ssh
/// options alike.
pub fn parse_variables<S: AsRef<str>>(args: &[S]) -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();

    for arg in args {
        let mut parts = arg.as_ref().splitn(2, '=');
        let key = parts.next().unwrap_or_default();
        if key.is_empty() {
            continue;
        }
        let value = parts.next().unwrap_or_default();
        map.insert(key.to_string(), value.to_string());
    }

    map
}
