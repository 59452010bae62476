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

//! Cluster template rendering.
//!
//! Templates are YAML documents with minijinja expressions:
//!
//! - `{{ name }}` is always the cluster name given on the command line
//! - `{{ lookup("core", 1) }}` resolves `core` from the command-line
//!   variables, then from `EMR_VAR_CORE`, then falls back to `1`
//! - `{{ env("USER") }}` reads an environment variable (empty when unset)

use crate::domain::config::spec::ClusterSpec;
use crate::infrastructure::constants::{ENV_VAR_PREFIX, TEMPLATE_NAME_VAR};
use crate::shared::error::{EmrError, Result};
use minijinja::{Environment, UndefinedBehavior, Value};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

type EnvLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

#[derive(Clone)]
pub struct ConfigRenderer {
    env_lookup: EnvLookup,
}

impl Default for ConfigRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ConfigRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigRenderer").finish_non_exhaustive()
    }
}

impl ConfigRenderer {
    /// Renderer reading fallbacks from the process environment
    pub fn new() -> Self {
        Self::with_env_lookup(|key| std::env::var(key).ok())
    }

    /// Renderer with a custom environment source
    pub fn with_env_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            env_lookup: Arc::new(lookup),
        }
    }

    /// Resolve a template variable: explicit override first, then the
    /// `EMR_VAR_<KEY>` environment variable.
    pub fn resolve(&self, vars: &BTreeMap<String, String>, key: &str) -> Option<String> {
        resolve_with(&self.env_lookup, vars, key)
    }

    /// Load, render and parse a cluster template
    pub fn load(
        &self,
        path: &Path,
        cluster_name: &str,
        vars: &BTreeMap<String, String>,
    ) -> Result<ClusterSpec> {
        let source = std::fs::read_to_string(path).map_err(|e| {
            EmrError::config_error(format!(
                "Failed to read cluster configuration {}: {}",
                path.display(),
                e
            ))
        })?;

        let rendered = self.render_str(&source, cluster_name, vars).map_err(|e| {
            EmrError::config_error(format!("Failed to render {}: {}", path.display(), e))
        })?;
        debug!(path = %path.display(), "rendered cluster configuration");

        let mut spec = ClusterSpec::from_yaml(&rendered).map_err(|e| {
            EmrError::config_error(format!(
                "Failed to parse rendered {}: {}",
                path.display(),
                e
            ))
        })?;

        if spec.name.is_empty() {
            spec.name = cluster_name.to_string();
        }

        Ok(spec)
    }

    /// Render template source into YAML text
    pub fn render_str(
        &self,
        source: &str,
        cluster_name: &str,
        vars: &BTreeMap<String, String>,
    ) -> std::result::Result<String, minijinja::Error> {
        let mut context = vars.clone();
        context.insert(TEMPLATE_NAME_VAR.to_string(), cluster_name.to_string());

        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);

        let lookup_vars = context.clone();
        let lookup_env = self.env_lookup.clone();
        env.add_function(
            "lookup",
            move |key: String, default: Option<Value>| -> Value {
                match resolve_with(&lookup_env, &lookup_vars, &key) {
                    Some(value) => Value::from(value),
                    None => default.unwrap_or(Value::UNDEFINED),
                }
            },
        );

        let env_source = self.env_lookup.clone();
        env.add_function("env", move |var: String| -> String {
            env_source(&var).unwrap_or_default()
        });

        env.render_str(source, &context)
    }
}

fn resolve_with(
    env_lookup: &EnvLookup,
    vars: &BTreeMap<String, String>,
    key: &str,
) -> Option<String> {
    if let Some(value) = vars.get(key) {
        return Some(value.clone());
    }
    env_lookup(&format!("{}{}", ENV_VAR_PREFIX, key.to_uppercase()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn renderer_with(env: &[(&str, &str)]) -> ConfigRenderer {
        let env: HashMap<String, String> = env
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ConfigRenderer::with_env_lookup(move |key| env.get(key).cloned())
    }

    fn vars(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_override_beats_env_beats_default() {
        let renderer = renderer_with(&[("EMR_VAR_CORE", "3")]);
        let template = r#"{{ lookup("core", 1) }}"#;

        let out = renderer
            .render_str(template, "c", &vars(&[("core", "5")]))
            .unwrap();
        assert_eq!(out, "5");

        let out = renderer.render_str(template, "c", &vars(&[])).unwrap();
        assert_eq!(out, "3");

        let out = renderer_with(&[])
            .render_str(template, "c", &vars(&[]))
            .unwrap();
        assert_eq!(out, "1");
    }

    #[test]
    fn test_env_fallback_uses_uppercased_key() {
        let renderer = renderer_with(&[("EMR_VAR_INSTANCE_TYPE", "r5.2xlarge")]);
        assert_eq!(
            renderer.resolve(&vars(&[]), "instance_type").as_deref(),
            Some("r5.2xlarge")
        );
        assert_eq!(renderer.resolve(&vars(&[]), "missing"), None);
    }

    #[test]
    fn test_name_is_reserved() {
        let renderer = renderer_with(&[]);
        let out = renderer
            .render_str(
                r#"{{ name }}/{{ lookup("name", "x") }}"#,
                "test-cluster",
                &vars(&[("name", "other")]),
            )
            .unwrap();
        assert_eq!(out, "test-cluster/test-cluster");
    }

    #[test]
    fn test_env_function_reads_environment() {
        let renderer = renderer_with(&[("USER", "hadoop")]);
        let out = renderer
            .render_str(r#"{{ env("USER") }}-{{ env("UNSET") }}"#, "c", &vars(&[]))
            .unwrap();
        assert_eq!(out, "hadoop-");
    }

    #[test]
    fn test_lookup_without_default_fails() {
        let renderer = renderer_with(&[]);
        assert!(renderer
            .render_str(r#"{{ lookup("subnet") }}"#, "c", &vars(&[]))
            .is_err());
    }

    #[test]
    fn test_syntax_error() {
        let renderer = renderer_with(&[]);
        assert!(renderer.render_str("{{ lookup(", "c", &vars(&[])).is_err());
    }

    #[test]
    fn test_load_fills_missing_name() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "ReleaseLabel: emr-6.15.0\nInstances:\n  InstanceGroups:\n    - Name: master\n      InstanceRole: MASTER\n      InstanceType: m5.xlarge\n      InstanceCount: {{{{ lookup(\"master\", 1) }}}}"
        )
        .unwrap();

        let spec = renderer_with(&[])
            .load(file.path(), "analytics", &vars(&[]))
            .unwrap();
        assert_eq!(spec.name, "analytics");
        assert_eq!(spec.instances.instance_groups[0].instance_count, 1);
    }

    #[test]
    fn test_load_missing_file() {
        let err = renderer_with(&[])
            .load(Path::new("/nonexistent/cluster.yml"), "c", &vars(&[]))
            .unwrap_err();
        assert!(matches!(err, EmrError::ConfigError(_)));
        assert!(err.to_string().contains("/nonexistent/cluster.yml"));
    }

    #[test]
    fn test_load_structural_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Instances: {{{{ name }}}}").unwrap();

        let err = renderer_with(&[])
            .load(file.path(), "c", &vars(&[]))
            .unwrap_err();
        assert!(matches!(err, EmrError::ConfigError(_)));
    }
}
