//! Configuration file parsing for `sieve.toml`.
//!
//! ```toml
//! [filters]
//! ignore_case = true
//!
//! [filters.aliases]
//! between = "Range"
//!
//! [debug]
//! log_filters = false
//!
//! [enums.Status]
//! Active = 0
//! Suspended = 1
//!
//! [schemas.users]
//! age = "int"
//! name = "text?"
//! status = "enum:Status"
//!
//! [requests.user_search]
//! schema = "users"
//! age = { operator = "between" }
//! q = { operator = "StartsWith", target = "name" }
//! ```
//!
//! Values may reference environment variables as `${NAME}`; unset variables
//! are left as written.

use std::path::Path;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::assembler::FilterAssembler;
use crate::error::{FilterError, FilterResult};
use crate::logging;
use crate::registry::FilterRegistry;
use crate::request::RequestShape;
use crate::schema::TableSchema;
use crate::value::{EnumType, FieldType};

/// Main configuration structure for `sieve.toml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SieveConfig {
    /// Filter behaviour.
    #[serde(default)]
    pub filters: FiltersConfig,

    /// Debug/logging settings.
    #[serde(default)]
    pub debug: DebugConfig,

    /// Enumerations, as member name to discriminant.
    #[serde(default)]
    pub enums: IndexMap<String, IndexMap<String, i64>>,

    /// Schemas, as field name to type string.
    #[serde(default)]
    pub schemas: IndexMap<String, IndexMap<String, String>>,

    /// Request shapes.
    #[serde(default)]
    pub requests: IndexMap<String, RequestShape>,
}

/// `[filters]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FiltersConfig {
    /// Default case handling for text operators.
    #[serde(default = "default_ignore_case")]
    pub ignore_case: bool,

    /// Extra operator names, as alias to registered name.
    #[serde(default)]
    pub aliases: IndexMap<String, String>,
}

impl Default for FiltersConfig {
    fn default() -> Self {
        Self {
            ignore_case: default_ignore_case(),
            aliases: IndexMap::new(),
        }
    }
}

fn default_ignore_case() -> bool {
    true
}

/// `[debug]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DebugConfig {
    /// Emit `sieve_debug!` events for filter assembly.
    #[serde(default)]
    pub log_filters: bool,
}

impl SieveConfig {
    /// Load configuration from a file path.
    pub fn from_file(path: impl AsRef<Path>) -> FilterResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| FilterError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Self = content.parse()?;
        debug!(
            path = %path.display(),
            schemas = config.schemas.len(),
            requests = config.requests.len(),
            "configuration loaded"
        );
        Ok(config)
    }

    /// Build a registry with the built-in operators plus configured aliases.
    pub fn registry(&self) -> FilterResult<FilterRegistry> {
        let registry = FilterRegistry::new();
        for (alias, target) in &self.filters.aliases {
            registry.alias(alias, target)?;
        }
        Ok(registry)
    }

    /// An assembler over `registry` using the configured case default.
    pub fn assembler<'r>(&self, registry: &'r FilterRegistry) -> FilterAssembler<'r> {
        FilterAssembler::new(registry).default_ignore_case(self.filters.ignore_case)
    }

    /// A configured enumeration.
    pub fn enum_type(&self, name: &str) -> Option<EnumType> {
        self.enums
            .get(name)
            .map(|members| EnumType::new(name, members.iter().map(|(k, v)| (k.clone(), *v))))
    }

    /// A configured schema.
    pub fn schema(&self, name: &str) -> FilterResult<TableSchema> {
        let fields = self
            .schemas
            .get(name)
            .ok_or_else(|| FilterError::config(format!("no schema named `{name}`")))?;

        let mut schema = TableSchema::new(name);
        for (field, ty) in fields {
            let ty = self.parse_field_type(ty).map_err(|e| {
                FilterError::config(format!("schema `{name}`, field `{field}`: {e}"))
            })?;
            schema.insert(field.clone(), ty);
        }
        Ok(schema)
    }

    /// A configured request shape.
    pub fn request_shape(&self, name: &str) -> FilterResult<&RequestShape> {
        self.requests
            .get(name)
            .ok_or_else(|| FilterError::config(format!("no request named `{name}`")))
    }

    /// Parse a field type string such as `int`, `text?` or `enum:Status`.
    pub fn parse_field_type(&self, spec: &str) -> FilterResult<FieldType> {
        let spec = spec.trim();
        if let Some(inner) = spec.strip_suffix('?') {
            return Ok(FieldType::optional(self.parse_field_type(inner)?));
        }

        Ok(match spec.to_lowercase().as_str() {
            "bool" | "boolean" => FieldType::Bool,
            "int" | "integer" => FieldType::Int,
            "float" | "double" => FieldType::Float,
            "decimal" => FieldType::Decimal,
            "text" | "string" => FieldType::Text,
            "timestamp" | "datetime" => FieldType::Timestamp,
            "uuid" => FieldType::Uuid,
            _ => {
                let Some(name) = spec.strip_prefix("enum:") else {
                    return Err(FilterError::config(format!("unknown field type `{spec}`")));
                };
                let name = name.trim();
                let ty = self
                    .enum_type(name)
                    .ok_or_else(|| FilterError::config(format!("unknown enum `{name}`")))?;
                FieldType::enumeration(ty)
            }
        })
    }

    /// Check that aliases, schemas and requests refer to things that exist.
    pub fn validate(&self) -> FilterResult<()> {
        let registry = self.registry()?;

        let mut schemas = IndexMap::new();
        for name in self.schemas.keys() {
            schemas.insert(name.as_str(), self.schema(name)?);
        }

        for (name, shape) in &self.requests {
            let schema = match &shape.schema {
                Some(schema) => Some(schemas.get(schema.as_str()).ok_or_else(|| {
                    FilterError::config(format!(
                        "request `{name}` refers to unknown schema `{schema}`"
                    ))
                })?),
                None => None,
            };

            for (field, spec) in &shape.fields {
                if !registry.contains(&spec.operator) {
                    return Err(FilterError::config(format!(
                        "request `{name}`, field `{field}`: unsupported filter type `{}`",
                        spec.operator
                    )));
                }
                let target = spec.target.as_deref().unwrap_or(field.as_str());
                if let Some(schema) = schema {
                    if !schema.fields().any(|(f, _)| f == target) {
                        return Err(FilterError::config(format!(
                            "request `{name}`, field `{field}`: schema has no field `{target}`"
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// Turn on debug logging when `[debug] log_filters` is set.
    pub fn apply_logging(&self) {
        if self.debug.log_filters {
            logging::set_debug(true);
        }
    }
}

impl FromStr for SieveConfig {
    type Err = FilterError;

    fn from_str(content: &str) -> FilterResult<Self> {
        let expanded = expand_env_vars(content)?;
        toml::from_str(&expanded).map_err(|e| FilterError::Toml { source: e })
    }
}

fn expand_env_vars(content: &str) -> FilterResult<String> {
    let re = regex_lite::Regex::new(r"\$\{([^}]+)\}")
        .map_err(|e| FilterError::config(e.to_string()))?;
    Ok(re
        .replace_all(content, |caps: &regex_lite::Captures<'_>| {
            std::env::var(caps[1].trim()).unwrap_or_else(|_| caps[0].to_string())
        })
        .into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::FieldInput;
    use crate::schema::Schema;
    use crate::FilterRequest;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"
        [filters]
        ignore_case = false

        [filters.aliases]
        between = "Range"

        [debug]
        log_filters = true

        [enums.Status]
        Active = 0
        Suspended = 1

        [schemas.users]
        age = "int"
        name = "text?"
        status = "enum:Status"

        [requests.user_search]
        schema = "users"
        age = { operator = "between" }
        q = { operator = "StartsWith", target = "name" }
    "#;

    #[test]
    fn test_parse_sample() {
        let config: SieveConfig = SAMPLE.parse().unwrap();
        assert!(!config.filters.ignore_case);
        assert!(config.debug.log_filters);
        assert_eq!(config.enums["Status"]["Suspended"], 1);

        let schema = config.schema("users").unwrap();
        assert_eq!(schema.name(), "users");
        assert_eq!(schema.field_type("name"), Some(FieldType::optional(FieldType::Text)));
        assert!(matches!(
            schema.field_type("status"),
            Some(FieldType::Enum(ty)) if ty.name() == "Status"
        ));

        config.validate().unwrap();
    }

    #[test]
    fn test_defaults() {
        let config: SieveConfig = "".parse().unwrap();
        assert!(config.filters.ignore_case);
        assert!(!config.debug.log_filters);
        assert!(config.requests.is_empty());
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let err = "[filters]\ncase = true".parse::<SieveConfig>().unwrap_err();
        assert!(matches!(err, FilterError::Toml { .. }));
    }

    #[test]
    fn test_registry_aliases() {
        let config: SieveConfig = SAMPLE.parse().unwrap();
        let registry = config.registry().unwrap();
        assert_eq!(registry.create("BETWEEN").unwrap().kind(), "Range");

        let bad: SieveConfig = "[filters.aliases]\nx = \"Nope\"".parse().unwrap();
        assert!(bad.registry().unwrap_err().is_lookup());
    }

    #[test]
    fn test_field_type_strings() {
        let config: SieveConfig = SAMPLE.parse().unwrap();
        assert_eq!(config.parse_field_type("uuid?").unwrap(), FieldType::optional(FieldType::Uuid));
        assert_eq!(config.parse_field_type(" Decimal ").unwrap(), FieldType::Decimal);
        assert!(config.parse_field_type("enum:Colour").is_err());
        assert!(config.parse_field_type("blob").is_err());
    }

    #[test]
    fn test_validate_catches_dangling_references() {
        let unknown_op = format!("{SAMPLE}\n[requests.other]\nx = {{ operator = \"Fuzzy\" }}\n");
        let config: SieveConfig = unknown_op.parse().unwrap();
        assert!(config.validate().unwrap_err().to_string().contains("Fuzzy"));

        let bad_target = format!(
            "{SAMPLE}\n[requests.other]\nschema = \"users\"\nx = {{ operator = \"Equals\" }}\n"
        );
        let config: SieveConfig = bad_target.parse().unwrap();
        assert!(config.validate().is_err());

        let bad_schema = format!("{SAMPLE}\n[requests.other]\nschema = \"orders\"\n");
        let config: SieveConfig = bad_schema.parse().unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_expansion() {
        // SAFETY: the variable name is unique to this test.
        unsafe {
            std::env::set_var("SIEVE_TEST_ALIAS_TARGET", "Equals");
        }
        let content = concat!(
            "[filters.aliases]\n",
            "is = \"${SIEVE_TEST_ALIAS_TARGET}\"\n",
            "keep = \"${SIEVE_TEST_UNSET_VAR}\"",
        );
        let config: SieveConfig = content.parse().unwrap();
        assert_eq!(config.filters.aliases["is"], "Equals");
        assert_eq!(config.filters.aliases["keep"], "${SIEVE_TEST_UNSET_VAR}");
        unsafe {
            std::env::remove_var("SIEVE_TEST_ALIAS_TARGET");
        }
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sieve.toml");
        std::fs::write(&path, SAMPLE).unwrap();

        let config = SieveConfig::from_file(&path).unwrap();
        assert!(config.requests.contains_key("user_search"));

        let err = SieveConfig::from_file(dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, FilterError::Io { .. }));
    }

    #[test]
    fn test_apply_logging_enables_debug() {
        let _guard = logging::DEBUG_FLAG_LOCK.lock();

        logging::set_debug(false);
        let quiet: SieveConfig = "[debug]\nlog_filters = false".parse().unwrap();
        quiet.apply_logging();
        if std::env::var_os("SIEVE_DEBUG").is_none() {
            assert!(!logging::is_debug_enabled());
        }

        let config: SieveConfig = SAMPLE.parse().unwrap();
        config.apply_logging();
        assert!(logging::is_debug_enabled());

        // Debug-only events fire on the assembly path.
        let registry = config.registry().unwrap();
        let request = config
            .request_shape("user_search")
            .unwrap()
            .bind_value(&serde_json::json!({ "age": { "start": 18 }, "q": "Jo" }))
            .unwrap();
        let compiled = config
            .assembler(&registry)
            .compile(Some(&request), &config.schema("users").unwrap())
            .unwrap();
        assert!(!compiled.is_always());

        logging::set_debug(false);
    }

    #[test]
    fn test_request_shape_binding() {
        let config: SieveConfig = SAMPLE.parse().unwrap();
        let shape = config.request_shape("user_search").unwrap();
        assert_eq!(shape.schema.as_deref(), Some("users"));

        let request = shape
            .bind_value(&serde_json::json!({ "age": { "start": 18 }, "q": "Jo" }))
            .unwrap();
        let fields = request.fields();
        assert_eq!(fields[1].target(), "name");
        assert_eq!(fields[1].value, Some(FieldInput::Value("Jo".into())));

        assert!(config.request_shape("missing").is_err());
    }
}
