//! Configuration for the search engine.

use serde::{Deserialize, Serialize};

use crate::error::{QuiverError, Result};

fn default_take() -> usize {
    10
}

fn default_max_take() -> usize {
    1000
}

fn default_path_ids_field() -> String {
    "PathIds".to_string()
}

fn default_case_insensitive_variants() -> bool {
    true
}

/// Engine-wide settings shared by the document store and the searcher.
///
/// # Example
///
/// ```
/// use quiver::config::EngineConfig;
///
/// let config = EngineConfig::builder()
///     .default_take(25)
///     .path_ids_field("AncestorIds")
///     .build()
///     .unwrap();
///
/// assert_eq!(config.default_take, 25);
/// assert_eq!(config.path_ids_field, "AncestorIds");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Page size used when a search request does not specify `take`.
    #[serde(default = "default_take")]
    pub default_take: usize,

    /// Upper bound for `take`. Larger requests are clamped.
    #[serde(default = "default_max_take")]
    pub max_take: usize,

    /// Keyword field holding the ancestor id trail used by cascading delete.
    #[serde(default = "default_path_ids_field")]
    pub path_ids_field: String,

    /// Compare culture and segment names ignoring ASCII case.
    #[serde(default = "default_case_insensitive_variants")]
    pub case_insensitive_variants: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            default_take: default_take(),
            max_take: default_max_take(),
            path_ids_field: default_path_ids_field(),
            case_insensitive_variants: default_case_insensitive_variants(),
        }
    }
}

impl EngineConfig {
    /// Create a new builder for EngineConfig.
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::new()
    }

    /// Load a configuration from JSON. Missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration for values the engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.max_take == 0 {
            return Err(QuiverError::invalid_argument("max_take must be at least 1"));
        }
        if self.default_take == 0 {
            return Err(QuiverError::invalid_argument(
                "default_take must be at least 1",
            ));
        }
        if self.path_ids_field.trim().is_empty() {
            return Err(QuiverError::invalid_argument(
                "path_ids_field must not be empty",
            ));
        }
        Ok(())
    }

    /// Resolve the effective page size for a request.
    pub fn effective_take(&self, requested: Option<usize>) -> usize {
        requested.unwrap_or(self.default_take).min(self.max_take)
    }

    /// Compare two culture or segment names under this configuration.
    pub fn variant_eq(&self, left: &str, right: &str) -> bool {
        if self.case_insensitive_variants {
            left.eq_ignore_ascii_case(right)
        } else {
            left == right
        }
    }
}

/// Builder for EngineConfig.
///
/// Any unset values use the defaults of [`EngineConfig::default`].
#[derive(Debug, Default)]
pub struct EngineConfigBuilder {
    default_take: Option<usize>,
    max_take: Option<usize>,
    path_ids_field: Option<String>,
    case_insensitive_variants: Option<bool>,
}

impl EngineConfigBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page size used when a request omits `take`.
    /// Default: 10
    pub fn default_take(mut self, take: usize) -> Self {
        self.default_take = Some(take);
        self
    }

    /// Set the largest page a single request may return.
    /// Default: 1000
    pub fn max_take(mut self, max: usize) -> Self {
        self.max_take = Some(max);
        self
    }

    /// Set the keyword field consulted by cascading delete.
    /// Default: "PathIds"
    pub fn path_ids_field(mut self, field: impl Into<String>) -> Self {
        self.path_ids_field = Some(field.into());
        self
    }

    /// Enable or disable case-insensitive culture/segment comparison.
    /// Default: true
    pub fn case_insensitive_variants(mut self, enabled: bool) -> Self {
        self.case_insensitive_variants = Some(enabled);
        self
    }

    /// Build and validate the configuration.
    pub fn build(self) -> Result<EngineConfig> {
        let mut config = EngineConfig::default();

        if let Some(take) = self.default_take {
            config.default_take = take;
        }
        if let Some(max) = self.max_take {
            config.max_take = max;
        }
        if let Some(field) = self.path_ids_field {
            config.path_ids_field = field;
        }
        if let Some(enabled) = self.case_insensitive_variants {
            config.case_insensitive_variants = enabled;
        }

        config.validate()?;
        Ok(config)
    }
}
