//! Parser configuration

use serde::{Deserialize, Serialize};

/// Options controlling type validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Reject a `$filter` whose resolved type is not `Edm.Boolean`
    pub require_boolean: bool,

    /// Accept operands that match a signature only after numeric promotion
    pub type_promotion: bool,
}

impl ParserConfig {
    /// Create a configuration with custom settings
    pub fn new(require_boolean: bool, type_promotion: bool) -> Self {
        Self {
            require_boolean,
            type_promotion,
        }
    }

    /// Exact signature matches only
    pub fn strict() -> Self {
        Self {
            require_boolean: true,
            type_promotion: false,
        }
    }

    /// Accept expressions of any result type
    pub fn lenient() -> Self {
        Self {
            require_boolean: false,
            type_promotion: true,
        }
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            require_boolean: true,
            type_promotion: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_take_defaults() {
        let config: ParserConfig = serde_json::from_str(r#"{"type_promotion": false}"#).unwrap();
        assert_eq!(config, ParserConfig::strict());

        let config: ParserConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ParserConfig::default());
    }
}
