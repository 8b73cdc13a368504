//! Linter configuration.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use akapen_text::{DEFAULT_ABBREVIATIONS, EndOfSentenceDetector, SentenceExtractor};
use jsonschema::Validator as SchemaValidator;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use crate::symbols::{SymbolOverride, SymbolTable};
use crate::validator::Severity;
use crate::LinterError;

// Embed the schema
const SCHEMA_JSON: &str = include_str!("../../../schemas/v1/config.json");
static CONFIG_SCHEMA: OnceLock<Result<SchemaValidator, String>> = OnceLock::new();

/// File names probed by [`Configuration::discover`], in order.
pub const CONFIG_FILE_NAMES: [&str; 2] = [".akapen.jsonc", ".akapen.json"];

/// Configuration for the linter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Configuration {
    /// Document language (`en`, `ja`, ...).
    #[serde(default = "default_lang")]
    pub lang: String,

    /// Language variant, e.g. `zenkaku` or `hankaku` for Japanese.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,

    /// Overrides of the language's default symbols.
    #[serde(default)]
    pub symbols: Vec<SymbolOverride>,

    /// Abbreviations whose periods never end a sentence.
    #[serde(default = "default_abbreviations")]
    pub abbreviations: Vec<String>,

    /// Validators to run, in order.
    #[serde(default)]
    pub validators: Vec<ValidatorConfig>,

    /// File patterns to include.
    #[serde(default)]
    pub include: Vec<String>,

    /// File patterns to exclude.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Whether to enable performance timings.
    #[serde(default)]
    pub timings: bool,

    /// Directory of the configuration file, if loaded from one.
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

fn default_lang() -> String {
    "en".to_string()
}

fn default_abbreviations() -> Vec<String> {
    DEFAULT_ABBREVIATIONS.iter().map(|s| s.to_string()).collect()
}

/// One configured validator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatorConfig {
    /// Validator name, with or without the `Validator` suffix.
    pub name: String,

    /// Severity attached to every error of this validator.
    #[serde(default)]
    pub level: Severity,

    /// Validator specific settings.
    #[serde(default)]
    pub properties: Map<String, Value>,
}

impl ValidatorConfig {
    /// Creates a validator entry with default severity and no properties.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            level: Severity::default(),
            properties: Map::new(),
        }
    }

    /// Sets a property.
    pub fn with_property(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.properties.insert(key.to_string(), value.into());
        self
    }

    /// Sets the severity.
    pub fn with_level(mut self, level: Severity) -> Self {
        self.level = level;
        self
    }
}

impl Configuration {
    /// Creates an empty configuration for `lang`, without validators.
    pub fn new(lang: impl Into<String>) -> Self {
        Self {
            lang: lang.into(),
            variant: None,
            symbols: Vec::new(),
            abbreviations: default_abbreviations(),
            validators: Vec::new(),
            include: Vec::new(),
            exclude: Vec::new(),
            timings: false,
            base_dir: None,
        }
    }

    /// Returns the configuration used when no file is found.
    pub fn default_for(lang: &str) -> Self {
        let mut config = Self::new(lang);
        config.validators = vec![
            ValidatorConfig::new("SentenceLength").with_property("max_len", 120),
            ValidatorConfig::new("CommaNumber"),
            ValidatorConfig::new("InvalidSymbol"),
            ValidatorConfig::new("DoubledWord"),
            ValidatorConfig::new("SectionLength").with_property("max_num", 2000),
            ValidatorConfig::new("ParagraphNumber").with_property("max_num", 6),
        ];
        if lang != "ja" {
            config.validators.push(ValidatorConfig::new("FrequentSentenceStart"));
        }
        config
    }

    /// Loads configuration from a file.
    ///
    /// Supports `.akapen.jsonc` and `.akapen.json`; comments and trailing
    /// commas are accepted in both.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LinterError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            LinterError::config(format!("Failed to read config {}: {}", path.display(), e))
        })?;

        let mut config = Self::from_json(&content)?;

        if let Some(parent) = path.parent() {
            config.base_dir = Some(parent.to_path_buf());
        }

        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parses configuration from a JSON (or JSONC) string with schema
    /// validation.
    pub fn from_json(json: &str) -> Result<Self, LinterError> {
        let value = jsonc_parser::parse_to_serde_value(json, &jsonc_parser::ParseOptions::default())
            .map_err(|e| LinterError::config(format!("Invalid JSON: {}", e)))?
            .ok_or_else(|| LinterError::config("Configuration is empty"))?;

        let schema = CONFIG_SCHEMA
            .get_or_init(|| {
                let schema_json: Value = serde_json::from_str(SCHEMA_JSON)
                    .map_err(|e| format!("Invalid embedded config schema: {}", e))?;
                SchemaValidator::new(&schema_json)
                    .map_err(|e| format!("Invalid config schema compilation: {}", e))
            })
            .as_ref()
            .map_err(|e| LinterError::config(e.clone()))?;

        if let Err(e) = schema.validate(&value) {
            let error_msg = format!("{} at {}", e, e.instance_path());
            return Err(LinterError::config(format!(
                "Config validation failed: {}",
                error_msg
            )));
        }

        serde_json::from_value(value)
            .map_err(|e| LinterError::config(format!("Invalid config: {}", e)))
    }

    /// Looks for a configuration file in `dir`.
    ///
    /// Returns `Ok(None)` when none of [`CONFIG_FILE_NAMES`] exists.
    pub fn discover(dir: impl AsRef<Path>) -> Result<Option<Self>, LinterError> {
        let dir = dir.as_ref();
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
            .map(Self::from_file)
            .transpose()
    }

    /// Builds the symbol table for the configured language.
    pub fn symbol_table(&self) -> Result<SymbolTable, LinterError> {
        Ok(SymbolTable::new(&self.lang, self.variant.as_deref())?.with_overrides(&self.symbols))
    }

    /// Builds the sentence extractor for the configured language.
    ///
    /// Lines of a Japanese paragraph are joined without a separator, other
    /// languages use a space.
    pub fn sentence_extractor(&self) -> Result<SentenceExtractor, LinterError> {
        let symbols = self.symbol_table()?;
        let detector =
            EndOfSentenceDetector::new(symbols.end_of_sentence_symbols(), &self.abbreviations)
                .with_right_quotations(symbols.right_quotations());
        let separator = if self.lang == "ja" { "" } else { " " };
        Ok(SentenceExtractor::new(detector, separator))
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::default_for("en")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_config_from_json() {
        let json = r#"{
            "lang": "en",
            "validators": [
                { "name": "SentenceLength", "properties": { "max_len": 100 } },
                { "name": "CommaNumberValidator", "level": "warning" }
            ]
        }"#;

        let config = Configuration::from_json(json).unwrap();
        assert_eq!(config.lang, "en");
        assert_eq!(config.validators.len(), 2);
        assert_eq!(config.validators[0].properties["max_len"], 100);
        assert_eq!(config.validators[1].level, Severity::Warning);
        assert_eq!(config.abbreviations, default_abbreviations());
    }

    #[test]
    fn test_config_from_jsonc_with_comments() {
        let json = r#"{
            // Japanese documents
            "lang": "ja",
            "variant": "zenkaku",
            "validators": [
                { "name": "SentenceLength" }, // trailing comma below
            ],
        }"#;

        let config = Configuration::from_json(json).unwrap();
        assert_eq!(config.lang, "ja");
        assert_eq!(config.variant.as_deref(), Some("zenkaku"));
        assert_eq!(config.validators.len(), 1);
    }

    #[test]
    fn test_config_symbols_and_abbreviations() {
        let json = r#"{
            "validators": [],
            "abbreviations": ["Fig."],
            "symbols": [
                { "name": "COMMA", "value": "、", "invalid_chars": ",", "after_space": false }
            ]
        }"#;

        let config = Configuration::from_json(json).unwrap();
        assert_eq!(config.abbreviations, vec!["Fig.".to_string()]);

        let table = config.symbol_table().unwrap();
        assert_eq!(table.comma(), "、");
    }

    #[rstest]
    #[case::missing_validators(r#"{ "lang": "en" }"#, "Config validation failed")]
    #[case::unknown_property(r#"{ "validators": [], "rules": [] }"#, "Config validation failed")]
    #[case::type_mismatch(r#"{ "validators": [], "timings": "yes" }"#, "Config validation failed")]
    #[case::invalid_level(
        r#"{ "validators": [{ "name": "SentenceLength", "level": "fatal" }] }"#,
        "Config validation failed"
    )]
    #[case::unknown_symbol(
        r#"{ "validators": [], "symbols": [{ "name": "SNOWMAN" }] }"#,
        "Config validation failed"
    )]
    #[case::broken_json(r#"{ "validators": [ "#, "Invalid JSON")]
    fn test_config_validation_errors(#[case] json: &str, #[case] expected_error_part: &str) {
        let result = Configuration::from_json(json);
        assert!(result.is_err(), "Expected error for JSON: {}", json);
        let err = result.unwrap_err();
        assert!(
            err.to_string().contains(expected_error_part),
            "Error message '{}' should contain '{}'",
            err,
            expected_error_part
        );
    }

    #[test]
    fn test_discover_prefers_jsonc() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(".akapen.json"),
            r#"{ "lang": "en", "validators": [] }"#,
        )
        .unwrap();
        fs::write(
            dir.path().join(".akapen.jsonc"),
            r#"{ "lang": "ja", "validators": [] }"#,
        )
        .unwrap();

        let config = Configuration::discover(dir.path()).unwrap().unwrap();
        assert_eq!(config.lang, "ja");
        assert_eq!(config.base_dir.as_deref(), Some(dir.path()));
    }

    #[test]
    fn test_discover_without_file() {
        let dir = tempdir().unwrap();
        assert!(Configuration::discover(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_from_file_missing() {
        let result = Configuration::from_file("/nonexistent/.akapen.json");
        assert!(matches!(result, Err(LinterError::Config(_))));
    }

    #[test]
    fn test_default_for_language() {
        let en = Configuration::default_for("en");
        assert!(en.validators.iter().any(|v| v.name == "FrequentSentenceStart"));

        let ja = Configuration::default_for("ja");
        assert!(ja.validators.iter().all(|v| v.name != "FrequentSentenceStart"));
    }

    #[test]
    fn test_sentence_extractor_by_language() {
        let en = Configuration::new("en").sentence_extractor().unwrap();
        assert_eq!(en.broken_line_separator(), " ");
        assert_eq!(en.split("Mr. Smith came. He left.").len(), 2);

        let ja = Configuration::new("ja").sentence_extractor().unwrap();
        assert_eq!(ja.broken_line_separator(), "");
        assert_eq!(ja.split("これは本です。あれは机です。").len(), 2);
    }
}
