//! Construction of validators from configuration.

use std::sync::Arc;

use akapen_text::Tokenizer;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::config::ValidatorConfig;
use crate::rules::{
    CommaNumber, DoubledWord, FrequentSentenceStart, InvalidExpression, InvalidSymbol,
    ParagraphNumber, ParagraphStartWith, SectionLength, SentenceLength, WordNumber,
};
use crate::symbols::SymbolTable;
use crate::validator::Validator;
use crate::LinterError;

/// Names of the built-in validators.
pub const BUILTIN_VALIDATORS: [&str; 10] = [
    "SentenceLength",
    "CommaNumber",
    "InvalidSymbol",
    "InvalidExpression",
    "WordNumber",
    "DoubledWord",
    "SectionLength",
    "ParagraphNumber",
    "ParagraphStartWith",
    "FrequentSentenceStart",
];

/// Builds validators by name.
///
/// The symbol table and tokenizer are shared by every validator the
/// factory creates.
pub struct ValidatorFactory {
    symbols: Arc<SymbolTable>,
    tokenizer: Arc<dyn Tokenizer>,
}

impl ValidatorFactory {
    /// Creates a factory sharing `symbols` and `tokenizer` with every validator.
    pub fn new(symbols: SymbolTable, tokenizer: Arc<dyn Tokenizer>) -> Self {
        Self {
            symbols: Arc::new(symbols),
            tokenizer,
        }
    }

    /// Creates the validator described by `config`.
    ///
    /// The name may carry a trailing `Validator` suffix. Unknown names and
    /// malformed properties are configuration errors.
    pub fn create(&self, config: &ValidatorConfig) -> Result<Validator, LinterError> {
        let name = canonical_name(&config.name);
        let props = Properties::new(name, &config.properties);
        let tokenizer = Arc::clone(&self.tokenizer);

        let validator = match name {
            "SentenceLength" => {
                Validator::sentence(name, SentenceLength::new(props.usize("max_len", 30)?))
            }
            "CommaNumber" => Validator::sentence(
                name,
                CommaNumber::new(self.symbols.comma(), props.usize("max_num", 3)?),
            ),
            "InvalidSymbol" => {
                Validator::sentence(name, InvalidSymbol::new(Arc::clone(&self.symbols)))
            }
            "InvalidExpression" => {
                Validator::sentence(name, InvalidExpression::new(props.list("list")?))
            }
            "WordNumber" => {
                Validator::sentence(name, WordNumber::new(tokenizer, props.usize("max_num", 30)?))
            }
            "DoubledWord" => Validator::sentence(
                name,
                DoubledWord::new(tokenizer, self.symbols.lang(), props.list("list")?),
            ),
            "SectionLength" => {
                Validator::section(name, SectionLength::new(props.usize("max_num", 1000)?))
            }
            "ParagraphNumber" => {
                Validator::section(name, ParagraphNumber::new(props.usize("max_num", 5)?))
            }
            "ParagraphStartWith" => Validator::section(
                name,
                ParagraphStartWith::new(props.string("start_from", " ")?),
            ),
            "FrequentSentenceStart" => Validator::document(
                name,
                FrequentSentenceStart::new(
                    tokenizer,
                    props.usize("leading_word_limit", 3)?,
                    props.usize("percentage_threshold", 25)?,
                    props.usize("min_sentence_count", 5)?,
                ),
            ),
            other => {
                return Err(LinterError::config(format!(
                    "Unknown validator '{}'",
                    other
                )));
            }
        };

        debug!("Created {} validator {}", validator.kind().scope(), name);
        Ok(validator.with_severity(config.level))
    }

    /// Creates every configured validator, in order.
    pub fn create_all(&self, configs: &[ValidatorConfig]) -> Result<Vec<Validator>, LinterError> {
        let validators = configs
            .iter()
            .map(|config| self.create(config))
            .collect::<Result<Vec<_>, _>>()?;
        info!("Loaded {} validators", validators.len());
        Ok(validators)
    }
}

fn canonical_name(name: &str) -> &str {
    let name = name.trim();
    match name.strip_suffix("Validator") {
        Some(stripped) if !stripped.is_empty() => stripped,
        _ => name,
    }
}

/// Typed access to a validator's properties.
///
/// Numbers may be given as JSON numbers or numeric strings; lists as JSON
/// arrays or comma separated strings.
struct Properties<'a> {
    validator: &'a str,
    values: &'a Map<String, Value>,
}

impl<'a> Properties<'a> {
    fn new(validator: &'a str, values: &'a Map<String, Value>) -> Self {
        Self { validator, values }
    }

    fn invalid(&self, key: &str, expected: &str) -> LinterError {
        LinterError::config(format!(
            "Property '{}' of {} must be {}",
            key, self.validator, expected
        ))
    }

    fn usize(&self, key: &str, default: usize) -> Result<usize, LinterError> {
        match self.values.get(key) {
            None => Ok(default),
            Some(Value::Number(n)) => n
                .as_u64()
                .and_then(|n| usize::try_from(n).ok())
                .ok_or_else(|| self.invalid(key, "a non-negative integer")),
            Some(Value::String(s)) => s
                .trim()
                .parse()
                .map_err(|_| self.invalid(key, "a non-negative integer")),
            Some(_) => Err(self.invalid(key, "a non-negative integer")),
        }
    }

    fn string(&self, key: &str, default: &str) -> Result<String, LinterError> {
        match self.values.get(key) {
            None => Ok(default.to_string()),
            Some(Value::String(s)) => Ok(s.clone()),
            Some(_) => Err(self.invalid(key, "a string")),
        }
    }

    fn list(&self, key: &str) -> Result<Vec<String>, LinterError> {
        match self.values.get(key) {
            None => Ok(Vec::new()),
            Some(Value::String(s)) => Ok(s
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| {
                    item.as_str()
                        .map(str::to_string)
                        .ok_or_else(|| self.invalid(key, "a list of strings"))
                })
                .collect(),
            Some(_) => Err(self.invalid(key, "a list of strings")),
        }
    }
}
