//! Symbol tables.
//!
//! A [`SymbolTable`] maps each [`SymbolType`] to the character a document is
//! expected to use for it, the characters that should not be used instead,
//! and whether the symbol needs a space before or after it. Tables are built
//! once from the language defaults plus configured overrides and then shared
//! read-only by the sentence extractor and the validators.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::LinterError;

/// Kinds of symbols a table configures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SymbolType {
    Space,
    ExclamationMark,
    NumberSign,
    DollarSign,
    PercentSign,
    QuestionMark,
    Ampersand,
    LeftParenthesis,
    RightParenthesis,
    Asterisk,
    Comma,
    FullStop,
    PlusSign,
    HyphenSign,
    Slash,
    Colon,
    Semicolon,
    LessThanSign,
    EqualSign,
    GreaterThanSign,
    AtMark,
    LeftSquareBracket,
    RightSquareBracket,
    Backslash,
    CircumflexAccent,
    LowLine,
    LeftCurlyBracket,
    RightCurlyBracket,
    VerticalBar,
    Tilde,
    LeftSingleQuotationMark,
    RightSingleQuotationMark,
    LeftDoubleQuotationMark,
    RightDoubleQuotationMark,
}

impl fmt::Display for SymbolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Same spelling as the configuration file.
        let name = serde_json::to_value(self)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default();
        f.write_str(&name)
    }
}

/// Settings of one symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol {
    pub symbol_type: SymbolType,
    /// The character(s) documents should use.
    pub value: String,
    /// Characters that must not be used in place of `value`.
    pub invalid_chars: Vec<char>,
    /// A space is required before the symbol.
    pub before_space: bool,
    /// A space is required after the symbol.
    pub after_space: bool,
}

impl Symbol {
    /// Creates a symbol without spacing requirements.
    pub fn new(symbol_type: SymbolType, value: &str, invalid_chars: &str) -> Self {
        Self {
            symbol_type,
            value: value.to_string(),
            invalid_chars: invalid_chars.chars().collect(),
            before_space: false,
            after_space: false,
        }
    }
}

/// Per-symbol override read from the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolOverride {
    pub name: SymbolType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invalid_chars: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before_space: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after_space: Option<bool>,
}

/// Immutable table of symbols for one language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolTable {
    lang: String,
    symbols: BTreeMap<SymbolType, Symbol>,
}

impl SymbolTable {
    /// Builds the default table for `lang`.
    ///
    /// Japanese has two variants: `zenkaku` (the default) uses full-width
    /// marks, `hankaku` switches brackets and question/exclamation marks to
    /// their half-width forms.
    pub fn new(lang: &str, variant: Option<&str>) -> Result<Self, LinterError> {
        let defaults = match (lang, variant) {
            ("ja", None | Some("zenkaku")) => japanese_symbols(),
            ("ja", Some("hankaku")) => japanese_hankaku_symbols(),
            ("ja", Some(other)) => {
                return Err(LinterError::config(format!(
                    "Unknown variant '{}' for language 'ja'",
                    other
                )));
            }
            _ => default_symbols(),
        };

        Ok(Self {
            lang: lang.to_string(),
            symbols: defaults
                .into_iter()
                .map(|symbol| (symbol.symbol_type, symbol))
                .collect(),
        })
    }

    /// Returns a copy of the table with the given overrides applied.
    pub fn with_overrides(mut self, overrides: &[SymbolOverride]) -> Self {
        for item in overrides {
            let symbol = self
                .symbols
                .entry(item.name)
                .or_insert_with(|| Symbol::new(item.name, "", ""));
            if let Some(value) = &item.value {
                symbol.value = value.clone();
            }
            if let Some(invalid) = &item.invalid_chars {
                symbol.invalid_chars = invalid.chars().collect();
            }
            if let Some(before) = item.before_space {
                symbol.before_space = before;
            }
            if let Some(after) = item.after_space {
                symbol.after_space = after;
            }
        }
        self
    }

    /// Returns the language of the table.
    pub fn lang(&self) -> &str {
        &self.lang
    }

    /// Returns the settings of a symbol.
    pub fn get(&self, symbol_type: SymbolType) -> Option<&Symbol> {
        self.symbols.get(&symbol_type)
    }

    /// Returns the value of a symbol, or an empty string when unset.
    pub fn value(&self, symbol_type: SymbolType) -> &str {
        self.get(symbol_type).map_or("", |s| s.value.as_str())
    }

    /// Iterates over every symbol in a stable order.
    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.values()
    }

    /// Returns the symbol whose value is `value`.
    pub fn by_value(&self, value: &str) -> Option<&Symbol> {
        self.symbols.values().find(|s| s.value == value)
    }

    /// Returns the non-empty end-of-sentence symbols.
    pub fn end_of_sentence_symbols(&self) -> Vec<String> {
        [
            SymbolType::FullStop,
            SymbolType::QuestionMark,
            SymbolType::ExclamationMark,
        ]
        .into_iter()
        .map(|t| self.value(t).to_string())
        .filter(|v| !v.is_empty())
        .collect()
    }

    /// Returns the closing quotation marks that may follow a terminator.
    pub fn right_quotations(&self) -> Vec<char> {
        [
            SymbolType::RightSingleQuotationMark,
            SymbolType::RightDoubleQuotationMark,
        ]
        .into_iter()
        .flat_map(|t| self.value(t).chars())
        .collect()
    }

    /// Returns the comma.
    pub fn comma(&self) -> &str {
        self.value(SymbolType::Comma)
    }
}

fn default_symbols() -> Vec<Symbol> {
    use SymbolType::*;
    vec![
        Symbol::new(Space, " ", ""),
        Symbol::new(ExclamationMark, "!", "！"),
        Symbol::new(NumberSign, "#", "＃"),
        Symbol::new(DollarSign, "$", "＄"),
        Symbol::new(PercentSign, "%", "％"),
        Symbol::new(QuestionMark, "?", "？"),
        Symbol::new(Ampersand, "&", "＆"),
        Symbol::new(LeftParenthesis, "(", "（"),
        Symbol::new(RightParenthesis, ")", "）"),
        Symbol::new(Asterisk, "*", "＊"),
        Symbol::new(Comma, ",", "，、"),
        Symbol::new(FullStop, ".", "．。"),
        Symbol::new(PlusSign, "+", "＋"),
        Symbol::new(HyphenSign, "-", "ー"),
        Symbol::new(Slash, "/", "／"),
        Symbol::new(Colon, ":", "："),
        Symbol::new(Semicolon, ";", "；"),
        Symbol::new(LessThanSign, "<", "＜"),
        Symbol::new(EqualSign, "=", "＝"),
        Symbol::new(GreaterThanSign, ">", "＞"),
        Symbol::new(AtMark, "@", "＠"),
        Symbol::new(LeftSquareBracket, "[", ""),
        Symbol::new(RightSquareBracket, "]", ""),
        Symbol::new(Backslash, "\\", ""),
        Symbol::new(CircumflexAccent, "^", ""),
        Symbol::new(LowLine, "_", ""),
        Symbol::new(LeftCurlyBracket, "{", "｛"),
        Symbol::new(RightCurlyBracket, "}", "｝"),
        Symbol::new(VerticalBar, "|", "｜"),
        Symbol::new(Tilde, "~", "〜"),
        Symbol::new(LeftSingleQuotationMark, "'", ""),
        Symbol::new(RightSingleQuotationMark, "'", ""),
        Symbol::new(LeftDoubleQuotationMark, "\"", ""),
        Symbol::new(RightDoubleQuotationMark, "\"", ""),
    ]
}

fn japanese_symbols() -> Vec<Symbol> {
    use SymbolType::*;
    vec![
        Symbol::new(Space, "　", ""),
        Symbol::new(ExclamationMark, "！", "!"),
        Symbol::new(NumberSign, "＃", "#"),
        Symbol::new(DollarSign, "＄", "$"),
        Symbol::new(PercentSign, "％", "%"),
        Symbol::new(QuestionMark, "？", "?"),
        Symbol::new(Ampersand, "＆", "&"),
        Symbol::new(LeftParenthesis, "（", "("),
        Symbol::new(RightParenthesis, "）", ")"),
        Symbol::new(Asterisk, "＊", "*"),
        Symbol::new(Comma, "、", ",，"),
        Symbol::new(FullStop, "。", ".．"),
        Symbol::new(PlusSign, "＋", "+"),
        Symbol::new(HyphenSign, "ー", "-"),
        Symbol::new(Slash, "／", "/"),
        Symbol::new(Colon, "：", ":"),
        Symbol::new(Semicolon, "；", ";"),
        Symbol::new(LessThanSign, "＜", "<"),
        Symbol::new(EqualSign, "＝", "="),
        Symbol::new(GreaterThanSign, "＞", ">"),
        Symbol::new(AtMark, "＠", "@"),
        Symbol::new(LeftSquareBracket, "「", ""),
        Symbol::new(RightSquareBracket, "」", ""),
        Symbol::new(Backslash, "¥", ""),
        Symbol::new(CircumflexAccent, "＾", "^"),
        Symbol::new(LowLine, "＿", "_"),
        Symbol::new(LeftCurlyBracket, "｛", "{"),
        Symbol::new(RightCurlyBracket, "｝", "}"),
        Symbol::new(VerticalBar, "｜", "|"),
        Symbol::new(Tilde, "〜", "~"),
        Symbol::new(LeftSingleQuotationMark, "‘", ""),
        Symbol::new(RightSingleQuotationMark, "’", ""),
        Symbol::new(LeftDoubleQuotationMark, "“", ""),
        Symbol::new(RightDoubleQuotationMark, "”", ""),
    ]
}

fn japanese_hankaku_symbols() -> Vec<Symbol> {
    use SymbolType::*;
    let hankaku = [
        Symbol::new(ExclamationMark, "!", "！"),
        Symbol::new(QuestionMark, "?", "？"),
        Symbol::new(LeftParenthesis, "(", "（"),
        Symbol::new(RightParenthesis, ")", "）"),
        Symbol::new(Colon, ":", "："),
        Symbol::new(Semicolon, ";", "；"),
    ];

    japanese_symbols()
        .into_iter()
        .map(|symbol| {
            hankaku
                .iter()
                .find(|h| h.symbol_type == symbol.symbol_type)
                .cloned()
                .unwrap_or(symbol)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case::english("en", None, ".", ",")]
    #[case::japanese("ja", None, "。", "、")]
    #[case::japanese_hankaku("ja", Some("hankaku"), "。", "、")]
    fn test_language_defaults(
        #[case] lang: &str,
        #[case] variant: Option<&str>,
        #[case] full_stop: &str,
        #[case] comma: &str,
    ) {
        let table = SymbolTable::new(lang, variant).unwrap();
        assert_eq!(table.value(SymbolType::FullStop), full_stop);
        assert_eq!(table.comma(), comma);
        assert_eq!(table.lang(), lang);
    }

    #[test]
    fn test_hankaku_question_mark() {
        let table = SymbolTable::new("ja", Some("hankaku")).unwrap();
        assert_eq!(table.value(SymbolType::QuestionMark), "?");
        assert_eq!(table.get(SymbolType::QuestionMark).unwrap().invalid_chars, vec!['？']);
    }

    #[test]
    fn test_unknown_variant_is_config_error() {
        let result = SymbolTable::new("ja", Some("katakana"));
        assert!(matches!(result, Err(LinterError::Config(_))));
    }

    #[test]
    fn test_overrides() {
        let table = SymbolTable::new("en", None).unwrap().with_overrides(&[SymbolOverride {
            name: SymbolType::Comma,
            value: Some("、".to_string()),
            invalid_chars: Some(",".to_string()),
            before_space: None,
            after_space: Some(true),
        }]);

        let comma = table.get(SymbolType::Comma).unwrap();
        assert_eq!(comma.value, "、");
        assert_eq!(comma.invalid_chars, vec![',']);
        assert!(comma.after_space);
        assert!(!comma.before_space);
        assert_eq!(table.by_value("、").map(|s| s.symbol_type), Some(SymbolType::Comma));
    }

    #[test]
    fn test_end_of_sentence_symbols() {
        let table = SymbolTable::new("en", None).unwrap();
        assert_eq!(table.end_of_sentence_symbols(), vec![".", "?", "!"]);
        assert_eq!(table.right_quotations(), vec!['\'', '"']);
    }

    #[test]
    fn test_symbol_type_display() {
        assert_eq!(SymbolType::FullStop.to_string(), "FULL_STOP");
        assert_eq!(SymbolType::LeftParenthesis.to_string(), "LEFT_PARENTHESIS");
    }
}
