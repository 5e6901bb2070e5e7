use serde::{Deserialize, Serialize};

/// ISO 4217 currency representation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CurrencyCode(pub String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::new("RUB")
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum NegativeStyle {
    Sign,
    Parentheses,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SymbolPosition {
    Prefix,
    Suffix,
}

/// Locale-aware formatting preferences.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocaleConfig {
    pub language_tag: String,
    pub decimal_separator: char,
    pub grouping_separator: char,
    pub symbol_position: SymbolPosition,
    pub negative_style: NegativeStyle,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self::for_tag("ru-RU")
    }
}

impl LocaleConfig {
    /// Formatting conventions for a BCP 47 tag; unknown tags fall back to `en-US` rules.
    ///
    /// The `-u-cf-account` extension selects accounting negatives, `(1 250,00 ₽)`.
    pub fn for_tag(tag: &str) -> Self {
        let language = tag
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        let (decimal_separator, grouping_separator, symbol_position) = match language.as_str() {
            "ru" | "uk" | "be" | "kk" | "fr" => (',', ' ', SymbolPosition::Suffix),
            "de" | "es" | "it" | "pt" => (',', '.', SymbolPosition::Suffix),
            _ => ('.', ',', SymbolPosition::Prefix),
        };
        Self {
            language_tag: tag.to_string(),
            decimal_separator,
            grouping_separator,
            symbol_position,
            negative_style: if tag.to_ascii_lowercase().contains("-u-cf-account") {
                NegativeStyle::Parentheses
            } else {
                NegativeStyle::Sign
            },
        }
    }
}

pub fn symbol_for(code: &str) -> String {
    match code {
        "RUB" => "₽".into(),
        "USD" => "$".into(),
        "EUR" => "€".into(),
        "GBP" => "£".into(),
        "JPY" => "¥".into(),
        "KZT" => "₸".into(),
        _ => code.into(),
    }
}

pub fn minor_units_for(code: &str) -> u8 {
    match code {
        "JPY" => 0,
        "KWD" | "BHD" => 3,
        _ => 2,
    }
}

pub fn format_number(locale: &LocaleConfig, value: f64, precision: u8) -> String {
    let body = format!("{:.*}", precision as usize, value);
    let (int_part, fraction) = match body.split_once('.') {
        Some((int_part, fraction)) => (int_part, Some(fraction)),
        None => (body.as_str(), None),
    };
    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", int_part),
    };
    let mut out = format!("{}{}", sign, group_digits(digits, locale.grouping_separator));
    if let Some(fraction) = fraction {
        out.push(locale.decimal_separator);
        out.push_str(fraction);
    }
    out
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::new();
    for (count, ch) in digits.chars().rev().enumerate() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, separator);
        }
        grouped.insert(0, ch);
    }
    grouped
}

/// Renders an amount with the currency symbol placed and signed per `locale`.
pub fn format_amount(amount: f64, code: &CurrencyCode, locale: &LocaleConfig) -> String {
    let precision = minor_units_for(code.as_str());
    let body = format_number(locale, amount.abs(), precision);
    let symbol = symbol_for(code.as_str());
    let unsigned = match locale.symbol_position {
        SymbolPosition::Prefix => format!("{}{}", symbol, body),
        SymbolPosition::Suffix => format!("{} {}", body, symbol),
    };
    // rounding can turn a tiny negative into zero
    let negative = amount < 0.0 && body.chars().any(|c| c.is_ascii_digit() && c != '0');
    match (negative, locale.negative_style) {
        (false, _) => unsigned,
        (true, NegativeStyle::Sign) => format!("-{}", unsigned),
        (true, NegativeStyle::Parentheses) => format!("({})", unsigned),
    }
}
