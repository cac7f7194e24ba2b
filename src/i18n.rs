//! Multilingual field handling.
//!
//! Odoo returns translatable fields as a map of language code to text
//! (`{"en_US": "...", "ar_001": "..."}`), a bare string when the field is read
//! without translations, or `false`/`null` when unset. Everything is folded
//! into [`Translations`] once, right after a response is decoded.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Lang {
    #[serde(rename = "en_US")]
    EnUs,
    #[serde(rename = "ar_001")]
    Ar001,
}

impl Lang {
    pub const ALL: [Lang; 2] = [Lang::EnUs, Lang::Ar001];

    pub fn code(self) -> &'static str {
        match self {
            Lang::EnUs => "en_US",
            Lang::Ar001 => "ar_001",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "en_US" => Some(Lang::EnUs),
            "ar_001" => Some(Lang::Ar001),
            _ => None,
        }
    }

    /// Accepts UI locales (`en`, `ar-SA`) as well as Odoo codes.
    pub fn from_locale(locale: &str) -> Option<Self> {
        if let Some(lang) = Self::from_code(locale.trim()) {
            return Some(lang);
        }
        let primary = locale
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or("")
            .to_ascii_lowercase();
        match primary.as_str() {
            "en" => Some(Lang::EnUs),
            "ar" => Some(Lang::Ar001),
            _ => None,
        }
    }
}

/// Language code to text, as exchanged with the GraphQL server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(transparent)]
pub struct Translations(BTreeMap<String, String>);

impl Translations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds any wire shape into translations. Strings are treated as
    /// English; non-string map entries (Odoo's `false`) are dropped.
    pub fn from_wire(value: &Value) -> Self {
        let mut map = BTreeMap::new();
        match value {
            Value::String(text) => {
                let text = text.trim();
                if !text.is_empty() {
                    map.insert(Lang::EnUs.code().to_string(), text.to_string());
                }
            }
            Value::Object(entries) => {
                for (code, text) in entries {
                    if let Value::String(text) = text {
                        map.insert(code.clone(), text.trim().to_string());
                    }
                }
            }
            _ => {}
        }
        Self(map)
    }

    pub fn with(mut self, lang: Lang, text: impl Into<String>) -> Self {
        self.0.insert(lang.code().to_string(), text.into());
        self
    }

    pub fn get(&self, lang: Lang) -> Option<&str> {
        self.0.get(lang.code()).map(String::as_str)
    }

    fn non_empty(&self, lang: Lang) -> Option<&str> {
        self.get(lang).filter(|t| !t.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(|t| t.is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Preferred language, then English, Arabic, any other non-empty value,
    /// and finally the empty string.
    pub fn display(&self, preferred: Lang) -> String {
        self.non_empty(preferred)
            .or_else(|| self.non_empty(Lang::EnUs))
            .or_else(|| self.non_empty(Lang::Ar001))
            .or_else(|| self.0.values().map(String::as_str).find(|t| !t.is_empty()))
            .unwrap_or_default()
            .to_string()
    }

    /// Case-insensitive substring match against every language.
    pub fn matches(&self, needle_lower: &str) -> bool {
        self.0
            .values()
            .any(|t| t.to_lowercase().contains(needle_lower))
    }
}

impl<'de> Deserialize<'de> for Translations {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Translations::from_wire(&value))
    }
}

/// Flat edit state for a translatable field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FormState {
    #[serde(rename = "en_US", default)]
    pub en_us: String,
    #[serde(rename = "ar_001", default)]
    pub ar_001: String,
}

impl FormState {
    pub fn new(en_us: impl Into<String>, ar_001: impl Into<String>) -> Self {
        Self {
            en_us: en_us.into(),
            ar_001: ar_001.into(),
        }
    }

    pub fn from_wire(value: &Value) -> Self {
        Self::from_translations(&Translations::from_wire(value))
    }

    pub fn from_translations(translations: &Translations) -> Self {
        Self {
            en_us: translations.get(Lang::EnUs).unwrap_or_default().to_string(),
            ar_001: translations.get(Lang::Ar001).unwrap_or_default().to_string(),
        }
    }

    /// Only languages with text are emitted. A cleared field is left out of
    /// the payload, so the server keeps its previous translation.
    pub fn to_wire_payload(&self) -> Translations {
        let mut out = Translations::new();
        for (lang, text) in [(Lang::EnUs, &self.en_us), (Lang::Ar001, &self.ar_001)] {
            let text = text.trim();
            if !text.is_empty() {
                out = out.with(lang, text);
            }
        }
        out
    }

    pub fn is_blank(&self) -> bool {
        self.en_us.trim().is_empty() && self.ar_001.trim().is_empty()
    }

    pub fn require(&self, field: &str) -> Result<(), String> {
        if self.is_blank() {
            return Err(format!(
                "{field} is required in at least one language (English or Arabic)"
            ));
        }
        Ok(())
    }
}
