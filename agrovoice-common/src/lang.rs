//! Language codes supported by the advisory service
//!
//! Three languages are supported end to end: English, Hindi, and Marathi.
//! Wire format is the two-letter code (`en`, `hi`, `mr`) used by the HTTP
//! form field and the config file.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported advisory language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English
    En,
    /// Hindi
    Hi,
    /// Marathi
    Mr,
}

impl Language {
    /// All supported languages, in wire-code order
    pub const ALL: [Language; 3] = [Language::En, Language::Hi, Language::Mr];

    /// Two-letter wire code (`en`, `hi`, `mr`)
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Hi => "hi",
            Language::Mr => "mr",
        }
    }

    /// Best-effort keyword match of a free-text utterance against language
    /// names in Latin and Devanagari script.
    ///
    /// Used by the console flow to interpret the user's spoken/typed reply
    /// to the language prompt. Returns `None` when no language name is
    /// found; the caller decides the fallback (console flow defaults to
    /// English).
    pub fn from_keywords(utterance: &str) -> Option<Language> {
        let lower = utterance.to_lowercase();
        if lower.contains("hindi") || lower.contains("हिंदी") {
            Some(Language::Hi)
        } else if lower.contains("marathi") || lower.contains("मराठी") {
            Some(Language::Mr)
        } else if lower.contains("english") || lower.contains("इंग्लिश") {
            Some(Language::En)
        } else {
            None
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en" => Ok(Language::En),
            "hi" => Ok(Language::Hi),
            "mr" => Ok(Language::Mr),
            other => Err(crate::Error::InvalidInput(format!(
                "Unsupported language code: {} (expected en, hi, or mr)",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_codes_round_trip() {
        for lang in Language::ALL {
            assert_eq!(lang.code().parse::<Language>().unwrap(), lang);
        }
    }

    #[test]
    fn test_unsupported_code_rejected() {
        let err = "fr".parse::<Language>().unwrap_err();
        assert!(err.to_string().contains("fr"));
    }

    #[test]
    fn test_keyword_match_latin() {
        assert_eq!(
            Language::from_keywords("I prefer Hindi please"),
            Some(Language::Hi)
        );
        assert_eq!(Language::from_keywords("Marathi"), Some(Language::Mr));
        assert_eq!(
            Language::from_keywords("english works"),
            Some(Language::En)
        );
    }

    #[test]
    fn test_keyword_match_devanagari() {
        assert_eq!(Language::from_keywords("मुझे हिंदी चाहिए"), Some(Language::Hi));
        assert_eq!(Language::from_keywords("मराठी"), Some(Language::Mr));
    }

    #[test]
    fn test_keyword_no_match() {
        assert_eq!(Language::from_keywords("no idea"), None);
        assert_eq!(Language::from_keywords(""), None);
    }

    #[test]
    fn test_serde_wire_format() {
        let json = serde_json::to_string(&Language::Mr).unwrap();
        assert_eq!(json, "\"mr\"");
        let parsed: Language = serde_json::from_str("\"hi\"").unwrap();
        assert_eq!(parsed, Language::Hi);
    }
}
