//! Routing labels and classifier-output normalization

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// The five routing labels the classifier may produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoutingLabel {
    Math,
    English,
    Language,
    CompSci,
    General,
}

fn token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b(MATH|ENGLISH|LANGUAGE|COMPSCI|GENERAL)\b").unwrap())
}

impl RoutingLabel {
    /// Uppercase token form
    pub fn as_str(&self) -> &'static str {
        match self {
            RoutingLabel::Math => "MATH",
            RoutingLabel::English => "ENGLISH",
            RoutingLabel::Language => "LANGUAGE",
            RoutingLabel::CompSci => "COMPSCI",
            RoutingLabel::General => "GENERAL",
        }
    }

    /// Specialist name used in routing logs
    pub fn assistant_name(&self) -> &'static str {
        match self {
            RoutingLabel::Math => "Math",
            RoutingLabel::English => "English",
            RoutingLabel::Language => "Language",
            RoutingLabel::CompSci => "Computer Science",
            RoutingLabel::General => "General",
        }
    }

    fn from_token(token: &str) -> Option<Self> {
        match token {
            "MATH" => Some(RoutingLabel::Math),
            "ENGLISH" => Some(RoutingLabel::English),
            "LANGUAGE" => Some(RoutingLabel::Language),
            "COMPSCI" => Some(RoutingLabel::CompSci),
            "GENERAL" => Some(RoutingLabel::General),
            _ => None,
        }
    }

    /// Extract a routing label from raw classifier output.
    ///
    /// Exact match after trim+uppercase, else the first whole-word
    /// occurrence of a valid token, else `GENERAL`. Never fails.
    pub fn normalize(raw: &str) -> Self {
        let upper = raw.trim().to_uppercase();
        if let Some(label) = Self::from_token(&upper) {
            return label;
        }
        token_re()
            .captures(&upper)
            .and_then(|c| c.get(1))
            .and_then(|m| Self::from_token(m.as_str()))
            .unwrap_or(RoutingLabel::General)
    }
}

impl fmt::Display for RoutingLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
