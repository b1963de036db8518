use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which weekly quota a session counts toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuotaField {
    /// Intermediate accounting lectures (中會), counted in sessions.
    Zhonghui,
    /// Written essay answers (申論), counted in questions.
    Essay,
}

impl QuotaField {
    pub const ALL: [QuotaField; 2] = [QuotaField::Zhonghui, QuotaField::Essay];

    pub fn as_str(&self) -> &'static str {
        match *self {
            Self::Zhonghui => "zhonghui",
            Self::Essay => "essay",
        }
    }

    pub fn label(&self) -> &'static str {
        match *self {
            Self::Zhonghui => "Zhonghui",
            Self::Essay => "Essay",
        }
    }
}

impl fmt::Display for QuotaField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuotaField {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "zhonghui" | "zh" | "中會" => Ok(Self::Zhonghui),
            "essay" | "es" | "申論" => Ok(Self::Essay),
            _ => Err(format!(
                "invalid quota '{value}', expected one of: zhonghui, zh, essay, es"
            )),
        }
    }
}
