//! The closed set of video search engines the search box can target

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Video search engine identifier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    #[default]
    Youku,
    Tencent,
}

impl Engine {
    /// Every engine, in display order
    pub const ALL: [Engine; 2] = [Engine::Youku, Engine::Tencent];

    /// Number of engines
    pub const COUNT: usize = Self::ALL.len();

    /// Stable lowercase name
    pub fn name(&self) -> &'static str {
        match self {
            Engine::Youku => "youku",
            Engine::Tencent => "tencent",
        }
    }

    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            Engine::Youku => "Youku",
            Engine::Tencent => "Tencent Video",
        }
    }

    /// Position of this engine in [`Engine::ALL`]
    pub fn index(&self) -> usize {
        match self {
            Engine::Youku => 0,
            Engine::Tencent => 1,
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown engine name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown engine: {0}")]
pub struct UnknownEngine(pub String);

impl FromStr for Engine {
    type Err = UnknownEngine;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "youku" | "yk" => Ok(Engine::Youku),
            "tencent" | "qq" | "v.qq" => Ok(Engine::Tencent),
            _ => Err(UnknownEngine(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_matches_all() {
        for (i, engine) in Engine::ALL.iter().enumerate() {
            assert_eq!(engine.index(), i);
        }
    }

    #[test]
    fn test_default_is_youku() {
        assert_eq!(Engine::default(), Engine::Youku);
    }

    #[test]
    fn test_parse() {
        assert_eq!("Youku".parse::<Engine>().unwrap(), Engine::Youku);
        assert_eq!(" qq ".parse::<Engine>().unwrap(), Engine::Tencent);
        assert!("bilibili".parse::<Engine>().is_err());
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&Engine::Tencent).unwrap();
        assert_eq!(json, "\"tencent\"");
        let engine: Engine = serde_json::from_str("\"youku\"").unwrap();
        assert_eq!(engine, Engine::Youku);
    }
}
