//! Namespaced identifiers (`namespace:path`) used as registry keys.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// A parse failure for an [`Identifier`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdentifierError {
    /// The namespace contains a character outside `[a-z0-9_.-]`.
    #[error("invalid namespace in identifier `{0}`")]
    InvalidNamespace(String),
    /// The path contains a character outside `[a-z0-9_.-/]`.
    #[error("invalid path in identifier `{0}`")]
    InvalidPath(String),
}

/// A resource location such as `minecraft:overworld`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier {
    /// Namespace, `minecraft` for vanilla content.
    pub namespace: Cow<'static, str>,
    /// Path within the namespace.
    pub path: Cow<'static, str>,
}

impl Identifier {
    /// Namespace of vanilla content.
    pub const VANILLA_NAMESPACE: &'static str = "minecraft";

    /// Build from owned parts without validation.
    #[must_use]
    pub fn new(namespace: impl Into<Cow<'static, str>>, path: impl Into<Cow<'static, str>>) -> Self {
        Self {
            namespace: namespace.into(),
            path: path.into(),
        }
    }

    /// A vanilla identifier with an owned path.
    #[must_use]
    pub fn vanilla(path: impl Into<String>) -> Self {
        Self::new(Self::VANILLA_NAMESPACE, path.into())
    }

    /// A vanilla identifier with a static path, usable in constants.
    #[must_use]
    pub const fn vanilla_static(path: &'static str) -> Self {
        Self {
            namespace: Cow::Borrowed(Self::VANILLA_NAMESPACE),
            path: Cow::Borrowed(path),
        }
    }
}

const fn valid_namespace_char(c: char) -> bool {
    matches!(c, 'a'..='z' | '0'..='9' | '_' | '-' | '.')
}

const fn valid_path_char(c: char) -> bool {
    valid_namespace_char(c) || c == '/'
}

impl FromStr for Identifier {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (namespace, path) = s.split_once(':').unwrap_or((Self::VANILLA_NAMESPACE, s));
        if namespace.is_empty() || !namespace.chars().all(valid_namespace_char) {
            return Err(IdentifierError::InvalidNamespace(s.to_owned()));
        }
        if path.is_empty() || !path.chars().all(valid_path_char) {
            return Err(IdentifierError::InvalidPath(s.to_owned()));
        }
        Ok(Self::new(namespace.to_owned(), path.to_owned()))
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

impl Serialize for Identifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Identifier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Cow::<'de, str>::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let id: Identifier = "minecraft:overworld".parse().unwrap();
        assert_eq!(id, Identifier::vanilla_static("overworld"));
        assert_eq!(id.to_string(), "minecraft:overworld");

        let implicit: Identifier = "caves/noodle".parse().unwrap();
        assert_eq!(implicit, Identifier::vanilla("caves/noodle"));

        let custom: Identifier = "mypack:worldgen/flat".parse().unwrap();
        assert_eq!(custom.namespace, "mypack");
        assert_eq!(custom.path, "worldgen/flat");
    }

    #[test]
    fn test_rejects_invalid() {
        assert!("Minecraft:stone".parse::<Identifier>().is_err());
        assert!("minecraft:".parse::<Identifier>().is_err());
        assert!("minecraft:Stone Brick".parse::<Identifier>().is_err());
        assert!("a/b:c".parse::<Identifier>().is_err());
    }

    #[test]
    fn test_serde_as_string() {
        let id = Identifier::vanilla_static("aquifer_barrier");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"minecraft:aquifer_barrier\"");
        let back: Identifier = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
