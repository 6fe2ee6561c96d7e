//! Domain entities as they come out of the catalog store.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Studio,
    Scene,
    Actor,
    Label,
}

impl EntityKind {
    /// Every kind, in the order a full rebuild visits them.
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Label,
        EntityKind::Studio,
        EntityKind::Actor,
        EntityKind::Scene,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Studio => "studio",
            EntityKind::Scene => "scene",
            EntityKind::Actor => "actor",
            EntityKind::Label => "label",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "studio" | "studios" => Ok(EntityKind::Studio),
            "scene" | "scenes" => Ok(EntityKind::Scene),
            "actor" | "actors" => Ok(EntityKind::Actor),
            "label" | "labels" => Ok(EntityKind::Label),
            other => Err(format!("unknown entity kind: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Label {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Studio {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Label ids, resolved through the store at adapt time.
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub favorite: bool,
    #[serde(default)]
    pub bookmark: bool,
    #[serde(default)]
    pub rating: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub favorite: bool,
    #[serde(default)]
    pub bookmark: bool,
    #[serde(default)]
    pub rating: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub studio: Option<String>,
    #[serde(default)]
    pub actors: Vec<String>,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub favorite: bool,
    #[serde(default)]
    pub bookmark: bool,
    #[serde(default)]
    pub rating: Option<u8>,
}

/// A snapshot of the whole catalog, in the JSON shape of a corpus file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Corpus {
    pub studios: Vec<Studio>,
    pub scenes: Vec<Scene>,
    pub actors: Vec<Actor>,
    pub labels: Vec<Label>,
}

impl Corpus {
    /// Append another snapshot's entities after this one's.
    pub fn merge(&mut self, other: Corpus) {
        self.studios.extend(other.studios);
        self.scenes.extend(other.scenes);
        self.actors.extend(other.actors);
        self.labels.extend(other.labels);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_parses_singular_and_plural() {
        assert_eq!("Scene".parse::<EntityKind>(), Ok(EntityKind::Scene));
        assert_eq!("labels".parse::<EntityKind>(), Ok(EntityKind::Label));
        assert!("movie".parse::<EntityKind>().is_err());
    }

    #[test]
    fn corpus_fields_default_to_empty() {
        let corpus: Corpus =
            serde_json::from_str(r#"{"studios":[{"id":"st1","name":"Indie"}]}"#).unwrap();
        assert_eq!(corpus.studios.len(), 1);
        assert!(corpus.studios[0].labels.is_empty());
        assert!(!corpus.studios[0].favorite);
        assert!(corpus.scenes.is_empty());
    }
}
