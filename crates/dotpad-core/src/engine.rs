//! Graphviz layout engines.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Layout engine handed to the rendering collaborator.
///
/// - `dot`: hierarchical/directed graphs (default)
/// - `neato`: spring model for undirected graphs
/// - `fdp`: force-directed placement
/// - `sfdp`: scalable force-directed placement (large graphs)
/// - `circo`: circular layout
/// - `twopi`: radial layout
/// - `osage`: array-based layout
/// - `patchwork`: squarified treemap layout
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LayoutEngine {
    #[default]
    Dot,
    Neato,
    Fdp,
    Sfdp,
    Circo,
    Twopi,
    Osage,
    Patchwork,
}

impl LayoutEngine {
    /// Parses a selector value, falling back to `dot` for anything unknown.
    pub fn parse_or_default(value: &str) -> Self {
        Self::from_str(value.trim()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn parses_every_engine_name() {
        for engine in LayoutEngine::iter() {
            assert_eq!(LayoutEngine::from_str(engine.as_ref()).unwrap(), engine);
        }
        assert_eq!(LayoutEngine::iter().count(), 8);
    }

    #[test]
    fn unknown_selector_falls_back_to_dot() {
        assert_eq!(LayoutEngine::parse_or_default("graphviz"), LayoutEngine::Dot);
        assert_eq!(LayoutEngine::parse_or_default(""), LayoutEngine::Dot);
        assert_eq!(LayoutEngine::parse_or_default("circo"), LayoutEngine::Circo);
    }

    #[test]
    fn displays_lowercase() {
        assert_eq!(LayoutEngine::Patchwork.to_string(), "patchwork");
        assert_eq!(
            serde_json::to_string(&LayoutEngine::Sfdp).unwrap(),
            "\"sfdp\""
        );
    }
}
