//! Story artifact types.
//!
//! A [`StoryArtifact`] is the validated structured output of a
//! story-generating agent. Artifacts are created once per dispatch, never
//! mutated after validation, and persisted exactly once.

use serde::{Deserialize, Serialize};

/// A character in a generated story.
///
/// `role` is free text by convention (`protagonist`, `support`,
/// `antagonist`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    /// Character name, unique within its owning collection
    pub name: String,
    /// Narrative role
    pub role: String,
    /// Short description
    pub description: String,
}

/// The three-part plot of a story.
///
/// All fields must be non-empty after validation; absence of any is a
/// validation failure, not a silent default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plot {
    /// Opening situation
    pub setup: String,
    /// Central conflict and development
    pub conflict: String,
    /// Resolution
    pub resolution: String,
}

/// Provenance metadata stamped onto an artifact at dispatch time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryMetadata {
    /// Version of the agent that produced the artifact
    pub agent_version: String,
    /// Configuration document the agent was resolved from
    pub config: String,
    /// Generation timestamp
    pub timestamp: String,
}

/// The validated structured output of a story-generating agent.
///
/// # Examples
///
/// ```
/// use fabula_core::{Character, Plot, StoryArtifact, StoryMetadata};
///
/// let artifact = StoryArtifact {
///     title: "The Locked Room".to_string(),
///     characters: vec![Character {
///         name: "Inspector Reed".to_string(),
///         role: "protagonist".to_string(),
///         description: "A meticulous detective".to_string(),
///     }],
///     plot: Plot {
///         setup: "A body is found in a sealed study.".to_string(),
///         conflict: "Every suspect has an alibi.".to_string(),
///         resolution: "The room was never locked at all.".to_string(),
///     },
///     themes: vec!["appearances deceive".to_string()],
///     genre: "mystery".to_string(),
///     metadata: StoryMetadata {
///         agent_version: "v0.1".to_string(),
///         config: "config/fabula.toml".to_string(),
///         timestamp: "20260805_120000".to_string(),
///     },
/// };
///
/// assert!(artifact.render_text().contains("The Locked Room"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryArtifact {
    /// Story title
    pub title: String,
    /// Characters in order of appearance in the payload
    pub characters: Vec<Character>,
    /// Three-part plot
    pub plot: Plot,
    /// Themes in payload order
    pub themes: Vec<String>,
    /// The genre the story was requested for
    pub genre: String,
    /// Provenance metadata
    pub metadata: StoryMetadata,
}

impl StoryArtifact {
    /// Render the artifact as human-readable text.
    ///
    /// This is the second persisted representation; it is produced for
    /// human consumption and never machine-parsed by the pipeline.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("Title: {}\n", self.title));

        out.push_str("\nCharacters:\n");
        for character in &self.characters {
            out.push_str(&format!(
                "- {} ({}): {}\n",
                character.name, character.role, character.description
            ));
        }

        out.push_str("\nPlot:\n");
        out.push_str(&format!("{}\n\n", self.plot.setup));
        out.push_str(&format!("{}\n\n", self.plot.conflict));
        out.push_str(&format!("{}\n", self.plot.resolution));

        out.push_str("\nThemes:\n");
        for theme in &self.themes {
            out.push_str(&format!("- {}\n", theme));
        }

        out.push_str(&format!(
            "\nGenre: {}\nGenerated by agent {} from {}\n",
            self.genre, self.metadata.agent_version, self.metadata.config
        ));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> StoryArtifact {
        StoryArtifact {
            title: "T".to_string(),
            characters: vec![Character {
                name: "A".to_string(),
                role: "protagonist".to_string(),
                description: "desc".to_string(),
            }],
            plot: Plot {
                setup: "s".to_string(),
                conflict: "c".to_string(),
                resolution: "r".to_string(),
            },
            themes: vec!["t1".to_string()],
            genre: "fantasy".to_string(),
            metadata: StoryMetadata {
                agent_version: "v0.1".to_string(),
                config: "fabula.toml".to_string(),
                timestamp: "20260101_000000".to_string(),
            },
        }
    }

    #[test]
    fn structured_shape_round_trips() {
        let artifact = sample();
        let json = serde_json::to_string(&artifact).unwrap();
        let back: StoryArtifact = serde_json::from_str(&json).unwrap();
        assert_eq!(artifact, back);
    }

    #[test]
    fn structured_shape_has_required_keys() {
        let value = serde_json::to_value(sample()).unwrap();
        for key in ["title", "characters", "plot", "themes", "genre", "metadata"] {
            assert!(value.get(key).is_some(), "missing key {key}");
        }
        let metadata = value.get("metadata").unwrap();
        for key in ["agent_version", "config", "timestamp"] {
            assert!(metadata.get(key).is_some(), "missing metadata key {key}");
        }
    }

    #[test]
    fn text_rendering_lists_characters_and_themes() {
        let text = sample().render_text();
        assert!(text.contains("Title: T"));
        assert!(text.contains("- A (protagonist): desc"));
        assert!(text.contains("- t1"));
    }
}
