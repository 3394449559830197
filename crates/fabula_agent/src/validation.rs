//! Response payload validation.
//!
//! Two required shapes are supported: the story shape (title plus a
//! three-part plot, all non-empty) and the suggestion shape (exactly three
//! non-empty improvement strings, structured or as a numbered list). A
//! payload that fails its shape is a validation error carrying the reason;
//! nothing is ever defaulted into an empty artifact.

use crate::extraction::extract_structured;
use fabula_core::{Character, Plot, PlotImprovement, StoryArtifact, StoryMetadata};
use fabula_error::{ValidationError, ValidationErrorKind};
use serde::Deserialize;

/// A validated story payload before genre and metadata are stamped on.
///
/// The dispatcher turns a draft into a [`StoryArtifact`] once it knows the
/// request genre and provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryDraft {
    /// Validated non-empty title
    pub title: String,
    /// Characters in payload order (may be empty)
    pub characters: Vec<Character>,
    /// Validated three-part plot
    pub plot: Plot,
    /// Themes in payload order (may be empty)
    pub themes: Vec<String>,
}

impl StoryDraft {
    /// Stamp genre and provenance metadata onto the draft.
    pub fn into_artifact(self, genre: impl Into<String>, metadata: StoryMetadata) -> StoryArtifact {
        StoryArtifact {
            title: self.title,
            characters: self.characters,
            plot: self.plot,
            themes: self.themes,
            genre: genre.into(),
            metadata,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawStory {
    title: Option<String>,
    #[serde(default)]
    characters: Vec<RawCharacter>,
    plot: Option<RawPlot>,
    #[serde(default)]
    themes: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawCharacter {
    name: String,
    #[serde(default)]
    role: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct RawPlot {
    setup: Option<String>,
    conflict: Option<String>,
    resolution: Option<String>,
}

/// Validate raw generation output against the story shape.
///
/// # Errors
///
/// Fails when no structured payload is present, the payload does not parse,
/// or `title` / `plot.setup` / `plot.conflict` / `plot.resolution` are
/// absent or empty.
///
/// # Examples
///
/// ```
/// let raw = r#"{"title":"T","plot":{"setup":"a","conflict":"b","resolution":"c"}}"#;
/// let draft = fabula_agent::validate_story(raw).unwrap();
/// assert_eq!(draft.title, "T");
/// ```
pub fn validate_story(raw: &str) -> Result<StoryDraft, ValidationError> {
    let payload = extract_structured(raw)?;
    let parsed: RawStory = serde_json::from_str(&payload)
        .map_err(|e| ValidationError::new(ValidationErrorKind::Parse(e.to_string())))?;

    let title = required(parsed.title, "title")?;
    let plot = parsed
        .plot
        .ok_or_else(|| ValidationError::new(ValidationErrorKind::MissingField("plot".into())))?;
    let plot = Plot {
        setup: required(plot.setup, "plot.setup")?,
        conflict: required(plot.conflict, "plot.conflict")?,
        resolution: required(plot.resolution, "plot.resolution")?,
    };

    let characters = parsed
        .characters
        .into_iter()
        .map(|c| Character {
            name: c.name,
            role: c.role,
            description: c.description,
        })
        .collect();

    Ok(StoryDraft {
        title,
        characters,
        plot,
        themes: parsed.themes,
    })
}

fn required(value: Option<String>, field: &str) -> Result<String, ValidationError> {
    let value = value
        .ok_or_else(|| ValidationError::new(ValidationErrorKind::MissingField(field.into())))?;
    if value.trim().is_empty() {
        return Err(ValidationError::new(ValidationErrorKind::EmptyField(
            field.into(),
        )));
    }
    Ok(value)
}

/// Validate raw generation output against the suggestion shape.
///
/// Accepts a JSON string array, a JSON object with a `suggestions` array,
/// or — because the capability sometimes answers in prose — a numbered list
/// recognized by line-leading ordinal markers (`1.`, `2)`, `3:`). Exactly
/// three non-empty suggestions are required in every form.
///
/// # Errors
///
/// Fails when no suggestions can be recognized or the count is not exactly
/// three.
///
/// # Examples
///
/// ```
/// let raw = "1. Raise the stakes\n2. Cut the subplot\n3. Foreshadow the twist";
/// let improvement = fabula_agent::validate_suggestions(raw).unwrap();
/// assert_eq!(improvement.suggestions().len(), 3);
/// ```
pub fn validate_suggestions(raw: &str) -> Result<PlotImprovement, ValidationError> {
    match structured_suggestions(raw) {
        Ok(suggestions) => finish_suggestions(suggestions),
        // fall back to the numbered-list format before reporting failure
        Err(structured_err) => {
            let lines = ordinal_lines(raw);
            if lines.is_empty() {
                Err(structured_err)
            } else {
                finish_suggestions(lines)
            }
        }
    }
}

fn structured_suggestions(raw: &str) -> Result<Vec<String>, ValidationError> {
    let payload = extract_structured(raw)?;
    let value: serde_json::Value = serde_json::from_str(&payload)
        .map_err(|e| ValidationError::new(ValidationErrorKind::Parse(e.to_string())))?;

    let items = match &value {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Object(map) => match map.get("suggestions") {
            Some(serde_json::Value::Array(items)) => items,
            _ => {
                return Err(ValidationError::new(ValidationErrorKind::MissingField(
                    "suggestions".into(),
                )));
            }
        },
        _ => {
            return Err(ValidationError::new(ValidationErrorKind::Parse(
                "expected an array or an object with a suggestions array".into(),
            )));
        }
    };

    items
        .iter()
        .map(|item| {
            item.as_str().map(str::to_string).ok_or_else(|| {
                ValidationError::new(ValidationErrorKind::Parse(
                    "suggestion entries must be strings".into(),
                ))
            })
        })
        .collect()
}

/// Collect lines led by an ordinal marker: digits followed by `.`, `)`,
/// or `:`.
fn ordinal_lines(raw: &str) -> Vec<String> {
    raw.lines()
        .filter_map(|line| {
            let line = line.trim();
            let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
            if digits == 0 {
                return None;
            }
            let rest = &line[digits..];
            let rest = rest.strip_prefix(['.', ')', ':'])?;
            let text = rest.trim();
            (!text.is_empty()).then(|| text.to_string())
        })
        .collect()
}

fn finish_suggestions(suggestions: Vec<String>) -> Result<PlotImprovement, ValidationError> {
    let count = suggestions.len();
    PlotImprovement::new(suggestions)
        .ok_or_else(|| ValidationError::new(ValidationErrorKind::SuggestionCount(count)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn story_shape_round_trips_title() {
        let raw = r#"{"title":"T","plot":{"setup":"a","conflict":"b","resolution":"c"}}"#;
        let draft = validate_story(raw).unwrap();
        assert_eq!(draft.title, "T");
        assert_eq!(draft.plot.conflict, "b");
        assert!(draft.characters.is_empty());
    }

    #[test]
    fn story_shape_reads_characters_and_themes() {
        let raw = r#"{
            "title": "T",
            "characters": [
                {"name": "A", "role": "protagonist", "description": "lead"},
                {"name": "B", "role": "antagonist", "description": "rival"}
            ],
            "plot": {"setup": "a", "conflict": "b", "resolution": "c"},
            "themes": ["growth", "trust"]
        }"#;
        let draft = validate_story(raw).unwrap();
        assert_eq!(draft.characters.len(), 2);
        assert_eq!(draft.characters[1].role, "antagonist");
        assert_eq!(draft.themes, vec!["growth", "trust"]);
    }

    #[test]
    fn story_missing_conflict_fails() {
        let raw = r#"{"title":"T","plot":{"setup":"a","resolution":"c"}}"#;
        let err = validate_story(raw).unwrap_err();
        assert!(matches!(err.kind, ValidationErrorKind::MissingField(ref f) if f == "plot.conflict"));
    }

    #[test]
    fn story_empty_title_fails() {
        let raw = r#"{"title":"  ","plot":{"setup":"a","conflict":"b","resolution":"c"}}"#;
        let err = validate_story(raw).unwrap_err();
        assert!(matches!(err.kind, ValidationErrorKind::EmptyField(ref f) if f == "title"));
    }

    #[test]
    fn story_in_code_fence_validates() {
        let raw = "```json\n{\"title\":\"T\",\"plot\":{\"setup\":\"a\",\"conflict\":\"b\",\"resolution\":\"c\"}}\n```";
        assert!(validate_story(raw).is_ok());
    }

    #[test]
    fn suggestions_accept_a_json_array() {
        let raw = r#"["tighten pacing", "add stakes", "earn the ending"]"#;
        let improvement = validate_suggestions(raw).unwrap();
        assert_eq!(improvement.suggestions()[2], "earn the ending");
    }

    #[test]
    fn suggestions_accept_a_wrapped_object() {
        let raw = r#"{"suggestions": ["a", "b", "c"]}"#;
        assert!(validate_suggestions(raw).is_ok());
    }

    #[test]
    fn suggestions_accept_numbered_text_in_order() {
        let raw = "Here are my thoughts:\n1. First idea\n2) Second idea\n3: Third idea\nGood luck!";
        let improvement = validate_suggestions(raw).unwrap();
        assert_eq!(
            improvement.suggestions(),
            ["First idea", "Second idea", "Third idea"]
        );
    }

    #[test]
    fn two_suggestions_fail() {
        let raw = "1. Only one\n2. And another";
        let err = validate_suggestions(raw).unwrap_err();
        assert!(matches!(err.kind, ValidationErrorKind::SuggestionCount(2)));
    }

    #[test]
    fn four_structured_suggestions_fail() {
        let raw = r#"["a", "b", "c", "d"]"#;
        let err = validate_suggestions(raw).unwrap_err();
        assert!(matches!(err.kind, ValidationErrorKind::SuggestionCount(4)));
    }

    #[test]
    fn prose_without_list_or_payload_fails() {
        let err = validate_suggestions("I have no concrete ideas.").unwrap_err();
        assert!(matches!(err.kind, ValidationErrorKind::NoPayload(_)));
    }
}
