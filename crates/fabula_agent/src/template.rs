//! Prompt template rendering.
//!
//! Templates carry named placeholders in braces: `Genre: {genre}`. Doubled
//! braces (`{{`, `}}`) escape to literal braces, so templates can embed JSON
//! examples. Rendering requires every placeholder to be supplied; unused
//! variables in the mapping are ignored, supporting shared variable sets
//! across templates.

use fabula_error::TemplateError;
use std::collections::HashMap;

/// Substitute named variables into a template string.
///
/// Pure function: identical template and variables always yield an
/// identical string.
///
/// # Errors
///
/// Fails with a `TemplateError` naming the first placeholder that has no
/// matching variable, or describing a malformed placeholder. There is no
/// silent blank substitution.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
///
/// let vars = HashMap::from([("genre".to_string(), "fantasy".to_string())]);
/// let rendered = fabula_agent::render("A {genre} tale in a {genre} land", &vars).unwrap();
/// assert_eq!(rendered, "A fantasy tale in a fantasy land");
///
/// assert!(fabula_agent::render("Plot: {plot_summary}", &vars).is_err());
/// ```
pub fn render(
    template: &str,
    variables: &HashMap<String, String>,
) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '{' => {
                if chars.peek() == Some(&'{') {
                    chars.next();
                    out.push('{');
                    continue;
                }
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(c) if c.is_ascii_alphanumeric() || c == '_' => name.push(c),
                        Some(c) => {
                            return Err(TemplateError::new(format!(
                                "malformed placeholder: unexpected '{c}' after '{{{name}'"
                            )));
                        }
                        None => {
                            return Err(TemplateError::new(format!(
                                "unclosed placeholder: {{{name}"
                            )));
                        }
                    }
                }
                let value = variables.get(&name).ok_or_else(|| {
                    TemplateError::new(format!("missing variable: {name}"))
                })?;
                out.push_str(value);
            }
            '}' => {
                if chars.peek() == Some(&'}') {
                    chars.next();
                }
                out.push('}');
            }
            other => out.push(other),
        }
    }

    Ok(out)
}
