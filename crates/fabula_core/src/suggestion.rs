//! Plot improvement suggestions.

use serde::{Deserialize, Serialize};

/// Exactly three plot improvement suggestions, in original order.
///
/// The validator enforces the count; this type only carries the result.
/// Partial suggestion counts are a validation failure, never a partial
/// success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlotImprovement {
    suggestions: Vec<String>,
}

impl PlotImprovement {
    /// Number of suggestions an improvement payload must contain.
    pub const COUNT: usize = 3;

    /// Wrap a validated set of suggestions.
    ///
    /// Returns `None` unless exactly [`Self::COUNT`] non-empty suggestions
    /// are supplied.
    pub fn new(suggestions: Vec<String>) -> Option<Self> {
        if suggestions.len() == Self::COUNT && suggestions.iter().all(|s| !s.trim().is_empty()) {
            Some(Self { suggestions })
        } else {
            None
        }
    }

    /// The suggestions, in the order the capability produced them.
    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_exactly_three() {
        let improvement =
            PlotImprovement::new(vec!["a".into(), "b".into(), "c".into()]).unwrap();
        assert_eq!(improvement.suggestions().len(), 3);
        assert_eq!(improvement.suggestions()[0], "a");
    }

    #[test]
    fn rejects_two_or_empty() {
        assert!(PlotImprovement::new(vec!["a".into(), "b".into()]).is_none());
        assert!(PlotImprovement::new(vec!["a".into(), " ".into(), "c".into()]).is_none());
    }
}
