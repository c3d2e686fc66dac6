//! Diagnostics raised by name resolution

use std::mem;
use tn_span::FileSpan;

/// Errors that occur during name resolution
///
/// None of these stop the pass; they are recorded in the diagnostics sink and
/// resolution carries on with the rest of the tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, miette::Diagnostic)]
pub enum ResolutionError {
    /// Name is declared twice in the same scope
    #[error("`{name}` is already declared in this scope")]
    #[diagnostic(
        code(resolve::conflict),
        help("the first declaration is kept; rename one of them")
    )]
    Conflict {
        /// The name that was redeclared
        name: String,
        /// The declaration that stays in effect
        first: Option<FileSpan>,
        /// The rejected declaration
        second: Option<FileSpan>,
    },

    /// Name is not declared in any visible scope at the point of use
    #[error("cannot find `{name}` in this scope")]
    #[diagnostic(code(resolve::unresolved))]
    Unresolved {
        /// The name that was not found
        name: String,
        /// Where the name was used
        use_site: FileSpan,
        /// "Did you mean" text, if a similar name is visible
        #[help]
        help: Option<String>,
    },

    /// Callee does not name a function or builtin visible at the call
    #[error("cannot call `{name}`: {reason}")]
    #[diagnostic(code(resolve::unresolved_call))]
    UnresolvedCall {
        /// The callee name
        name: String,
        /// Why the call cannot be bound
        reason: String,
        /// Where the call was made
        use_site: FileSpan,
        /// "Did you mean" text, if a similar name is visible
        #[help]
        help: Option<String>,
    },
}

impl ResolutionError {
    /// Primary location of the error
    pub fn span(&self) -> Option<FileSpan> {
        match self {
            Self::Conflict { second, .. } => *second,
            Self::Unresolved { use_site, .. } | Self::UnresolvedCall { use_site, .. } => {
                Some(*use_site)
            }
        }
    }
}

/// An inner declaration hides one from an enclosing scope
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, miette::Diagnostic)]
#[error("`{name}` shadows a declaration in an outer scope")]
#[diagnostic(code(resolve::shadow), severity(Warning))]
pub struct ShadowWarning {
    /// The reused name
    pub name: String,
    /// The hidden declaration
    pub outer: Option<FileSpan>,
    /// The new declaration
    pub inner: Option<FileSpan>,
}

/// Render suggestions as "did you mean" help text
pub fn suggestion_help(suggestions: &[String]) -> Option<String> {
    match suggestions {
        [] => None,
        [only] => Some(format!("did you mean `{only}`?")),
        many => {
            let names: Vec<String> = many.iter().map(|name| format!("`{name}`")).collect();
            Some(format!("did you mean one of {}?", names.join(", ")))
        }
    }
}

/// Pick the visible names closest to `target`, at most three, closest first
///
/// Candidates further than three edits away are dropped; ties keep the
/// order of `available`.
pub fn compute_suggestions<'a>(
    target: &str,
    available: impl IntoIterator<Item = &'a str>,
) -> Vec<String> {
    let mut suggestions: Vec<(&str, usize)> = available
        .into_iter()
        .filter(|candidate| *candidate != target)
        .map(|candidate| (candidate, levenshtein_distance(target, candidate)))
        .filter(|(_, distance)| *distance <= 3)
        .collect();

    suggestions.sort_by_key(|(_, distance)| *distance);
    suggestions
        .into_iter()
        .take(3)
        .map(|(name, _)| name.to_string())
        .collect()
}

/// Compute Levenshtein distance between two strings
fn levenshtein_distance(source: &str, target: &str) -> usize {
    let source: Vec<char> = source.chars().collect();
    let target: Vec<char> = target.chars().collect();

    if source.is_empty() {
        return target.len();
    }
    if target.is_empty() {
        return source.len();
    }

    let mut previous: Vec<usize> = (0..=target.len()).collect();
    let mut current = vec![0; target.len() + 1];

    for (idx, source_char) in source.iter().enumerate() {
        current[0] = idx + 1;
        for (jdx, target_char) in target.iter().enumerate() {
            let cost = usize::from(source_char != target_char);
            current[jdx + 1] = (previous[jdx + 1] + 1)
                .min(current[jdx] + 1)
                .min(previous[jdx] + cost);
        }
        mem::swap(&mut previous, &mut current);
    }

    previous[target.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein_distance() {
        assert_eq!(levenshtein_distance("", ""), 0);
        assert_eq!(levenshtein_distance("abc", "abc"), 0);
        assert_eq!(levenshtein_distance("abc", "def"), 3);
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
        assert_eq!(levenshtein_distance("saturday", "sunday"), 3);
    }

    #[test]
    fn test_suggestions_are_sorted_and_capped() {
        let available = ["count", "counter", "mount", "zzzzzzzz", "cont", "coun"];
        let suggestions = compute_suggestions("count", available);
        assert_eq!(suggestions, ["mount", "cont", "coun"]);
    }

    #[test]
    fn test_suggestion_help_text() {
        assert_eq!(suggestion_help(&[]), None);
        assert_eq!(
            suggestion_help(&["x".to_string()]).as_deref(),
            Some("did you mean `x`?")
        );
        assert_eq!(
            suggestion_help(&["x".to_string(), "y".to_string()]).as_deref(),
            Some("did you mean one of `x`, `y`?")
        );
    }
}
