//! Greedy word wrapping.

use log::trace;

use crate::error::{Error, Result};

/// Lines produced by [`wrap_with_report`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wrapped {
    /// Display lines, never empty
    pub lines: Vec<String>,

    /// Tokens wider than the maximum width, each placed alone
    pub overflow_tokens: usize,
}

/// Wrap `text` to `max_width` using the injected `measure`.
///
/// Always returns at least one line; empty text gives a single empty line.
pub fn wrap<F>(text: &str, max_width: f32, measure: F) -> Result<Vec<String>>
where
    F: FnMut(&str) -> Result<f32>,
{
    wrap_with_report(text, max_width, measure).map(|w| w.lines)
}

/// Wrap `text` and report how many tokens overflowed the width.
///
/// Tokens are whitespace-delimited and joined with single spaces. A token
/// wider than `max_width` is never split or hyphenated.
pub fn wrap_with_report<F>(text: &str, max_width: f32, mut measure: F) -> Result<Wrapped>
where
    F: FnMut(&str) -> Result<f32>,
{
    if !max_width.is_finite() || max_width <= 0.0 {
        return Err(Error::Configuration(format!(
            "wrap width must be positive (got {})",
            max_width
        )));
    }

    let mut width_of = |s: &str| -> Result<f32> {
        let w = measure(s)?;
        if w.is_finite() && w >= 0.0 {
            Ok(w)
        } else {
            Err(Error::measurement(s, format!("unusable width {}", w)))
        }
    };

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut overflow_tokens = 0;

    for token in text.split_whitespace() {
        if current.is_empty() {
            if width_of(token)? > max_width {
                overflow_tokens += 1;
            }
            current.push_str(token);
            continue;
        }

        let candidate = format!("{} {}", current, token);
        if width_of(&candidate)? <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::take(&mut current));
            if width_of(token)? > max_width {
                overflow_tokens += 1;
            }
            current.push_str(token);
        }
    }
    lines.push(current);

    if overflow_tokens > 0 {
        trace!("{} token(s) wider than {}", overflow_tokens, max_width);
    }

    Ok(Wrapped {
        lines,
        overflow_tokens,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// One unit per character.
    fn chars(s: &str) -> Result<f32> {
        Ok(s.chars().count() as f32)
    }

    #[test]
    fn test_wrap_greedy() {
        let lines = wrap("the quick brown fox jumps", 10.0, chars).unwrap();
        assert_eq!(lines, vec!["the quick", "brown fox", "jumps"]);
    }

    #[test]
    fn test_wrap_exact_fit() {
        let lines = wrap("aaaa bbbbb", 10.0, chars).unwrap();
        assert_eq!(lines, vec!["aaaa bbbbb"]);
    }

    #[test]
    fn test_wrap_empty_text() {
        assert_eq!(wrap("", 10.0, chars).unwrap(), vec![String::new()]);
        assert_eq!(wrap("   ", 10.0, chars).unwrap(), vec![String::new()]);
    }

    #[test]
    fn test_overlong_token_stays_whole() {
        let token = "supercalifragilisticexpialidocious";
        let report = wrap_with_report(token, 5.0, chars).unwrap();
        assert_eq!(report.lines, vec![token.to_string()]);
        assert_eq!(report.overflow_tokens, 1);
    }

    #[test]
    fn test_overlong_token_mid_paragraph() {
        let report = wrap_with_report("ab abcdefghijkl cd", 5.0, chars).unwrap();
        assert_eq!(report.lines, vec!["ab", "abcdefghijkl", "cd"]);
        assert_eq!(report.overflow_tokens, 1);
    }

    #[test]
    fn test_whitespace_collapses() {
        let lines = wrap("a   b\tc", 100.0, chars).unwrap();
        assert_eq!(lines, vec!["a b c"]);
    }

    #[test]
    fn test_invalid_width() {
        assert!(matches!(
            wrap("a", 0.0, chars),
            Err(Error::Configuration(_))
        ));
        assert!(wrap("a", f32::INFINITY, chars).is_err());
    }

    #[test]
    fn test_measurement_failure_propagates() {
        let result = wrap("a b", 10.0, |s: &str| -> Result<f32> {
            Err(Error::measurement(s, "no metrics"))
        });
        assert!(matches!(result, Err(Error::Measurement { .. })));

        let result = wrap("a b", 10.0, |_: &str| -> Result<f32> { Ok(f32::NAN) });
        assert!(matches!(result, Err(Error::Measurement { .. })));
    }

    #[test]
    fn test_rejoined_lines_reconstruct_tokens() {
        let text = "Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do";
        let lines = wrap(text, 17.0, chars).unwrap();
        assert!(lines.len() > 1);
        assert_eq!(
            lines.join(" "),
            text.split_whitespace().collect::<Vec<_>>().join(" ")
        );
    }
}
