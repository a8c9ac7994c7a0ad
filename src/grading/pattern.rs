//! Regex-as-data matching for answer keys.
//!
//! Answer-key patterns arrive as plain strings (from built-in seeds or TOML).
//! Each is compiled once, case-insensitively, when the key is loaded. A string
//! that fails to compile degrades to case-insensitive substring matching; a
//! malformed pattern must never take down the grading path.

use regex::{Regex, RegexBuilder};
use tracing::warn;

/// A single compiled answer-key pattern.
#[derive(Clone, Debug)]
pub enum Matcher {
  Regex(Regex),
  /// Lowercased literal, matched as substring against the lowercased answer.
  Substring(String),
}

impl Matcher {
  /// Compile a pattern string, falling back to substring matching on error.
  pub fn compile(pattern: &str) -> Self {
    match RegexBuilder::new(pattern).case_insensitive(true).build() {
      Ok(re) => Matcher::Regex(re),
      Err(e) => {
        warn!(target: "grading", %pattern, error = %e, "Pattern is not valid regex; using substring match");
        Matcher::Substring(pattern.to_lowercase())
      }
    }
  }

  /// True if this pattern matches anywhere in `text`.
  /// `text_lower` must be the lowercased form of the same text.
  pub fn is_match(&self, text: &str, text_lower: &str) -> bool {
    match self {
      Matcher::Regex(re) => re.is_match(text),
      Matcher::Substring(needle) => text_lower.contains(needle.as_str()),
    }
  }
}

/// Compile a whole pattern list. Used for core elements, conclusions, and
/// wrong-answer patterns alike.
pub fn compile_all(patterns: &[String]) -> Vec<Matcher> {
  patterns.iter().map(|p| Matcher::compile(p)).collect()
}

/// True if any pattern in the list matches.
pub fn any_match(matchers: &[Matcher], text: &str, text_lower: &str) -> bool {
  matchers.iter().any(|m| m.is_match(text, text_lower))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn valid_regex_matches_case_insensitively() {
    let m = Matcher::compile(r"switch(ing)? doors?");
    assert!(m.is_match("You should SWITCH DOORS.", "you should switch doors."));
    assert!(m.is_match("switching door", "switching door"));
    assert!(!m.is_match("stay put", "stay put"));
  }

  #[test]
  fn malformed_regex_degrades_to_substring() {
    let m = Matcher::compile("2/3 chance ((");
    match &m {
      Matcher::Substring(s) => assert_eq!(s, "2/3 chance (("),
      Matcher::Regex(_) => panic!("expected substring fallback"),
    }
    let text = "There is a 2/3 chance (( if you switch.";
    assert!(m.is_match(text, &text.to_lowercase()));
  }

  #[test]
  fn any_match_over_list() {
    let ms = compile_all(&["always switch".into(), "two.thirds".into()]);
    let text = "Switching wins two-thirds of the time.";
    assert!(any_match(&ms, text, &text.to_lowercase()));
  }
}
