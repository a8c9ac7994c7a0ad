//! Small utility helpers used across modules.

/// Whitespace-delimited word count, the measure all length heuristics use.
pub fn word_count(s: &str) -> usize {
  s.split_whitespace().count()
}

/// Sentence count: non-empty runs between terminal punctuation.
/// Good enough for prose heuristics; not a sentence parser.
pub fn sentence_count(s: &str) -> usize {
  s.split(['.', '!', '?']).filter(|part| !part.trim().is_empty()).count()
}

/// Log-safe truncation for large strings.
/// Avoids spamming logs with huge request/response payloads.
/// The cut lands on a char boundary; `max` is a byte budget, not a char count.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  if s.len() <= max {
    return s.to_string();
  }
  let mut cut = max;
  while !s.is_char_boundary(cut) {
    cut -= 1;
  }
  format!("{}… ({} bytes total)", &s[..cut], s.len())
}
