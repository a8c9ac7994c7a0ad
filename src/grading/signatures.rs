//! Signatures of well-known puzzles, used to recognize when an answer is
//! about a *different* puzzle than the one being graded.
//!
//! Detection is deliberately coarse: an answer must hit at least two keywords
//! of a signature before we name the puzzle, and the signature with the most
//! hits wins. One stray word ("door", "coin") is not evidence.

/// (puzzle name, distinctive keywords). Keywords are matched as
/// case-insensitive substrings of the answer.
const PUZZLE_SIGNATURES: &[(&str, &[&str])] = &[
  ("Monty Hall", &["door", "goat", "car", "host", "switch door", "switching doors"]),
  ("Burning Ropes", &["rope", "fuse", "both ends", "45 minutes", "burn"]),
  ("Bridge Crossing", &["bridge", "flashlight", "torch", "17 minutes", "cross together"]),
  ("Knights and Knaves", &["knight", "knave", "liar", "always lies", "truth-teller"]),
  ("Two Guards", &["guard", "two doors", "which door", "other guard would say"]),
  ("River Crossing", &["wolf", "cabbage", "boat", "river", "one at a time"]),
  ("Wason Selection", &["card", "vowel", "even number", "turn over", "flip"]),
  ("Bat and Ball", &["bat", "ball", "$1.10", "1.10", "cents"]),
  ("Lily Pond", &["lily", "pond", "doubles", "48 days", "half covered"]),
  ("Widget Machines", &["machine", "widget", "5 minutes", "100 machines"]),
  ("Trolley Problem", &["trolley", "lever", "track", "five people", "pull"]),
  ("Prisoner's Dilemma", &["prisoner", "confess", "cooperate", "defect", "betray"]),
  ("Birthday Paradox", &["birthday", "23 people", "365", "share a birthday"]),
  ("Gambler's Fallacy", &["coin flip", "heads", "tails", "streak", "due for"]),
  ("Base Rate Neglect", &["false positive", "base rate", "disease", "test accuracy", "prevalence"]),
  ("Linda Problem", &["linda", "bank teller", "feminist", "conjunction"]),
  ("Anchoring Bias", &["anchor", "first number", "initial estimate", "adjust"]),
  ("Sunk Cost Fallacy", &["sunk cost", "already invested", "already spent", "throw good money"]),
  ("Survivorship Bias", &["bullet holes", "returning planes", "armor", "survivor"]),
  ("Simpson's Paradox", &["subgroup", "aggregate", "admission rates", "reverses", "simpson"]),
  ("Water Jugs", &["jug", "gallon", "pour", "measure exactly"]),
  ("100 Prisoners and Boxes", &["boxes", "100 prisoners", "loop", "own number"]),
  ("Zebra Puzzle", &["zebra", "five houses", "nationality", "drinks water"]),
  ("Two Children", &["two children", "at least one boy", "both girls", "boy or girl"]),
  ("Missing Dollar", &["bellboy", "hotel", "missing dollar", "$30", "paid 27"]),
];

/// Try to name the puzzle an answer is actually about.
///
/// Returns the best-matching signature name, requiring >= 2 keyword hits.
/// Ties go to the earlier entry in the table.
pub fn detect_puzzle(answer_lower: &str) -> Option<&'static str> {
  let mut best: Option<(&'static str, usize)> = None;
  for (name, keywords) in PUZZLE_SIGNATURES {
    // Keywords in the table are already lowercase.
    let hits = keywords.iter().filter(|kw| answer_lower.contains(*kw)).count();
    if hits >= 2 && best.map_or(true, |(_, b)| hits > b) {
      best = Some((name, hits));
    }
  }
  best.map(|(name, _)| name)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn monty_hall_answer_is_detected() {
    let answer = "you should always switch doors because the host opens a door with a goat";
    assert_eq!(detect_puzzle(answer), Some("Monty Hall"));
  }

  #[test]
  fn single_keyword_is_not_enough() {
    assert_eq!(detect_puzzle("open the door and walk in"), None);
  }

  #[test]
  fn most_hits_wins() {
    // "cross" appears for bridges but wolf/cabbage/boat pin it to river crossing.
    let answer = "take the goat first, then the wolf, bring the goat back, take the cabbage, cross by boat";
    assert_eq!(detect_puzzle(answer), Some("River Crossing"));
  }

  #[test]
  fn empty_answer_matches_nothing() {
    assert_eq!(detect_puzzle(""), None);
  }
}
