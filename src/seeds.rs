//! Seed data: built-in puzzles and answer keys that keep the app useful with
//! no external config at all.

use uuid::Uuid;

use crate::domain::{AnswerKey, Conclusion, CoreElement, Puzzle, PuzzleSource, WrongAnswerPattern};

/// Minimal built-in puzzle bank. The first two carry expert answer keys
/// (see `seed_answer_keys`); the rest are graded structurally.
pub fn seed_puzzles() -> Vec<Puzzle> {
  vec![
    Puzzle {
      id: "monty-hall".into(),
      title: "The Monty Hall Problem".into(),
      skill: "probability".into(),
      difficulty: "medium".into(),
      source: PuzzleSource::Seed,
      prompt: "You pick one of three doors; one hides a car, two hide goats. The host, who \
        knows where the car is, opens another door revealing a goat and offers you a switch. \
        Should you switch, and why?"
        .into(),
      ideal_answer: String::new(),
      key_principles: vec![],
    },
    Puzzle {
      id: "burning-ropes".into(),
      title: "Burning Ropes Timer".into(),
      skill: "logic".into(),
      difficulty: "hard".into(),
      source: PuzzleSource::Seed,
      prompt: "You have two ropes that each take exactly one hour to burn, but they burn \
        unevenly. Using only these ropes and a lighter, how do you measure 45 minutes?"
        .into(),
      ideal_answer: String::new(),
      key_principles: vec![],
    },
    Puzzle {
      id: "vaccine-timing".into(),
      title: "Vaccines and Timing".into(),
      skill: "causal_reasoning".into(),
      difficulty: "easy".into(),
      source: PuzzleSource::Seed,
      prompt: "A parent argues that vaccines cause autism because symptoms often appear \
        shortly after routine childhood vaccinations. What is wrong with this reasoning, and \
        what evidence would settle the question?"
        .into(),
      ideal_answer: "The argument confuses correlation with causation: vaccination and symptom \
        onset both cluster at the same age, so the timing is a coincidence, not evidence of a \
        causal link. Controlled studies comparing vaccinated and unvaccinated groups are what \
        would settle it, and such studies show no difference."
        .into(),
      key_principles: vec![
        "Correlation does not imply causation".into(),
        "Coinciding timing can be explained by a common factor (age)".into(),
        "Controlled comparison groups isolate the causal question".into(),
      ],
    },
    Puzzle {
      id: "remote-work-claim".into(),
      title: "The Remote Work Memo".into(),
      skill: "critical_evaluation".into(),
      difficulty: "medium".into(),
      source: PuzzleSource::Seed,
      prompt: "A memo claims remote work destroyed productivity, citing a drop in badge swipes \
        at headquarters. Evaluate the argument."
        .into(),
      ideal_answer: "The memo's evidence measures attendance, not productivity, so the claim \
        does not follow. Badge swipes would drop under remote work even if output rose. What's \
        needed is a measure of output itself, compared before and after, ideally controlling \
        for other changes in the same period."
        .into(),
      key_principles: vec![
        "Identify what the evidence actually measures".into(),
        "Attendance is a proxy, not productivity".into(),
        "Compare outcomes, controlling for confounds".into(),
      ],
    },
  ]
}

/// Expert answer keys for the seed puzzles that have one, keyed by puzzle id.
pub fn seed_answer_keys() -> Vec<(String, AnswerKey)> {
  vec![
    ("monty-hall".into(), monty_hall_key()),
    ("burning-ropes".into(), burning_ropes_key()),
  ]
}

fn monty_hall_key() -> AnswerKey {
  AnswerKey {
    title: "The Monty Hall Problem".into(),
    puzzle_context: vec!["door".into(), "host".into(), "goat".into(), "switch".into(), "car".into()],
    required_concepts: vec![
      vec!["host knows".into(), "knows where".into(), "never opens the car".into()],
      vec!["1/3".into(), "one third".into(), "one-third".into()],
      vec!["2/3".into(), "two thirds".into(), "two-thirds".into()],
    ],
    core_answer: vec![
      CoreElement {
        element: "the original pick wins 1/3 of the time".into(),
        weight: 30.0,
        patterns: vec![r"(1/3|one.third).{0,40}(first|original|initial)".into(), r"(first|original|initial).{0,40}(1/3|one.third)".into()],
      },
      CoreElement {
        element: "the host's reveal is not random information".into(),
        weight: 40.0,
        patterns: vec![r"host.{0,60}(knows|never|always).{0,40}goat".into(), r"(not|isn'?t) random".into()],
      },
      CoreElement {
        element: "switching concentrates the remaining 2/3".into(),
        weight: 30.0,
        patterns: vec![r"switch(ing)?.{0,60}(2/3|two.thirds)".into(), r"(2/3|two.thirds).{0,60}switch".into()],
      },
    ],
    correct_conclusion: Conclusion {
      patterns: vec![
        r"(should|always) switch".into(),
        r"switch(ing)? (doors? )?(wins|is better|improves)".into(),
      ],
      description: "You should always switch; switching wins 2/3 of the time.".into(),
    },
    bonus_insights: vec![
      "100 doors".into(),
      "conditional probability".into(),
      "information".into(),
    ],
    wrong_answer_patterns: vec![
      WrongAnswerPattern {
        pattern: r"(50[/\-:]50|fifty.fifty|doesn'?t matter|no difference|even odds)".into(),
        feedback: "The odds are not 50/50 after the reveal. The host's choice is constrained, \
          so the two remaining doors are not symmetric."
          .into(),
      },
      WrongAnswerPattern {
        pattern: r"(stay|stick) (with|to) (your|the) (door|pick|choice) (is|because it'?s) (better|safer)".into(),
        feedback: "Staying wins only when your original 1/3 pick was right; switching wins in \
          the other 2/3 of cases."
          .into(),
      },
    ],
  }
}

fn burning_ropes_key() -> AnswerKey {
  AnswerKey {
    title: "Burning Ropes Timer".into(),
    puzzle_context: vec!["rope".into(), "burn".into(), "light".into(), "minutes".into(), "hour".into()],
    required_concepts: vec![
      vec!["uneven".into(), "not uniform".into(), "non-uniform".into(), "unevenly".into()],
      vec!["both ends".into(), "two ends".into(), "each end".into()],
    ],
    core_answer: vec![
      CoreElement {
        element: "light rope A at both ends and rope B at one end".into(),
        weight: 40.0,
        patterns: vec![r"both ends.{0,80}(one end|other rope|second rope)".into(), r"(first|one) rope.{0,40}both ends".into()],
      },
      CoreElement {
        element: "rope A finishing marks 30 minutes".into(),
        weight: 30.0,
        patterns: vec![r"(30|thirty) ?min".into(), r"half (an hour|the time)".into()],
      },
      CoreElement {
        element: "then light rope B's other end for 15 more minutes".into(),
        weight: 30.0,
        patterns: vec![r"(then|when|after).{0,80}(other|second) end".into(), r"(15|fifteen) ?min".into()],
      },
    ],
    correct_conclusion: Conclusion {
      patterns: vec![r"45\s*min".into(), "forty-five".into()],
      description: "30 minutes plus 15 minutes gives exactly 45 minutes.".into(),
    },
    bonus_insights: vec!["remaining".into(), "simultaneous".into(), "regardless of how unevenly".into()],
    wrong_answer_patterns: vec![WrongAnswerPattern {
      pattern: r"(fold|cut|measure).{0,30}(rope|half|quarter)".into(),
      feedback: "Folding or cutting the rope doesn't work: the ropes burn unevenly, so length \
        does not correspond to time."
        .into(),
    }],
  }
}

/// Absolute last resort: if the bank has nothing for a skill, we inject this.
pub fn hard_fallback_puzzle(skill: String) -> Puzzle {
  Puzzle {
    id: Uuid::new_v4().to_string(),
    title: "Vaccines and Timing".into(),
    skill,
    difficulty: "easy".into(),
    source: PuzzleSource::Seed,
    prompt: "A parent argues that vaccines cause autism because symptoms often appear shortly \
      after routine childhood vaccinations. What is wrong with this reasoning?"
      .into(),
    ideal_answer: "The timing is a coincidence of age, not evidence of causation; controlled \
      comparisons are needed."
      .into(),
    key_principles: vec!["Correlation does not imply causation".into()],
  }
}
