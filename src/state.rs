//! Application state: in-memory stores, compiled graders, and selection logic.
//!
//! This module owns:
//!   - puzzle stores (by id, by skill, last-by-skill)
//!   - the compiled answer-key store, wrapped by the expert grader
//!   - the structural evaluator
//!
//! Both graders are pure; the only mutable state here is the puzzle pool and
//! the last-served bookkeeping used to avoid immediate repeats.

use std::{collections::HashMap, sync::Arc};

use rand::seq::SliceRandom;
use tokio::sync::RwLock;
use tracing::{error, info, instrument, warn};

use crate::config::load_bank_config_from_env;
use crate::domain::{Puzzle, PuzzleSource};
use crate::grading::{AnswerKeyStore, ExpertAlignmentGrader, StructuralEvaluator};
use crate::seeds::{hard_fallback_puzzle, seed_answer_keys, seed_puzzles};
use uuid::Uuid;

#[derive(Clone)]
pub struct AppState {
    pub by_id: Arc<RwLock<HashMap<String, Puzzle>>>,
    pub by_skill: Arc<RwLock<HashMap<String, Vec<String>>>>,
    pub last_by_skill: Arc<RwLock<HashMap<String, String>>>,
    pub expert_grader: Arc<ExpertAlignmentGrader>,
    pub structural_evaluator: Arc<StructuralEvaluator>,
}

impl AppState {
    /// Build state from env: load config, seed puzzles, build indices,
    /// compile answer keys.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Self {
        let cfg_opt = load_bank_config_from_env();

        let mut id_map = HashMap::<String, Puzzle>::new();
        let mut skill_map = HashMap::<String, Vec<String>>::new();
        let mut key_store = AnswerKeyStore::new();

        // Insert config-based puzzles (if any).
        if let Some(cfg) = &cfg_opt {
            for pc in &cfg.puzzles {
                let id = pc.id.clone().unwrap_or_else(|| Uuid::new_v4().to_string());
                if pc.prompt.trim().is_empty() {
                    error!(target: "puzzle", %id, skill = %pc.skill, "Skipping bank item: empty prompt");
                    continue;
                }
                let puzzle = Puzzle {
                    id: id.clone(),
                    title: pc.title.clone(),
                    skill: pc.skill.clone(),
                    difficulty: pc.difficulty.clone().unwrap_or_else(|| "medium".into()),
                    source: PuzzleSource::LocalBank,
                    prompt: pc.prompt.clone(),
                    ideal_answer: pc.ideal_answer.clone().unwrap_or_default(),
                    key_principles: pc.key_principles.clone(),
                };
                skill_map.entry(puzzle.skill.clone()).or_default().push(id.clone());
                id_map.insert(id, puzzle);
            }
            for kc in &cfg.answer_keys {
                key_store.insert(&kc.puzzle_id, &kc.key);
            }
        }

        // Always insert built-in seeds, but don't overwrite existing ids.
        for p in seed_puzzles() {
            if id_map.contains_key(&p.id) {
                continue;
            }
            skill_map.entry(p.skill.clone()).or_default().push(p.id.clone());
            id_map.insert(p.id.clone(), p);
        }
        for (puzzle_id, key) in seed_answer_keys() {
            key_store.insert(&puzzle_id, &key);
        }

        // Inventory summary by skill/source.
        let mut count_by_skill: HashMap<String, (usize, usize)> = HashMap::new();
        for p in id_map.values() {
            let entry = count_by_skill.entry(p.skill.clone()).or_insert((0, 0));
            match p.source {
                PuzzleSource::LocalBank => entry.0 += 1,
                PuzzleSource::Seed => entry.1 += 1,
            }
        }
        for (skill, (bank, seed)) in count_by_skill {
            info!(target: "puzzle", %skill, local_bank = bank, seed = seed, "Startup puzzle inventory");
        }
        key_store.log_inventory();

        Self {
            by_id: Arc::new(RwLock::new(id_map)),
            by_skill: Arc::new(RwLock::new(skill_map)),
            last_by_skill: Arc::new(RwLock::new(HashMap::new())),
            expert_grader: Arc::new(ExpertAlignmentGrader::new(key_store)),
            structural_evaluator: Arc::new(StructuralEvaluator::new()),
        }
    }

    /// Insert a puzzle into the stores (by_id and by_skill).
    #[instrument(level = "debug", skip(self, p), fields(id = %p.id))]
    pub async fn insert_puzzle(&self, p: Puzzle) {
        let mut by_id = self.by_id.write().await;
        let mut by_skill = self.by_skill.write().await;
        let id = p.id.clone();
        let skill = p.skill.clone();
        by_id.insert(id.clone(), p);
        by_skill.entry(skill).or_default().push(id);
    }

    /// Selection policy: random pick from the skill's pool, avoiding the
    /// puzzle served last time when there is a choice. Falls back to a
    /// hard-coded puzzle for skills the bank doesn't cover.
    #[instrument(level = "info", skip(self), fields(%skill))]
    pub async fn choose_puzzle(&self, skill: &str) -> (Puzzle, &'static str) {
        if let Some(ids) = { self.by_skill.read().await.get(skill).cloned() } {
            if !ids.is_empty() {
                let last = { self.last_by_skill.read().await.get(skill).cloned() };
                let candidates: Vec<&String> = match &last {
                    Some(last_id) if ids.len() > 1 => ids.iter().filter(|id| *id != last_id).collect(),
                    _ => ids.iter().collect(),
                };
                let chosen_id = candidates
                    .choose(&mut rand::thread_rng())
                    .map(|s| (*s).clone())
                    .unwrap_or_else(|| ids[0].clone());

                if let Some(p) = { self.by_id.read().await.get(&chosen_id).cloned() } {
                    self.last_by_skill
                        .write()
                        .await
                        .insert(skill.to_string(), chosen_id.clone());
                    info!(target: "puzzle", %skill, chosen = %chosen_id, source = "pool", "Serving puzzle");
                    return (p, "pool");
                }
            }
        }

        // Last resort: hard fallback.
        let p = hard_fallback_puzzle(skill.to_string());
        let id = p.id.clone();
        self.insert_puzzle(p.clone()).await;
        self.last_by_skill.write().await.insert(skill.to_string(), id.clone());
        warn!(target: "puzzle", %skill, chosen = %id, source = "hard_fallback", "Inserted hard fallback puzzle");
        (p, "hard_fallback")
    }

    /// Read-only access to a puzzle by id.
    #[instrument(level = "debug", skip(self), fields(%id))]
    pub async fn get_puzzle(&self, id: &str) -> Option<Puzzle> {
        let by_id = self.by_id.read().await;
        by_id.get(id).cloned()
    }
}
