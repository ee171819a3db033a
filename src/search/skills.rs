//! Multi-strategy skill-name ranking.
//!
//! Every candidate is classified into the best rank bucket it satisfies:
//!
//! 1. exact (case-insensitive equality)
//! 2. prefix (name starts with the term)
//! 3. linguistic (stemmed, word-order independent token match)
//! 4. fuzzy (trigram similarity above a fixed floor)
//!
//! A skill matching none of the four is excluded outright. Final order is
//! `(rank asc, linguistic relevance desc, trigram similarity desc, name
//! asc)` — exact and prefix matches always outrank fuzzy ones no matter how
//! high the fuzzy score, while the continuous scores break ties within a
//! bucket and the name gives a last deterministic key.

use std::cmp::Ordering;

use crate::error::{Result, SearchError};
use crate::model::Skill;
use crate::search::text;
use crate::store::Database;

/// A classified candidate. Internal to ranking; the rank and scores are
/// discarded after ordering and never returned to the caller.
#[derive(Debug)]
struct SkillMatch {
    skill: Skill,
    match_rank: u8,
    linguistic_relevance: f32,
    fuzzy_similarity: f32,
}

/// Rank the given vocabulary against a search term, capped at `cap`.
pub fn rank_skills(term: &str, vocabulary: Vec<Skill>, fuzzy_floor: f32, cap: usize) -> Result<Vec<Skill>> {
    let term = term.trim();
    if term.is_empty() {
        return Err(SearchError::InvalidInput(
            "search term cannot be empty".into(),
        ));
    }
    let term_lower = term.to_lowercase();

    let mut matches: Vec<SkillMatch> = vocabulary
        .into_iter()
        .filter_map(|skill| classify(&term_lower, term, skill, fuzzy_floor))
        .collect();

    matches.sort_by(|a, b| {
        a.match_rank
            .cmp(&b.match_rank)
            .then_with(|| {
                b.linguistic_relevance
                    .partial_cmp(&a.linguistic_relevance)
                    .unwrap_or(Ordering::Equal)
            })
            .then_with(|| {
                b.fuzzy_similarity
                    .partial_cmp(&a.fuzzy_similarity)
                    .unwrap_or(Ordering::Equal)
            })
            .then_with(|| {
                a.skill
                    .name
                    .to_lowercase()
                    .cmp(&b.skill.name.to_lowercase())
            })
    });
    matches.truncate(cap);

    Ok(matches.into_iter().map(|m| m.skill).collect())
}

/// Classify one skill, returning None when no strategy admits it.
fn classify(term_lower: &str, term: &str, skill: Skill, fuzzy_floor: f32) -> Option<SkillMatch> {
    let name_lower = skill.name.to_lowercase();

    // Tie-break scores are computed for every admitted candidate, whatever
    // bucket admitted it.
    let linguistic_relevance = text::linguistic_relevance(term, &skill.name);
    let fuzzy_similarity = text::trigram_similarity(term, &skill.name);

    let match_rank = if name_lower == term_lower {
        1
    } else if name_lower.starts_with(term_lower) {
        2
    } else if text::linguistic_match(term, &skill.name) {
        3
    } else if fuzzy_similarity > fuzzy_floor {
        4
    } else {
        return None;
    };

    Some(SkillMatch {
        skill,
        match_rank,
        linguistic_relevance,
        fuzzy_similarity,
    })
}

/// Load the vocabulary and rank it.
pub fn search_skills(
    db: &Database,
    term: &str,
    fuzzy_floor: f32,
    cap: usize,
) -> Result<Vec<Skill>> {
    let vocabulary = db.all_skills()?;
    rank_skills(term, vocabulary, fuzzy_floor, cap)
}
