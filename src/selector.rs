// This file is part of Legible.
//
// Copyright (c) 2026  Legible contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Picks the next phonotactically safe letters for a word under construction.
//!
//! None of these functions can fail: an empty candidate set falls back to a
//! small fixed set so the word builder always makes progress.

use crate::builder::WordBuildState;
use crate::rules::PhonotacticRules;
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::debug;

const FALLBACK_VOWELS: [char; 3] = ['a', 'e', 'o'];
const FALLBACK_CONSONANTS: [char; 4] = ['n', 'r', 's', 't'];

/// Chance of keeping a repeated `a` ("aa") when the word already ends in `a`.
const REPEATED_A_CHANCE: f64 = 0.1;

/// Chance that a consonant is followed by a vowel rather than `r`/`l`.
const VOWEL_AFTER_CONSONANT_CHANCE: f64 = 0.8;

/// Remaining budget required before a two-letter cluster is offered.
const CLUSTER_MIN_REMAINING: usize = 4;

/// Remaining budget required before `ch`, `ll` or `ñ` is offered.
const DIGRAPH_MIN_REMAINING: usize = 3;

pub fn next_vowel<R: Rng + ?Sized>(
    rules: &PhonotacticRules,
    state: &WordBuildState,
    rng: &mut R,
) -> char {
    let last = state.last_char();
    let candidates: Vec<char> = rules
        .vowels
        .iter()
        .copied()
        .filter(|&vowel| {
            if Some(vowel) == last {
                vowel == 'a' && rng.gen_bool(REPEATED_A_CHANCE)
            } else {
                true
            }
        })
        .collect();

    pick_or_fallback(&candidates, &FALLBACK_VOWELS, rng)
}

pub fn next_consonant<R: Rng + ?Sized>(
    rules: &PhonotacticRules,
    state: &WordBuildState,
    rng: &mut R,
) -> char {
    let last = state.last_char();
    let candidates: Vec<char> = rules
        .consonants
        .iter()
        .copied()
        .filter(|&consonant| match last {
            Some(prev) if prev == consonant => rules.is_natural_double(consonant),
            Some(prev) => !rules.is_invalid_combination(prev, consonant),
            None => true,
        })
        .collect();

    pick_or_fallback(&candidates, &FALLBACK_CONSONANTS, rng)
}

/// Context-sensitive continuation for a non-empty word.
///
/// Returns `None` when nothing qualifies; the caller appends a vowel instead.
pub fn next_character_set<R: Rng + ?Sized>(
    rules: &PhonotacticRules,
    state: &WordBuildState,
    rng: &mut R,
) -> Option<String> {
    let last = state.last_char()?;

    if rules.is_vowel(last) {
        let mut options: Vec<String> = rules
            .consonants
            .iter()
            .filter(|&&c| !rules.is_invalid_combination(last, c))
            .map(|c| c.to_string())
            .collect();

        if state.remaining() >= CLUSTER_MIN_REMAINING {
            options.extend(
                rules
                    .valid_clusters
                    .iter()
                    .filter(|cluster| !starts_invalid(rules, last, cluster))
                    .map(|cluster| cluster.to_string()),
            );
        }

        if state.remaining() >= DIGRAPH_MIN_REMAINING {
            options.extend(
                rules
                    .special_digraphs
                    .iter()
                    .filter(|digraph| !starts_invalid(rules, last, digraph))
                    .map(|digraph| digraph.to_string()),
            );
        }

        return options.choose(rng).cloned();
    }

    if rng.gen_bool(VOWEL_AFTER_CONSONANT_CHANCE) {
        return Some(next_vowel(rules, state, rng).to_string());
    }

    if rules.precede_r.contains(&last) && rng.gen_bool(0.5) {
        Some("r".to_string())
    } else if rules.precede_l.contains(&last) {
        Some("l".to_string())
    } else {
        Some(next_vowel(rules, state, rng).to_string())
    }
}

fn starts_invalid(rules: &PhonotacticRules, last: char, piece: &str) -> bool {
    piece
        .chars()
        .next()
        .is_some_and(|first| rules.is_invalid_combination(last, first))
}

fn pick_or_fallback<R: Rng + ?Sized>(candidates: &[char], fallback: &[char], rng: &mut R) -> char {
    match candidates.choose(rng) {
        Some(&c) => c,
        None => {
            debug!(?fallback, "no candidate survived filtering, using fallback set");
            fallback.choose(rng).copied().unwrap_or(fallback[0])
        }
    }
}
