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

//! Grows the readable stem of a password under a target-length budget.

use crate::generator::GenerationOptions;
use crate::rules::PhonotacticRules;
use crate::selector::{next_character_set, next_consonant, next_vowel};
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::debug;

const TRADITIONAL_MAX_ATTEMPTS: usize = 100;
const COMPLEX_MAX_ATTEMPTS: usize = 50;

const ROOT_SEED_CHANCE: f64 = 0.3;
const ROOT_SEED_MIN_TARGET: usize = 8;
const INITIAL_CONSONANT_CHANCE: f64 = 0.75;

const COMPLEX_STRATEGY_CHANCE: f64 = 0.4;
const COMPLEX_START_CHANCE: f64 = 0.7;
const COMPLEX_MIDDLE_CHANCE: f64 = 0.3;
const RHYTHM_COMPLEX_CHANCE: f64 = 0.3;
const RHYTHM_MIN_TARGET: usize = 6;

/// Characters kept free at the end of every stem for security characters.
pub const SECURITY_HEADROOM: usize = 2;

/// Word under construction together with its target length.
///
/// Lengths are counted in characters, so `ñ` takes one slot.
#[derive(Debug, Clone, Default)]
pub struct WordBuildState {
    word: String,
    len: usize,
    target_length: usize,
}

impl WordBuildState {
    pub fn new(target_length: usize) -> Self {
        Self {
            word: String::new(),
            len: 0,
            target_length,
        }
    }

    pub fn seeded(word: &str, target_length: usize) -> Self {
        Self {
            word: word.to_string(),
            len: word.chars().count(),
            target_length,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.word
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn target_length(&self) -> usize {
        self.target_length
    }

    pub fn last_char(&self) -> Option<char> {
        self.word.chars().next_back()
    }

    pub fn ends_in_vowel(&self, rules: &PhonotacticRules) -> bool {
        self.last_char().is_some_and(|c| rules.is_vowel(c))
    }

    /// Characters left before the target length is reached.
    pub fn remaining(&self) -> usize {
        self.target_length.saturating_sub(self.len)
    }

    pub fn push(&mut self, c: char) {
        self.word.push(c);
        self.len += 1;
    }

    pub fn push_str(&mut self, piece: &str) {
        self.word.push_str(piece);
        self.len += piece.chars().count();
    }

    pub fn pop(&mut self) -> Option<char> {
        let c = self.word.pop()?;
        self.len -= 1;
        Some(c)
    }

    pub fn truncate(&mut self, max_chars: usize) {
        if self.len > max_chars {
            if let Some((byte_idx, _)) = self.word.char_indices().nth(max_chars) {
                self.word.truncate(byte_idx);
            }
            self.len = max_chars;
        }
    }

    pub fn into_string(self) -> String {
        self.word
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Rhythmic,
    ComplexSyllable,
    Traditional,
}

pub fn choose_strategy<R: Rng + ?Sized>(
    options: &GenerationOptions,
    target_length: usize,
    rng: &mut R,
) -> Strategy {
    if options.use_rhythm && target_length >= RHYTHM_MIN_TARGET {
        Strategy::Rhythmic
    } else if options.use_complex_syllables && rng.gen_bool(COMPLEX_STRATEGY_CHANCE) {
        Strategy::ComplexSyllable
    } else {
        Strategy::Traditional
    }
}

/// Builds a readable stem of at most `target_length - 2` characters.
pub fn build_word<R: Rng + ?Sized>(
    rules: &PhonotacticRules,
    options: &GenerationOptions,
    target_length: usize,
    rng: &mut R,
) -> String {
    let strategy = choose_strategy(options, target_length, rng);

    let mut state = match strategy {
        Strategy::Rhythmic => build_rhythmic(rules, options, target_length, rng),
        Strategy::ComplexSyllable => build_complex_syllable(rules, target_length, rng),
        Strategy::Traditional => build_traditional(rules, target_length, rng),
    };

    if options.add_endings
        && state.len() >= 4
        && state.len() <= target_length.saturating_sub(3)
    {
        add_ending(rules, &mut state, rng);
    }

    state.truncate(target_length.saturating_sub(SECURITY_HEADROOM));

    debug!(?strategy, target_length, stem_len = state.len(), "built readable stem");

    state.into_string()
}

pub fn build_traditional<R: Rng + ?Sized>(
    rules: &PhonotacticRules,
    target_length: usize,
    rng: &mut R,
) -> WordBuildState {
    let mut state = WordBuildState::new(target_length);

    if target_length >= ROOT_SEED_MIN_TARGET && rng.gen_bool(ROOT_SEED_CHANCE) {
        if let Some(root) = rules.word_roots.choose(rng) {
            if root.chars().count() + 3 <= target_length {
                state.push_str(root);
            }
        }
    }

    let mut attempts = 0;
    while state.len() + 2 < target_length && attempts < TRADITIONAL_MAX_ATTEMPTS {
        attempts += 1;

        if state.is_empty() {
            if rng.gen_bool(INITIAL_CONSONANT_CHANCE) {
                let initials = rules.initial_consonants();
                match initials.choose(rng) {
                    Some(&c) => state.push(c),
                    None => state.push(next_consonant(rules, &state, rng)),
                }
            } else {
                state.push(next_vowel(rules, &state, rng));
            }
        } else {
            extend(rules, &mut state, rng);
        }
    }

    if attempts == TRADITIONAL_MAX_ATTEMPTS {
        debug!(len = state.len(), "traditional builder hit its iteration cap");
    }

    state
}

pub fn build_complex_syllable<R: Rng + ?Sized>(
    rules: &PhonotacticRules,
    target_length: usize,
    rng: &mut R,
) -> WordBuildState {
    let mut state = WordBuildState::new(target_length);

    if rng.gen_bool(COMPLEX_START_CHANCE) {
        if let Some(start) = rules.fragments.start.choose(rng) {
            if start.chars().count() + 3 <= target_length {
                state.push_str(start);
            }
        }
    }

    let mut attempts = 0;
    while state.len() + 3 < target_length && attempts < COMPLEX_MAX_ATTEMPTS {
        attempts += 1;

        if state.is_empty() {
            state.push(next_consonant(rules, &state, rng));
            continue;
        }

        if rng.gen_bool(COMPLEX_MIDDLE_CHANCE) && state.len() + 5 < target_length {
            if let Some(middle) = rules.fragments.middle.choose(rng) {
                if state.len() + middle.chars().count() + SECURITY_HEADROOM <= target_length {
                    state.push_str(middle);
                    continue;
                }
            }
        }

        extend(rules, &mut state, rng);
    }

    if attempts == COMPLEX_MAX_ATTEMPTS {
        debug!(len = state.len(), "complex-syllable builder hit its iteration cap");
    }

    state
}

pub fn build_rhythmic<R: Rng + ?Sized>(
    rules: &PhonotacticRules,
    options: &GenerationOptions,
    target_length: usize,
    rng: &mut R,
) -> WordBuildState {
    let mut state = WordBuildState::new(target_length);
    let Some(pattern) = rules.rhythmic_patterns.choose(rng) else {
        return state;
    };
    let slots: Vec<char> = pattern.chars().collect();

    let mut i = 0;
    while i < slots.len() && state.len() + 3 < target_length {
        match slots[i] {
            'C' => {
                if options.use_complex_syllables
                    && rng.gen_bool(RHYTHM_COMPLEX_CHANCE)
                    && state.len() + 5 < target_length
                {
                    if let Some(start) = rules.fragments.start.choose(rng) {
                        if state.len() + start.chars().count() + SECURITY_HEADROOM
                            <= target_length
                        {
                            // the fragment carries its own vowel, so it fills the next slot too
                            state.push_str(start);
                            i += 2;
                            continue;
                        }
                    }
                }
                state.push(next_consonant(rules, &state, rng));
            }
            'V' => state.push(next_vowel(rules, &state, rng)),
            _ => {}
        }
        i += 1;
    }

    debug!(pattern, len = state.len(), "rhythmic builder finished");

    state
}

/// Appends a grammatical ending that fits the remaining space.
pub fn add_ending<R: Rng + ?Sized>(
    rules: &PhonotacticRules,
    state: &mut WordBuildState,
    rng: &mut R,
) {
    let available = state
        .target_length()
        .saturating_sub(state.len() + SECURITY_HEADROOM);
    if available < 2 {
        return;
    }

    let Some((class, endings)) = rules.endings.choose(rng) else {
        return;
    };

    let fitting: Vec<&str> = endings
        .iter()
        .copied()
        .filter(|ending| ending.chars().count() <= available)
        .collect();

    let Some(&ending) = fitting.choose(rng) else {
        return;
    };

    let ending_starts_with_vowel = ending.chars().next().is_some_and(|c| rules.is_vowel(c));
    if ending_starts_with_vowel && state.ends_in_vowel(rules) {
        state.pop();
    }

    debug!(?class, ending, "appending word ending");
    state.push_str(ending);
}

fn extend<R: Rng + ?Sized>(rules: &PhonotacticRules, state: &mut WordBuildState, rng: &mut R) {
    match next_character_set(rules, state, rng) {
        Some(piece) => state.push_str(&piece),
        None => {
            let vowel = next_vowel(rules, state, rng);
            state.push(vowel);
        }
    }
}
