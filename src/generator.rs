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

use crate::analyzer::{PhoneticAnalysis, StrengthLevel, analyze, calculate_strength};
use crate::assembler::{
    adjust_to_exact_length, apply_random_capitalization, apply_readable_leet, capitalize_first,
    insert_security_chars,
};
use crate::builder::build_word;
use crate::numbers::generate_numbers;
use crate::rules::PhonotacticRules;
use anyhow::Result;
use chrono::{Datelike, Utc};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::debug;
use zeroize::{Zeroize, ZeroizeOnDrop};

pub const MIN_LENGTH: usize = 6;
pub const MAX_LENGTH: usize = 64;
pub const DEFAULT_LENGTH: usize = 12;

const MIN_STEM_BUDGET: usize = 4;
const LEET_CHANCE: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerationOptions {
    pub target_length: usize,
    pub use_complex_syllables: bool,
    /// Capitalize only the first letter; otherwise capitals land at random.
    pub capitalize_first: bool,
    pub add_endings: bool,
    pub use_rhythm: bool,
    pub include_uppercase: bool,
    pub include_lowercase: bool,
    pub include_numbers: bool,
    pub include_symbols: bool,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            target_length: DEFAULT_LENGTH,
            use_complex_syllables: false,
            capitalize_first: true,
            add_endings: false,
            use_rhythm: false,
            include_uppercase: true,
            include_lowercase: true,
            include_numbers: true,
            include_symbols: false,
        }
    }
}

impl GenerationOptions {
    pub fn validate(&self) -> Result<()> {
        if !(MIN_LENGTH..=MAX_LENGTH).contains(&self.target_length) {
            anyhow::bail!(
                "Password length must be between {} and {} characters (got {})",
                MIN_LENGTH,
                MAX_LENGTH,
                self.target_length
            );
        }
        Ok(())
    }

    pub fn security_chars_needed(&self) -> usize {
        let numbers = if self.include_numbers { 2 } else { 0 };
        let symbols = if self.include_symbols { 1 } else { 0 };
        numbers + symbols
    }

    /// Letters are upper-cased throughout, padding included.
    pub fn uppercase_only(&self) -> bool {
        self.include_uppercase && !self.include_lowercase
    }

    /// Length budget handed to the word builder.
    pub fn base_word_length(&self) -> usize {
        self.target_length
            .saturating_sub(self.security_chars_needed())
            .max(MIN_STEM_BUDGET)
    }
}

#[derive(Clone, Serialize, Zeroize, ZeroizeOnDrop)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedPassword {
    pub password: String,
    pub readable_stem: String,
    pub strength_score: u8,
    #[zeroize(skip)]
    pub strength_level: StrengthLevel,
    #[zeroize(skip)]
    pub analysis: PhoneticAnalysis,
}

/// Password generator bound to a rule table and a reference year.
///
/// The year only feeds the "recent year" number pattern.
#[derive(Debug, Clone, Copy)]
pub struct Generator<'a> {
    rules: &'a PhonotacticRules,
    current_year: i32,
}

impl Generator<'static> {
    pub fn new() -> Self {
        Self {
            rules: PhonotacticRules::spanish(),
            current_year: Utc::now().year(),
        }
    }
}

impl Default for Generator<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Generator<'a> {
    pub fn with_rules(rules: &'a PhonotacticRules, current_year: i32) -> Self {
        Self {
            rules,
            current_year,
        }
    }

    pub fn with_year(self, current_year: i32) -> Self {
        Self {
            current_year,
            ..self
        }
    }

    pub fn generate<R: Rng + ?Sized>(
        &self,
        options: &GenerationOptions,
        rng: &mut R,
    ) -> Result<GeneratedPassword> {
        options.validate()?;

        let length = options.target_length;
        let stem = build_word(self.rules, options, options.base_word_length(), rng);

        let mut readable = if !options.include_uppercase {
            stem
        } else if options.uppercase_only() {
            stem.to_uppercase()
        } else if options.capitalize_first {
            capitalize_first(&stem)
        } else {
            apply_random_capitalization(&stem, rng)
        };

        if rng.gen_bool(LEET_CHANCE) {
            readable = apply_readable_leet(self.rules, &readable);
        }

        let mut password = readable.clone();

        if options.include_numbers {
            let numbers = generate_numbers(self.current_year, rng);
            password = insert_security_chars(&password, &numbers, length, rng);
        }

        if options.include_symbols {
            if let Some(symbol) = self.rules.symbols.choose(rng) {
                password = insert_security_chars(&password, &symbol.to_string(), length, rng);
            }
        }

        let mut password = adjust_to_exact_length(self.rules, &password, &readable, length, rng);
        if options.uppercase_only() {
            password = password.to_uppercase();
        }

        let strength_score = calculate_strength(&password);
        let analysis = analyze(&password, &readable);

        debug!(
            length,
            strength_score,
            syllables = analysis.syllable_count,
            memorability = %analysis.memorability_level,
            "generated password"
        );

        Ok(GeneratedPassword {
            password,
            readable_stem: readable,
            strength_score,
            strength_level: StrengthLevel::from_score(strength_score),
            analysis,
        })
    }
}

pub fn generate_password<R: Rng + ?Sized>(
    options: &GenerationOptions,
    rng: &mut R,
) -> Result<GeneratedPassword> {
    Generator::new().generate(options, rng)
}
