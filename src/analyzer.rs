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

use crate::numbers::{has_weak_numeric_run, numeric_runs};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use unicode_normalization::UnicodeNormalization;

const VOWELS: &str = "aeiouáéíóúü";
const STRONG_VOWELS: &str = "aeoáéó";
const EXTRA_LETTERS: &str = "áéíóúüñ";

const MEMORABLE_CLUSTERS: [&str; 7] = ["bra", "cla", "tri", "pro", "gra", "fra", "dra"];
const MEMORABLE_SUFFIXES: [&str; 7] = ["ar", "er", "ir", "ando", "mente", "oso", "iva"];

const MAX_CONSONANT_RUN: usize = 3;
const MAX_VOWEL_RUN: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MemorabilityLevel {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl MemorabilityLevel {
    pub fn from_score(score: i32) -> Self {
        match score {
            s if s >= 85 => MemorabilityLevel::VeryHigh,
            s if s >= 65 => MemorabilityLevel::High,
            s if s >= 45 => MemorabilityLevel::Medium,
            _ => MemorabilityLevel::Low,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MemorabilityLevel::Low => "Low",
            MemorabilityLevel::Medium => "Medium",
            MemorabilityLevel::High => "High",
            MemorabilityLevel::VeryHigh => "Very high",
        }
    }
}

impl fmt::Display for MemorabilityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Badge shown next to a strength score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StrengthLevel {
    Weak,
    Medium,
    Strong,
    VeryStrong,
}

impl StrengthLevel {
    pub fn from_score(score: u8) -> Self {
        match score {
            80.. => StrengthLevel::VeryStrong,
            60..=79 => StrengthLevel::Strong,
            40..=59 => StrengthLevel::Medium,
            _ => StrengthLevel::Weak,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StrengthLevel::Weak => "Weak",
            StrengthLevel::Medium => "Medium",
            StrengthLevel::Strong => "Strong",
            StrengthLevel::VeryStrong => "Very strong",
        }
    }
}

impl fmt::Display for StrengthLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhoneticAnalysis {
    pub syllable_count: usize,
    pub pronounceable: bool,
    pub length: usize,
    pub memorability_level: MemorabilityLevel,
}

/// Phonetic profile of `password`, whose readable part is `stem`.
pub fn analyze(password: &str, stem: &str) -> PhoneticAnalysis {
    let syllable_count = count_syllables(stem);
    PhoneticAnalysis {
        syllable_count,
        pronounceable: is_pronounceable(stem),
        length: password.chars().count(),
        memorability_level: calculate_memorability(password, stem, syllable_count),
    }
}

fn clean(word: &str) -> Vec<char> {
    word.nfc()
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_ascii_lowercase() || EXTRA_LETTERS.contains(*c))
        .collect()
}

fn is_vowel(c: char) -> bool {
    VOWELS.contains(c)
}

fn is_strong(c: char) -> bool {
    STRONG_VOWELS.contains(c)
}

/// Spanish syllable estimate: one per vowel group, plus one for every hiatus
/// (two strong vowels side by side). Zero only when no letters remain.
pub fn count_syllables(word: &str) -> usize {
    let letters = clean(word);
    if letters.is_empty() {
        return 0;
    }

    let mut count = 0;
    let mut prev: Option<char> = None;
    for &c in &letters {
        if is_vowel(c) {
            match prev {
                Some(p) if is_vowel(p) => {
                    if is_strong(p) && is_strong(c) {
                        count += 1;
                    }
                }
                _ => count += 1,
            }
        }
        prev = Some(c);
    }

    count.max(1)
}

pub fn is_pronounceable(word: &str) -> bool {
    let letters = clean(word);
    let Some(&first) = letters.first() else {
        return true;
    };

    if matches!(first, 'x' | 'y' | 'z') {
        return false;
    }

    let mut consonant_run = 0;
    let mut vowel_run = 0;
    for (i, &c) in letters.iter().enumerate() {
        if is_vowel(c) {
            vowel_run += 1;
            consonant_run = 0;
        } else {
            consonant_run += 1;
            vowel_run = 0;
        }
        if consonant_run > MAX_CONSONANT_RUN || vowel_run > MAX_VOWEL_RUN {
            return false;
        }
        if matches!(c, 'q' | 'w') && letters.get(i + 1) != Some(&'u') {
            return false;
        }
    }

    true
}

/// Letters, then digits, then at most one trailing symbol.
fn has_memorable_shape(password: &str) -> bool {
    let mut chars = password.chars().peekable();

    let mut letters = 0;
    while chars.next_if(|c| c.is_alphabetic()).is_some() {
        letters += 1;
    }
    let mut digits = 0;
    while chars.next_if(|c| c.is_ascii_digit()).is_some() {
        digits += 1;
    }
    chars.next_if(|c| !c.is_alphanumeric());

    letters > 0 && digits > 0 && chars.next().is_none()
}

pub fn memorability_score(password: &str, stem: &str, syllables: usize) -> i32 {
    let password_len = password.chars().count();
    let stem_len = stem.chars().count();
    let stem_lower = stem.to_lowercase();

    let mut score = match password_len {
        0..=12 => 30,
        13..=16 => 20,
        _ => 10,
    };

    score += match syllables {
        2..=4 => 25,
        1..=6 => 15,
        _ => 5,
    };

    let readable_ratio = if password_len == 0 {
        0.0
    } else {
        stem_len as f64 / password_len as f64
    };
    score += if readable_ratio >= 0.7 {
        25
    } else if readable_ratio >= 0.5 {
        15
    } else {
        5
    };

    if has_memorable_shape(password) {
        score += 15;
    }
    if MEMORABLE_CLUSTERS.iter().any(|c| stem_lower.contains(c)) {
        score += 10;
    }
    if MEMORABLE_SUFFIXES.iter().any(|s| stem_lower.ends_with(s)) {
        score += 10;
    }
    if has_weak_numeric_run(password) {
        score -= 15;
    }

    score
}

pub fn calculate_memorability(password: &str, stem: &str, syllables: usize) -> MemorabilityLevel {
    MemorabilityLevel::from_score(memorability_score(password, stem, syllables))
}

pub fn calculate_strength(password: &str) -> u8 {
    let length = password.chars().count();
    let mut score: i32 = match length {
        12.. => 25,
        8..=11 => 15,
        _ => 5,
    };

    let classes = [
        password.chars().any(char::is_lowercase),
        password.chars().any(char::is_uppercase),
        password.chars().any(|c| c.is_ascii_digit()),
        password.chars().any(|c| !c.is_alphanumeric()),
    ];
    score += 15 * classes.iter().filter(|&&present| present).count() as i32;

    let chars: Vec<char> = password.chars().collect();
    let has_triple = chars.windows(3).any(|w| w[0] == w[1] && w[1] == w[2]);
    if !has_triple {
        score += 10;
    }

    if has_weak_numeric_run(password) {
        score -= 20;
    }

    let digits: Vec<u8> = numeric_runs(password).into_iter().flatten().collect();
    let distinct: HashSet<u8> = digits.iter().copied().collect();
    if digits.len() >= 2 && distinct.len() >= 2 {
        score += 5;
    }

    score.clamp(0, 100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_syllables_basic() {
        assert_eq!(count_syllables("casa"), 2);
        assert_eq!(count_syllables("amor"), 2);
        assert_eq!(count_syllables("Casa47!"), 2);
    }

    #[test]
    fn test_count_syllables_empty_and_floor() {
        assert_eq!(count_syllables(""), 0);
        assert_eq!(count_syllables("4729!"), 0);
        assert_eq!(count_syllables("xyz"), 1);
    }

    #[test]
    fn test_count_syllables_diphthong_and_hiatus() {
        assert_eq!(count_syllables("aire"), 2);
        assert_eq!(count_syllables("cuidado"), 3);
        assert_eq!(count_syllables("poeta"), 3);
        assert_eq!(count_syllables("Canción"), 2);
        assert_eq!(count_syllables("Cancio\u{0301}n"), 2);
    }

    #[test]
    fn test_is_pronounceable() {
        assert!(!is_pronounceable("xyzz"));
        assert!(is_pronounceable("casa"));
        assert!(is_pronounceable(""));
        assert!(is_pronounceable("queso"));
        assert!(is_pronounceable("Casa47!"));
        assert!(is_pronounceable("montaña"));
    }

    #[test]
    fn test_is_pronounceable_rejections() {
        assert!(!is_pronounceable("zapato"));
        assert!(!is_pronounceable("yate"));
        assert!(!is_pronounceable("strength"));
        assert!(!is_pronounceable("aeiou"));
        assert!(!is_pronounceable("qatar"));
        assert!(!is_pronounceable("kiwi"));
        assert!(is_pronounceable("estra"));
    }

    #[test]
    fn test_memorability_very_high() {
        assert_eq!(memorability_score("Casa47!", "Casa", 2), 85);
        assert_eq!(
            calculate_memorability("Casa47!", "Casa", 2),
            MemorabilityLevel::VeryHigh
        );
    }

    #[test]
    fn test_memorability_bonuses_and_penalty() {
        // 30 + 25 + 25 + 15 + 10 (bra) + 10 (ar) - 15 (12)
        assert_eq!(memorability_score("Brasar12", "Brasar", 2), 100);
    }

    #[test]
    fn test_memorability_levels() {
        assert_eq!(
            calculate_memorability("Tkzq*mesa", "Tkzq", 1),
            MemorabilityLevel::Medium
        );
        assert_eq!(
            calculate_memorability("x9#kq2!zzw8@pl3$mn7%", "x", 1),
            MemorabilityLevel::Low
        );
        assert_eq!(
            calculate_memorability("mesaluna4", "xz", 1),
            MemorabilityLevel::High
        );
    }

    #[test]
    fn test_memorable_shape() {
        assert!(has_memorable_shape("Casa47"));
        assert!(has_memorable_shape("Casa47!"));
        assert!(has_memorable_shape("Cañón7#"));
        assert!(!has_memorable_shape("Casa"));
        assert!(!has_memorable_shape("47Casa"));
        assert!(!has_memorable_shape("Ca4sa7"));
        assert!(!has_memorable_shape("Casa47!!"));
    }

    #[test]
    fn test_strength_scores() {
        assert_eq!(calculate_strength("casaluna"), 40);
        assert_eq!(calculate_strength("Casa47!x"), 90);
        assert_eq!(calculate_strength("Casa123!"), 70);
        assert_eq!(calculate_strength("Casaluna47!x"), 100);
        assert_eq!(calculate_strength("aaa"), 20);
    }

    #[test]
    fn test_strength_clamped_at_zero() {
        assert_eq!(calculate_strength("111"), 0);
        assert_eq!(calculate_strength("00000"), 0);
    }

    #[test]
    fn test_strength_diversity_monotonic() {
        let pairs = [
            ("casalunas", "Casa4un!s"),
            ("mesaverde", "Mesa7er#e"),
            ("solymar", "S0l&mar"),
        ];
        for (plain, diverse) in pairs {
            assert_eq!(plain.chars().count(), diverse.chars().count());
            assert!(
                calculate_strength(diverse) >= calculate_strength(plain),
                "{} scored below {}",
                diverse,
                plain
            );
        }
    }

    #[test]
    fn test_scoring_is_deterministic() {
        for password in ["Casa47!", "Brasar12", "x9#kq2!zz", ""] {
            assert_eq!(calculate_strength(password), calculate_strength(password));
            assert_eq!(
                memorability_score(password, "casa", 2),
                memorability_score(password, "casa", 2)
            );
        }
    }

    #[test]
    fn test_strength_levels() {
        assert_eq!(StrengthLevel::from_score(100), StrengthLevel::VeryStrong);
        assert_eq!(StrengthLevel::from_score(80), StrengthLevel::VeryStrong);
        assert_eq!(StrengthLevel::from_score(79), StrengthLevel::Strong);
        assert_eq!(StrengthLevel::from_score(60), StrengthLevel::Strong);
        assert_eq!(StrengthLevel::from_score(40), StrengthLevel::Medium);
        assert_eq!(StrengthLevel::from_score(39), StrengthLevel::Weak);
        assert_eq!(StrengthLevel::from_score(0), StrengthLevel::Weak);
    }

    #[test]
    fn test_memorability_thresholds() {
        assert_eq!(MemorabilityLevel::from_score(85), MemorabilityLevel::VeryHigh);
        assert_eq!(MemorabilityLevel::from_score(84), MemorabilityLevel::High);
        assert_eq!(MemorabilityLevel::from_score(65), MemorabilityLevel::High);
        assert_eq!(MemorabilityLevel::from_score(45), MemorabilityLevel::Medium);
        assert_eq!(MemorabilityLevel::from_score(44), MemorabilityLevel::Low);
        assert_eq!(MemorabilityLevel::from_score(-5), MemorabilityLevel::Low);
    }

    #[test]
    fn test_analyze_uses_stem_for_phonetics() {
        let analysis = analyze("Casa47!", "Casa");
        assert_eq!(analysis.syllable_count, 2);
        assert!(analysis.pronounceable);
        assert_eq!(analysis.length, 7);
        assert_eq!(analysis.memorability_level, MemorabilityLevel::VeryHigh);
    }

    #[test]
    fn test_analysis_serializes_plain_values() {
        let json = serde_json::to_value(analyze("Casa47!", "Casa")).unwrap();
        assert_eq!(json["syllableCount"], 2);
        assert_eq!(json["pronounceable"], true);
        assert_eq!(json["memorabilityLevel"], "very_high");
    }
}
