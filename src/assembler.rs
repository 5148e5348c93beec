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

//! Layers capitalization, leet substitution and security characters over a
//! readable stem, then forces the result to an exact length.

use crate::builder::{SECURITY_HEADROOM, WordBuildState};
use crate::rules::PhonotacticRules;
use crate::selector::next_vowel;
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::debug;

const APPEND_CHANCE: f64 = 0.7;
const BREAKPOINTS: [f64; 2] = [0.6, 0.8];
const PAD_VOWEL_CHANCE: f64 = 0.6;

pub fn capitalize_first(stem: &str) -> String {
    let mut chars = stem.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Lowercases the stem, then capitalizes index 0 and one or two more distinct
/// positions, never more than three in total.
pub fn apply_random_capitalization<R: Rng + ?Sized>(stem: &str, rng: &mut R) -> String {
    let mut chars: Vec<char> = stem.to_lowercase().chars().collect();
    if chars.is_empty() {
        return String::new();
    }

    let mut positions = vec![0];
    let additional = rng.gen_range(1..=2);
    let limit = chars.len().min(3);
    for _ in 0..additional {
        if positions.len() >= limit {
            break;
        }
        let free: Vec<usize> = (0..chars.len()).filter(|i| !positions.contains(i)).collect();
        if let Some(&pos) = free.choose(rng) {
            positions.push(pos);
        }
    }

    for pos in positions {
        let upper: Vec<char> = chars[pos].to_uppercase().collect();
        if upper.len() == 1 {
            chars[pos] = upper[0];
        }
    }

    chars.into_iter().collect()
}

/// Replaces the first eligible lowercase letter with its digit look-alike.
///
/// Letters that belong to a natural double ("ss") are left alone.
pub fn apply_readable_leet(rules: &PhonotacticRules, stem: &str) -> String {
    let mut chars: Vec<char> = stem.chars().collect();

    for i in 0..chars.len() {
        let c = chars[i];
        let Some(digit) = rules.leet_for(c) else {
            continue;
        };

        let doubled_before = i > 0 && chars[i - 1] == c;
        let doubled_after = chars.get(i + 1) == Some(&c);
        if (doubled_before || doubled_after) && rules.is_natural_double(c) {
            continue;
        }

        chars[i] = digit;
        break;
    }

    chars.into_iter().collect()
}

/// Inserts `insert` at the end (70%) or at the 60% / 80% breakpoint (30%).
///
/// Skipped when the result would exceed `target_length`.
pub fn insert_security_chars<R: Rng + ?Sized>(
    password: &str,
    insert: &str,
    target_length: usize,
    rng: &mut R,
) -> String {
    let mut chars: Vec<char> = password.chars().collect();
    let insert_len = insert.chars().count();

    if chars.len() + insert_len > target_length {
        debug!(insert_len, target_length, "security characters do not fit, skipping");
        return password.to_string();
    }

    let position = if rng.gen_bool(APPEND_CHANCE) {
        chars.len()
    } else {
        let ratio = BREAKPOINTS[rng.gen_range(0..BREAKPOINTS.len())];
        (chars.len() as f64 * ratio).floor() as usize
    };

    debug!(position, insert_len, "inserting security characters");
    let tail = chars.split_off(position);
    chars.extend(insert.chars());
    chars.extend(tail);
    chars.into_iter().collect()
}

/// Forces `password` to exactly `target_length` characters.
///
/// Over length: keeps up to `target_length - 2` leading characters of `stem`
/// and fills the rest with the tail of `password`. Under length: pads with
/// safe vowels or digits.
pub fn adjust_to_exact_length<R: Rng + ?Sized>(
    rules: &PhonotacticRules,
    password: &str,
    stem: &str,
    target_length: usize,
    rng: &mut R,
) -> String {
    let chars: Vec<char> = password.chars().collect();

    if chars.len() > target_length {
        let kept = stem
            .chars()
            .count()
            .min(target_length.saturating_sub(SECURITY_HEADROOM));
        let tail_len = target_length - kept;
        debug!(from = chars.len(), kept, tail_len, "trimming assembled password");
        return stem
            .chars()
            .take(kept)
            .chain(chars[chars.len() - tail_len..].iter().copied())
            .collect();
    }

    let mut state = WordBuildState::seeded(password, target_length);
    if state.len() < target_length {
        debug!(from = state.len(), target_length, "padding assembled password");
    }
    while state.len() < target_length {
        if rng.gen_bool(PAD_VOWEL_CHANCE) {
            let vowel = next_vowel(rules, &state, rng);
            state.push(vowel);
        } else {
            state.push(char::from(b'0' + rng.gen_range(0..10u8)));
        }
    }
    state.truncate(target_length);
    state.into_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entropy::Keystream;

    #[test]
    fn test_capitalize_first() {
        assert_eq!(capitalize_first("casa"), "Casa");
        assert_eq!(capitalize_first("ñandu"), "Ñandu");
        assert_eq!(capitalize_first(""), "");
    }

    #[test]
    fn test_random_capitalization_bounds() {
        for i in 0..100u8 {
            let mut rng = Keystream::new(&[i; 32]);
            let out = apply_random_capitalization("MurCielago", &mut rng);
            let upper = out.chars().filter(|c| c.is_uppercase()).count();

            assert!(out.starts_with('M'));
            assert!((2..=3).contains(&upper), "{} has {} capitals", out, upper);
            assert_eq!(out.to_lowercase(), "murcielago");
        }
    }

    #[test]
    fn test_random_capitalization_short_words() {
        let mut rng = Keystream::new(&[1u8; 32]);
        assert_eq!(apply_random_capitalization("a", &mut rng), "A");
        assert_eq!(apply_random_capitalization("so", &mut rng), "SO");
        assert_eq!(apply_random_capitalization("", &mut rng), "");
    }

    #[test]
    fn test_leet_first_eligible_only() {
        let rules = PhonotacticRules::spanish();
        assert_eq!(apply_readable_leet(rules, "casa"), "c4sa");
        assert_eq!(apply_readable_leet(rules, "pelota"), "p3lota");
        assert_eq!(apply_readable_leet(rules, "tidur"), "tidur");
    }

    #[test]
    fn test_leet_skips_natural_doubles() {
        let rules = PhonotacticRules::spanish();
        assert_eq!(apply_readable_leet(rules, "issu"), "issu");
        assert_eq!(apply_readable_leet(rules, "missa"), "miss4");
    }

    #[test]
    fn test_leet_ignores_capitals() {
        let rules = PhonotacticRules::spanish();
        assert_eq!(apply_readable_leet(rules, "Amor"), "Am0r");
    }

    #[test]
    fn test_insert_positions() {
        let mut appended = 0;
        let mut inside = 0;
        for i in 0..200u8 {
            let mut key = [0u8; 32];
            key[0] = i;
            let mut rng = Keystream::new(&key);
            let out = insert_security_chars("abcdefghij", "47", 12, &mut rng);
            assert_eq!(out.len(), 12);
            match out.find("47") {
                Some(10) => appended += 1,
                Some(6) | Some(8) => inside += 1,
                other => panic!("Unexpected position {:?} in {}", other, out),
            }
        }
        assert!(appended > inside);
        assert!(inside > 0);
    }

    #[test]
    fn test_insert_skips_when_too_long() {
        let mut rng = Keystream::new(&[0u8; 32]);
        assert_eq!(insert_security_chars("abcdefghij", "471", 12, &mut rng), "abcdefghij");
    }

    #[test]
    fn test_adjust_pads_to_length() {
        let rules = PhonotacticRules::spanish();
        for i in 0..50u8 {
            let mut rng = Keystream::new(&[i; 32]);
            let out = adjust_to_exact_length(rules, "Casa", "Casa", 12, &mut rng);
            assert_eq!(out.chars().count(), 12);
            assert!(out.starts_with("Casa"));
            assert!(
                out.chars()
                    .skip(4)
                    .all(|c| rules.is_vowel(c) || c.is_ascii_digit()),
                "Unexpected padding in {}",
                out
            );
        }
    }

    #[test]
    fn test_adjust_exact_is_unchanged() {
        let rules = PhonotacticRules::spanish();
        let mut rng = Keystream::new(&[0u8; 32]);
        assert_eq!(
            adjust_to_exact_length(rules, "Casa47!x", "Casa", 8, &mut rng),
            "Casa47!x"
        );
    }

    #[test]
    fn test_adjust_trims_keeping_stem() {
        let rules = PhonotacticRules::spanish();
        let mut rng = Keystream::new(&[0u8; 32]);
        let out = adjust_to_exact_length(rules, "Casa1234!", "Casa", 8, &mut rng);
        assert_eq!(out, "Casa234!");
    }

    #[test]
    fn test_adjust_trims_long_stem() {
        // stem longer than target - 2: stem cut to 6, last 2 chars of the password kept
        let rules = PhonotacticRules::spanish();
        let mut rng = Keystream::new(&[0u8; 32]);
        let out = adjust_to_exact_length(rules, "Murcielago47!", "Murcielago", 8, &mut rng);
        assert_eq!(out, "Murcie7!");
    }
}
