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

//! Numeric security strings and the pattern checks shared with the analyzer.

use rand::Rng;
use rand::seq::SliceRandom;
use rand::seq::index::sample;

const KEYPAD_PATTERNS: [&str; 7] = ["147", "258", "369", "159", "357", "246", "468"];

const RECENT_YEAR_SPAN: i32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberPattern {
    /// 00 to 99, zero padded.
    Padded,
    /// Last two digits of a year in the last three decades.
    RecentYear,
    /// Two digits, no repeat, no neighbours, never "10".
    TwoDigits,
    /// Three distinct digits outside every predictable pattern.
    ThreeDigits,
    /// Two or three distinct single digits.
    Mixed,
}

impl NumberPattern {
    pub const ALL: [NumberPattern; 5] = [
        NumberPattern::Padded,
        NumberPattern::RecentYear,
        NumberPattern::TwoDigits,
        NumberPattern::ThreeDigits,
        NumberPattern::Mixed,
    ];
}

pub fn generate_numbers<R: Rng + ?Sized>(current_year: i32, rng: &mut R) -> String {
    let pattern = NumberPattern::ALL[rng.gen_range(0..NumberPattern::ALL.len())];
    generate_with(pattern, current_year, rng)
}

pub fn generate_with<R: Rng + ?Sized>(
    pattern: NumberPattern,
    current_year: i32,
    rng: &mut R,
) -> String {
    match pattern {
        NumberPattern::Padded => format!("{:02}", rng.gen_range(0..100)),
        NumberPattern::RecentYear => {
            let year = current_year - rng.gen_range(0..RECENT_YEAR_SPAN);
            format!("{:02}", year.rem_euclid(100))
        }
        NumberPattern::TwoDigits => pick(&unpredictable_pairs(), rng),
        NumberPattern::ThreeDigits => pick(&unpredictable_triples(), rng),
        NumberPattern::Mixed => {
            let count = rng.gen_range(2..=3);
            sample(rng, 10, count)
                .iter()
                .map(|d| char::from(b'0' + d as u8))
                .collect()
        }
    }
}

// Sampling uniformly from the accepted set is equivalent to retrying until a
// draw passes, without an unbounded loop.
fn pick<R: Rng + ?Sized>(candidates: &[String], rng: &mut R) -> String {
    candidates.choose(rng).cloned().unwrap_or_else(|| "47".to_string())
}

fn unpredictable_pairs() -> Vec<String> {
    (10u32..100)
        .map(|n| digits_of(&n.to_string()))
        .filter(|d| d[0] != d[1] && d[0].abs_diff(d[1]) != 1 && d[..] != [1, 0])
        .map(|d| to_string(&d))
        .collect()
}

fn unpredictable_triples() -> Vec<String> {
    (100u32..1000)
        .map(|n| digits_of(&n.to_string()))
        .filter(|d| {
            d[0] != d[1] && d[1] != d[2] && d[0] != d[2] && !is_sequential(d) && !is_predictable(d)
        })
        .map(|d| to_string(&d))
        .collect()
}

fn digits_of(run: &str) -> Vec<u8> {
    run.bytes()
        .filter(u8::is_ascii_digit)
        .map(|b| b - b'0')
        .collect()
}

fn to_string(digits: &[u8]) -> String {
    digits.iter().map(|d| char::from(b'0' + d)).collect()
}

/// Every step is +1, or every step is -1.
pub fn is_sequential(digits: &[u8]) -> bool {
    if digits.len() < 2 {
        return false;
    }
    let ascending = digits.windows(2).all(|w| w[1] == w[0] + 1);
    let descending = digits.windows(2).all(|w| w[0] == w[1] + 1);
    ascending || descending
}

pub fn is_repeating(digits: &[u8]) -> bool {
    digits.windows(2).any(|w| w[0] == w[1])
}

/// True if any three-digit window is a well-known pattern: straight runs up or
/// down, keypad lines, round hundreds (100..900) or mirrored tens (101..909).
pub fn is_predictable(digits: &[u8]) -> bool {
    digits.windows(3).any(|w| {
        let (a, b, c) = (w[0], w[1], w[2]);
        let text = to_string(w);
        is_sequential(w)
            || KEYPAD_PATTERNS.iter().any(|p| *p == text)
            || (a != 0 && b == 0 && c == 0)
            || (a != 0 && b == 0 && c == a)
    })
}

/// Maximal runs of ASCII digits, left to right.
pub fn numeric_runs(password: &str) -> Vec<Vec<u8>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();

    for c in password.chars() {
        if c.is_ascii_digit() {
            current.push(c as u8 - b'0');
        } else if !current.is_empty() {
            runs.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }

    runs
}

pub fn is_weak_run(digits: &[u8]) -> bool {
    digits.len() >= 2 && (is_sequential(digits) || is_repeating(digits) || is_predictable(digits))
}

pub fn has_weak_numeric_run(password: &str) -> bool {
    numeric_runs(password).iter().any(|run| is_weak_run(run))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entropy::Keystream;

    fn d(s: &str) -> Vec<u8> {
        digits_of(s)
    }

    #[test]
    fn test_sequential() {
        assert!(is_sequential(&d("123")));
        assert!(is_sequential(&d("987")));
        assert!(is_sequential(&d("45")));
        assert!(!is_sequential(&d("135")));
        assert!(!is_sequential(&d("7")));
        assert!(!is_sequential(&d("121")));
    }

    #[test]
    fn test_predictable_list() {
        for p in [
            "123", "234", "789", "987", "210", "147", "258", "369", "159", "357", "246", "468",
            "100", "500", "900", "101", "505", "909",
        ] {
            assert!(is_predictable(&d(p)), "{} should be predictable", p);
        }
        for p in ["139", "472", "805", "961"] {
            assert!(!is_predictable(&d(p)), "{} should not be predictable", p);
        }
    }

    #[test]
    fn test_predictable_inside_longer_run() {
        assert!(is_predictable(&d("91479")));
        assert!(!is_predictable(&d("47")));
    }

    #[test]
    fn test_numeric_runs() {
        assert_eq!(numeric_runs("Casa47!x9"), vec![vec![4, 7], vec![9]]);
        assert!(numeric_runs("casa").is_empty());
        assert_eq!(numeric_runs("12ab345"), vec![vec![1, 2], vec![3, 4, 5]]);
    }

    #[test]
    fn test_weak_runs() {
        assert!(has_weak_numeric_run("Casa123"));
        assert!(has_weak_numeric_run("Casa77!"));
        assert!(has_weak_numeric_run("Ca505sa"));
        assert!(!has_weak_numeric_run("Casa47!"));
        assert!(!has_weak_numeric_run("C4sa"));
        assert!(!has_weak_numeric_run("casa"));
    }

    #[test]
    fn test_two_digit_candidates() {
        let pairs = unpredictable_pairs();
        assert!(!pairs.is_empty());
        for p in &pairs {
            let digits = d(p);
            assert_eq!(digits.len(), 2);
            assert_ne!(digits[0], 0);
            assert!(!is_weak_run(&digits), "{} is weak", p);
            assert_ne!(p, "10");
        }
    }

    #[test]
    fn test_three_digit_candidates_avoid_patterns() {
        let triples = unpredictable_triples();
        assert!(!triples.is_empty());
        for t in &triples {
            let digits = d(t);
            assert!(!is_weak_run(&digits), "{} is weak", t);
        }
    }

    #[test]
    fn test_generated_avoid_predictable() {
        for i in 0..20u8 {
            let mut rng = Keystream::new(&[i; 32]);
            for _ in 0..100 {
                for pattern in [NumberPattern::TwoDigits, NumberPattern::ThreeDigits] {
                    let n = generate_with(pattern, 2026, &mut rng);
                    assert!(!is_weak_run(&d(&n)), "{:?} produced {}", pattern, n);
                }
            }
        }
    }

    #[test]
    fn test_padded_and_year_shapes() {
        let mut rng = Keystream::new(&[42u8; 32]);
        for _ in 0..200 {
            let padded = generate_with(NumberPattern::Padded, 2026, &mut rng);
            assert_eq!(padded.len(), 2);
            assert!(padded.bytes().all(|b| b.is_ascii_digit()));

            let year: u32 = generate_with(NumberPattern::RecentYear, 2026, &mut rng)
                .parse()
                .unwrap();
            // 1997..=2026
            assert!(year <= 26 || year >= 97, "Unexpected year suffix {}", year);
        }
    }

    #[test]
    fn test_mixed_digits_distinct() {
        let mut rng = Keystream::new(&[13u8; 32]);
        for _ in 0..200 {
            let mixed = generate_with(NumberPattern::Mixed, 2026, &mut rng);
            let digits = d(&mixed);
            assert!((2..=3).contains(&digits.len()));

            use std::collections::HashSet;
            let unique: HashSet<_> = digits.iter().collect();
            assert_eq!(unique.len(), digits.len(), "Repeated digit in {}", mixed);
        }
    }

    #[test]
    fn test_every_pattern_reachable() {
        let mut rng = Keystream::new(&[42u8; 32]);
        let lengths: Vec<usize> = (0..300)
            .map(|_| generate_numbers(2026, &mut rng).len())
            .collect();
        assert!(lengths.iter().all(|l| (2..=3).contains(l)));
        assert!(lengths.contains(&2));
        assert!(lengths.contains(&3));
    }
}
