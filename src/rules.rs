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

use std::collections::HashSet;
use std::sync::OnceLock;

const CONSONANTS: &[char] = &[
    'b', 'c', 'd', 'f', 'g', 'h', 'j', 'k', 'l', 'm', 'n', 'p', 'q', 'r', 's', 't', 'v', 'w', 'x',
    'y', 'z',
];

const VOWELS: &[char] = &['a', 'e', 'i', 'o', 'u'];

const VALID_CLUSTERS: &[&str] = &[
    "br", "cr", "dr", "fr", "gr", "kr", "pr", "tr", "bl", "cl", "fl", "gl", "kl", "pl",
];

const SPECIAL_DIGRAPHS: &[&str] = &["ch", "ll", "ñ"];

const NATURAL_DOUBLES: &[&str] = &["ll", "rr", "cc", "nn", "ss"];

#[rustfmt::skip]
const INVALID_COMBINATIONS: &[&str] = &[
    // consonant + v
    "cv", "kv", "pv", "bv", "tv", "dv", "gv", "fv", "jv", "lv", "mv", "nv", "rv", "sv", "xv", "zv",
    "kb", "kg", "kp", "kt", "kf", "kj", "km", "kn", "ks", "kx", "kz",
    "pb", "pg", "pk", "pt", "pf", "pj", "pm", "pn", "ps", "px", "pz",
    "gb", "gp", "gk", "gt", "gf", "gj", "gm", "gx", "gz",
    "tb", "tg", "tk", "tp", "tf", "tj", "tm", "tx", "tz",
    "db", "dg", "dk", "dp", "df", "dj", "dm", "dx", "dz",
    "fb", "fg", "fk", "fp", "ft", "fj", "fm", "fn", "fx", "fz",
    "jb", "jg", "jk", "jp", "jt", "jf", "jm", "jn", "js", "jx", "jz",
    "vb", "vg", "vk", "vp", "vt", "vf", "vj", "vm", "vn", "vs", "vx", "vz",
    "wb", "wg", "wk", "wp", "wt", "wf", "wj", "wm", "wn", "ws", "wx", "wz",
    "xb", "xg", "xk", "xp", "xt", "xf", "xj", "xm", "xn", "xs", "xx", "xz",
    "zb", "zg", "zk", "zp", "zt", "zf", "zj", "zm", "zn", "zs", "zx", "zz",
];

const RARE_INITIAL: &[char] = &['k', 'w', 'x'];

const PRECEDE_R: &[char] = &['b', 'c', 'd', 'f', 'g', 'k', 'p', 't'];
const PRECEDE_L: &[char] = &['b', 'c', 'f', 'g', 'k', 'p'];

const START_FRAGMENTS: &[&str] = &[
    "bra", "bre", "bri", "bro", "bru", "cla", "cle", "cli", "clo", "clu", "cra", "cre", "cri",
    "cro", "cru", "dra", "dre", "dri", "dro", "dru", "fra", "fre", "fri", "fro", "fru", "gra",
    "gre", "gri", "gro", "gru", "pla", "ple", "pli", "plo", "plu", "pra", "pre", "pri", "pro",
    "pru", "tra", "tre", "tri", "tro", "tru",
];

const MIDDLE_FRAGMENTS: &[&str] = &[
    "bla", "ble", "bli", "blo", "blu", "fla", "fle", "fli", "flo", "flu", "gla", "gle", "gli",
    "glo", "glu",
];

const END_FRAGMENTS: &[&str] = &["ción", "sión", "tivo", "tiva", "mente", "able", "ible"];

const VERB_ENDINGS: &[&str] = &["ar", "er", "ir", "ando", "iendo", "ado", "ido"];
const NOUN_ENDINGS: &[&str] = &["o", "a", "e", "or", "ora", "ero", "era", "ista"];
const ADJECTIVE_ENDINGS: &[&str] = &["oso", "osa", "ivo", "iva", "able", "ible", "al", "ante"];
const ADVERB_ENDINGS: &[&str] = &["mente"];

const WORD_ROOTS: &[&str] = &[
    "amor", "vida", "casa", "agua", "luz", "sol", "mar", "voz", "paz", "flor", "pan", "sal", "rey",
    "ley",
];

const RHYTHMIC_PATTERNS: &[&str] = &["CVCV", "CVCVC", "CVCVCV", "CCVCV", "CVCVC", "CVCCV"];

const LEET_SUBSTITUTIONS: &[(char, char)] = &[('a', '4'), ('e', '3'), ('o', '0'), ('s', '5')];

const SYMBOLS: &[char] = &['!', '@', '#', '$', '%', '&', '*'];

/// Grammatical category of a word ending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordClass {
    Verb,
    Noun,
    Adjective,
    Adverb,
}

/// Syllable fragments keyed by their position in a word.
#[derive(Debug, Clone)]
pub struct SyllableFragments {
    pub start: Vec<&'static str>,
    pub middle: Vec<&'static str>,
    pub end: Vec<&'static str>,
}

/// Letter inventory and combination constraints the word builder works from.
///
/// The table is immutable once built. The Spanish table is shared process-wide
/// through [`PhonotacticRules::spanish`]; tests may assemble their own.
#[derive(Debug, Clone)]
pub struct PhonotacticRules {
    pub consonants: Vec<char>,
    pub vowels: Vec<char>,
    pub valid_clusters: Vec<&'static str>,
    pub special_digraphs: Vec<&'static str>,
    pub invalid_combinations: HashSet<&'static str>,
    pub natural_doubles: HashSet<&'static str>,
    pub rare_initial: Vec<char>,
    pub precede_r: Vec<char>,
    pub precede_l: Vec<char>,
    pub fragments: SyllableFragments,
    pub endings: Vec<(WordClass, Vec<&'static str>)>,
    pub word_roots: Vec<&'static str>,
    pub rhythmic_patterns: Vec<&'static str>,
    pub leet: Vec<(char, char)>,
    pub symbols: Vec<char>,
}

static SPANISH: OnceLock<PhonotacticRules> = OnceLock::new();

impl PhonotacticRules {
    pub fn spanish() -> &'static PhonotacticRules {
        SPANISH.get_or_init(|| PhonotacticRules {
            consonants: CONSONANTS.to_vec(),
            vowels: VOWELS.to_vec(),
            valid_clusters: VALID_CLUSTERS.to_vec(),
            special_digraphs: SPECIAL_DIGRAPHS.to_vec(),
            invalid_combinations: INVALID_COMBINATIONS.iter().copied().collect(),
            natural_doubles: NATURAL_DOUBLES.iter().copied().collect(),
            rare_initial: RARE_INITIAL.to_vec(),
            precede_r: PRECEDE_R.to_vec(),
            precede_l: PRECEDE_L.to_vec(),
            fragments: SyllableFragments {
                start: START_FRAGMENTS.to_vec(),
                middle: MIDDLE_FRAGMENTS.to_vec(),
                end: END_FRAGMENTS.to_vec(),
            },
            endings: vec![
                (WordClass::Verb, VERB_ENDINGS.to_vec()),
                (WordClass::Noun, NOUN_ENDINGS.to_vec()),
                (WordClass::Adjective, ADJECTIVE_ENDINGS.to_vec()),
                (WordClass::Adverb, ADVERB_ENDINGS.to_vec()),
            ],
            word_roots: WORD_ROOTS.to_vec(),
            rhythmic_patterns: RHYTHMIC_PATTERNS.to_vec(),
            leet: LEET_SUBSTITUTIONS.to_vec(),
            symbols: SYMBOLS.to_vec(),
        })
    }

    pub fn is_vowel(&self, c: char) -> bool {
        self.vowels.contains(&c)
    }

    pub fn is_consonant(&self, c: char) -> bool {
        self.consonants.contains(&c)
    }

    pub fn is_invalid_combination(&self, first: char, second: char) -> bool {
        let pair: String = first
            .to_lowercase()
            .chain(second.to_lowercase())
            .collect();
        self.invalid_combinations.contains(pair.as_str())
    }

    pub fn is_natural_double(&self, c: char) -> bool {
        let pair: String = [c, c].iter().collect();
        self.natural_doubles.contains(pair.as_str())
    }

    /// Consonants allowed to open a word.
    pub fn initial_consonants(&self) -> Vec<char> {
        self.consonants
            .iter()
            .copied()
            .filter(|c| !self.rare_initial.contains(c))
            .collect()
    }

    pub fn leet_for(&self, c: char) -> Option<char> {
        self.leet
            .iter()
            .find(|(letter, _)| *letter == c)
            .map(|(_, digit)| *digit)
    }
}
