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

pub mod analyzer;
pub mod assembler;
pub mod builder;
pub mod entropy;
pub mod generator;
pub mod kdf;
pub mod numbers;
pub mod rules;
pub mod selector;

pub use analyzer::{
    MemorabilityLevel, PhoneticAnalysis, StrengthLevel, analyze, calculate_memorability,
    calculate_strength, count_syllables, is_pronounceable,
};
pub use entropy::Keystream;
pub use generator::{GeneratedPassword, GenerationOptions, Generator, generate_password};
pub use kdf::{KdfCost, REFERENCE_YEAR, derive_seed};
pub use rules::PhonotacticRules;
