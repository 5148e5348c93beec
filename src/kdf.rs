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

//! Key derivation for derived mode: the same master secret and context labels
//! always key the generator's keystream the same way.

use crate::entropy::KEY_LEN;
use anyhow::{Context, Result};
use argon2::{Algorithm, Argon2, Params, Version};
use blake2::{Blake2b512, Digest};
use zeroize::Zeroizing;

const SALT_DOMAIN: &[u8] = b"legible/v1/label";

/// Reference year for derived generation, so output does not drift with the
/// calendar.
pub const REFERENCE_YEAR: i32 = 2025;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfCost {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl KdfCost {
    pub const STANDARD: Self = Self {
        memory_kib: 64 * 1024,
        iterations: 8,
        parallelism: 4,
    };

    pub const PARANOID: Self = Self {
        memory_kib: 256 * 1024,
        iterations: 16,
        parallelism: 4,
    };

    pub fn memory_mib(&self) -> u32 {
        self.memory_kib / 1024
    }
}

/// Stretches `master_secret` once per label, each round keyed by the previous
/// output. Label order matters.
pub fn derive_seed(
    master_secret: &[u8],
    labels: &[Zeroizing<String>],
    cost: KdfCost,
) -> Result<Zeroizing<[u8; KEY_LEN]>> {
    if labels.is_empty() {
        anyhow::bail!("At least one context label is required");
    }

    let params = Params::new(
        cost.memory_kib,
        cost.iterations,
        cost.parallelism,
        Some(KEY_LEN),
    )
    .context("Failed to create Argon2 parameters")?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut input = Zeroizing::new(master_secret.to_vec());
    let mut key = Zeroizing::new([0u8; KEY_LEN]);

    for (i, label) in labels.iter().enumerate() {
        let salt = label_salt(label.as_bytes());
        argon2
            .hash_password_into(&input, &salt[..], &mut key[..])
            .map_err(|e| anyhow::anyhow!("Argon2 derivation failed: {:?}", e))
            .with_context(|| format!("Failed to derive key at label {}", i + 1))?;
        input = Zeroizing::new(key.to_vec());
    }

    Ok(key)
}

fn label_salt(label: &[u8]) -> Zeroizing<[u8; 64]> {
    let mut hasher = Blake2b512::new();
    hasher.update(SALT_DOMAIN);
    hasher.update((label.len() as u64).to_le_bytes());
    hasher.update(label);

    let mut salt = Zeroizing::new([0u8; 64]);
    salt.copy_from_slice(&hasher.finalize());
    salt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entropy::Keystream;
    use crate::generator::{GenerationOptions, Generator};

    const TEST_COST: KdfCost = KdfCost {
        memory_kib: 64,
        iterations: 1,
        parallelism: 1,
    };

    fn labels(v: &[&str]) -> Vec<Zeroizing<String>> {
        v.iter().map(|s| Zeroizing::new(s.to_string())).collect()
    }

    #[test]
    fn test_empty_labels() {
        let result = derive_seed(b"correct horse battery", &[], TEST_COST);
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("At least one context label is required")
        );
    }

    #[test]
    fn test_deterministic_derivation() {
        let a = derive_seed(b"master", &labels(&["github", "work"]), TEST_COST).unwrap();
        let b = derive_seed(b"master", &labels(&["github", "work"]), TEST_COST).unwrap();
        assert_eq!(a.as_ref(), b.as_ref());
    }

    #[test]
    fn test_labels_change_key() {
        let a = derive_seed(b"master", &labels(&["github"]), TEST_COST).unwrap();
        let b = derive_seed(b"master", &labels(&["gitlab"]), TEST_COST).unwrap();
        let c = derive_seed(b"master", &labels(&["github", "work"]), TEST_COST).unwrap();
        assert_ne!(a.as_ref(), b.as_ref());
        assert_ne!(a.as_ref(), c.as_ref());
    }

    #[test]
    fn test_label_order_matters() {
        let a = derive_seed(b"master", &labels(&["a", "b"]), TEST_COST).unwrap();
        let b = derive_seed(b"master", &labels(&["b", "a"]), TEST_COST).unwrap();
        assert_ne!(a.as_ref(), b.as_ref());
    }

    #[test]
    fn test_master_changes_key() {
        let a = derive_seed(b"master", &labels(&["site"]), TEST_COST).unwrap();
        let b = derive_seed(b"Master", &labels(&["site"]), TEST_COST).unwrap();
        assert_ne!(a.as_ref(), b.as_ref());
    }

    #[test]
    fn test_cost_changes_key() {
        let cheap = derive_seed(b"master", &labels(&["site"]), TEST_COST).unwrap();
        let dearer = derive_seed(
            b"master",
            &labels(&["site"]),
            KdfCost {
                iterations: 2,
                ..TEST_COST
            },
        )
        .unwrap();
        assert_ne!(cheap.as_ref(), dearer.as_ref());
    }

    #[test]
    fn test_short_and_unicode_labels() {
        let short = derive_seed(b"master", &labels(&["x"]), TEST_COST).unwrap();
        let accented = derive_seed(b"master", &labels(&["contraseña"]), TEST_COST).unwrap();
        assert_eq!(short.len(), KEY_LEN);
        assert_ne!(short.as_ref(), accented.as_ref());
    }

    #[test]
    fn test_label_salt_is_length_prefixed() {
        assert_ne!(label_salt(b"ab").as_ref(), label_salt(b"ab\0").as_ref());
        assert_eq!(label_salt(b"site").as_ref(), label_salt(b"site").as_ref());
    }

    #[test]
    fn test_derived_password_reproducible() {
        let key = derive_seed(b"master", &labels(&["bank"]), TEST_COST).unwrap();
        let generator = Generator::new().with_year(REFERENCE_YEAR);
        let options = GenerationOptions {
            include_symbols: true,
            ..Default::default()
        };

        let first = generator
            .generate(&options, &mut Keystream::new(&key))
            .unwrap();
        let second = generator
            .generate(&options, &mut Keystream::new(&key))
            .unwrap();
        assert_eq!(first.password, second.password);
    }

    #[test]
    fn test_presets() {
        assert_eq!(KdfCost::STANDARD.memory_mib(), 64);
        assert_eq!(KdfCost::PARANOID.memory_mib(), 256);
    }
}
