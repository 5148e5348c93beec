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

use chacha20::ChaCha20;
use chacha20::cipher::{KeyIvInit, StreamCipher};
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use zeroize::Zeroizing;

pub const KEY_LEN: usize = 32;

const BUFFER_LEN: usize = 512;

/// Random source backed by a ChaCha20 keystream.
///
/// The same key always yields the same stream, which is what the generator
/// tests and derived mode rely on. Fresh keys come from the OS.
pub struct Keystream {
    cipher: ChaCha20,
    buffer: Zeroizing<[u8; BUFFER_LEN]>,
    pos: usize,
}

impl Keystream {
    pub fn new(key: &[u8; KEY_LEN]) -> Self {
        let mut stream = Self {
            cipher: ChaCha20::new(key.into(), &[0u8; 12].into()),
            buffer: Zeroizing::new([0u8; BUFFER_LEN]),
            pos: 0,
        };
        stream.refill();
        stream
    }

    pub fn from_os() -> Self {
        let mut key = Zeroizing::new([0u8; KEY_LEN]);
        OsRng.fill_bytes(&mut key[..]);
        Self::new(&key)
    }

    fn refill(&mut self) {
        self.buffer.fill(0);
        self.cipher.apply_keystream(&mut self.buffer[..]);
        self.pos = 0;
    }
}

impl RngCore for Keystream {
    fn next_u32(&mut self) -> u32 {
        let mut bytes = [0u8; 4];
        self.fill_bytes(&mut bytes);
        u32::from_le_bytes(bytes)
    }

    fn next_u64(&mut self) -> u64 {
        let mut bytes = [0u8; 8];
        self.fill_bytes(&mut bytes);
        u64::from_le_bytes(bytes)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        let mut written = 0;
        while written < dest.len() {
            if self.pos >= BUFFER_LEN {
                self.refill();
            }

            let take = (dest.len() - written).min(BUFFER_LEN - self.pos);
            dest[written..written + take].copy_from_slice(&self.buffer[self.pos..self.pos + take]);
            self.buffer[self.pos..self.pos + take].fill(0);
            self.pos += take;
            written += take;
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl CryptoRng for Keystream {}
