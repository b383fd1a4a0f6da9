use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

// Seedable randomness for the palette and the spin engine.
// server_seed (secret) + client_seed + nonce -> HMAC-SHA256 -> bytes -> floats in [0,1)

pub type HmacSha256 = Hmac<Sha256>;

/// Floats produced per nonce before the stream moves on to the next one.
const FLOATS_PER_NONCE: usize = 8;

/// Anything that can hand out uniform floats in `[0, 1)`.
pub trait RandomSource {
    fn next_unit(&mut self) -> f64;

    /// Uniform sample from `[min, max)`.
    fn next_range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_unit() * (max - min)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

pub fn derive_hash_hex(input: &[u8]) -> String {
    hex::encode(Sha256::digest(input))
}

pub fn derive_floats(hmac_bytes: &[u8], count: usize) -> Vec<f64> {
    // Successive 4-byte chunks become u32s mapped to [0,1)
    let mut out = Vec::with_capacity(count);
    let mut buffer = hmac_bytes.to_vec();
    let mut i = 0usize;
    while out.len() < count {
        if i + 4 > buffer.len() {
            // extend deterministically by hashing the previous buffer
            buffer = Sha256::digest(&buffer).to_vec();
            i = 0;
            continue;
        }
        let v = u32::from_be_bytes([buffer[i], buffer[i + 1], buffer[i + 2], buffer[i + 3]]);
        out.push(f64::from(v) / (f64::from(u32::MAX) + 1.0));
        i += 4;
    }
    out
}

#[derive(Debug, Clone)]
pub struct ProvablyFairRng {
    pub server_seed: String, // secret
    pub client_seed: String,
    pub nonce: u64,
}

impl ProvablyFairRng {
    pub fn new(server_seed: impl Into<String>, client_seed: impl Into<String>, nonce: u64) -> Self {
        Self {
            server_seed: server_seed.into(),
            client_seed: client_seed.into(),
            nonce,
        }
    }

    /// Published commitment to the secret seed.
    pub fn server_seed_hash_hex(&self) -> String {
        derive_hash_hex(self.server_seed.as_bytes())
    }

    pub fn hmac_bytes(&self) -> [u8; 32] {
        let mut mac = HmacSha256::new_from_slice(self.server_seed.as_bytes()).expect("HMAC key");
        let msg = format!("{}:{}", self.client_seed, self.nonce);
        mac.update(msg.as_bytes());
        let res = mac.finalize().into_bytes();
        let mut out = [0u8; 32];
        out.copy_from_slice(&res);
        out
    }

    pub fn next_floats(&self, count: usize) -> Vec<f64> {
        derive_floats(&self.hmac_bytes(), count)
    }
}

/// Endless [`RandomSource`] over [`ProvablyFairRng`]: spends one block of
/// floats per nonce, then advances the nonce.
#[derive(Debug, Clone)]
pub struct SeededStream {
    rng: ProvablyFairRng,
    block: Vec<f64>,
    cursor: usize,
}

impl SeededStream {
    pub fn new(server_seed: impl Into<String>, client_seed: impl Into<String>, nonce: u64) -> Self {
        Self::from_rng(ProvablyFairRng::new(server_seed, client_seed, nonce))
    }

    pub fn from_rng(rng: ProvablyFairRng) -> Self {
        let block = rng.next_floats(FLOATS_PER_NONCE);
        Self {
            rng,
            block,
            cursor: 0,
        }
    }

    /// Nonce the next float will be drawn from.
    pub fn nonce(&self) -> u64 {
        self.rng.nonce
    }

    pub fn server_seed_hash_hex(&self) -> String {
        self.rng.server_seed_hash_hex()
    }
}

impl RandomSource for SeededStream {
    fn next_unit(&mut self) -> f64 {
        if self.cursor == self.block.len() {
            self.rng.nonce = self.rng.nonce.wrapping_add(1);
            self.block = self.rng.next_floats(FLOATS_PER_NONCE);
            self.cursor = 0;
        }
        let v = self.block[self.cursor];
        self.cursor += 1;
        v
    }
}
