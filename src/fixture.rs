//! Randomized, realistic-looking field values for generated log lines.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

pub const USERS: [&str; 7] = ["admin", "root", "user", "guest", "support", "sysadmin", "deploy"];
pub const ACTIONS: [&str; 6] = ["login", "logout", "failed", "accepted", "error", "timeout"];
pub const PATHS: [&str; 6] = [
    "/index.html",
    "/api/v1/login",
    "/admin",
    "/dashboard",
    "/config",
    "/etc/passwd",
];
pub const STATUS_CODES: [u16; 11] = [200, 201, 301, 302, 400, 401, 403, 404, 500, 502, 503];

pub const MIN_PORT: u16 = 1024;
pub const MAX_PORT: u16 = 65534;

/// Source of random fixture values.
///
/// Owns its generator, so two providers never share state. Use [`Fixtures::seeded`]
/// for a reproducible sequence.
#[derive(Debug, Clone)]
pub struct Fixtures<R = StdRng> {
    rng: R,
}

impl Fixtures<StdRng> {
    /// Provider seeded from OS entropy.
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for Fixtures<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> Fixtures<R> {
    pub fn from_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Dotted IPv4 address. Each octet is drawn from 0..=254; 255 never appears.
    pub fn ip(&mut self) -> String {
        let [a, b, c, d]: [u8; 4] = std::array::from_fn(|_| self.rng.gen_range(0..255));
        format!("{a}.{b}.{c}.{d}")
    }

    pub fn user(&mut self) -> &'static str {
        self.pick(&USERS)
    }

    pub fn action(&mut self) -> &'static str {
        self.pick(&ACTIONS)
    }

    pub fn path(&mut self) -> &'static str {
        self.pick(&PATHS)
    }

    pub fn status_code(&mut self) -> u16 {
        *STATUS_CODES
            .choose(&mut self.rng)
            .unwrap_or(&STATUS_CODES[0])
    }

    /// Unprivileged port in `MIN_PORT..=MAX_PORT`.
    pub fn port(&mut self) -> u16 {
        self.rng.gen_range(MIN_PORT..=MAX_PORT)
    }

    fn pick(&mut self, items: &[&'static str]) -> &'static str {
        items.choose(&mut self.rng).copied().unwrap_or_default()
    }
}
