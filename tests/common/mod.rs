//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::sync::Arc;

use once_cell::sync::Lazy;
use zstake::prelude::*;

/// Key generation dominates test time, so every test in a binary shares one key set.
pub static KEYS: Lazy<KeyPair> =
    Lazy::new(|| KeyPair::generate(&FHEConfig::default()).expect("key generation"));

pub const START: u64 = 1_700_000_000;
pub const DAY: u64 = SECONDS_PER_DAY;

pub fn server() -> FHEServer {
    FHEServer::new(KEYS.server.clone(), KEYS.public.clone()).expect("matching keys")
}

pub fn units(n: u128) -> u128 {
    n * STAKE_UNIT
}

pub fn account(byte: u8) -> AccountId {
    AccountId([byte; 32])
}

pub type MemoryEngine = StakingEngine<MemoryBackend, Zcoin<MemoryBackend>, Arc<ManualClock>>;

/// Engine over an in-memory backend, clock at [`START`]
pub struct Setup {
    pub engine: MemoryEngine,
    pub clock: Arc<ManualClock>,
    pub backend: Arc<MemoryBackend>,
    pub decryption: DecryptionService<MemoryBackend>,
}

impl Setup {
    pub fn new() -> Self {
        let fhe = server();
        let backend = Arc::new(MemoryBackend::new());
        let token = Arc::new(Zcoin::new(backend.clone(), fhe.clone()));
        let clock = Arc::new(ManualClock::new(START));
        let engine = StakingEngine::new(backend.clone(), token, fhe, clock.clone())
            .expect("engine");
        let decryption = DecryptionService::new(KEYS.client.clone(), backend.clone());
        Self {
            engine,
            clock,
            backend,
            decryption,
        }
    }

    pub fn stake_of(&self, who: &AccountId) -> u64 {
        let handle = self.engine.encrypted_stake_of(who).unwrap();
        self.decryption.user_decrypt(&handle, who).unwrap()
    }

    pub fn reward_of(&self, who: &AccountId) -> u64 {
        let handle = self.engine.encrypted_rewards_of(who).unwrap();
        self.decryption.user_decrypt(&handle, who).unwrap()
    }

    pub fn balance_of(&self, who: &AccountId) -> u64 {
        let handle = self.engine.encrypted_balance_of(who).unwrap();
        self.decryption.user_decrypt(&handle, who).unwrap()
    }
}
