//! Real TFHE-rs implementation

mod keys;
mod ciphertext;
mod operations;
mod server;

pub use keys::{ClientKey, ServerKey, PublicKey, KeyPair};
pub use ciphertext::{FHECiphertext, FHEUint64};
pub use operations::{FHEOps, FHEBool};
pub use server::{FHEServer, ElapsedFactor};
