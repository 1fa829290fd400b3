//! ACL-checked user decryption
//!
//! The only component holding a client key. It answers for one requester at
//! a time and refuses handles the requester is not allowed to read.

use std::sync::Arc;

use tracing::{debug, warn};
use zstake_fhe::ClientKey;

use crate::backend::CiphertextSource;
use crate::errors::{StakingError, StakingResult};
use crate::types::{AccountId, Handle};

pub struct DecryptionService<S> {
    client_key: ClientKey,
    source: Arc<S>,
}

impl<S: CiphertextSource> DecryptionService<S> {
    pub fn new(client_key: ClientKey, source: Arc<S>) -> Self {
        Self { client_key, source }
    }

    /// Decrypt `handle` on behalf of `requester`
    pub fn user_decrypt(&self, handle: &Handle, requester: &AccountId) -> StakingResult<u64> {
        // The canonical zero is public and carries no secret
        if handle.is_zero() {
            return Ok(0);
        }

        let acl = self
            .source
            .acl(handle)?
            .ok_or(StakingError::UnknownHandle(*handle))?;
        if !acl.allows(requester) {
            warn!(%handle, %requester, "decryption refused");
            return Err(StakingError::UnauthorizedDecryption { handle: *handle });
        }

        let amount = self
            .source
            .ciphertext(handle)?
            .ok_or(StakingError::UnknownHandle(*handle))?;

        debug!(%handle, %requester, "decrypted for requester");
        Ok(amount.value.decrypt(&self.client_key))
    }
}
