//! Reward token balances

use redb::ReadableTable;
use tracing::debug;
use zstake_staking::{AccountId, ClaimId, Handle, StakingResult, TokenBackend, TokenCredit};

use crate::tables::{encode_ciphertext, handle_from_bytes, BALANCES, CIPHERTEXTS, CREDITED};
use crate::{RedbBackend, StorageResult};

impl RedbBackend {
    fn load_balance_handle(&self, holder: &AccountId) -> StorageResult<Option<Handle>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(BALANCES)?;

        let result = match table.get(holder.0.as_slice())? {
            Some(data) => Some(handle_from_bytes(data.value())?),
            None => None,
        };

        Ok(result)
    }

    fn has_credit(&self, claim: &ClaimId) -> StorageResult<bool> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(CREDITED)?;
        let exists = table.get(claim.0.as_slice())?.is_some();
        Ok(exists)
    }

    fn apply_credit(&self, credit: TokenCredit) -> StorageResult<()> {
        let encoded = encode_ciphertext(&credit.balance, &credit.acl)?;
        let handle = credit.balance.handle;

        let write_txn = self.db.begin_write()?;
        {
            let mut ciphertexts = write_txn.open_table(CIPHERTEXTS)?;
            ciphertexts.insert(handle.0.as_slice(), encoded.as_slice())?;
            if let Some(old) = credit.retired.filter(|h| !h.is_zero()) {
                ciphertexts.remove(old.0.as_slice())?;
            }

            let mut balances = write_txn.open_table(BALANCES)?;
            balances.insert(credit.to.0.as_slice(), handle.0.as_slice())?;

            let mut credited = write_txn.open_table(CREDITED)?;
            credited.insert(credit.claim.0.as_slice(), credit.to.0.as_slice())?;
        }
        write_txn.commit()?;

        debug!(account = %credit.to, balance = %handle, "stored token credit");
        Ok(())
    }
}

impl TokenBackend for RedbBackend {
    fn balance_handle(&self, holder: &AccountId) -> StakingResult<Option<Handle>> {
        Ok(self.load_balance_handle(holder)?)
    }

    fn is_credited(&self, claim: &ClaimId) -> StakingResult<bool> {
        Ok(self.has_credit(claim)?)
    }

    fn commit_credit(&self, credit: TokenCredit) -> StakingResult<()> {
        Ok(self.apply_credit(credit)?)
    }
}
