//! Engine state: accounts, claim journal and event log

use redb::ReadableTable;
use tracing::debug;
use zstake_staking::{
    AccountId, AccountRecord, EventRecord, PendingClaim, StakingResult, StateBackend, WriteBatch,
};

use crate::tables::{encode_ciphertext, ACCOUNTS, CIPHERTEXTS, CLAIMS, EVENTS};
use crate::{RedbBackend, StorageResult};

impl RedbBackend {
    fn load_account(&self, account: &AccountId) -> StorageResult<Option<AccountRecord>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ACCOUNTS)?;

        let result = match table.get(account.0.as_slice())? {
            Some(data) => Some(bincode::deserialize(data.value())?),
            None => None,
        };

        Ok(result)
    }

    fn apply(&self, batch: WriteBatch) -> StorageResult<()> {
        // Serialize ciphertexts before taking the write lock
        let ciphertexts = batch
            .ciphertexts
            .iter()
            .map(|(amount, acl)| Ok((amount.handle, encode_ciphertext(amount, acl)?)))
            .collect::<StorageResult<Vec<_>>>()?;

        let write_txn = self.db.begin_write()?;
        let first_seq;
        {
            let mut table = write_txn.open_table(CIPHERTEXTS)?;
            for (handle, bytes) in &ciphertexts {
                table.insert(handle.0.as_slice(), bytes.as_slice())?;
            }
            for handle in &batch.retired {
                table.remove(handle.0.as_slice())?;
            }

            let mut accounts = write_txn.open_table(ACCOUNTS)?;
            for (account, record) in &batch.accounts {
                let encoded = bincode::serialize(record)?;
                accounts.insert(account.0.as_slice(), encoded.as_slice())?;
            }

            let mut claims = write_txn.open_table(CLAIMS)?;
            for claim in &batch.claims_started {
                let encoded = bincode::serialize(claim)?;
                claims.insert(claim.id.0.as_slice(), encoded.as_slice())?;
            }
            for id in &batch.claims_finished {
                claims.remove(id.0.as_slice())?;
            }

            let mut events = write_txn.open_table(EVENTS)?;
            first_seq = events.len()?;
            for (offset, event) in batch.events.into_iter().enumerate() {
                let record = EventRecord {
                    seq: first_seq + offset as u64,
                    event,
                };
                let encoded = bincode::serialize(&record)?;
                events.insert(record.seq, encoded.as_slice())?;
            }
        }
        write_txn.commit()?;

        debug!(
            ciphertexts = ciphertexts.len(),
            retired = batch.retired.len(),
            accounts = batch.accounts.len(),
            first_seq,
            "committed batch"
        );
        Ok(())
    }

    fn load_pending_claims(&self) -> StorageResult<Vec<PendingClaim>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(CLAIMS)?;

        let mut claims = Vec::new();
        for item in table.iter()? {
            let (_, data) = item?;
            claims.push(bincode::deserialize(data.value())?);
        }
        Ok(claims)
    }

    fn load_events(&self, from_seq: u64) -> StorageResult<Vec<EventRecord>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(EVENTS)?;

        let mut events = Vec::new();
        for item in table.range(from_seq..)? {
            let (_, data) = item?;
            events.push(bincode::deserialize(data.value())?);
        }
        Ok(events)
    }
}

impl StateBackend for RedbBackend {
    fn account(&self, account: &AccountId) -> StakingResult<Option<AccountRecord>> {
        Ok(self.load_account(account)?)
    }

    fn commit(&self, batch: WriteBatch) -> StakingResult<()> {
        Ok(self.apply(batch)?)
    }

    fn pending_claims(&self) -> StakingResult<Vec<PendingClaim>> {
        Ok(self.load_pending_claims()?)
    }

    fn events_since(&self, from_seq: u64) -> StakingResult<Vec<EventRecord>> {
        Ok(self.load_events(from_seq)?)
    }
}
