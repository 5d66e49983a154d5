use std::collections::BTreeMap;

use anchor_lang::prelude::*;

use crate::error::ErrorCode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountFilter {
    Memcmp { offset: usize, bytes: Vec<u8> },
    DataSize(u64),
}

impl AccountFilter {
    pub fn memcmp(offset: usize, bytes: impl Into<Vec<u8>>) -> Self {
        Self::Memcmp {
            offset,
            bytes: bytes.into(),
        }
    }

    pub fn matches(&self, data: &[u8]) -> bool {
        match self {
            Self::Memcmp { offset, bytes } => offset
                .checked_add(bytes.len())
                .and_then(|end| data.get(*offset..end))
                .map_or(false, |window| window == bytes.as_slice()),
            Self::DataSize(size) => data.len() as u64 == *size,
        }
    }
}

/// Read side of the cluster. Transport failures surface as
/// `ErrorCode::SourceUnavailable`.
pub trait AccountSource {
    /// Raw account data, `None` when the account does not exist.
    fn get_account(&self, address: &Pubkey) -> Result<Option<Vec<u8>>>;

    /// Accounts owned by `program_id` matching every filter.
    fn get_program_accounts(
        &self,
        program_id: &Pubkey,
        filters: &[AccountFilter],
    ) -> Result<Vec<(Pubkey, Vec<u8>)>>;

    fn account_exists(&self, address: &Pubkey) -> Result<bool> {
        Ok(self.get_account(address)?.is_some())
    }
}

impl<T: AccountSource + ?Sized> AccountSource for &T {
    fn get_account(&self, address: &Pubkey) -> Result<Option<Vec<u8>>> {
        (**self).get_account(address)
    }

    fn get_program_accounts(
        &self,
        program_id: &Pubkey,
        filters: &[AccountFilter],
    ) -> Result<Vec<(Pubkey, Vec<u8>)>> {
        (**self).get_program_accounts(program_id, filters)
    }
}

/// Fetches and decodes one Anchor account. Missing accounts are `Ok(None)`;
/// data of the wrong type is an error.
pub fn fetch_account<T: AccountDeserialize>(
    source: &impl AccountSource,
    address: &Pubkey,
) -> Result<Option<T>> {
    match source.get_account(address)? {
        Some(data) => {
            let mut data = data.as_slice();
            T::try_deserialize(&mut data)
                .map(Some)
                .map_err(|_| error!(ErrorCode::AccountDecodeFailed))
        }
        None => Ok(None),
    }
}

#[derive(Debug, Clone)]
struct StoredAccount {
    owner: Pubkey,
    data: Vec<u8>,
}

/// Account store kept in memory, ordered by address.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAccounts {
    accounts: BTreeMap<Pubkey, StoredAccount>,
}

impl InMemoryAccounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, address: Pubkey, owner: Pubkey, data: Vec<u8>) {
        self.accounts.insert(address, StoredAccount { owner, data });
    }

    /// Stores an Anchor account under its owning program.
    pub fn insert_account<T: AccountSerialize + Owner>(
        &mut self,
        address: Pubkey,
        account: &T,
    ) -> Result<()> {
        let mut data = Vec::new();
        account.try_serialize(&mut data)?;
        self.insert(address, T::owner(), data);
        Ok(())
    }

    pub fn remove(&mut self, address: &Pubkey) -> bool {
        self.accounts.remove(address).is_some()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

impl AccountSource for InMemoryAccounts {
    fn get_account(&self, address: &Pubkey) -> Result<Option<Vec<u8>>> {
        Ok(self.accounts.get(address).map(|a| a.data.clone()))
    }

    fn get_program_accounts(
        &self,
        program_id: &Pubkey,
        filters: &[AccountFilter],
    ) -> Result<Vec<(Pubkey, Vec<u8>)>> {
        Ok(self
            .accounts
            .iter()
            .filter(|(_, a)| a.owner == *program_id)
            .filter(|(_, a)| filters.iter().all(|f| f.matches(&a.data)))
            .map(|(address, a)| (*address, a.data.clone()))
            .collect())
    }
}
