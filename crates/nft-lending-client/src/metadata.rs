use std::collections::BTreeMap;

use anchor_lang::prelude::*;

use crate::config::ClientConfig;
use crate::error::ErrorCode;

// collection as reported by the indexer; floor_price in lamports
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    pub id: Pubkey,
    pub name: String,
    pub symbol: String,
    pub floor_price: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NftMetadata {
    pub mint: Pubkey,
    pub name: String,
    pub uri: String,
    // collection key from the token metadata, counted only when verified
    pub collection: Option<Pubkey>,
    pub collection_verified: bool,
}

impl NftMetadata {
    pub fn verified_collection(&self) -> Option<Pubkey> {
        self.collection.filter(|_| self.collection_verified)
    }
}

/// Collection and NFT lookups served by an RPC/indexing service.
pub trait MetadataSource {
    fn collections(&self) -> Result<Vec<Collection>>;

    fn collection(&self, id: &Pubkey) -> Result<Option<Collection>>;

    fn nft(&self, mint: &Pubkey) -> Result<Option<NftMetadata>>;

    fn nfts_by_owner(&self, owner: &Pubkey) -> Result<Vec<NftMetadata>>;
}

impl<T: MetadataSource + ?Sized> MetadataSource for &T {
    fn collections(&self) -> Result<Vec<Collection>> {
        (**self).collections()
    }

    fn collection(&self, id: &Pubkey) -> Result<Option<Collection>> {
        (**self).collection(id)
    }

    fn nft(&self, mint: &Pubkey) -> Result<Option<NftMetadata>> {
        (**self).nft(mint)
    }

    fn nfts_by_owner(&self, owner: &Pubkey) -> Result<Vec<NftMetadata>> {
        (**self).nfts_by_owner(owner)
    }
}

/// Floor price of the verified collection `nft_mint` belongs to.
pub fn floor_price_for(source: &impl MetadataSource, nft_mint: &Pubkey) -> Result<u64> {
    let nft = source
        .nft(nft_mint)?
        .ok_or_else(|| error!(ErrorCode::NftNotFound))?;
    let id = nft
        .verified_collection()
        .ok_or_else(|| error!(ErrorCode::UnverifiedCollection))?;
    let collection = source
        .collection(&id)?
        .ok_or_else(|| error!(ErrorCode::CollectionNotFound))?;
    Ok(collection.floor_price)
}

pub fn collateral_for_nft(
    config: &ClientConfig,
    source: &impl MetadataSource,
    nft_mint: &Pubkey,
) -> Result<u64> {
    config.collateral_for(floor_price_for(source, nft_mint)?)
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryMetadata {
    collections: BTreeMap<Pubkey, Collection>,
    // mint -> (owner, metadata)
    nfts: BTreeMap<Pubkey, (Pubkey, NftMetadata)>,
}

impl InMemoryMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_collection(&mut self, collection: Collection) {
        self.collections.insert(collection.id, collection);
    }

    pub fn insert_nft(&mut self, owner: Pubkey, nft: NftMetadata) {
        self.nfts.insert(nft.mint, (owner, nft));
    }

    // escrow moves change the holder, not the metadata
    pub fn transfer(&mut self, mint: &Pubkey, new_owner: Pubkey) -> bool {
        match self.nfts.get_mut(mint) {
            Some((owner, _)) => {
                *owner = new_owner;
                true
            }
            None => false,
        }
    }
}

impl MetadataSource for InMemoryMetadata {
    fn collections(&self) -> Result<Vec<Collection>> {
        Ok(self.collections.values().cloned().collect())
    }

    fn collection(&self, id: &Pubkey) -> Result<Option<Collection>> {
        Ok(self.collections.get(id).cloned())
    }

    fn nft(&self, mint: &Pubkey) -> Result<Option<NftMetadata>> {
        Ok(self.nfts.get(mint).map(|(_, nft)| nft.clone()))
    }

    fn nfts_by_owner(&self, owner: &Pubkey) -> Result<Vec<NftMetadata>> {
        Ok(self
            .nfts
            .values()
            .filter(|(holder, _)| holder == owner)
            .map(|(_, nft)| nft.clone())
            .collect())
    }
}
