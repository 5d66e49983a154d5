use anchor_lang::prelude::Pubkey;
use anchor_lang::solana_program::instruction::Instruction;
use anchor_spl::token;

use nft_lending_client::{
    collateral_for_nft, instruction_discriminator, pda, Action, Aggregator, ClientConfig, Collection,
    Dispatcher, InMemoryAccounts, InMemoryMetadata, LiquidationWatch, Listing, Loan,
    MetadataSource, NftMetadata, Notification, Wallet, LAMPORTS_PER_SOL, SECONDS_PER_DAY,
};

const T0: i64 = 1_700_000_000;
const WEEK: u64 = 7 * SECONDS_PER_DAY as u64;

struct RecordingWallet {
    key: Pubkey,
    sent: Vec<Vec<Instruction>>,
}

impl RecordingWallet {
    fn new() -> Self {
        Self {
            key: Pubkey::new_unique(),
            sent: Vec::new(),
        }
    }

    fn last(&self) -> &[Instruction] {
        self.sent.last().map(Vec::as_slice).unwrap_or_default()
    }
}

impl Wallet for RecordingWallet {
    fn public_key(&self) -> Option<Pubkey> {
        Some(self.key)
    }

    fn sign_and_send(&mut self, instructions: &[Instruction]) -> anchor_lang::Result<String> {
        self.sent.push(instructions.to_vec());
        Ok(format!("sig-{}", self.sent.len()))
    }
}

fn selector(ix: &Instruction) -> &[u8] {
    &ix.data[..8]
}

/// Stands in for the on-chain program: applies the state change an accepted
/// instruction would make.
struct Chain {
    store: InMemoryAccounts,
    config: ClientConfig,
}

impl Chain {
    fn new() -> Self {
        Self {
            store: InMemoryAccounts::new(),
            config: ClientConfig::default(),
        }
    }

    fn token_account(&mut self, owner: &Pubkey, mint: &Pubkey) {
        self.store
            .insert(pda::user_token_account(owner, mint), token::ID, vec![0; 165]);
    }

    fn list(&mut self, lender: Pubkey, nft_mint: Pubkey) -> Pubkey {
        let (address, bump) = pda::listing_address(&self.config.program_id, &lender, &nft_mint);
        let listing = Listing {
            lender,
            nft_mint,
            loan_duration: WEEK,
            interest_rate_bps: 1_250,
            collateral_amount: 10 * LAMPORTS_PER_SOL,
            is_active: true,
            bump,
        };
        self.store.insert_account(address, &listing).unwrap();
        self.store.insert(
            pda::nft_vault(&self.config.program_id, &nft_mint),
            token::ID,
            vec![0; 165],
        );
        address
    }

    fn borrow(&mut self, borrower: Pubkey, listing_address: Pubkey, now: i64) -> Pubkey {
        let mut listing = Listing::decode(&self.listing_data(&listing_address)).unwrap();
        listing.is_active = false;
        self.store.insert_account(listing_address, &listing).unwrap();

        let (address, bump) = pda::loan_address(&self.config.program_id, &listing_address);
        let loan = Loan {
            borrower,
            listing: listing_address,
            start_time: now,
            end_time: now + listing.loan_duration as i64,
            collateral_amount: listing.collateral_amount,
            interest_rate_bps: listing.interest_rate_bps,
            is_active: true,
            bump,
        };
        self.store.insert_account(address, &loan).unwrap();
        self.token_account(&borrower, &listing.nft_mint);
        address
    }

    fn close_loan(&mut self, loan_address: Pubkey) {
        use nft_lending_client::AccountSource;
        let data = self.store.get_account(&loan_address).unwrap().unwrap();
        let mut loan = Loan::decode(&data).unwrap();
        loan.is_active = false;
        self.store.insert_account(loan_address, &loan).unwrap();
    }

    fn listing_data(&self, address: &Pubkey) -> Vec<u8> {
        use nft_lending_client::AccountSource;
        self.store.get_account(address).unwrap().unwrap()
    }
}

#[test]
fn list_borrow_overdue_liquidate() {
    let mut chain = Chain::new();
    let nft_mint = Pubkey::new_unique();

    // lender lists; the vault token account does not exist yet
    let mut lender = Dispatcher::new(&chain.config, &chain.store, RecordingWallet::new());
    let notice = lender.dispatch(&Action::List {
        nft_mint,
        loan_duration: WEEK,
        interest_rate_bps: 1_250,
        collateral_amount: 10 * LAMPORTS_PER_SOL,
    });
    assert_eq!(
        notice,
        Notification::Success {
            action: "list_nft",
            signature: "sig-1".to_string()
        }
    );
    let bundle = lender.wallet().last().to_vec();
    let lender_key = lender.wallet().key;
    assert_eq!(bundle.len(), 2);
    assert_eq!(selector(&bundle[1]), &instruction_discriminator("list_nft")[..]);
    drop(lender);

    chain.token_account(&lender_key, &nft_mint);
    let listing = chain.list(lender_key, nft_mint);
    {
        let aggregator = Aggregator::new(&chain.config, &chain.store);
        let listings = aggregator.active_listings().unwrap();
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].address, listing);
        assert_eq!(listings[0].listing.terms().total_repayment().unwrap(), 10_023_972_602);
    }

    // borrower accepts; their token account is created in the same bundle
    let mut borrower = Dispatcher::new(&chain.config, &chain.store, RecordingWallet::new());
    assert!(borrower.dispatch(&Action::Borrow { listing }).is_success());
    let bundle = borrower.wallet().last().to_vec();
    let borrower_key = borrower.wallet().key;
    assert_eq!(bundle.len(), 2);
    assert_eq!(bundle[0].program_id, anchor_spl::associated_token::ID);
    assert_eq!(selector(&bundle[1]), &instruction_discriminator("borrow")[..]);
    assert_eq!(bundle[1].accounts[2].pubkey, pda::loan_address(&chain.config.program_id, &listing).0);
    drop(borrower);

    let loan = chain.borrow(borrower_key, listing, T0);

    let now = T0 + 8 * SECONDS_PER_DAY;
    let mut watch = LiquidationWatch::new(&chain.config);
    {
        let aggregator = Aggregator::new(&chain.config, &chain.store);
        assert!(aggregator.active_listings().unwrap().is_empty());
        assert!(aggregator.liquidatable_loans(T0 + WEEK as i64).unwrap().is_empty());

        assert!(watch.poll(&aggregator, now).unwrap());
        let due = watch.loans();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].address, loan);
        assert_eq!(due[0].nft_mint(), nft_mint);
        assert_eq!(due[0].quote.time_overdue.days, 1);
        assert!(due[0].quote.time_remaining.is_zero());
    }

    // lender liquidates
    let mut wallet = RecordingWallet::new();
    wallet.key = lender_key;
    let mut lender = Dispatcher::new(&chain.config, &chain.store, wallet);
    assert!(lender.dispatch(&Action::Liquidate { loan }).is_success());
    let bundle = lender.wallet().last().to_vec();
    assert_eq!(bundle.len(), 1);
    assert_eq!(selector(&bundle[0]), &instruction_discriminator("liquidate")[..]);
    assert!(bundle[0].accounts[0].is_signer);
    assert_eq!(bundle[0].accounts[0].pubkey, lender_key);
    drop(lender);

    chain.close_loan(loan);
    let aggregator = Aggregator::new(&chain.config, &chain.store);
    watch.refresh(&aggregator, now + 60).unwrap();
    assert!(watch.loans().is_empty());
}

#[test]
fn borrow_then_repay_before_due() {
    let mut chain = Chain::new();
    let lender = Pubkey::new_unique();
    let nft_mint = Pubkey::new_unique();
    let listing = chain.list(lender, nft_mint);

    let borrower_wallet = RecordingWallet::new();
    let borrower_key = borrower_wallet.key;
    let loan = chain.borrow(borrower_key, listing, T0);

    let now = T0 + 2 * SECONDS_PER_DAY;
    {
        let aggregator = Aggregator::new(&chain.config, &chain.store);
        let portfolio = aggregator.portfolio(&borrower_key, now).unwrap();
        assert_eq!(portfolio.borrowed.len(), 1);
        assert!(!portfolio.borrowed[0].quote.is_overdue);
        assert_eq!(portfolio.borrowed[0].quote.time_remaining.days, 5);
        assert_eq!(portfolio.outstanding_repayment().unwrap(), 10_023_972_602);

        let lender_view = aggregator.portfolio(&lender, now).unwrap();
        assert_eq!(lender_view.lent.len(), 1);
        assert_eq!(lender_view.liquidatable().count(), 0);
    }

    // the lender's token account is gone, so repay recreates it first
    let mut borrower = Dispatcher::new(&chain.config, &chain.store, borrower_wallet);
    let bundle = borrower.build(&Action::Repay { loan }).unwrap();
    assert_eq!(bundle.len(), 2);
    let repay = &bundle[1];
    assert_eq!(selector(repay), &instruction_discriminator("repay")[..]);
    assert_eq!(repay.accounts[0].pubkey, borrower_key);
    assert_eq!(repay.accounts[1].pubkey, lender);
    assert_eq!(repay.accounts[3].pubkey, loan);

    assert!(borrower.dispatch(&Action::Repay { loan }).is_success());
    assert_eq!(borrower.wallet().sent.len(), 1);
    drop(borrower);

    chain.close_loan(loan);
    let aggregator = Aggregator::new(&chain.config, &chain.store);
    assert!(aggregator.loans_by_borrower(&borrower_key, now).unwrap().is_empty());
}

#[test]
fn cancel_active_listing() {
    let mut chain = Chain::new();
    let wallet = RecordingWallet::new();
    let nft_mint = Pubkey::new_unique();
    let listing = chain.list(wallet.key, nft_mint);
    chain.token_account(&wallet.key, &nft_mint);

    let lender_key = wallet.key;
    let mut lender = Dispatcher::new(&chain.config, &chain.store, wallet);
    assert!(lender.dispatch(&Action::Cancel { listing }).is_success());

    let bundle = lender.wallet().last();
    assert_eq!(bundle.len(), 1);
    assert_eq!(selector(&bundle[0]), &instruction_discriminator("cancel_listing")[..]);
    assert_eq!(bundle[0].accounts[0].pubkey, lender_key);
    assert_eq!(
        bundle[0].accounts[4].pubkey,
        pda::nft_vault(&chain.config.program_id, &nft_mint)
    );
}

#[test]
fn list_at_collection_floor() {
    let chain = Chain::new();
    let config = chain.config.clone().with_collateral_ratio_bps(8_000);
    let wallet = RecordingWallet::new();

    let collection = Collection {
        id: Pubkey::new_unique(),
        name: "Okay Bears".to_string(),
        symbol: "OKB".to_string(),
        floor_price: 25 * LAMPORTS_PER_SOL,
    };
    let nft = NftMetadata {
        mint: Pubkey::new_unique(),
        name: "Okay Bear #77".to_string(),
        uri: "https://arweave.net/okb77".to_string(),
        collection: Some(collection.id),
        collection_verified: true,
    };
    let mut metadata = InMemoryMetadata::new();
    metadata.insert_collection(collection);
    metadata.insert_nft(wallet.key, nft);

    // the lender picks one of their own NFTs
    let owned = metadata.nfts_by_owner(&wallet.key).unwrap();
    assert_eq!(owned.len(), 1);
    let nft_mint = owned[0].mint;

    let collateral_amount = collateral_for_nft(&config, &metadata, &nft_mint).unwrap();
    assert_eq!(collateral_amount, 20 * LAMPORTS_PER_SOL);

    let dispatcher = Dispatcher::new(&config, &chain.store, wallet);
    let bundle = dispatcher
        .build(&Action::List {
            nft_mint,
            loan_duration: WEEK,
            interest_rate_bps: 1_250,
            collateral_amount,
        })
        .unwrap();
    let list = bundle.last().unwrap();
    assert_eq!(selector(list), &instruction_discriminator("list_nft")[..]);
    assert_eq!(&list.data[18..26], &collateral_amount.to_le_bytes()[..]);
}
