#![allow(unexpected_cfgs)]
pub mod aggregator;
pub mod calculator;
pub mod config;
pub mod constants;
pub mod dispatcher;
pub mod error;
pub mod events;
pub mod instructions;
pub mod metadata;
pub mod pda;
pub mod source;
pub mod state;

use anchor_lang::prelude::*;

pub use aggregator::*;
pub use calculator::*;
pub use config::*;
pub use constants::*;
pub use dispatcher::*;
pub use instructions::*;
pub use metadata::*;
pub use source::*;
pub use state::*;

// deployed lending program; every account type and PDA below is owned by it
declare_id!("CGtRdTnqAHm1yQ1FBAZCoqkhr2DEoYs6LgQPRrg1Mfp3");
