pub mod listing;
pub mod loan;

pub use listing::*;
pub use loan::*;
