//! # Verdant Adoption
//!
//! Pixel adoptions from quote to permanent record.
//!
//! [`CheckoutService::quote`] prices a plan and captures exchange rates;
//! [`CheckoutService::checkout`] pays exactly that amount to the treasury
//! through a [`Settlement`] provider and, on success, appends a
//! [`PixelAdoption`] to the [`AdoptionLedger`].

pub mod checkout;
pub mod error;
pub mod ids;
pub mod ledger;
pub mod record;
pub mod settlement;


pub use checkout::{CheckoutQuote, CheckoutService};
pub use error::{AdoptionError, SettlementError};
pub use ids::{PixelId, TxHash, WalletAddress};
pub use ledger::{AdoptionLedger, InMemoryLedger};
pub use record::PixelAdoption;
pub use settlement::{Settlement, TransferRequest};
