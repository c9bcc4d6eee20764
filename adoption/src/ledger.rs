//! Append-only adoption history.

use {
    crate::{
        error::AdoptionError,
        ids::{PixelId, TxHash, WalletAddress},
        record::PixelAdoption,
    },
    chrono::{DateTime, Utc},
    parking_lot::RwLock,
    std::collections::{BTreeSet, HashMap},
};

pub trait AdoptionLedger: Send + Sync {
    /// Record a confirmed adoption. Each settlement transaction may back
    /// at most one record.
    fn append(&self, adoption: PixelAdoption) -> Result<(), AdoptionError>;

    /// Every adoption of `pixel`, oldest first.
    fn by_pixel(&self, pixel: &PixelId) -> Vec<PixelAdoption>;

    /// Every adoption paid by `buyer`, oldest first.
    fn by_buyer(&self, buyer: &WalletAddress) -> Vec<PixelAdoption>;

    /// Distinct wallets holding an active adoption of `pixel` at `now`.
    fn holders(&self, pixel: &PixelId, now: DateTime<Utc>) -> Vec<WalletAddress> {
        self.by_pixel(pixel)
            .into_iter()
            .filter(|a| a.is_active(now))
            .map(|a| a.buyer)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

#[derive(Debug, Default)]
struct Entries {
    records: Vec<PixelAdoption>,
    by_tx: HashMap<TxHash, usize>,
    by_pixel: HashMap<PixelId, Vec<usize>>,
    by_buyer: HashMap<WalletAddress, Vec<usize>>,
}

impl Entries {
    fn collect(&self, indexes: Option<&Vec<usize>>) -> Vec<PixelAdoption> {
        indexes
            .into_iter()
            .flatten()
            .filter_map(|&i| self.records.get(i).cloned())
            .collect()
    }
}

#[derive(Debug, Default)]
pub struct InMemoryLedger {
    entries: RwLock<Entries>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AdoptionLedger for InMemoryLedger {
    fn append(&self, adoption: PixelAdoption) -> Result<(), AdoptionError> {
        let mut entries = self.entries.write();
        if entries.by_tx.contains_key(&adoption.tx_hash) {
            return Err(AdoptionError::DuplicateTransaction(adoption.tx_hash));
        }
        let index = entries.records.len();
        entries.by_tx.insert(adoption.tx_hash.clone(), index);
        entries
            .by_pixel
            .entry(adoption.pixel_id.clone())
            .or_default()
            .push(index);
        entries
            .by_buyer
            .entry(adoption.buyer.clone())
            .or_default()
            .push(index);
        entries.records.push(adoption);
        Ok(())
    }

    fn by_pixel(&self, pixel: &PixelId) -> Vec<PixelAdoption> {
        let entries = self.entries.read();
        entries.collect(entries.by_pixel.get(pixel))
    }

    fn by_buyer(&self, buyer: &WalletAddress) -> Vec<PixelAdoption> {
        let entries = self.entries.read();
        entries.collect(entries.by_buyer.get(buyer))
    }
}
