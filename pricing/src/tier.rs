//! Ownership tiers derived from a region's yearly price per m².
//!
//! Thresholds are evaluated high-to-low and do not overlap:
//!
//! ```text
//! price >= 300         → Diamond (level 1)
//! 250 <= price < 300   → Gold    (level 2)
//! 200 <= price < 250   → Silver  (level 3)
//! price < 200          → Basic   (level 4)
//! ```
//!
//! A lower level is more exclusive.  Benefits carry the level they require
//! and are visible to holders whose own level is numerically lower or equal.

use {
    serde::{Deserialize, Serialize},
    std::fmt,
};

/// Lower bound (inclusive) of the Diamond tier.
pub const DIAMOND_MIN_PRICE: f64 = 300.0;
/// Lower bound (inclusive) of the Gold tier.
pub const GOLD_MIN_PRICE: f64 = 250.0;
/// Lower bound (inclusive) of the Silver tier.
pub const SILVER_MIN_PRICE: f64 = 200.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Diamond,
    Gold,
    Silver,
    Basic,
}

impl Tier {
    /// All tiers, most exclusive first.
    pub const ALL: [Tier; 4] = [Tier::Diamond, Tier::Gold, Tier::Silver, Tier::Basic];

    /// Numeric level, 1 = highest.
    pub const fn level(self) -> u8 {
        match self {
            Tier::Diamond => 1,
            Tier::Gold => 2,
            Tier::Silver => 3,
            Tier::Basic => 4,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Tier::Diamond => "Diamond",
            Tier::Gold => "Gold",
            Tier::Silver => "Silver",
            Tier::Basic => "Basic",
        }
    }

    pub fn from_level(level: u8) -> Option<Tier> {
        Tier::ALL.into_iter().find(|tier| tier.level() == level)
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Map a yearly price per m² to its tier.
///
/// Every value lands in exactly one tier.  `NaN` satisfies no threshold and
/// therefore falls through to [`Tier::Basic`].
pub fn classify(price_per_m2: f64) -> Tier {
    if price_per_m2 >= DIAMOND_MIN_PRICE {
        Tier::Diamond
    } else if price_per_m2 >= GOLD_MIN_PRICE {
        Tier::Gold
    } else if price_per_m2 >= SILVER_MIN_PRICE {
        Tier::Silver
    } else {
        Tier::Basic
    }
}

/// A perk or experience unlocked by owning pixels of a given tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Benefit {
    pub id: String,
    pub title: String,
    /// Least exclusive tier level that still sees this benefit.
    pub tier_level: u8,
}

impl Benefit {
    pub fn is_visible_to(&self, tier: Tier) -> bool {
        tier.level() <= self.tier_level
    }
}

/// Filter `benefits` down to the ones a holder of `tier` may see.
pub fn visible_benefits(tier: Tier, benefits: &[Benefit]) -> Vec<&Benefit> {
    benefits.iter().filter(|b| b.is_visible_to(tier)).collect()
}
