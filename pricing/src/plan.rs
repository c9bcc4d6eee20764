//! The fixed catalog of adoption plans.

use {
    serde::{
        de::{self, Visitor},
        Deserialize, Deserializer, Serialize, Serializer,
    },
    std::{fmt, str::FromStr},
};

/// How long an adoption lasts.
///
/// Serialised as a month count, or as the string `"perpetual"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlanDuration {
    Months(u32),
    Perpetual,
}

const PERPETUAL_TAG: &str = "perpetual";

impl PlanDuration {
    pub fn is_perpetual(&self) -> bool {
        matches!(self, PlanDuration::Perpetual)
    }

    /// Month count, `None` for perpetual plans.
    pub fn months(&self) -> Option<u32> {
        match self {
            PlanDuration::Months(m) => Some(*m),
            PlanDuration::Perpetual => None,
        }
    }
}

impl Serialize for PlanDuration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PlanDuration::Months(m) => serializer.serialize_u32(*m),
            PlanDuration::Perpetual => serializer.serialize_str(PERPETUAL_TAG),
        }
    }
}

impl<'de> Deserialize<'de> for PlanDuration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DurationVisitor;

        impl Visitor<'_> for DurationVisitor {
            type Value = PlanDuration;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "a month count or \"{PERPETUAL_TAG}\"")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                u32::try_from(v)
                    .map(PlanDuration::Months)
                    .map_err(|_| E::custom(format!("month count out of range: {v}")))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                u32::try_from(v)
                    .map(PlanDuration::Months)
                    .map_err(|_| E::custom(format!("month count out of range: {v}")))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                if v == PERPETUAL_TAG {
                    Ok(PlanDuration::Perpetual)
                } else {
                    Err(E::invalid_value(de::Unexpected::Str(v), &self))
                }
            }
        }

        deserializer.deserialize_any(DurationVisitor)
    }
}

/// Identifier of one of the five catalog plans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlanId {
    #[serde(rename = "plan_12m")]
    Months12,
    #[serde(rename = "plan_24m")]
    Months24,
    #[serde(rename = "plan_36m")]
    Months36,
    #[serde(rename = "plan_60m")]
    Months60,
    #[serde(rename = "plan_perpetual")]
    Perpetual,
}

impl PlanId {
    pub const ALL: [PlanId; 5] = [
        PlanId::Months12,
        PlanId::Months24,
        PlanId::Months36,
        PlanId::Months60,
        PlanId::Perpetual,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            PlanId::Months12 => "plan_12m",
            PlanId::Months24 => "plan_24m",
            PlanId::Months36 => "plan_36m",
            PlanId::Months60 => "plan_60m",
            PlanId::Perpetual => "plan_perpetual",
        }
    }

    /// The catalog entry for this id.
    pub fn plan(self) -> AdoptionPlan {
        let (duration, discount_pct, benefits): (PlanDuration, f64, Vec<&str>) = match self {
            PlanId::Months12 => (
                PlanDuration::Months(12),
                0.0,
                vec!["Adoption certificate", "Quarterly biome report"],
            ),
            PlanId::Months24 => (
                PlanDuration::Months(24),
                0.0,
                vec!["Adoption certificate", "Quarterly biome report", "Pixel name tag"],
            ),
            PlanId::Months36 => (
                PlanDuration::Months(36),
                10.0,
                vec![
                    "Adoption certificate",
                    "Monthly biome report",
                    "Pixel name tag",
                    "10% discount",
                ],
            ),
            PlanId::Months60 => (
                PlanDuration::Months(60),
                20.0,
                vec![
                    "Adoption certificate",
                    "Monthly biome report",
                    "Pixel name tag",
                    "20% discount",
                    "Ranger video call",
                ],
            ),
            PlanId::Perpetual => (
                PlanDuration::Perpetual,
                20.0,
                vec![
                    "Perpetual ownership",
                    "Monthly biome report",
                    "Pixel name tag",
                    "Ranger video call",
                    "Priority on new regions",
                ],
            ),
        };
        AdoptionPlan {
            id: self.as_str().to_string(),
            duration,
            discount_pct,
            benefits: benefits.into_iter().map(String::from).collect(),
        }
    }

    pub fn catalog() -> Vec<AdoptionPlan> {
        PlanId::ALL.into_iter().map(PlanId::plan).collect()
    }
}

impl fmt::Display for PlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlanId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PlanId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| format!("unknown plan id: {s}"))
    }
}

/// A plan the buyer can pick when adopting pixels.
///
/// Catalog plans come from [`PlanId::plan`]; ad-hoc plans (promotions,
/// what-if pricing) can be built directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdoptionPlan {
    pub id: String,
    pub duration: PlanDuration,
    /// Percentage discount applied to the proportional price (0–100).
    /// Ignored for perpetual plans, which use a fixed formula.
    pub discount_pct: f64,
    pub benefits: Vec<String>,
}

impl AdoptionPlan {
    pub fn custom(id: impl Into<String>, duration: PlanDuration, discount_pct: f64) -> Self {
        Self {
            id: id.into(),
            duration,
            discount_pct,
            benefits: Vec::new(),
        }
    }
}
