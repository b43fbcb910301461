use serde::{Deserialize, Serialize};

pub const MODERATE_FLOOR: u32 = 10;
pub const HIGH_FLOOR: u32 = 20;

/// Risk classification derived from a score via closed intervals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    Low,
    Moderate,
    High,
}

impl RiskTier {
    pub const fn ordered() -> [Self; 3] {
        [Self::Low, Self::Moderate, Self::High]
    }

    pub const fn from_score(score: u32) -> Self {
        if score >= HIGH_FLOOR {
            Self::High
        } else if score >= MODERATE_FLOOR {
            Self::Moderate
        } else {
            Self::Low
        }
    }

    /// Inclusive bounds; `None` means the tier is open-ended.
    pub const fn bounds(self) -> (u32, Option<u32>) {
        match self {
            Self::Low => (0, Some(MODERATE_FLOOR - 1)),
            Self::Moderate => (MODERATE_FLOOR, Some(HIGH_FLOOR - 1)),
            Self::High => (HIGH_FLOOR, None),
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
        }
    }

    pub const fn headline(self) -> &'static str {
        match self {
            Self::Low => "Risk Level: Low — Continue routine screenings.",
            Self::Moderate => "Risk Level: Moderate — Consider early screening or a consultation.",
            Self::High => {
                "Risk Level: High — Please consult a breast specialist or genetic counselor."
            }
        }
    }

    pub const fn next_step(self) -> &'static str {
        match self {
            Self::Low => "Continue routine screenings and check again next year.",
            Self::Moderate => "Talk to your provider about early screening and breast density.",
            Self::High => "Schedule a visit with a breast specialist or genetic counselor.",
        }
    }

    pub const fn gauge_color(self) -> &'static str {
        match self {
            Self::Low => "lightgreen",
            Self::Moderate => "yellow",
            Self::High => "red",
        }
    }
}
