use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::game::CELL_COUNT;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum TierError {
    EmptyName,
    ProbabilityOutOfRange { field: String, value: f64 },
    DepthOutOfRange { depth: u8 },
    InvalidThinkRange { min_ms: u32, max_ms: u32 },
    UnknownTier { name: String },
}

impl fmt::Display for TierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TierError::EmptyName => write!(f, "tier name must not be empty"),
            TierError::ProbabilityOutOfRange { field, value } => {
                write!(f, "{field} must lie in [0, 1], got {value}")
            }
            TierError::DepthOutOfRange { depth } => {
                write!(f, "search depth must lie in [1, {CELL_COUNT}], got {depth}")
            }
            TierError::InvalidThinkRange { min_ms, max_ms } => {
                write!(f, "think range [{min_ms}, {max_ms}] is inverted")
            }
            TierError::UnknownTier { name } => write!(f, "unknown difficulty tier {name:?}"),
        }
    }
}

impl std::error::Error for TierError {}

/// 难度档位：搜索概率、失误概率与搜索深度。构造时校验，之后不可变。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "TierSpec", rename_all = "camelCase")]
pub struct DifficultyTier {
    name: String,
    skill_probability: f64,
    error_probability: f64,
    search_depth_limit: u8,
    think_ms: [u32; 2],
}

/// 未经校验的档位描述，仅用于反序列化。
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TierSpec {
    name: String,
    skill_probability: f64,
    error_probability: f64,
    search_depth_limit: u8,
    #[serde(default)]
    think_ms: [u32; 2],
}

impl TryFrom<TierSpec> for DifficultyTier {
    type Error = TierError;

    fn try_from(spec: TierSpec) -> Result<Self, Self::Error> {
        DifficultyTier::new(
            spec.name,
            spec.skill_probability,
            spec.error_probability,
            spec.search_depth_limit,
        )?
        .with_think_ms(spec.think_ms[0], spec.think_ms[1])
    }
}

fn check_probability(field: &str, value: f64) -> Result<(), TierError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(TierError::ProbabilityOutOfRange {
            field: field.to_string(),
            value,
        })
    }
}

impl DifficultyTier {
    pub fn new(
        name: impl Into<String>,
        skill_probability: f64,
        error_probability: f64,
        search_depth_limit: u8,
    ) -> Result<Self, TierError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(TierError::EmptyName);
        }
        check_probability("skillProbability", skill_probability)?;
        check_probability("errorProbability", error_probability)?;
        if !(1..=CELL_COUNT as u8).contains(&search_depth_limit) {
            return Err(TierError::DepthOutOfRange {
                depth: search_depth_limit,
            });
        }

        Ok(Self {
            name,
            skill_probability,
            error_probability,
            search_depth_limit,
            think_ms: [0, 0],
        })
    }

    pub fn with_think_ms(mut self, min_ms: u32, max_ms: u32) -> Result<Self, TierError> {
        if min_ms > max_ms {
            return Err(TierError::InvalidThinkRange { min_ms, max_ms });
        }
        self.think_ms = [min_ms, max_ms];
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn skill_probability(&self) -> f64 {
        self.skill_probability
    }

    pub fn error_probability(&self) -> f64 {
        self.error_probability
    }

    pub fn search_depth_limit(&self) -> u8 {
        self.search_depth_limit
    }

    pub fn think_ms(&self) -> (u32, u32) {
        (self.think_ms[0], self.think_ms[1])
    }

    /// 模拟“思考”时长，在 `[min, max)` 区间内均匀抽取。
    pub fn think_delay_ms<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        let [min_ms, max_ms] = self.think_ms;
        let span = f64::from(max_ms - min_ms);
        min_ms + (rng.gen::<f64>() * span) as u32
    }
}

// (name, skill, error, depth, think range)
const TIER_TABLE: [(&str, f64, f64, u8, [u32; 2]); 6] = [
    ("easy", 0.25, 0.55, 1, [200, 400]),
    ("medium", 0.6, 0.25, 3, [300, 600]),
    ("hard", 0.9, 0.08, 7, [400, 800]),
    ("expert", 0.97, 0.03, 9, [500, 1000]),
    ("master", 0.995, 0.01, 9, [600, 1200]),
    ("impossible", 1.0, 0.0, 9, [700, 1400]),
];

static TIERS: Lazy<Vec<DifficultyTier>> = Lazy::new(|| {
    TIER_TABLE
        .iter()
        .map(|&(name, skill, error, depth, [min_ms, max_ms])| DifficultyTier {
            name: name.to_string(),
            skill_probability: skill,
            error_probability: error,
            search_depth_limit: depth,
            think_ms: [min_ms, max_ms],
        })
        .collect()
});

/// 由弱到强排列的内置档位表。
pub fn tiers() -> &'static [DifficultyTier] {
    &TIERS
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AiDifficulty {
    Easy,
    Medium,
    Hard,
    Expert,
    Master,
    Impossible,
}

impl AiDifficulty {
    pub const ALL: [AiDifficulty; 6] = [
        AiDifficulty::Easy,
        AiDifficulty::Medium,
        AiDifficulty::Hard,
        AiDifficulty::Expert,
        AiDifficulty::Master,
        AiDifficulty::Impossible,
    ];

    pub fn tier(self) -> &'static DifficultyTier {
        &TIERS[self as usize]
    }
}

impl FromStr for AiDifficulty {
    type Err = TierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(AiDifficulty::Easy),
            "medium" | "normal" => Ok(AiDifficulty::Medium),
            "hard" => Ok(AiDifficulty::Hard),
            "expert" => Ok(AiDifficulty::Expert),
            "master" => Ok(AiDifficulty::Master),
            "impossible" | "unbeatable" | "perfect" => Ok(AiDifficulty::Impossible),
            _ => Err(TierError::UnknownTier {
                name: s.to_string(),
            }),
        }
    }
}

impl Default for AiDifficulty {
    fn default() -> Self {
        AiDifficulty::Easy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn table_is_ordered_from_weakest_to_perfect() {
        let table = tiers();
        assert_eq!(table.len(), 6);
        for pair in table.windows(2) {
            assert!(pair[0].skill_probability() <= pair[1].skill_probability());
            assert!(pair[0].error_probability() >= pair[1].error_probability());
            assert!(pair[0].search_depth_limit() <= pair[1].search_depth_limit());
        }

        let top = AiDifficulty::Impossible.tier();
        assert_eq!(top.name(), "impossible");
        assert_eq!(top.skill_probability(), 1.0);
        assert_eq!(top.error_probability(), 0.0);
        assert_eq!(top.search_depth_limit(), 9);
    }

    #[test]
    fn every_difficulty_maps_to_its_named_tier() {
        for difficulty in AiDifficulty::ALL {
            let tier = difficulty.tier();
            let parsed: AiDifficulty = tier.name().parse().expect("tier name should parse");
            assert_eq!(parsed, difficulty);
        }
        assert_eq!("Normal".parse::<AiDifficulty>(), Ok(AiDifficulty::Medium));
        assert!("godlike".parse::<AiDifficulty>().is_err());
    }

    #[test]
    fn construction_rejects_malformed_tiers() {
        assert!(matches!(
            DifficultyTier::new("x", 1.2, 0.0, 3),
            Err(TierError::ProbabilityOutOfRange { .. })
        ));
        assert!(matches!(
            DifficultyTier::new("x", 0.5, -0.1, 3),
            Err(TierError::ProbabilityOutOfRange { .. })
        ));
        assert!(matches!(
            DifficultyTier::new("x", 0.5, f64::NAN, 3),
            Err(TierError::ProbabilityOutOfRange { .. })
        ));
        assert_eq!(
            DifficultyTier::new("x", 0.5, 0.5, 0),
            Err(TierError::DepthOutOfRange { depth: 0 })
        );
        assert_eq!(
            DifficultyTier::new("x", 0.5, 0.5, 10),
            Err(TierError::DepthOutOfRange { depth: 10 })
        );
        assert_eq!(DifficultyTier::new("  ", 0.5, 0.5, 3), Err(TierError::EmptyName));
        let tier = DifficultyTier::new("x", 0.5, 0.5, 3).expect("tier should be valid");
        assert_eq!(
            tier.with_think_ms(500, 100),
            Err(TierError::InvalidThinkRange {
                min_ms: 500,
                max_ms: 100
            })
        );
    }

    #[test]
    fn deserialization_validates_custom_tiers() {
        let json = r#"{"name":"custom","skillProbability":0.5,"errorProbability":0.1,"searchDepthLimit":4,"thinkMs":[100,200]}"#;
        let tier: DifficultyTier = serde_json::from_str(json).expect("tier should deserialize");
        assert_eq!(tier.search_depth_limit(), 4);
        assert_eq!(tier.think_ms(), (100, 200));

        let bad = r#"{"name":"custom","skillProbability":0.5,"errorProbability":3.0,"searchDepthLimit":4}"#;
        assert!(serde_json::from_str::<DifficultyTier>(bad).is_err());
    }

    #[test]
    fn think_delay_stays_in_range() {
        let mut rng = SmallRng::seed_from_u64(7);
        let tier = AiDifficulty::Hard.tier();
        for _ in 0..200 {
            let delay = tier.think_delay_ms(&mut rng);
            assert!((400..800).contains(&delay));
        }
    }
}
