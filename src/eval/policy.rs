//! Difficulty policies
//!
//! Pure data: per-tier weights, candidate pool shape, temperature, mistake
//! and noise rates, each varying by game phase. Control flow lives in the
//! engine; this table is the single place that tunes how each tier feels.

use serde::{Deserialize, Serialize};

/// AI difficulty tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiLevel {
    Easy,
    Medium,
    Hard,
}

impl AiLevel {
    pub const ALL: [AiLevel; 3] = [AiLevel::Easy, AiLevel::Medium, AiLevel::Hard];

    /// Tuning table for this tier
    #[inline]
    pub fn policy(self) -> &'static DifficultyPolicy {
        match self {
            AiLevel::Easy => &EASY,
            AiLevel::Medium => &MEDIUM,
            AiLevel::Hard => &HARD,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            AiLevel::Easy => "Easy",
            AiLevel::Medium => "Medium",
            AiLevel::Hard => "Hard",
        }
    }
}

/// Game phase by fraction of edges already drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Opening,
    Midgame,
    Endgame,
}

impl Phase {
    /// Opening below 30% progress, endgame from 74%.
    pub fn from_progress(remaining: usize, total: usize) -> Phase {
        if total == 0 {
            return Phase::Midgame;
        }
        let progress = 1.0 - remaining as f64 / total as f64;
        if progress < 0.30 {
            Phase::Opening
        } else if progress < 0.74 {
            Phase::Midgame
        } else {
            Phase::Endgame
        }
    }
}

/// A value that differs per phase
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseValue<T> {
    pub opening: T,
    pub midgame: T,
    pub endgame: T,
}

impl<T: Copy> PhaseValue<T> {
    pub const fn new(opening: T, midgame: T, endgame: T) -> Self {
        Self { opening, midgame, endgame }
    }

    #[inline]
    pub fn at(&self, phase: Phase) -> T {
        match phase {
            Phase::Opening => self.opening,
            Phase::Midgame => self.midgame,
            Phase::Endgame => self.endgame,
        }
    }
}

/// Weights of the per-move heuristic terms
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TacticalWeights {
    /// Per zone completed by the move
    pub capture_reward: f64,
    /// Per zone raised from 2 to 3 drawn edges
    pub third_penalty: f64,
    /// Per zone raised from 1 to 2 drawn edges
    pub second_bonus: f64,
    /// Flat bonus for a safe move
    pub safety_bonus: f64,
    /// Multiplier of the center weight
    pub center_bonus: f64,
    /// Per capture available to the opponent after the move
    pub immediate_capture_penalty: f64,
    /// Per open third the opponent's replies would create
    pub open_third_penalty: f64,
    /// Per safe reply left to the opponent
    pub safe_reply_bonus: f64,
}

/// Complete tuning table of a tier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyPolicy {
    pub weights: TacticalWeights,
    /// Max distance from the best score to enter the candidate pool
    pub candidate_delta: PhaseValue<f64>,
    /// Max size of the candidate pool
    pub candidate_limit: PhaseValue<usize>,
    /// Softmax temperature of the weighted choice
    pub temperature: PhaseValue<f64>,
    /// Chance of a deliberately sub-optimal pick
    pub mistake_chance: PhaseValue<f64>,
    /// Chance of ignoring an available capture.
    ///
    /// Only the easy tier rolls it. Medium weighs captures through its
    /// pressure score and hard through search, so their rows are tuning
    /// reference only.
    pub miss_capture_chance: PhaseValue<f64>,
    /// Amplitude of uniform noise added to heuristic move scores.
    ///
    /// Read by easy and medium; the hard row is unused since search scores
    /// carry no noise.
    pub noise_amplitude: PhaseValue<f64>,
    /// Full penalty for replaying the most recent AI edge
    pub novelty_penalty: f64,
}

pub const EASY: DifficultyPolicy = DifficultyPolicy {
    weights: TacticalWeights {
        capture_reward: 118.0,
        third_penalty: 74.0,
        second_bonus: 4.0,
        safety_bonus: 22.0,
        center_bonus: 5.0,
        immediate_capture_penalty: 0.0,
        open_third_penalty: 0.0,
        safe_reply_bonus: 0.0,
    },
    candidate_delta: PhaseValue::new(22.0, 16.0, 10.0),
    candidate_limit: PhaseValue::new(5, 4, 3),
    temperature: PhaseValue::new(0.92, 0.82, 0.72),
    mistake_chance: PhaseValue::new(0.30, 0.22, 0.13),
    miss_capture_chance: PhaseValue::new(0.14, 0.19, 0.24),
    noise_amplitude: PhaseValue::new(8.2, 6.1, 4.0),
    novelty_penalty: 4.8,
};

pub const MEDIUM: DifficultyPolicy = DifficultyPolicy {
    weights: TacticalWeights {
        capture_reward: 174.0,
        third_penalty: 136.0,
        second_bonus: 9.0,
        safety_bonus: 24.0,
        center_bonus: 6.0,
        immediate_capture_penalty: 100.0,
        open_third_penalty: 20.0,
        safe_reply_bonus: 4.8,
    },
    candidate_delta: PhaseValue::new(13.0, 8.0, 4.0),
    candidate_limit: PhaseValue::new(5, 4, 3),
    temperature: PhaseValue::new(0.58, 0.42, 0.24),
    mistake_chance: PhaseValue::new(0.09, 0.06, 0.02),
    miss_capture_chance: PhaseValue::new(0.05, 0.08, 0.10),
    noise_amplitude: PhaseValue::new(2.4, 1.4, 0.6),
    novelty_penalty: 2.4,
};

pub const HARD: DifficultyPolicy = DifficultyPolicy {
    weights: TacticalWeights {
        capture_reward: 220.0,
        third_penalty: 72.0,
        second_bonus: 5.0,
        safety_bonus: 52.0,
        center_bonus: 3.0,
        immediate_capture_penalty: 0.0,
        open_third_penalty: 0.0,
        safe_reply_bonus: 0.0,
    },
    candidate_delta: PhaseValue::new(2.0, 1.0, 0.0),
    candidate_limit: PhaseValue::new(3, 2, 1),
    temperature: PhaseValue::new(0.20, 0.16, 0.08),
    mistake_chance: PhaseValue::new(0.08, 0.04, 0.0),
    miss_capture_chance: PhaseValue::new(0.0, 0.0, 0.0),
    noise_amplitude: PhaseValue::new(0.8, 0.4, 0.0),
    novelty_penalty: 0.8,
};

/// Depth and time budget of the hard-tier search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchProfile {
    pub depth_limit: u16,
    pub time_budget_ms: u64,
}

/// Hard-tier search profile by remaining edges and phase.
///
/// Positions with few edges left get deeper, longer searches.
pub fn search_profile(remaining: usize, phase: Phase) -> SearchProfile {
    let rem = remaining.min(u16::MAX as usize) as u16;
    let (depth_limit, time_budget_ms) = match (phase, remaining) {
        (Phase::Opening, 0..=12) => (rem.min(11), 380),
        (Phase::Opening, 13..=20) => (9, 280),
        (Phase::Opening, _) => (6, 200),
        (Phase::Midgame, 0..=12) => (rem.min(12), 420),
        (Phase::Midgame, 13..=20) => (10, 320),
        (Phase::Midgame, _) => (7, 240),
        (Phase::Endgame, 0..=8) => (rem, 560),
        (Phase::Endgame, 9..=12) => (12, 500),
        (Phase::Endgame, 13..=20) => (11, 360),
        (Phase::Endgame, _) => (8, 280),
    };
    SearchProfile {
        depth_limit: depth_limit.max(1),
        time_budget_ms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_thresholds() {
        assert_eq!(Phase::from_progress(100, 100), Phase::Opening);
        assert_eq!(Phase::from_progress(71, 100), Phase::Opening);
        assert_eq!(Phase::from_progress(70, 100), Phase::Midgame);
        assert_eq!(Phase::from_progress(27, 100), Phase::Midgame);
        assert_eq!(Phase::from_progress(26, 100), Phase::Endgame);
        assert_eq!(Phase::from_progress(0, 0), Phase::Midgame);
    }

    #[test]
    fn test_hard_is_narrow_and_quiet() {
        for phase in [Phase::Opening, Phase::Midgame, Phase::Endgame] {
            assert!(HARD.candidate_limit.at(phase) <= 3);
            assert!(HARD.mistake_chance.at(phase) < 0.1);
            assert_eq!(HARD.miss_capture_chance.at(phase), 0.0);
            assert!(HARD.noise_amplitude.at(phase) < EASY.noise_amplitude.at(phase));
        }
        assert_eq!(HARD.mistake_chance.at(Phase::Endgame), 0.0);
    }

    #[test]
    fn test_easy_is_wider_than_medium() {
        for phase in [Phase::Opening, Phase::Midgame, Phase::Endgame] {
            assert!(EASY.candidate_delta.at(phase) > MEDIUM.candidate_delta.at(phase));
            assert!(EASY.mistake_chance.at(phase) > MEDIUM.mistake_chance.at(phase));
            assert!(EASY.temperature.at(phase) > MEDIUM.temperature.at(phase));
        }
    }

    #[test]
    fn test_search_profile_table() {
        assert_eq!(search_profile(40, Phase::Opening), SearchProfile { depth_limit: 6, time_budget_ms: 200 });
        assert_eq!(search_profile(15, Phase::Midgame).depth_limit, 10);
        assert_eq!(search_profile(6, Phase::Endgame).depth_limit, 6);
        assert_eq!(search_profile(10, Phase::Endgame).depth_limit, 12);
        assert_eq!(search_profile(0, Phase::Endgame).depth_limit, 1);
    }

    #[test]
    fn test_level_policy_lookup() {
        assert_eq!(AiLevel::Easy.policy().novelty_penalty, EASY.novelty_penalty);
        assert_eq!(AiLevel::Hard.policy().weights.capture_reward, 220.0);
    }
}
