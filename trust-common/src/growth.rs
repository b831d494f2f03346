//! Growth engine: the support-action state transition
//!
//! A support action is the only derived growth in the system. It is a pure
//! transition over an artist's counters; the caller persists the result and
//! records the Vote fact as a separate write.

use crate::db::models::{Artist, Trend};

/// HP gained per support action
pub const SUPPORT_HP_GAIN: i64 = 5;

/// HP span of one level; reaching it rolls HP over into the next level
pub const HP_PER_LEVEL: i64 = 100;

/// Growth counters of an artist, detached from the stored row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Growth {
    pub trust_score: i64,
    pub hp: i64,
    pub level: i64,
    pub votes_total: i64,
    pub trend: Trend,
}

impl From<&Artist> for Growth {
    fn from(artist: &Artist) -> Self {
        Growth {
            trust_score: artist.trust_score,
            hp: artist.hp,
            level: artist.level,
            votes_total: artist.votes_total,
            trend: artist.trend,
        }
    }
}

/// Apply one support action.
///
/// `trust_score` and `votes_total` gain 1, HP gains [`SUPPORT_HP_GAIN`] and
/// wraps into level increments at [`HP_PER_LEVEL`]. Trend becomes `up`
/// unconditionally; this engine never derives `down` or `flat` — those only
/// occur as creation defaults or external data.
pub fn apply_support(current: Growth) -> Growth {
    let hp_raw = current.hp + SUPPORT_HP_GAIN;
    let (level, hp) = if hp_raw >= HP_PER_LEVEL {
        (current.level + hp_raw / HP_PER_LEVEL, hp_raw % HP_PER_LEVEL)
    } else {
        (current.level, hp_raw)
    };

    Growth {
        trust_score: current.trust_score + 1,
        hp,
        level,
        votes_total: current.votes_total + 1,
        trend: Trend::Up,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn growth(trust_score: i64, hp: i64, level: i64, votes_total: i64) -> Growth {
        Growth {
            trust_score,
            hp,
            level,
            votes_total,
            trend: Trend::Flat,
        }
    }

    #[test]
    fn test_support_without_rollover() {
        let next = apply_support(growth(10, 50, 1, 0));
        assert_eq!(next.trust_score, 11);
        assert_eq!(next.hp, 55);
        assert_eq!(next.level, 1);
        assert_eq!(next.votes_total, 1);
        assert_eq!(next.trend, Trend::Up);
    }

    #[test]
    fn test_support_rollover_with_remainder() {
        // hp=97 -> raw 102 -> level+1, hp=2
        let next = apply_support(growth(10, 97, 3, 7));
        assert_eq!(next.hp, 2);
        assert_eq!(next.level, 4);
    }

    #[test]
    fn test_support_rollover_exact_boundary() {
        // hp=95 -> raw 100 -> level+1, hp=0
        let next = apply_support(growth(0, 95, 1, 0));
        assert_eq!(next.hp, 0);
        assert_eq!(next.level, 2);
    }

    #[test]
    fn test_rollover_sweep_full_hp_range() {
        // For every hp in [0,99]: hp' = (hp+5) mod 100, level' = level + (hp+5)/100
        for hp in 0..100 {
            let next = apply_support(growth(0, hp, 1, 0));
            assert_eq!(next.hp, (hp + 5) % 100, "hp'={} for hp={}", next.hp, hp);
            assert_eq!(next.level, 1 + (hp + 5) / 100, "level' for hp={}", hp);
            assert_eq!(next.trust_score, 1);
            assert_eq!(next.votes_total, 1);
            assert_eq!(next.trend, Trend::Up);
        }
    }

    #[test]
    fn test_trend_up_even_when_already_down() {
        let mut current = growth(5, 10, 1, 2);
        current.trend = Trend::Down;
        assert_eq!(apply_support(current).trend, Trend::Up);
    }
}
