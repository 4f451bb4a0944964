use serde::{Deserialize, Serialize};

/// Self-reported sentiment for a day, on a fixed 1-5 ordinal scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Mood {
    VeryFrustrated = 1,
    Frustrated = 2,
    Neutral = 3,
    Good = 4,
    Excellent = 5,
}

const SYMBOLS: [&str; 5] = ["😞", "😕", "😐", "🙂", "😀"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Mood must be between 1 and 5, got {0}")]
pub struct InvalidMood(pub i64);

impl Mood {
    pub fn value(self) -> u8 {
        self as u8
    }

    pub fn symbol(self) -> &'static str {
        SYMBOLS[usize::from(self.value()) - 1]
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::VeryFrustrated => "very frustrated",
            Self::Frustrated => "frustrated",
            Self::Neutral => "neutral",
            Self::Good => "good",
            Self::Excellent => "excellent",
        }
    }

    /// Symbol for a fractional average, rounded half-up to the nearest level.
    pub fn symbol_for_average(average: f64) -> Option<&'static str> {
        let rounded = (average + 0.5).floor() as i64;
        Self::try_from(rounded).ok().map(Self::symbol)
    }
}

impl TryFrom<i64> for Mood {
    type Error = InvalidMood;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::VeryFrustrated),
            2 => Ok(Self::Frustrated),
            3 => Ok(Self::Neutral),
            4 => Ok(Self::Good),
            5 => Ok(Self::Excellent),
            other => Err(InvalidMood(other)),
        }
    }
}

impl TryFrom<u8> for Mood {
    type Error = InvalidMood;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::try_from(i64::from(value))
    }
}

impl From<Mood> for u8 {
    fn from(mood: Mood) -> Self {
        mood.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbols_follow_ordinal_scale() {
        assert_eq!(Mood::VeryFrustrated.symbol(), "😞");
        assert_eq!(Mood::Neutral.symbol(), "😐");
        assert_eq!(Mood::Excellent.symbol(), "😀");
    }

    #[test]
    fn test_out_of_range_values_are_rejected() {
        assert_eq!(Mood::try_from(0u8), Err(InvalidMood(0)));
        assert_eq!(Mood::try_from(6u8), Err(InvalidMood(6)));
        assert_eq!(Mood::try_from(-3i64), Err(InvalidMood(-3)));
    }

    #[test]
    fn test_serde_uses_integer_and_rejects_out_of_range() {
        assert_eq!(serde_json::to_string(&Mood::Good).unwrap(), "4");
        assert_eq!(serde_json::from_str::<Mood>("1").unwrap(), Mood::VeryFrustrated);
        assert!(serde_json::from_str::<Mood>("9").is_err());
    }

    #[test]
    fn test_symbol_for_average_rounds_half_up() {
        assert_eq!(Mood::symbol_for_average(3.5), Some("🙂"));
        assert_eq!(Mood::symbol_for_average(3.49), Some("😐"));
        assert_eq!(Mood::symbol_for_average(f64::NAN), None);
    }
}
