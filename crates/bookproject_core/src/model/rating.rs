//! Rating scale for books that have been read.

use serde::{Deserialize, Serialize};

/// Zero-to-ten rating, plus an explicit "not rated" marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatingScale {
    NoRating,
    Zero,
    One,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
}

impl RatingScale {
    const SCORED: [RatingScale; 11] = [
        Self::Zero,
        Self::One,
        Self::Two,
        Self::Three,
        Self::Four,
        Self::Five,
        Self::Six,
        Self::Seven,
        Self::Eight,
        Self::Nine,
        Self::Ten,
    ];

    /// Numeric score, `None` for `NoRating`.
    pub fn score(self) -> Option<u8> {
        Self::SCORED
            .iter()
            .position(|rating| *rating == self)
            .and_then(|index| u8::try_from(index).ok())
    }

    /// Maps a 0..=10 score to a rating.
    pub fn from_score(score: u8) -> Option<Self> {
        Self::SCORED.get(usize::from(score)).copied()
    }

    /// Stable storage text.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoRating => "no_rating",
            Self::Zero => "zero",
            Self::One => "one",
            Self::Two => "two",
            Self::Three => "three",
            Self::Four => "four",
            Self::Five => "five",
            Self::Six => "six",
            Self::Seven => "seven",
            Self::Eight => "eight",
            Self::Nine => "nine",
            Self::Ten => "ten",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        if value == "no_rating" {
            return Some(Self::NoRating);
        }
        Self::SCORED
            .into_iter()
            .find(|rating| rating.as_str() == value)
    }
}

#[cfg(test)]
mod tests {
    use super::RatingScale;

    #[test]
    fn score_round_trips_through_from_score() {
        for score in 0..=10 {
            let rating = RatingScale::from_score(score).unwrap();
            assert_eq!(rating.score(), Some(score));
        }
        assert_eq!(RatingScale::from_score(11), None);
        assert_eq!(RatingScale::NoRating.score(), None);
    }

    #[test]
    fn parse_accepts_storage_text() {
        assert_eq!(RatingScale::parse("no_rating"), Some(RatingScale::NoRating));
        assert_eq!(RatingScale::parse("seven"), Some(RatingScale::Seven));
        assert_eq!(RatingScale::parse("7"), None);
    }
}
