//! Closed genre category set.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Genre {
    Adventure,
    Biography,
    Business,
    Children,
    Classics,
    Comic,
    Cookbook,
    Crime,
    Fantasy,
    History,
    Horror,
    Humor,
    Memoir,
    Mystery,
    Philosophy,
    Poetry,
    Romance,
    Science,
    ScienceFiction,
    SelfHelp,
    Thriller,
    Travel,
    YoungAdult,
}

impl Genre {
    pub const ALL: [Genre; 23] = [
        Self::Adventure,
        Self::Biography,
        Self::Business,
        Self::Children,
        Self::Classics,
        Self::Comic,
        Self::Cookbook,
        Self::Crime,
        Self::Fantasy,
        Self::History,
        Self::Horror,
        Self::Humor,
        Self::Memoir,
        Self::Mystery,
        Self::Philosophy,
        Self::Poetry,
        Self::Romance,
        Self::Science,
        Self::ScienceFiction,
        Self::SelfHelp,
        Self::Thriller,
        Self::Travel,
        Self::YoungAdult,
    ];

    /// Stable storage text, identical to the serde name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Adventure => "adventure",
            Self::Biography => "biography",
            Self::Business => "business",
            Self::Children => "children",
            Self::Classics => "classics",
            Self::Comic => "comic",
            Self::Cookbook => "cookbook",
            Self::Crime => "crime",
            Self::Fantasy => "fantasy",
            Self::History => "history",
            Self::Horror => "horror",
            Self::Humor => "humor",
            Self::Memoir => "memoir",
            Self::Mystery => "mystery",
            Self::Philosophy => "philosophy",
            Self::Poetry => "poetry",
            Self::Romance => "romance",
            Self::Science => "science",
            Self::ScienceFiction => "science_fiction",
            Self::SelfHelp => "self_help",
            Self::Thriller => "thriller",
            Self::Travel => "travel",
            Self::YoungAdult => "young_adult",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|genre| genre.as_str() == value)
    }
}

#[cfg(test)]
mod tests {
    use super::Genre;

    #[test]
    fn storage_text_matches_serde_name() {
        for genre in Genre::ALL {
            let json = serde_json::to_value(genre).unwrap();
            assert_eq!(json, genre.as_str());
            assert_eq!(Genre::parse(genre.as_str()), Some(genre));
        }
    }
}
