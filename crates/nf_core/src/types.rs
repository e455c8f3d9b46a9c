use serde::{Deserialize, Serialize};

/// A news category used for navigation and filtering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub title: String,
}

impl Section {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}

/// A person credited on an article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contributor {
    pub first_name: String,
    pub last_name: String,
}

impl Contributor {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub section_name: String,
    /// ISO-8601 timestamp exactly as the API returned it.
    pub published_at: String,
    pub title: String,
    pub url: String,
    pub contributors: Vec<Contributor>,
}

impl Article {
    /// Comma separated contributor names, `None` when nobody is credited.
    pub fn byline(&self) -> Option<String> {
        if self.contributors.is_empty() {
            return None;
        }
        Some(
            self.contributors
                .iter()
                .map(Contributor::display_name)
                .collect::<Vec<_>>()
                .join(", "),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(contributors: Vec<Contributor>) -> Article {
        Article {
            section_name: "Technology".to_string(),
            published_at: "2024-03-01T10:00:00Z".to_string(),
            title: "Test Article".to_string(),
            url: "https://example.com/a".to_string(),
            contributors,
        }
    }

    #[test]
    fn test_byline_joins_contributors() {
        let a = article(vec![
            Contributor::new("Ada", "Lovelace"),
            Contributor::new("Alan", "Turing"),
        ]);
        assert_eq!(a.byline().as_deref(), Some("Ada Lovelace, Alan Turing"));
    }

    #[test]
    fn test_byline_empty() {
        assert_eq!(article(vec![]).byline(), None);
    }

    #[test]
    fn test_section_serializes_as_plain_object() {
        let json = serde_json::to_string(&Section::new("world", "World news")).unwrap();
        assert_eq!(json, r#"{"id":"world","title":"World news"}"#);
    }
}
