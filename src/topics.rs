//! Conversation topic catalog.

use anyhow::Result;

use crate::ui::Style;

/// A conversation topic the student can pick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    /// Stable identifier (e.g., "hobbies").
    pub id: &'static str,
    /// Dutch title shown in the topic list.
    pub title: &'static str,
    /// Dutch description, also passed to the teacher prompt.
    pub description: &'static str,
}

/// All available topics, in display order.
pub const TOPICS: &[Topic] = &[
    Topic {
        id: "hobbies",
        title: "Hobbies & Vrije tijd",
        description: "Praat over wat je graag doet in je vrije tijd",
    },
    Topic {
        id: "school",
        title: "School & Vakken",
        description: "Vertel over je school, vakken en leraren",
    },
    Topic {
        id: "family",
        title: "Familie & Vrienden",
        description: "Beschrijf je familie en beste vrienden",
    },
    Topic {
        id: "food",
        title: "Eten & Drinken",
        description: "Praat over je favoriete eten en drankjes",
    },
    Topic {
        id: "travel",
        title: "Reizen & Vakantie",
        description: "Vertel over plekken waar je bent geweest of naartoe wilt",
    },
    Topic {
        id: "technology",
        title: "Technologie & Social Media",
        description: "Praat over apps, games en sociale media",
    },
    Topic {
        id: "sports",
        title: "Sport & Beweging",
        description: "Vertel over sporten die je doet of leuk vindt",
    },
    Topic {
        id: "future",
        title: "Toekomstplannen",
        description: "Praat over wat je later wilt worden of doen",
    },
    Topic {
        id: "daily",
        title: "Dagelijkse Routine",
        description: "Beschrijf een gewone dag in jouw leven",
    },
    Topic {
        id: "weather",
        title: "Weer & Seizoenen",
        description: "Praat over het weer en je favoriete seizoen",
    },
];

/// Looks up a topic by its identifier.
pub fn find_topic(id: &str) -> Option<&'static Topic> {
    TOPICS.iter().find(|topic| topic.id == id)
}

/// Validates a topic identifier, listing the valid ones on failure.
pub fn validate_topic(id: &str) -> Result<&'static Topic> {
    find_topic(id).ok_or_else(|| {
        let ids: Vec<&str> = TOPICS.iter().map(|t| t.id).collect();
        anyhow::anyhow!(
            "Onbekend onderwerp: '{id}'\n\n\
             Beschikbare onderwerpen: {}",
            ids.join(", ")
        )
    })
}

pub fn print_topics() {
    println!("{}", Style::header("Onderwerpen"));
    for topic in TOPICS {
        println!(
            "  {:<12} {}  {}",
            Style::code(topic.id),
            Style::value(topic.title),
            Style::secondary(topic.description)
        );
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.title, self.description)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_find_known_topic() {
        let topic = find_topic("hobbies").unwrap();
        assert_eq!(topic.title, "Hobbies & Vrije tijd");
    }

    #[test]
    fn test_find_unknown_topic() {
        assert!(find_topic("astronomy").is_none());
    }

    #[test]
    fn test_topic_ids_are_unique() {
        let mut ids: Vec<&str> = TOPICS.iter().map(|t| t.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), TOPICS.len());
    }

    #[test]
    fn test_validate_topic_error_lists_ids() {
        let err = validate_topic("nope").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("nope"));
        assert!(msg.contains("weather"));
    }
}
