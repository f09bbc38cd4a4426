//! Conversation data: messages, per-turn scores, and the session summary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, de::Error as _};
use uuid::Uuid;

use crate::voice::PlaybackId;

/// Who said a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Teacher,
}

/// Scores for one student turn, as returned by the feedback prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackScore {
    #[serde(deserialize_with = "deserialize_score")]
    pub grammar: u8,
    #[serde(deserialize_with = "deserialize_score")]
    pub pronunciation: u8,
    #[serde(deserialize_with = "deserialize_score")]
    pub vocabulary: u8,
    #[serde(deserialize_with = "deserialize_score")]
    pub fluency: u8,
    #[serde(default)]
    pub comments: String,
}

/// Scores for a spoken student turn (voice input with pronunciation feedback).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PronunciationScore {
    #[serde(deserialize_with = "deserialize_score")]
    pub pronunciation: u8,
    #[serde(deserialize_with = "deserialize_score")]
    pub fluency: u8,
    #[serde(deserialize_with = "deserialize_score")]
    pub accuracy: u8,
    #[serde(default)]
    pub comments: String,
}

/// End-of-session feedback over the whole transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    #[serde(deserialize_with = "deserialize_score")]
    pub overall_grammar: u8,
    #[serde(deserialize_with = "deserialize_score")]
    pub overall_pronunciation: u8,
    #[serde(deserialize_with = "deserialize_score")]
    pub overall_vocabulary: u8,
    #[serde(deserialize_with = "deserialize_score")]
    pub overall_fluency: u8,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub improvements: Vec<String>,
    #[serde(default)]
    pub specific_tips: Vec<String>,
    #[serde(default)]
    pub encouragement: String,
}

/// Scores are 1–10; models occasionally answer 0, 11 or 7.5.
fn deserialize_score<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if !value.is_finite() {
        return Err(D::Error::custom("score must be a finite number"));
    }
    Ok(value.round().clamp(1.0, 10.0) as u8)
}

/// One line of the conversation.
///
/// Content, role, and timestamp are fixed at creation. The scores and the
/// playback reference can each be attached once, later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    id: Uuid,
    role: Role,
    content: String,
    created_at: DateTime<Utc>,
    feedback: Option<FeedbackScore>,
    pronunciation: Option<PronunciationScore>,
    audio_ref: Option<PlaybackId>,
}

impl Message {
    fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content: content.into(),
            created_at: Utc::now(),
            feedback: None,
            pronunciation: None,
            audio_ref: None,
        }
    }

    pub fn student(content: impl Into<String>) -> Self {
        Self::new(Role::Student, content)
    }

    pub fn teacher(content: impl Into<String>) -> Self {
        Self::new(Role::Teacher, content)
    }

    pub const fn id(&self) -> Uuid {
        self.id
    }

    pub const fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub const fn feedback(&self) -> Option<&FeedbackScore> {
        self.feedback.as_ref()
    }

    pub const fn pronunciation(&self) -> Option<&PronunciationScore> {
        self.pronunciation.as_ref()
    }

    pub const fn audio_ref(&self) -> Option<PlaybackId> {
        self.audio_ref
    }

    /// Attaches turn scores. Returns `false` (and changes nothing) for teacher
    /// messages or when scores were already attached.
    pub(crate) fn attach_feedback(&mut self, feedback: FeedbackScore) -> bool {
        if self.role != Role::Student || self.feedback.is_some() {
            return false;
        }
        self.feedback = Some(feedback);
        true
    }

    pub(crate) fn attach_pronunciation(&mut self, score: PronunciationScore) -> bool {
        if self.role != Role::Student || self.pronunciation.is_some() {
            return false;
        }
        self.pronunciation = Some(score);
        true
    }

    pub(crate) fn attach_audio(&mut self, playback: PlaybackId) -> bool {
        if self.audio_ref.is_some() {
            return false;
        }
        self.audio_ref = Some(playback);
        true
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn score() -> FeedbackScore {
        FeedbackScore {
            grammar: 7,
            pronunciation: 6,
            vocabulary: 7,
            fluency: 6,
            comments: "Goed gedaan!".to_string(),
        }
    }

    #[test]
    fn test_feedback_score_from_json() {
        let parsed: FeedbackScore = serde_json::from_str(
            r#"{"grammar":7,"pronunciation":6,"vocabulary":7,"fluency":6,"comments":"Goed gedaan!"}"#,
        )
        .unwrap();
        assert_eq!(parsed, score());
    }

    #[test]
    fn test_scores_are_clamped_and_rounded() {
        let parsed: FeedbackScore = serde_json::from_str(
            r#"{"grammar":0,"pronunciation":11,"vocabulary":7.6,"fluency":-3}"#,
        )
        .unwrap();
        assert_eq!(parsed.grammar, 1);
        assert_eq!(parsed.pronunciation, 10);
        assert_eq!(parsed.vocabulary, 8);
        assert_eq!(parsed.fluency, 1);
        assert!(parsed.comments.is_empty());
    }

    #[test]
    fn test_string_score_is_rejected() {
        let parsed = serde_json::from_str::<FeedbackScore>(
            r#"{"grammar":"7","pronunciation":6,"vocabulary":7,"fluency":6}"#,
        );
        assert!(parsed.is_err());
    }

    #[test]
    fn test_summary_from_camel_case_json() {
        let summary: SessionSummary = serde_json::from_str(
            r#"{
                "overallGrammar": 7, "overallPronunciation": 6,
                "overallVocabulary": 8, "overallFluency": 7,
                "strengths": ["a", "b", "c"],
                "improvements": ["d"],
                "specificTips": ["e", "f"],
                "encouragement": "Ga zo door!"
            }"#,
        )
        .unwrap();
        assert_eq!(summary.overall_vocabulary, 8);
        assert_eq!(summary.strengths.len(), 3);
        assert_eq!(summary.specific_tips, vec!["e", "f"]);
        assert_eq!(summary.encouragement, "Ga zo door!");
    }

    #[test]
    fn test_feedback_attaches_once() {
        let mut msg = Message::student("I like football.");
        assert!(msg.attach_feedback(score()));

        let mut other = score();
        other.grammar = 2;
        assert!(!msg.attach_feedback(other));
        assert_eq!(msg.feedback().unwrap().grammar, 7);
        assert_eq!(msg.content(), "I like football.");
    }

    #[test]
    fn test_teacher_message_never_takes_feedback() {
        let mut msg = Message::teacher("Hello!");
        assert!(!msg.attach_feedback(score()));
        assert!(msg.feedback().is_none());
    }

    #[test]
    fn test_message_ids_are_unique() {
        let a = Message::student("a");
        let b = Message::student("a");
        assert_ne!(a.id(), b.id());
        assert!(a.created_at() <= b.created_at());
    }
}
