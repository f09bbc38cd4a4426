//! Requests that have left the controller and the outcomes they bring back.

use tracing::{debug, warn};
use uuid::Uuid;

use super::SessionToken;
use super::model::{FeedbackScore, PronunciationScore, SessionSummary};
use crate::speech::Recognition;
use crate::teacher::{ChatClient, parse_embedded};

/// What the student said, and how it reached us.
#[derive(Debug, Clone, PartialEq)]
pub enum StudentInput {
    Typed(String),
    Spoken(Recognition),
}

impl StudentInput {
    pub fn text(&self) -> &str {
        match self {
            Self::Typed(text) => text,
            Self::Spoken(recognition) => &recognition.transcript,
        }
    }
}

/// Scores for one student turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnFeedback {
    Written(FeedbackScore),
    Spoken(PronunciationScore),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FeedbackKind {
    Written,
    Spoken,
}

/// Sends `message` and logs failures; the caller only sees `None`.
async fn complete_or_log(
    chat: &dyn ChatClient,
    message: &str,
    ai_model: &str,
    what: &str,
) -> Option<String> {
    match chat.complete(message, ai_model).await {
        Ok(text) => Some(text),
        Err(e) => {
            warn!("Error requesting {what}: {e:#}");
            None
        }
    }
}

/// The opening line request for a freshly started session.
#[derive(Debug, Clone)]
pub struct PendingOpening {
    pub(crate) token: SessionToken,
    pub(crate) prompt: String,
    pub(crate) ai_model: String,
}

#[derive(Debug, Clone)]
pub struct OpeningOutcome {
    pub(crate) token: SessionToken,
    pub reply: Option<String>,
}

impl PendingOpening {
    pub async fn run(self, chat: &dyn ChatClient) -> OpeningOutcome {
        let reply = complete_or_log(chat, &self.prompt, &self.ai_model, "opening message").await;
        OpeningOutcome {
            token: self.token,
            reply,
        }
    }
}

/// One student turn: the teacher continuation plus the feedback request, both
/// built from the same transcript snapshot.
#[derive(Debug, Clone)]
pub struct PendingTurn {
    pub(crate) token: SessionToken,
    pub(crate) student_id: Uuid,
    pub(crate) continuation_prompt: String,
    pub(crate) feedback_prompt: String,
    pub(crate) feedback_kind: FeedbackKind,
    pub(crate) ai_model: String,
}

#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub(crate) token: SessionToken,
    pub(crate) student_id: Uuid,
    pub reply: Option<String>,
    pub feedback: Option<TurnFeedback>,
}

impl PendingTurn {
    /// Id of the student message this turn belongs to.
    pub const fn student_id(&self) -> Uuid {
        self.student_id
    }

    /// Requests the teacher's reply, then the feedback. When the reply fails
    /// the feedback request is skipped.
    pub async fn run(self, chat: &dyn ChatClient) -> TurnOutcome {
        let reply = complete_or_log(
            chat,
            &self.continuation_prompt,
            &self.ai_model,
            "teacher reply",
        )
        .await;

        let feedback = if reply.is_some() {
            complete_or_log(chat, &self.feedback_prompt, &self.ai_model, "feedback")
                .await
                .and_then(|text| self.parse_feedback(&text))
        } else {
            None
        };

        TurnOutcome {
            token: self.token,
            student_id: self.student_id,
            reply,
            feedback,
        }
    }

    fn parse_feedback(&self, text: &str) -> Option<TurnFeedback> {
        let parsed = match self.feedback_kind {
            FeedbackKind::Written => {
                parse_embedded::<FeedbackScore>(text).map(TurnFeedback::Written)
            }
            FeedbackKind::Spoken => {
                parse_embedded::<PronunciationScore>(text).map(TurnFeedback::Spoken)
            }
        };
        if parsed.is_none() {
            debug!("Feedback for {} left unscored", self.student_id);
        }
        parsed
    }
}

/// The end-of-session summary request.
#[derive(Debug, Clone)]
pub struct PendingSummary {
    pub(crate) token: SessionToken,
    pub(crate) prompt: String,
    pub(crate) ai_model: String,
}

#[derive(Debug, Clone)]
pub struct SummaryOutcome {
    pub(crate) token: SessionToken,
    pub summary: Option<SessionSummary>,
}

impl PendingSummary {
    pub async fn run(self, chat: &dyn ChatClient) -> SummaryOutcome {
        let summary = complete_or_log(chat, &self.prompt, &self.ai_model, "session summary")
            .await
            .and_then(|text| {
                let summary = parse_embedded::<SessionSummary>(&text);
                if summary.is_none() {
                    warn!("Session summary could not be parsed");
                }
                summary
            });

        SummaryOutcome {
            token: self.token,
            summary,
        }
    }
}
