use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::model::{Message, Role, SessionSummary};
use super::pending::{
    FeedbackKind, OpeningOutcome, PendingOpening, PendingSummary, PendingTurn, StudentInput,
    SummaryOutcome, TurnFeedback, TurnOutcome,
};
use super::{FeedbackMode, SessionError, SessionToken};
use crate::speech::Recognition;
use crate::teacher::{
    ChatClient, build_continuation_prompt, build_feedback_prompt, build_opening_prompt,
    build_pronunciation_prompt, build_summary_prompt, format_transcript,
};
use crate::topics::{Topic, find_topic};
use crate::voice::{PlaybackId, TeacherVoice, VoiceState};

/// Lifecycle of a practice session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No topic chosen.
    Idle,
    /// Topic chosen, conversation not started.
    Ready,
    /// Conversation in progress.
    Active,
    /// Waiting for the end-of-session summary.
    Summarizing,
    /// Summary available; only a reset leaves this state.
    Summarized,
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Ready => "ready",
            Self::Active => "active",
            Self::Summarizing => "summarizing",
            Self::Summarized => "summarized",
        };
        f.write_str(name)
    }
}

/// Coarse session status as seen from outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    NotStarted,
    Active,
    Ended,
}

/// Whether an asynchronous outcome was folded into the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Current,
    /// The session was reset or restarted since the request left.
    Stale,
}

#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// Model-selection hint forwarded to the chat endpoint.
    pub ai_model: String,
    pub feedback_mode: FeedbackMode,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            ai_model: "smart".to_string(),
            feedback_mode: FeedbackMode::default(),
        }
    }
}

/// Owns the conversation, the teacher voice, and the turn-taking rules.
pub struct SessionController {
    chat: Arc<dyn ChatClient>,
    voice: Box<dyn TeacherVoice>,
    settings: SessionSettings,
    state: SessionState,
    topic: Option<&'static Topic>,
    messages: Vec<Message>,
    summary: Option<SessionSummary>,
    loading: bool,
    token: SessionToken,
}

impl SessionController {
    pub fn new(
        chat: Arc<dyn ChatClient>,
        voice: Box<dyn TeacherVoice>,
        settings: SessionSettings,
    ) -> Self {
        Self {
            chat,
            voice,
            settings,
            state: SessionState::Idle,
            topic: None,
            messages: Vec::new(),
            summary: None,
            loading: false,
            token: SessionToken(0),
        }
    }

    /// The chat collaborator, for running pending requests.
    pub fn chat(&self) -> Arc<dyn ChatClient> {
        Arc::clone(&self.chat)
    }

    pub const fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub const fn state(&self) -> SessionState {
        self.state
    }

    pub const fn status(&self) -> SessionStatus {
        match self.state {
            SessionState::Idle | SessionState::Ready => SessionStatus::NotStarted,
            SessionState::Active | SessionState::Summarizing => SessionStatus::Active,
            SessionState::Summarized => SessionStatus::Ended,
        }
    }

    pub const fn topic(&self) -> Option<&'static Topic> {
        self.topic
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub const fn summary(&self) -> Option<&SessionSummary> {
        self.summary.as_ref()
    }

    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_teacher_speaking(&self) -> bool {
        self.voice.is_speaking()
    }

    /// Voice capture is only allowed while the teacher is silent and no
    /// reply is pending.
    pub fn can_listen(&self) -> bool {
        self.state == SessionState::Active && !self.loading && !self.voice.is_speaking()
    }

    pub fn voice_state(&self) -> watch::Receiver<VoiceState> {
        self.voice.subscribe()
    }

    pub fn last_message(&self, role: Role) -> Option<&Message> {
        self.messages.iter().rev().find(|m| m.role() == role)
    }

    pub fn select_topic(&mut self, topic_id: &str) -> Result<&'static Topic, SessionError> {
        self.expect_state("select a topic", &[SessionState::Idle, SessionState::Ready])?;

        let topic =
            find_topic(topic_id).ok_or_else(|| SessionError::UnknownTopic(topic_id.to_string()))?;
        self.topic = Some(topic);
        self.state = SessionState::Ready;
        debug!("Topic selected: {}", topic.id);
        Ok(topic)
    }

    pub fn begin_session(&mut self) -> Result<PendingOpening, SessionError> {
        self.expect_state("start the session", &[SessionState::Ready])?;
        let topic = self.topic.ok_or(SessionError::NoTopic)?;

        self.token = self.token.next();
        self.messages.clear();
        self.summary = None;
        self.state = SessionState::Active;
        self.loading = true;
        info!("Session started on topic '{}'", topic.id);

        Ok(PendingOpening {
            token: self.token,
            prompt: build_opening_prompt(topic),
            ai_model: self.settings.ai_model.clone(),
        })
    }

    pub fn apply_opening(&mut self, outcome: OpeningOutcome) -> Applied {
        if self.is_stale(outcome.token, "opening") {
            return Applied::Stale;
        }
        self.loading = false;

        if let Some(reply) = outcome.reply {
            self.push_teacher(reply);
        }
        Applied::Current
    }

    /// Starts the conversation and speaks the opening line.
    ///
    /// A failing chat request is not an error: the session is then active but
    /// empty.
    pub async fn start_session(&mut self) -> Result<(), SessionError> {
        let pending = self.begin_session()?;
        let outcome = pending.run(self.chat.as_ref()).await;
        self.apply_opening(outcome);
        Ok(())
    }

    pub fn begin_turn(&mut self, input: StudentInput) -> Result<PendingTurn, SessionError> {
        self.expect_state("send a message", &[SessionState::Active])?;
        if self.loading {
            return Err(SessionError::Busy);
        }
        let text = input.text().trim();
        if text.is_empty() {
            return Err(SessionError::EmptyMessage);
        }

        let (feedback_prompt, feedback_kind) = match (&input, self.settings.feedback_mode) {
            (StudentInput::Spoken(recognition), FeedbackMode::Spoken) => (
                build_pronunciation_prompt(text, recognition.confidence),
                FeedbackKind::Spoken,
            ),
            _ => (build_feedback_prompt(text), FeedbackKind::Written),
        };

        let student = Message::student(text);
        let student_id = student.id();
        self.messages.push(student);
        self.loading = true;

        let transcript = format_transcript(&self.messages);

        Ok(PendingTurn {
            token: self.token,
            student_id,
            continuation_prompt: build_continuation_prompt(&transcript),
            feedback_prompt,
            feedback_kind,
            ai_model: self.settings.ai_model.clone(),
        })
    }

    pub fn apply_turn(&mut self, outcome: TurnOutcome) -> Applied {
        if self.is_stale(outcome.token, "turn") {
            return Applied::Stale;
        }
        self.loading = false;

        if let Some(feedback) = outcome.feedback {
            let student = self
                .messages
                .iter_mut()
                .find(|m| m.id() == outcome.student_id);
            let attached = match (student, feedback) {
                (Some(msg), TurnFeedback::Written(score)) => msg.attach_feedback(score),
                (Some(msg), TurnFeedback::Spoken(score)) => msg.attach_pronunciation(score),
                (None, _) => false,
            };
            if !attached {
                debug!("Feedback for {} not attached", outcome.student_id);
            }
        }

        if let Some(reply) = outcome.reply {
            self.push_teacher(reply);
        }
        Applied::Current
    }

    /// Sends a typed student turn and waits for the teacher and the feedback.
    pub async fn submit_student_turn(&mut self, text: &str) -> Result<(), SessionError> {
        self.run_turn(StudentInput::Typed(text.to_string())).await
    }

    /// Sends a recognized utterance as the student's turn.
    pub async fn submit_spoken_turn(
        &mut self,
        recognition: Recognition,
    ) -> Result<(), SessionError> {
        self.run_turn(StudentInput::Spoken(recognition)).await
    }

    async fn run_turn(&mut self, input: StudentInput) -> Result<(), SessionError> {
        let pending = self.begin_turn(input)?;
        let outcome = pending.run(self.chat.as_ref()).await;
        self.apply_turn(outcome);
        Ok(())
    }

    pub fn begin_summary(&mut self) -> Result<PendingSummary, SessionError> {
        self.expect_state("end the session", &[SessionState::Active])?;
        if self.loading {
            return Err(SessionError::Busy);
        }
        if self.messages.is_empty() {
            return Err(SessionError::EmptyTranscript);
        }

        self.state = SessionState::Summarizing;
        self.loading = true;

        Ok(PendingSummary {
            token: self.token,
            prompt: build_summary_prompt(&format_transcript(&self.messages)),
            ai_model: self.settings.ai_model.clone(),
        })
    }

    pub fn apply_summary(&mut self, outcome: SummaryOutcome) -> Applied {
        if self.is_stale(outcome.token, "summary") {
            return Applied::Stale;
        }
        self.loading = false;

        match outcome.summary {
            Some(summary) => {
                self.summary = Some(summary);
                self.state = SessionState::Summarized;
                info!("Session summarized after {} messages", self.messages.len());
            }
            None => {
                self.state = SessionState::Active;
            }
        }
        Applied::Current
    }

    /// Requests the session summary. Without a usable answer the session
    /// simply stays active.
    pub async fn end_session(&mut self) -> Result<(), SessionError> {
        let pending = self.begin_summary()?;
        let outcome = pending.run(self.chat.as_ref()).await;
        self.apply_summary(outcome);
        Ok(())
    }

    /// Drops the whole session, silences the teacher, and invalidates every
    /// request still in flight.
    pub fn reset_session(&mut self) {
        self.voice.stop();
        self.token = self.token.next();
        self.state = SessionState::Idle;
        self.topic = None;
        self.messages.clear();
        self.summary = None;
        self.loading = false;
        debug!("Session reset");
    }

    /// The `nth` teacher message (1-based), or the latest one.
    pub fn teacher_message(&self, nth: Option<usize>) -> Option<&Message> {
        let mut teacher = self.messages.iter().filter(|m| m.role() == Role::Teacher);
        match nth {
            Some(n) => teacher.nth(n.checked_sub(1)?),
            None => teacher.last(),
        }
    }

    /// Speaks a teacher message again. Refused while the teacher is still
    /// talking; `Ok(None)` means the voice could not speak it.
    pub fn repeat_teacher(
        &mut self,
        nth: Option<usize>,
    ) -> Result<Option<PlaybackId>, SessionError> {
        if self.voice.is_speaking() {
            return Err(SessionError::TeacherSpeaking);
        }
        let text = self
            .teacher_message(nth)
            .ok_or(SessionError::NothingToRepeat)?
            .content()
            .to_string();
        Ok(self.voice.speak(&text))
    }

    pub fn stop_speaking(&mut self) {
        self.voice.stop();
    }

    fn push_teacher(&mut self, reply: String) {
        let mut message = Message::teacher(reply);
        if message.content().trim().is_empty() {
            debug!("Blank teacher message kept silent");
            self.messages.push(message);
            return;
        }
        match self.voice.speak(message.content()) {
            Some(playback) => {
                message.attach_audio(playback);
            }
            None => warn!("Teacher message was not spoken"),
        }
        self.messages.push(message);
    }

    fn is_stale(&self, token: SessionToken, what: &str) -> bool {
        let stale = token != self.token;
        if stale {
            debug!("Discarding stale {what} response");
        }
        stale
    }

    fn expect_state(
        &self,
        operation: &'static str,
        allowed: &[SessionState],
    ) -> Result<(), SessionError> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(SessionError::InvalidState {
                operation,
                state: self.state,
            })
        }
    }
}
