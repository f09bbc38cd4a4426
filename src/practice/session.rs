use std::future::Future;

use anyhow::Result;
use inquire::ui::{Attributes, Color, RenderConfig, StyleSheet, Styled};
use inquire::{InquireError, Select, Text};
use tracing::debug;

use super::command::{Input, SlashCommand, SlashCommandCompleter, parse_input};
use super::ui;
use crate::session::{Role, SessionController, SessionState, StudentInput};
use crate::speech::{ListenOutcome, Listener};
use crate::topics::{TOPICS, Topic};
use crate::ui::{Spinner, Style, handle_prompt_cancellation};

/// What the conversation loop asks of the outer loop.
enum Next {
    ChooseTopic,
    Quit,
}

/// Interactive practice: topic choice, then a REPL where plain text is a
/// student turn and slash commands drive the session.
pub struct PracticeSession {
    controller: SessionController,
    listener: Listener,
    preset_topic: Option<&'static Topic>,
}

impl PracticeSession {
    pub const fn new(
        controller: SessionController,
        listener: Listener,
        preset_topic: Option<&'static Topic>,
    ) -> Self {
        Self {
            controller,
            listener,
            preset_topic,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        loop {
            let topic = match self.preset_topic.take() {
                Some(topic) => topic,
                None => match handle_prompt_cancellation(choose_topic)? {
                    Some(topic) => topic,
                    None => break,
                },
            };

            self.controller.select_topic(topic.id)?;
            ui::print_header(topic, self.listener.is_supported());

            if !self.start().await {
                continue;
            }

            match self.converse().await? {
                Next::ChooseTopic => {}
                Next::Quit => break,
            }
        }

        self.controller.stop_speaking();
        ui::print_goodbye();
        Ok(())
    }

    /// Returns `false` when the student cancelled while waiting.
    async fn start(&mut self) -> bool {
        let pending = match self.controller.begin_session() {
            Ok(pending) => pending,
            Err(e) => {
                ui::print_session_error(&e);
                return false;
            }
        };

        let chat = self.controller.chat();
        let Some(outcome) =
            wait_for("De docent maakt zich klaar...", pending.run(chat.as_ref())).await
        else {
            self.abort();
            return false;
        };

        self.controller.apply_opening(outcome);
        match self.controller.last_message(Role::Teacher) {
            Some(opening) => {
                let opening = opening.content().to_string();
                ui::print_teacher(&opening);
                self.follow_teacher(&opening).await;
            }
            None => ui::print_error(
                "De docent is niet bereikbaar. Begin zelf het gesprek of probeer /reset.",
            ),
        }
        true
    }

    async fn converse(&mut self) -> Result<Next> {
        let render_config = render_config();

        loop {
            let line = Text::new("")
                .with_render_config(render_config)
                .with_autocomplete(SlashCommandCompleter)
                .with_help_message(
                    "Antwoord in het Engels, /help voor commando's, Ctrl+C om te stoppen",
                )
                .prompt();

            match line {
                Ok(line) => match parse_input(&line) {
                    Input::Empty => {}
                    Input::Text(text) => self.student_turn(StudentInput::Typed(text)).await,
                    Input::Command(cmd) => {
                        if let Some(next) = self.handle_command(cmd).await {
                            return Ok(next);
                        }
                    }
                },
                Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                    println!();
                    return Ok(Next::Quit);
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    async fn handle_command(&mut self, cmd: SlashCommand) -> Option<Next> {
        match cmd {
            SlashCommand::Speak => self.speak().await,
            SlashCommand::Stop => self.controller.stop_speaking(),
            SlashCommand::Repeat(nth) => match self.controller.repeat_teacher(nth) {
                Ok(_) => {
                    if let Some(message) = self.controller.teacher_message(nth) {
                        let text = message.content().to_string();
                        self.follow_teacher(&text).await;
                    }
                }
                Err(e) => ui::print_session_error(&e),
            },
            SlashCommand::Feedback => {
                ui::print_feedback(self.controller.last_message(Role::Student));
            }
            SlashCommand::End => self.end().await,
            SlashCommand::Reset => {
                self.controller.reset_session();
                return Some(Next::ChooseTopic);
            }
            SlashCommand::Help => ui::print_help(self.listener.is_supported()),
            SlashCommand::Quit => return Some(Next::Quit),
            SlashCommand::Unknown(cmd) => {
                ui::print_error(&format!("Onbekend commando: /{cmd}"));
            }
        }
        None
    }

    async fn student_turn(&mut self, input: StudentInput) {
        let pending = match self.controller.begin_turn(input) {
            Ok(pending) => pending,
            Err(e) => {
                ui::print_session_error(&e);
                return;
            }
        };
        let student_id = pending.student_id();

        let chat = self.controller.chat();
        let Some(outcome) = wait_for("De docent denkt na...", pending.run(chat.as_ref())).await
        else {
            self.abort();
            return;
        };

        let answered = outcome.reply.is_some();
        self.controller.apply_turn(outcome);

        if let Some(student) = self
            .controller
            .messages()
            .iter()
            .find(|m| m.id() == student_id)
        {
            ui::print_turn_scores(student);
        }
        println!();

        if answered && let Some(reply) = self.controller.last_message(Role::Teacher) {
            let reply = reply.content().to_string();
            ui::print_teacher(&reply);
            self.follow_teacher(&reply).await;
        } else {
            ui::print_error("De docent kon niet antwoorden. Probeer het nog eens.");
        }
    }

    async fn speak(&mut self) {
        if !self.listener.is_supported() {
            ui::print_notice(
                "Spraakherkenning is niet beschikbaar. Stel [stt] command in via havo-speak configure.",
            );
            return;
        }
        if self.controller.is_teacher_speaking() {
            ui::print_notice("Wacht tot de docent klaar is met praten, of gebruik /stop.");
            return;
        }
        if !self.controller.can_listen() {
            ui::print_notice("Je kunt nu niet inspreken.");
            return;
        }

        println!("{}", Style::hint("Luisteren... spreek nu in het Engels."));
        let outcome = tokio::select! {
            outcome = self.listener.listen() => outcome,
            _ = tokio::signal::ctrl_c() => {
                ui::print_notice("Opname gestopt.");
                return;
            }
        };

        match outcome {
            Ok(ListenOutcome::Heard(recognition)) => {
                ui::print_heard(&recognition);
                self.student_turn(StudentInput::Spoken(recognition)).await;
            }
            Ok(ListenOutcome::NoSpeech) => {
                ui::print_notice("Ik heb niets gehoord. Probeer het nog eens.");
            }
            Ok(ListenOutcome::TimedOut) => {
                ui::print_notice("De opname duurde te lang en is gestopt. Probeer het nog eens.");
            }
            Ok(ListenOutcome::Failed(reason)) => {
                ui::print_error(&format!("Spraakherkenning mislukt: {reason}"));
            }
            Err(e) => ui::print_error(&e.to_string()),
        }
    }

    async fn end(&mut self) {
        let pending = match self.controller.begin_summary() {
            Ok(pending) => pending,
            Err(e) => {
                ui::print_session_error(&e);
                return;
            }
        };

        let chat = self.controller.chat();
        let Some(outcome) = wait_for("Samenvatting maken...", pending.run(chat.as_ref())).await
        else {
            self.abort();
            return;
        };

        self.controller.apply_summary(outcome);
        match self.controller.summary() {
            Some(summary) if self.controller.state() == SessionState::Summarized => {
                ui::print_summary(summary);
            }
            _ => ui::print_error("De samenvatting is niet gelukt. Probeer /end nog eens."),
        }
    }

    /// Shows the word the teacher is saying until playback ends. Ctrl+C
    /// silences the teacher.
    async fn follow_teacher(&mut self, text: &str) {
        let mut voice = self.controller.voice_state();
        if !voice.borrow_and_update().is_speaking() {
            return;
        }

        let words: Vec<&str> = text.split_whitespace().collect();
        let line = Spinner::new(ui::speaking_line(&words, None));
        loop {
            tokio::select! {
                changed = voice.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let state = voice.borrow_and_update().clone();
                    if !state.is_speaking() {
                        break;
                    }
                    line.set_message(ui::speaking_line(&words, state.highlight));
                }
                _ = tokio::signal::ctrl_c() => {
                    debug!("Teacher interrupted by the student");
                    self.controller.stop_speaking();
                    break;
                }
            }
        }
        line.stop();
    }

    /// Drops the session after a cancelled wait so nothing stays loading.
    fn abort(&mut self) {
        debug!("Request cancelled by the student");
        self.controller.reset_session();
        ui::print_notice("Afgebroken. Kies een onderwerp om opnieuw te beginnen.");
    }
}

/// Awaits `fut` behind a spinner. Returns `None` when Ctrl+C comes first.
async fn wait_for<T>(message: &str, fut: impl Future<Output = T>) -> Option<T> {
    let _spinner = Spinner::new(message);
    tokio::select! {
        out = fut => Some(out),
        _ = tokio::signal::ctrl_c() => None,
    }
}

fn choose_topic() -> Result<&'static Topic> {
    let topics: Vec<&'static Topic> = TOPICS.iter().collect();
    let topic = Select::new("Kies een onderwerp:", topics)
        .with_render_config(render_config())
        .prompt()?;
    Ok(topic)
}

fn render_config() -> RenderConfig<'static> {
    let prompt_style = Styled::new("❯")
        .with_fg(Color::LightBlue)
        .with_attr(Attributes::BOLD);
    let mut render_config = RenderConfig::default()
        .with_prompt_prefix(prompt_style)
        .with_answered_prompt_prefix(prompt_style);

    render_config.option = StyleSheet::new().with_fg(Color::Grey);
    render_config.selected_option = Some(StyleSheet::new().with_fg(Color::DarkMagenta));
    render_config
}
