//! Practice mode output. Everything addressed to the student is Dutch;
//! only the teacher speaks English.

use crate::session::{FeedbackScore, Message, PronunciationScore, SessionError, SessionSummary};
use crate::speech::Recognition;
use crate::topics::Topic;
use crate::ui::Style;

use super::command::SLASH_COMMANDS;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Words shown on either side of the one being spoken.
const SPOKEN_CONTEXT: usize = 4;

pub fn print_header(topic: &Topic, voice_input: bool) {
    println!(
        "{} {} - Engels oefenen, A2 niveau",
        Style::header("havo-speak"),
        Style::version(format!("v{VERSION}"))
    );
    println!(
        "{} {}",
        Style::label("Onderwerp:"),
        Style::value(topic.title)
    );
    if voice_input {
        println!(
            "{}",
            Style::hint("Typ je antwoord in het Engels, of gebruik /speak om het in te spreken.")
        );
    } else {
        println!("{}", Style::hint("Typ je antwoord in het Engels."));
    }
    println!();
}

pub fn print_teacher(text: &str) {
    println!("{} {text}", Style::teacher("Docent:"));
    println!();
}

/// Status line while the teacher speaks: a short window of the sentence
/// around the highlighted word, or a plain notice before the first word.
pub fn speaking_line(words: &[&str], highlight: Option<usize>) -> String {
    let Some(index) = highlight.filter(|&i| i < words.len()) else {
        return format!(
            "{} {}",
            Style::teacher("Docent spreekt..."),
            Style::hint("Ctrl+C om te stoppen")
        );
    };

    let first = index.saturating_sub(SPOKEN_CONTEXT);
    let last = (index + SPOKEN_CONTEXT).min(words.len() - 1);

    let mut line = String::new();
    if first > 0 {
        line.push_str("... ");
    }
    for (i, word) in words.iter().enumerate().take(last + 1).skip(first) {
        if i > first {
            line.push(' ');
        }
        if i == index {
            line.push_str(&Style::spoken(word));
        } else {
            line.push_str(word);
        }
    }
    if last + 1 < words.len() {
        line.push_str(" ...");
    }
    format!("{} {line}", Style::teacher("Docent:"))
}

pub fn print_heard(recognition: &Recognition) {
    let confidence = recognition
        .confidence
        .map(|c| format!(" ({}% zeker)", (c * 100.0).round() as u8))
        .unwrap_or_default();
    println!(
        "{} {}{}",
        Style::student("Jij:"),
        recognition.transcript,
        Style::secondary(confidence)
    );
}

/// One-line score overview printed after each turn.
pub fn print_turn_scores(message: &Message) {
    if let Some(score) = message.feedback() {
        println!(
            "{}  {} {}  {} {}  {} {}  {} {}",
            Style::label("Feedback"),
            Style::label("grammatica"),
            Style::score(score.grammar),
            Style::label("uitspraak"),
            Style::score(score.pronunciation),
            Style::label("woordenschat"),
            Style::score(score.vocabulary),
            Style::label("vloeiendheid"),
            Style::score(score.fluency),
        );
        println!("{}", Style::hint("/feedback voor de toelichting"));
    } else if let Some(score) = message.pronunciation() {
        println!(
            "{}  {} {}  {} {}  {} {}",
            Style::label("Uitspraak"),
            Style::label("uitspraak"),
            Style::score(score.pronunciation),
            Style::label("vloeiendheid"),
            Style::score(score.fluency),
            Style::label("nauwkeurigheid"),
            Style::score(score.accuracy),
        );
        println!("{}", Style::hint("/feedback voor de toelichting"));
    }
}

/// Detailed scores for the student's last turn.
pub fn print_feedback(message: Option<&Message>) {
    let Some(message) = message else {
        print_notice("Je hebt nog niets gezegd in dit gesprek.");
        return;
    };

    println!("{}", Style::header("Feedback op je laatste antwoord"));
    println!("  \"{}\"", Style::secondary(message.content()));

    match (message.feedback(), message.pronunciation()) {
        (None, None) => println!("  {}", Style::hint("Voor dit antwoord is geen feedback.")),
        (feedback, pronunciation) => {
            if let Some(score) = feedback {
                print_feedback_score(score);
            }
            if let Some(score) = pronunciation {
                print_pronunciation_score(score);
            }
        }
    }
    println!();
}

fn print_feedback_score(score: &FeedbackScore) {
    print_score_line("grammatica", score.grammar);
    print_score_line("uitspraak", score.pronunciation);
    print_score_line("woordenschat", score.vocabulary);
    print_score_line("vloeiendheid", score.fluency);
    print_comments(&score.comments);
}

fn print_pronunciation_score(score: &PronunciationScore) {
    print_score_line("uitspraak", score.pronunciation);
    print_score_line("vloeiendheid", score.fluency);
    print_score_line("nauwkeurigheid", score.accuracy);
    print_comments(&score.comments);
}

fn print_score_line(label: &str, score: u8) {
    println!("  {:<16} {}", Style::label(label), Style::score(score));
}

fn print_comments(comments: &str) {
    if !comments.trim().is_empty() {
        println!();
        println!("  {comments}");
    }
}

pub fn print_summary(summary: &SessionSummary) {
    println!("{}", Style::header("Samenvatting van je gesprek"));
    print_score_line("grammatica", summary.overall_grammar);
    print_score_line("uitspraak", summary.overall_pronunciation);
    print_score_line("woordenschat", summary.overall_vocabulary);
    print_score_line("vloeiendheid", summary.overall_fluency);

    print_list("Sterke punten", &summary.strengths);
    print_list("Verbeterpunten", &summary.improvements);
    print_list("Tips", &summary.specific_tips);

    if !summary.encouragement.trim().is_empty() {
        println!();
        println!("{}", Style::success(&summary.encouragement));
    }
    println!();
    println!(
        "{}",
        Style::hint("Gebruik /reset voor een nieuw gesprek of /quit om te stoppen.")
    );
    println!();
}

fn print_list(title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!();
    println!("{}", Style::header(title));
    for item in items {
        println!("  - {item}");
    }
}

pub fn print_help(voice_input: bool) {
    println!("{}", Style::header("Beschikbare commando's"));
    for (cmd, desc) in SLASH_COMMANDS {
        if *cmd == "/speak" && !voice_input {
            println!(
                "  {:<10} {}",
                Style::secondary(cmd),
                Style::secondary("Niet beschikbaar: geen spraakherkenning ingesteld")
            );
        } else {
            println!("  {:<10} {}", Style::command(cmd), Style::secondary(desc));
        }
    }
    println!();
}

/// Dutch explanation of a refused action.
pub fn session_error_message(err: &SessionError) -> String {
    match err {
        SessionError::InvalidState { .. } => {
            "Dat kan nu niet. Gebruik /reset om opnieuw te beginnen.".to_string()
        }
        SessionError::UnknownTopic(id) => format!("Onbekend onderwerp: '{id}'"),
        SessionError::NoTopic => "Kies eerst een onderwerp.".to_string(),
        SessionError::EmptyMessage => "Je bericht is leeg.".to_string(),
        SessionError::Busy => "Even geduld, de docent is nog aan het antwoorden.".to_string(),
        SessionError::EmptyTranscript => {
            "Er is nog niets gezegd; een samenvatting is niet mogelijk.".to_string()
        }
        SessionError::TeacherSpeaking => {
            "Wacht tot de docent klaar is met praten, of gebruik /stop.".to_string()
        }
        SessionError::NothingToRepeat => "Die zin van de docent bestaat niet.".to_string(),
    }
}

pub fn print_session_error(err: &SessionError) {
    print_notice(&session_error_message(err));
}

pub fn print_notice(message: &str) {
    println!("{}", Style::warning(message));
    println!();
}

pub fn print_error(message: &str) {
    eprintln!("{} {message}", Style::error("Fout:"));
    eprintln!();
}

pub fn print_goodbye() {
    println!("{}", Style::success("Tot de volgende keer!"));
}
