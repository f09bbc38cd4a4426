//! Consistent styling utilities for terminal output.
//!
//! Provides color and formatting helpers using owo-colors.

use owo_colors::OwoColorize;
use std::fmt::Display;

/// Styles for different semantic elements.
pub struct Style;

impl Style {
    /// Style for section headers (e.g., "Configuratie", "Samenvatting")
    pub fn header<T: Display>(text: T) -> String {
        format!("{}", text.bold())
    }

    /// Style for labels/keys (e.g., "endpoint", "grammatica")
    pub fn label<T: Display>(text: T) -> String {
        format!("{}", text.dimmed())
    }

    /// Style for primary values (e.g., topic titles, voice names)
    pub fn value<T: Display>(text: T) -> String {
        format!("{}", text.cyan())
    }

    /// Style for secondary/supplementary info (e.g., descriptions, paths)
    pub fn secondary<T: Display>(text: T) -> String {
        format!("{}", text.dimmed())
    }

    pub fn success<T: Display>(text: T) -> String {
        format!("{}", text.green())
    }

    pub fn error<T: Display>(text: T) -> String {
        format!("{}", text.red().bold())
    }

    pub fn warning<T: Display>(text: T) -> String {
        format!("{}", text.yellow())
    }

    /// Style for commands (e.g., "/speak", "/help")
    pub fn command<T: Display>(text: T) -> String {
        format!("{}", text.green())
    }

    /// Style for identifiers such as topic ids and locale tags
    pub fn code<T: Display>(text: T) -> String {
        format!("{}", text.yellow())
    }

    pub fn hint<T: Display>(text: T) -> String {
        format!("{}", text.dimmed().italic())
    }

    pub fn version<T: Display>(text: T) -> String {
        format!("{}", text.dimmed())
    }

    /// Speaker tag in front of teacher lines
    pub fn teacher<T: Display>(text: T) -> String {
        format!("{}", text.blue().bold())
    }

    /// Speaker tag in front of student lines
    pub fn student<T: Display>(text: T) -> String {
        format!("{}", text.magenta().bold())
    }

    /// The word the teacher is saying right now
    pub fn spoken<T: Display>(text: T) -> String {
        format!("{}", text.cyan().bold().underline())
    }

    /// A 1-10 score, colored by band.
    pub fn score(score: u8) -> String {
        let text = format!("{score}/10");
        match score {
            8.. => format!("{}", text.green().bold()),
            6..=7 => format!("{}", text.yellow().bold()),
            _ => format!("{}", text.red().bold()),
        }
    }
}
