//! # havo-speak - Spoken English practice with an AI teacher
//!
//! `havo-speak` lets a Dutch HAVO 2 student (A2 level) hold a short English
//! conversation with an AI-simulated teacher from the terminal. The teacher
//! speaks its lines aloud, every student turn is scored on grammar,
//! pronunciation, vocabulary and fluency, and the session ends with a
//! summary of strengths, improvements and tips.
//!
//! ## Quick Start
//!
//! ```bash
//! # Pick a topic interactively
//! havo-speak
//!
//! # Start straight away on a topic
//! havo-speak --topic hobbies
//!
//! # Use the remote TTS voice instead of espeak-ng
//! havo-speak --voice remote
//! ```
//!
//! ## Configuration
//!
//! Settings are stored in `~/.config/havo-speak/config.toml`:
//!
//! ```toml
//! [speak]
//! endpoint = "http://localhost:3000"
//! ai_model = "smart"
//! voice = "local"
//! feedback = "written"
//!
//! [stt]
//! command = ["whisper-listen", "--lang", "{lang}"]
//! ```

/// Command-line interface definitions and handlers.
pub mod cli;

/// Configuration file management.
pub mod config;

/// XDG-style path utilities for configuration.
pub mod paths;

/// Interactive practice REPL.
pub mod practice;

/// Conversation state machine, messages and feedback.
pub mod session;

/// Student voice input.
pub mod speech;

/// Chat endpoint client, prompts and response parsing.
pub mod teacher;

/// Conversation topic catalog.
pub mod topics;

/// Terminal UI components (spinner, colors).
pub mod ui;

/// Teacher voice output.
pub mod voice;
