use clap::{Parser, Subcommand};

use crate::voice::VoiceKind;

#[derive(Parser, Debug)]
#[command(name = "havo-speak")]
#[command(about = "Oefen Engels spreken met een AI-docent (HAVO 2, A2 niveau)")]
#[command(version)]
pub struct Args {
    /// Topic id to start with (see `havo-speak topics`)
    #[arg(short = 't', long, global = true)]
    pub topic: Option<String>,

    /// Base URL of the chat and TTS endpoints
    #[arg(short = 'e', long, global = true)]
    pub endpoint: Option<String>,

    /// Model-selection hint sent to the chat endpoint
    #[arg(short = 'm', long, global = true)]
    pub model: Option<String>,

    /// Teacher voice
    #[arg(long, value_enum, global = true)]
    pub voice: Option<VoiceKind>,

    /// Log debug output to stderr
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Start a conversation (the default)
    Practice,
    /// List conversation topics
    Topics,
    /// List local English voices and the one the teacher uses
    Voices,
    /// Configure havo-speak defaults
    Configure {
        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
}
