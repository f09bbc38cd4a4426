use inquire::autocompletion::{Autocomplete, Replacement};

// Available slash commands: (command, description)
pub(crate) const SLASH_COMMANDS: &[(&str, &str)] = &[
    ("/speak", "Antwoord inspreken via de microfoon"),
    ("/stop", "Docent laten stoppen met praten"),
    ("/repeat", "Zin van de docent herhalen, /repeat 2 voor de tweede"),
    ("/feedback", "Feedback op je laatste antwoord"),
    ("/end", "Gesprek afronden met een samenvatting"),
    ("/reset", "Opnieuw beginnen met een ander onderwerp"),
    ("/help", "Beschikbare commando's tonen"),
    ("/quit", "Afsluiten"),
];

/// Slash command autocompleter
#[derive(Clone, Default)]
pub struct SlashCommandCompleter;

impl Autocomplete for SlashCommandCompleter {
    fn get_suggestions(&mut self, input: &str) -> Result<Vec<String>, inquire::CustomUserError> {
        if !input.starts_with('/') {
            return Ok(vec![]);
        }

        let suggestions: Vec<String> = SLASH_COMMANDS
            .iter()
            .filter(|(cmd, _)| cmd.starts_with(input))
            .map(|(cmd, desc)| format!("{cmd}  {desc}"))
            .collect();

        Ok(suggestions)
    }

    fn get_completion(
        &mut self,
        _input: &str,
        highlighted_suggestion: Option<String>,
    ) -> Result<Replacement, inquire::CustomUserError> {
        let replacement =
            highlighted_suggestion.map(|s| s.split_whitespace().next().unwrap_or("").to_string());
        Ok(replacement)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlashCommand {
    Speak,
    Stop,
    /// Replays the given teacher message (1-based), or the latest.
    Repeat(Option<usize>),
    Feedback,
    End,
    Reset,
    Help,
    Quit,
    Unknown(String),
}

/// One line typed at the practice prompt.
#[derive(Debug, PartialEq, Eq)]
pub enum Input {
    /// A student turn.
    Text(String),
    Command(SlashCommand),
    Empty,
}

pub fn parse_input(input: &str) -> Input {
    let input = input.trim();

    if input.is_empty() {
        return Input::Empty;
    }

    input
        .strip_prefix('/')
        .map_or_else(|| Input::Text(input.to_string()), parse_slash_command)
}

fn parse_slash_command(cmd: &str) -> Input {
    let parts: Vec<&str> = cmd.split_whitespace().collect();

    let command = match parts.first().copied() {
        Some("speak" | "s" | "mic") => SlashCommand::Speak,
        Some("stop") => SlashCommand::Stop,
        Some("repeat" | "r") => match parts.get(1).map(|n| n.parse::<usize>()) {
            None => SlashCommand::Repeat(None),
            Some(Ok(n)) => SlashCommand::Repeat(Some(n)),
            Some(Err(_)) => SlashCommand::Unknown(parts.join(" ")),
        },
        Some("feedback" | "f") => SlashCommand::Feedback,
        Some("end") => SlashCommand::End,
        Some("reset") => SlashCommand::Reset,
        Some("help" | "h" | "?") => SlashCommand::Help,
        Some("quit" | "exit" | "q") => SlashCommand::Quit,
        _ => SlashCommand::Unknown(parts.join(" ")),
    };
    Input::Command(command)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_input() {
        assert_eq!(parse_input(""), Input::Empty);
        assert_eq!(parse_input("   "), Input::Empty);
    }

    #[test]
    fn test_parse_student_text_is_trimmed() {
        assert_eq!(
            parse_input("  I like football.  "),
            Input::Text("I like football.".to_string())
        );
    }

    #[test]
    fn test_parse_commands_and_aliases() {
        let cases = [
            ("/speak", SlashCommand::Speak),
            ("/s", SlashCommand::Speak),
            ("/stop", SlashCommand::Stop),
            ("/repeat", SlashCommand::Repeat(None)),
            ("/r", SlashCommand::Repeat(None)),
            ("/repeat 2", SlashCommand::Repeat(Some(2))),
            ("/feedback", SlashCommand::Feedback),
            ("/end", SlashCommand::End),
            ("/reset", SlashCommand::Reset),
            ("/help", SlashCommand::Help),
            ("/quit", SlashCommand::Quit),
            ("/exit", SlashCommand::Quit),
            ("/q", SlashCommand::Quit),
        ];
        for (line, expected) in cases {
            assert_eq!(parse_input(line), Input::Command(expected), "{line}");
        }
    }

    #[test]
    fn test_parse_repeat_with_bad_index() {
        assert_eq!(
            parse_input("/repeat last"),
            Input::Command(SlashCommand::Unknown("repeat last".to_string()))
        );
    }

    #[test]
    fn test_parse_unknown_command() {
        assert_eq!(
            parse_input("/translate this"),
            Input::Command(SlashCommand::Unknown("translate this".to_string()))
        );
    }

    #[test]
    fn test_completer_no_suggestions_for_regular_text() {
        let mut completer = SlashCommandCompleter;
        assert!(completer.get_suggestions("hello").unwrap().is_empty());
    }

    #[test]
    fn test_completer_lists_every_command() {
        let mut completer = SlashCommandCompleter;
        let suggestions = completer.get_suggestions("/").unwrap();
        assert_eq!(suggestions.len(), SLASH_COMMANDS.len());
    }

    #[test]
    fn test_completer_filters_by_prefix() {
        let mut completer = SlashCommandCompleter;

        let suggestions = completer.get_suggestions("/s").unwrap();
        assert_eq!(suggestions.len(), 2);
        assert!(suggestions[0].starts_with("/speak"));
        assert!(suggestions[1].starts_with("/stop"));

        let suggestions = completer.get_suggestions("/re").unwrap();
        assert_eq!(suggestions.len(), 2);
    }

    #[test]
    fn test_completer_completion() {
        let mut completer = SlashCommandCompleter;
        let suggestion = "/feedback  Feedback op je laatste antwoord".to_string();
        let completion = completer.get_completion("/f", Some(suggestion)).unwrap();
        assert_eq!(completion, Some("/feedback".to_string()));

        assert!(completer.get_completion("/x", None).unwrap().is_none());
    }
}
