//! Prompt templates for the AI teacher.
//!
//! Every request to the chat endpoint is a single free-text instruction; the
//! templates below carry the topic, the transcript, or the student's answer
//! through `{placeholder}` substitution.

use crate::session::{Message, Role};
use crate::topics::Topic;

pub const OPENING_PROMPT_TEMPLATE: &str = "Start a conversation practice session for a Dutch HAVO 2 student (A2 English level) about the topic: \"{topic_title}\".

Instructions for you as the AI teacher:
- Speak in English only
- Keep questions and responses at A2 level (simple, clear language)
- Start with a friendly greeting and introduce the topic
- Ask open-ended questions to encourage the student to speak
- Be patient and encouraging
- Focus on communication rather than perfection
- Keep responses conversational, not like an interview

Topic: {topic_description}

Please start the conversation now with a warm greeting and an opening question about this topic.";

pub const CONTINUATION_PROMPT_TEMPLATE: &str = "Continue this English conversation practice session. You are an encouraging English teacher helping a Dutch HAVO 2 student (A2 level) practice speaking.

Current conversation:
{transcript}

Guidelines:
- Respond naturally to what the student said
- Ask follow-up questions to keep the conversation going
- Use A2 level English (simple, clear)
- Be encouraging and positive
- Occasionally acknowledge good language use
- If the student makes errors, gently model correct usage without explicitly correcting
- Keep the conversation flowing naturally

Respond as the teacher would in this conversation.";

pub const FEEDBACK_PROMPT_TEMPLATE: &str = "Analyze this English response from a Dutch HAVO 2 student (A2 level) and provide detailed feedback:

Student's response: \"{student_text}\"

Please provide feedback in this exact JSON format:
{
  \"grammar\": [score 1-10],
  \"pronunciation\": [score 1-10 based on likely pronunciation of written text],
  \"vocabulary\": [score 1-10],
  \"fluency\": [score 1-10 based on sentence structure and flow],
  \"comments\": \"Specific constructive feedback in Dutch, mentioning what was good and what could be improved. Keep it encouraging and specific.\"
}

Consider A2 level expectations:
- Grammar: Basic sentence structures, simple tenses
- Vocabulary: Common everyday words appropriate for the topic
- Fluency: Ability to express ideas clearly, even if simply
- Pronunciation: Estimate based on likely Dutch speaker challenges

Be encouraging but honest in your assessment.";

pub const PRONUNCIATION_PROMPT_TEMPLATE: &str = "A Dutch HAVO 2 student (A2 level) said the following out loud. The speech recognizer transcribed it with {confidence}.

Transcribed speech: \"{student_text}\"

Please provide pronunciation feedback in this exact JSON format:
{
  \"pronunciation\": [score 1-10],
  \"fluency\": [score 1-10],
  \"accuracy\": [score 1-10 based on how well the transcription matches what the student probably meant],
  \"comments\": \"Specific pronunciation tips in Dutch, mentioning typical Dutch speaker challenges. Keep it encouraging.\"
}

Be encouraging but honest in your assessment.";

pub const SUMMARY_PROMPT_TEMPLATE: &str = "Provide a comprehensive session summary and feedback for this English conversation practice session with a Dutch HAVO 2 student (A2 level):

{transcript}

Please provide feedback in this exact JSON format:
{
  \"overallGrammar\": [score 1-10],
  \"overallPronunciation\": [score 1-10],
  \"overallVocabulary\": [score 1-10],
  \"overallFluency\": [score 1-10],
  \"strengths\": [\"strength 1\", \"strength 2\", \"strength 3\"],
  \"improvements\": [\"improvement area 1\", \"improvement area 2\", \"improvement area 3\"],
  \"specificTips\": [\"tip 1\", \"tip 2\", \"tip 3\"],
  \"encouragement\": \"Encouraging message in Dutch about their progress and effort\"
}

Base your assessment on A2 level expectations and be constructive and encouraging.";

// {placeholders} below are for string replacement, not format arguments
#[allow(clippy::literal_string_with_formatting_args)]
pub fn build_opening_prompt(topic: &Topic) -> String {
    OPENING_PROMPT_TEMPLATE
        .replace("{topic_title}", topic.title)
        .replace("{topic_description}", topic.description)
}

#[allow(clippy::literal_string_with_formatting_args)]
pub fn build_continuation_prompt(transcript: &str) -> String {
    CONTINUATION_PROMPT_TEMPLATE.replace("{transcript}", transcript)
}

#[allow(clippy::literal_string_with_formatting_args)]
pub fn build_feedback_prompt(student_text: &str) -> String {
    FEEDBACK_PROMPT_TEMPLATE.replace("{student_text}", student_text)
}

#[allow(clippy::literal_string_with_formatting_args)]
pub fn build_pronunciation_prompt(student_text: &str, confidence: Option<f32>) -> String {
    let confidence = confidence.map_or_else(
        || "an unknown confidence".to_string(),
        |c| format!("a confidence of {}%", (c.clamp(0.0, 1.0) * 100.0).round() as u8),
    );
    PRONUNCIATION_PROMPT_TEMPLATE
        .replace("{confidence}", &confidence)
        .replace("{student_text}", student_text)
}

#[allow(clippy::literal_string_with_formatting_args)]
pub fn build_summary_prompt(transcript: &str) -> String {
    SUMMARY_PROMPT_TEMPLATE.replace("{transcript}", transcript)
}

/// Formats messages as alternating `Teacher:` / `Student:` lines.
pub fn format_transcript(messages: &[Message]) -> String {
    messages
        .iter()
        .map(|msg| {
            let speaker = match msg.role() {
                Role::Teacher => "Teacher",
                Role::Student => "Student",
            };
            format!("{speaker}: {}", msg.content())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::topics::find_topic;

    #[test]
    fn test_build_opening_prompt() {
        let topic = find_topic("food").unwrap();
        let prompt = build_opening_prompt(topic);
        assert!(prompt.contains("\"Eten & Drinken\""));
        assert!(prompt.contains("Topic: Praat over je favoriete eten en drankjes"));
        assert!(!prompt.contains("{topic_title}"));
    }

    #[test]
    fn test_build_continuation_prompt_embeds_transcript() {
        let prompt = build_continuation_prompt("Teacher: Hi!\nStudent: Hello.");
        assert!(prompt.contains("Current conversation:\nTeacher: Hi!\nStudent: Hello.\n"));
    }

    #[test]
    fn test_build_feedback_prompt_keeps_json_shape() {
        let prompt = build_feedback_prompt("I like football.");
        assert!(prompt.contains("Student's response: \"I like football.\""));
        assert!(prompt.contains("\"grammar\": [score 1-10]"));
        assert!(prompt.contains("\"comments\""));
    }

    #[test]
    fn test_build_pronunciation_prompt_percent() {
        let prompt = build_pronunciation_prompt("I like football.", Some(0.876));
        assert!(prompt.contains("with a confidence of 88%."));
        assert!(prompt.contains("\"accuracy\""));
    }

    #[test]
    fn test_build_pronunciation_prompt_unknown_confidence() {
        let prompt = build_pronunciation_prompt("Hello", None);
        assert!(prompt.contains("with an unknown confidence."));
    }

    #[test]
    fn test_build_summary_prompt() {
        let prompt = build_summary_prompt("Teacher: Bye!");
        assert!(prompt.contains("Teacher: Bye!"));
        assert!(prompt.contains("\"specificTips\""));
    }

    #[test]
    fn test_format_transcript_alternates_roles() {
        let messages = vec![
            Message::teacher("Hello! What do you like to do?"),
            Message::student("I like football."),
        ];
        assert_eq!(
            format_transcript(&messages),
            "Teacher: Hello! What do you like to do?\nStudent: I like football."
        );
    }

    #[test]
    fn test_format_transcript_empty() {
        assert_eq!(format_transcript(&[]), "");
    }
}
