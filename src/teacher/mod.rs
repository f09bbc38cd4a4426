mod client;
mod extract;
mod prompt;

pub use client::{CHAT_PATH, ChatClient, HttpChatClient};
pub use extract::{first_json_object, json_objects, parse_embedded};
pub use prompt::{
    build_continuation_prompt, build_feedback_prompt, build_opening_prompt,
    build_pronunciation_prompt, build_summary_prompt, format_transcript,
};
