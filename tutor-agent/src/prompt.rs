//! Prompts and canned fallbacks for the two tutor tasks.

use serde::{Deserialize, Serialize};

use lesson::MysteryReply;

use crate::backend::CompletionRequest;

/// What the tutor is asked to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TutorTask {
    /// Reply to the student's first e-mail
    MysteryReply,
    /// Evaluate politeness of the final draft
    ToneCheck,
}

impl TutorTask {
    /// Get a human-readable description.
    pub fn description(&self) -> &'static str {
        match self {
            TutorTask::MysteryReply => "Reply to the student's first e-mail as Robot 7",
            TutorTask::ToneCheck => "Evaluate the politeness and clarity of an e-mail draft",
        }
    }
}

pub const SYSTEM_PROMPT: &str =
    "You are a friendly teacher helping a 10-year-old student learn to write e-mails in Arabic.";

/// Build the mystery reply request.
pub fn mystery_reply_request(student_name: &str) -> CompletionRequest {
    CompletionRequest::new(format!(
        "Write a short, fun email reply in Arabic to a student named {} who just learned how to send emails.\n\
         Pretend you are \"Robot 7\", the email assistant.\n\
         The subject should be \"رد: تهانينا!\".\n\
         The body should be encouraging and mention that they are now an \"Email Explorer\".\n\
         Return as JSON: {{ \"subject\": \"...\", \"body\": \"...\" }}",
        student_name
    ))
    .with_instructions(SYSTEM_PROMPT)
    .expecting_json()
}

/// Build the tone check request.
pub fn tone_check_request(subject: &str, body: &str) -> CompletionRequest {
    CompletionRequest::new(format!(
        "Evaluate this email draft written by the student in Arabic.\n\
         Subject: {}\n\
         Body: {}\n\n\
         If the email is polite and clear, praise them in Arabic.\n\
         If it's rude or unclear, give a gentle tip in Arabic on how to improve.\n\
         Keep the response short (max 2 sentences).\n\
         Tone: Encouraging, fun.",
        subject, body
    ))
    .with_instructions(SYSTEM_PROMPT)
}

/// Parse a `{ "subject", "body" }` object out of model output.
///
/// Tolerates a fenced code block around the JSON.
pub fn parse_mystery_reply(content: &str) -> Option<MysteryReply> {
    let trimmed = content
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();

    let reply: MysteryReply = serde_json::from_str(trimmed).ok()?;
    if reply.subject.trim().is_empty() || reply.body.trim().is_empty() {
        return None;
    }
    Some(reply)
}

// ===== Fallbacks =====

/// Reply when no backend is configured.
pub fn offline_reply(student_name: &str) -> MysteryReply {
    MysteryReply::new(
        "رد: مرحباً!",
        format!(
            "أهلاً بك يا {}! أنا سعيد جداً باستلام رسالتك الأولى. أنت تتعلم بسرعة!",
            student_name
        ),
    )
}

/// Reply when the backend failed.
pub fn error_reply(student_name: &str) -> MysteryReply {
    MysteryReply::new(
        "رد: تهانينا!",
        format!(
            "أهلاً بك يا {}! أنا \"روبوت 7\". سعيد جداً بنجاحك في إرسال أول رسالة!",
            student_name
        ),
    )
}

/// Tone feedback when no backend is configured.
pub const OFFLINE_TONE: &str = "أحسنت! رسالتك تبدو رائعة.";
/// Tone feedback when the backend answered with nothing.
pub const EMPTY_TONE: &str = "رسالة ممتازة! واصل العمل الجيد.";
/// Tone feedback when the backend failed.
pub const ERROR_TONE: &str = "رسالة جميلة! (تعذر الاتصال بالمعلم الآلي حالياً)";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mystery_prompt_mentions_name_and_json() {
        let request = mystery_reply_request("Layla");
        assert!(request.expects_json());
        assert!(request.prompt.contains("Layla"));
        assert!(request.prompt.contains("Robot 7"));
    }

    #[test]
    fn test_tone_prompt_includes_draft() {
        let request = tone_check_request("Hi", "Hello teacher");
        assert!(!request.expects_json());
        assert!(request.prompt.contains("Subject: Hi"));
        assert!(request.prompt.contains("Body: Hello teacher"));
    }

    #[test]
    fn test_parse_mystery_reply() {
        let reply = parse_mystery_reply(r#"{"subject": "رد: تهانينا!", "body": "مرحبا"}"#).unwrap();
        assert_eq!(reply.subject, "رد: تهانينا!");

        let fenced = "```json\n{\"subject\": \"s\", \"body\": \"b\"}\n```";
        assert_eq!(parse_mystery_reply(fenced), Some(MysteryReply::new("s", "b")));

        assert_eq!(parse_mystery_reply("{}"), None);
        assert_eq!(parse_mystery_reply("not json"), None);
        assert_eq!(parse_mystery_reply(r#"{"subject": "", "body": "b"}"#), None);
    }

    #[test]
    fn test_fallback_replies_greet_student() {
        assert!(offline_reply("Layla").body.contains("Layla"));
        assert!(error_reply("Layla").body.contains("روبوت 7"));
    }
}
