//! Canonical report rendering.
//!
//! Reports are the durable artifacts of a flow: the interview text handed
//! to the administrator (and later archived verbatim) and the quiz result
//! summary and breakdown. All user-supplied text is HTML-escaped here;
//! the transport renders the result with HTML formatting enabled.

use crate::ids::SubmitterIdentity;
use crate::interview::{InterviewCategory, InterviewQuestion, PoliticalTopic};
use crate::quiz::{AnswerRecord, Scorecard, TestType};

/// Escape text for HTML rendering. Only the three characters with markup
/// meaning are replaced.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn identity_block(identity: &SubmitterIdentity) -> String {
    let username = identity.username.as_deref().unwrap_or("N/A");
    format!(
        "<b>Name:</b> {}\n<b>Username:</b> @{}\n<b>User id:</b> <code>{}</code>\n",
        escape_html(&identity.display_name()),
        escape_html(username),
        identity.id,
    )
}

fn interview_type_line(category: InterviewCategory, topic: Option<PoliticalTopic>) -> String {
    match topic {
        Some(topic) => format!("<b>Interview type:</b> {} - {}\n", category, topic),
        None => format!("<b>Interview type:</b> {}\n", category),
    }
}

/// Render a completed interview as the canonical report delivered to the
/// administrator and stored in the archive on acceptance.
///
/// Questions and answers are paired positionally; the caller guarantees
/// equal lengths.
pub fn interview_report(
    identity: &SubmitterIdentity,
    category: InterviewCategory,
    topic: Option<PoliticalTopic>,
    questions: &[InterviewQuestion],
    answers: &[String],
) -> String {
    let mut report = String::from("<b>Interview submission</b>\n");
    report.push_str(&identity_block(identity));
    report.push_str(&interview_type_line(category, topic));
    report.push_str("------------------------------------\n\n");
    for (index, (question, answer)) in questions.iter().zip(answers).enumerate() {
        report.push_str(&format!(
            "<b>Question {}:</b> {}\n<b>Answer:</b> {}\n\n",
            index + 1,
            escape_html(&question.text),
            escape_html(answer),
        ));
    }
    report
}

/// Render the taker-facing result of a quiz attempt.
pub fn quiz_summary(test_type: TestType, card: &Scorecard) -> String {
    let verdict = if card.passed() {
        "Result: PASSED"
    } else {
        "Result: FAILED. A new attempt is allowed 24 hours after this one."
    };
    format!(
        "<b>Regulations test result ({})</b>\n\n\
         Total questions: {}\n\
         Correct answers: {}\n\
         Wrong or skipped answers: {}\n\
         Penalty deducted (in correct answers): {}\n\
         <b>Final score: {:.2}%</b>\n\n{}",
        test_type,
        card.total,
        card.correct,
        card.incorrect,
        card.negative_points(),
        card.percent(),
        verdict,
    )
}

/// Render the administrator's copy of a quiz result: the summary plus a
/// per-question breakdown naming the chosen and correct options.
pub fn quiz_admin_report(
    identity: &SubmitterIdentity,
    test_type: TestType,
    card: &Scorecard,
    records: &[AnswerRecord],
) -> String {
    let mut report = format!("<b>Test result for {}</b>\n", escape_html(&identity.display_name()));
    report.push_str(&identity_block(identity));
    report.push('\n');
    report.push_str(&quiz_summary(test_type, card));
    report.push_str("\n\n<b>Answer breakdown</b>\n");
    for (index, record) in records.iter().enumerate() {
        let chosen = record.chosen_text().unwrap_or("I don't know");
        let mark = if record.is_correct() { "\u{2713}" } else { "\u{2717}" };
        report.push_str(&format!(
            "\n<b>{}. {}</b>\n   Chosen: {}\n   Correct: {} {}\n",
            index + 1,
            escape_html(&record.question),
            escape_html(chosen),
            escape_html(record.correct_text()),
            mark,
        ));
    }
    report
}
