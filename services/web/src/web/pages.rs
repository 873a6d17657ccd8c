//! services/web/src/web/pages.rs
//!
//! Renders the single study planner page: the header, the chat sidebar, the
//! study form and the result of the last submission.
//!
//! All user and model text is HTML-escaped here. Markdown is rendered in the
//! browser; without JavaScript the raw text is shown as preformatted text.

use chrono::NaiveDate;
use study_planner_core::{
    domain::{
        ChatHistory, SkillLevel, DEFAULT_HOURS_PER_DAY, MAX_HOURS_PER_DAY, MIN_HOURS_PER_DAY,
    },
    planner::SubmissionOutcome,
};

pub const PAGE_TITLE: &str = "AI Smart Study Planner";
pub const SUCCESS_BANNER: &str = "✅ Content Generated";
pub const PLAN_HEADING: &str = "🗓 Study Plan";
pub const NOTES_HEADING: &str = "📝 Quick Revision Notes";
pub const ERROR_PREFIX: &str = "❌ Error: ";

/// The values the study form is pre-filled with.
#[derive(Debug, Clone)]
pub struct FormValues {
    pub subject: String,
    pub level: SkillLevel,
    pub hours: u8,
    pub exam_date: NaiveDate,
}

impl FormValues {
    pub fn defaults(today: NaiveDate) -> Self {
        Self {
            subject: String::new(),
            level: SkillLevel::default(),
            hours: DEFAULT_HOURS_PER_DAY,
            exam_date: today,
        }
    }
}

/// Everything needed to render one page.
pub struct PageView<'a> {
    pub today: NaiveDate,
    pub form: FormValues,
    pub history: &'a ChatHistory,
    pub chat_error: Option<&'a str>,
    pub outcome: Option<&'a SubmissionOutcome>,
}

pub fn render_page(view: &PageView<'_>) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{PAGE_TITLE}</title>
    <link rel="icon" href="data:image/svg+xml,<svg xmlns=%22http://www.w3.org/2000/svg%22 viewBox=%220 0 100 100%22><text y=%22.9em%22 font-size=%2290%22>📚</text></svg>">
    <style>{STYLE}</style>
</head>
<body>
<aside class="sidebar">
{sidebar}
</aside>
<main>
    <h1>📚 {PAGE_TITLE}</h1>
    <p class="caption">Plan • Learn • Revise — Powered by Google Gemini</p>
    <hr>
{form}
{result}
    <hr>
    <p class="caption">Google Gemini API • Rust + axum</p>
</main>
<script src="https://cdn.jsdelivr.net/npm/marked/marked.min.js"></script>
<script src="https://cdn.jsdelivr.net/npm/dompurify/dist/purify.min.js"></script>
<script>{SCRIPT}</script>
</body>
</html>
"#,
        sidebar = render_sidebar(view.history, view.chat_error),
        form = render_form(&view.form, view.today),
        result = view.outcome.map(render_outcome).unwrap_or_default(),
    )
}

fn render_sidebar(history: &ChatHistory, chat_error: Option<&str>) -> String {
    let mut html = String::from(
        r#"    <h2>🤖 AI Help Bot</h2>
    <form method="post" action="/ask">
        <label for="question">Ask anything:</label>
        <input type="text" id="question" name="question" autocomplete="off">
        <button type="submit">Ask</button>
    </form>
"#,
    );

    if let Some(message) = chat_error {
        html.push_str(&format!(
            "    <div class=\"banner error\">{ERROR_PREFIX}{}</div>\n",
            escape_html(message)
        ));
    }

    for turn in history.newest_first() {
        html.push_str(&format!(
            "    <div class=\"turn\">\n        <div class=\"markdown\">**You:** {}</div>\n        <div class=\"markdown\">**AI:** {}</div>\n    </div>\n    <hr>\n",
            escape_html(&turn.question),
            escape_html(&turn.answer),
        ));
    }
    html
}

fn render_form(form: &FormValues, today: NaiveDate) -> String {
    let level_options: String = SkillLevel::ALL
        .iter()
        .map(|level| {
            let selected = if *level == form.level { " selected" } else { "" };
            format!("<option value=\"{level}\"{selected}>{level}</option>")
        })
        .collect();

    format!(
        r#"    <form method="post" action="/plan" class="study-form">
        <label for="subject">📘 Subject</label>
        <input type="text" id="subject" name="subject" placeholder="Example: Python Programming" value="{subject}">

        <label for="level">🎓 Skill Level</label>
        <select id="level" name="level">{level_options}</select>

        <label for="hours">⏰ Study hours per day: <output id="hours-value">{hours}</output></label>
        <input type="range" id="hours" name="hours" min="{MIN_HOURS_PER_DAY}" max="{MAX_HOURS_PER_DAY}" value="{hours}">

        <label for="exam_date">📅 Select Exam Date</label>
        <input type="date" id="exam_date" name="exam_date" min="{today}" value="{exam_date}">

        <button type="submit">🚀 Generate Plan</button>
    </form>"#,
        subject = escape_html(&form.subject),
        hours = form.hours,
        today = today.format("%Y-%m-%d"),
        exam_date = form.exam_date.format("%Y-%m-%d"),
    )
}

fn render_outcome(outcome: &SubmissionOutcome) -> String {
    match outcome {
        SubmissionOutcome::Invalid(e) => format!(
            "    <div class=\"banner warning\">{}</div>",
            escape_html(&e.to_string())
        ),
        SubmissionOutcome::Failed(message) => format!(
            "    <div class=\"banner error\">{ERROR_PREFIX}{}</div>",
            escape_html(message)
        ),
        SubmissionOutcome::Generated(content) => format!(
            r#"    <div class="banner success">{SUCCESS_BANNER}</div>
    <h2>{PLAN_HEADING}</h2>
    <div class="markdown" id="plan">{plan}</div>
    <hr>
    <h2>{NOTES_HEADING}</h2>
    <div class="markdown" id="notes">{notes}</div>"#,
            plan = escape_html(&content.plan),
            notes = escape_html(&content.notes),
        ),
    }
}

/// Escapes the characters that are significant in HTML text and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

const STYLE: &str = r#"
body { font-family: "Source Sans Pro", Arial, sans-serif; margin: 0; display: flex; min-height: 100vh; color: #262730; }
.sidebar { width: 300px; background: #f0f2f6; padding: 20px; box-sizing: border-box; }
main { flex: 1; max-width: 730px; margin: 0 auto; padding: 20px 40px; }
.caption { color: #808495; font-size: 14px; }
label { display: block; margin-top: 14px; font-size: 14px; }
input[type=text], input[type=date], select { width: 100%; padding: 8px; box-sizing: border-box; border: 1px solid #d0d3dc; border-radius: 6px; }
input[type=range] { width: 100%; }
button { margin-top: 16px; padding: 8px 16px; border: 1px solid #d0d3dc; border-radius: 6px; background: white; cursor: pointer; }
button:hover { border-color: #ff4b4b; color: #ff4b4b; }
.banner { padding: 12px 16px; border-radius: 6px; margin: 16px 0; }
.banner.success { background: #dff5e3; color: #1b5e20; }
.banner.warning { background: #fff8d6; color: #7a5d00; }
.banner.error { background: #ffe1e1; color: #8b0000; }
.markdown { white-space: pre-wrap; }
.markdown.rendered { white-space: normal; }
"#;

const SCRIPT: &str = r#"
document.querySelectorAll('.markdown').forEach(function (el) {
    if (window.marked && window.DOMPurify) {
        el.innerHTML = DOMPurify.sanitize(marked.parse(el.textContent));
        el.classList.add('rendered');
    }
});
var hours = document.getElementById('hours');
if (hours) {
    hours.addEventListener('input', function () {
        document.getElementById('hours-value').textContent = hours.value;
    });
}
"#;
