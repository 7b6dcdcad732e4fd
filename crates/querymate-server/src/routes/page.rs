//! Page Routes - The single-page question form
//!
//! `GET /` shows the form, `POST /` submits it and re-renders the page with
//! the outcome below the button.

use axum::{
    extract::{Form, State},
    response::Html,
    routing::get,
    Router,
};
use serde::Deserialize;

use querymate::DomainError;

use crate::application::AskOutcome;
use crate::config::API_KEY_VAR;
use crate::models::NO_ANSWER_NOTICE;
use crate::render::{escape, markdown_to_html};
use crate::AppState;

use super::ask::NOT_CONFIGURED;

const PAGE_TITLE: &str = "SQL & Excel AI Assistant";
const HEADING: &str = "💡 SQL & Excel AI Assistant";
const INTRO: &str =
    "Ask me anything about SQL queries, Excel formulas, or cheat sheets. I'm here to help!";
const PLACEHOLDER: &str =
    "e.g., 'SQL query to find active users', or 'Excel formula for conditional formatting'";
const EMPTY_WARNING: &str = "Please enter your question in the text area above!";
const ERROR_HINT: &str =
    "Please ensure your internet connection is stable and your API key is correct and valid.";
const FOOTER: &str = "Built with Gemini and axum";

/// Submitted form fields
#[derive(Debug, Default, Deserialize)]
pub struct AskForm {
    #[serde(default)]
    pub question: String,
}

/// Callout styles, mirroring the usual error/warning/info boxes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Error(String),
    Warning(String),
    Info(String),
    Code(String),
}

/// Everything the page template needs
#[derive(Debug, Default)]
pub struct PageView {
    pub question: String,
    pub notices: Vec<Notice>,
    pub answer_html: Option<String>,
    /// False once a fatal configuration problem was reported
    pub show_form: bool,
}

impl PageView {
    fn form(question: String) -> Self {
        Self {
            question,
            show_form: true,
            ..Default::default()
        }
    }

    fn not_configured() -> Self {
        Self {
            notices: vec![
                Notice::Error(NOT_CONFIGURED.to_string()),
                Notice::Warning(format!(
                    "Please set your API key as the {} secret or environment variable before starting the server.",
                    API_KEY_VAR
                )),
                Notice::Code(format!("export {}='YOUR_API_KEY_HERE'", API_KEY_VAR)),
            ],
            show_form: false,
            ..Default::default()
        }
    }
}

async fn show_form(State(state): State<AppState>) -> Html<String> {
    let view = if state.assistant.is_some() {
        PageView::form(String::new())
    } else {
        PageView::not_configured()
    };
    Html(render_page(&view))
}

async fn submit_form(State(state): State<AppState>, Form(form): Form<AskForm>) -> Html<String> {
    let Some(assistant) = state.assistant.as_deref() else {
        return Html(render_page(&PageView::not_configured()));
    };

    let mut view = PageView::form(form.question);

    match assistant.ask(&view.question).await {
        Ok(AskOutcome::Answered(answer)) => {
            view.answer_html = Some(markdown_to_html(&answer.markdown));
        }
        Ok(AskOutcome::NoAnswer { .. }) => {
            view.notices.push(Notice::Warning(NO_ANSWER_NOTICE.to_string()));
        }
        Err(DomainError::EmptyQuestion) => {
            view.notices.push(Notice::Warning(EMPTY_WARNING.to_string()));
        }
        Err(e @ DomainError::Validation(_)) => {
            view.notices.push(Notice::Warning(e.to_string()));
        }
        Err(e) => {
            view.notices
                .push(Notice::Error(format!("An error occurred: {}", e)));
            view.notices.push(Notice::Info(ERROR_HINT.to_string()));
        }
    }

    Html(render_page(&view))
}

/// Render the full HTML document
pub fn render_page(view: &PageView) -> String {
    let mut body = String::new();

    body.push_str(&format!("<h1>{}</h1>\n", escape(HEADING)));
    body.push_str(&format!("<p class=\"intro\">{}</p>\n", escape(INTRO)));

    if view.show_form {
        body.push_str(&format!(
            concat!(
                "<form method=\"post\" action=\"/\">\n",
                "<label for=\"question\">Your Question:</label>\n",
                "<textarea id=\"question\" name=\"question\" rows=\"7\" placeholder=\"{placeholder}\">\n{question}</textarea>\n",
                "<button type=\"submit\">Get AI Help</button>\n",
                "</form>\n",
            ),
            placeholder = escape(PLACEHOLDER),
            question = escape(&view.question),
        ));
    }

    for notice in &view.notices {
        body.push_str(&render_notice(notice));
    }

    if let Some(answer_html) = &view.answer_html {
        body.push_str("<section class=\"answer\">\n<h3>AI Assistant's Response:</h3>\n");
        body.push_str(answer_html);
        body.push_str("</section>\n");
    }

    body.push_str(&format!(
        "<hr>\n<p class=\"caption\">{}</p>\n",
        escape(FOOTER)
    ));

    format!(
        concat!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n",
            "<meta charset=\"utf-8\">\n",
            "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n",
            "<title>{title}</title>\n",
            "<link rel=\"icon\" href=\"data:image/svg+xml,<svg xmlns=%22http://www.w3.org/2000/svg%22 viewBox=%220 0 100 100%22><text y=%22.9em%22 font-size=%2290%22>🤖</text></svg>\">\n",
            "<style>{style}</style>\n",
            "</head>\n<body>\n<main>\n{body}</main>\n</body>\n</html>\n",
        ),
        title = escape(PAGE_TITLE),
        style = STYLE,
        body = body,
    )
}

fn render_notice(notice: &Notice) -> String {
    match notice {
        Notice::Error(text) => format!("<div class=\"notice error\">{}</div>\n", escape(text)),
        Notice::Warning(text) => format!("<div class=\"notice warning\">{}</div>\n", escape(text)),
        Notice::Info(text) => format!("<div class=\"notice info\">{}</div>\n", escape(text)),
        Notice::Code(text) => format!("<pre class=\"notice code\"><code>{}</code></pre>\n", escape(text)),
    }
}

const STYLE: &str = "\
body{font-family:system-ui,sans-serif;margin:0;background:#fff;color:#31333f}\
main{max-width:730px;margin:0 auto;padding:3rem 1rem}\
label{display:block;margin:1rem 0 .25rem;font-size:.9rem}\
textarea{width:100%;box-sizing:border-box;padding:.5rem;font:inherit;border:1px solid #ccc;border-radius:.4rem}\
button{width:100%;margin-top:.75rem;padding:.6rem;font:inherit;border:1px solid #ccc;border-radius:.4rem;background:#fff;cursor:pointer}\
button:hover{border-color:#ff4b4b;color:#ff4b4b}\
.notice{margin:1rem 0;padding:.75rem 1rem;border-radius:.4rem}\
.error{background:#ffebeb;color:#7d353b}\
.warning{background:#fffce7;color:#926c05}\
.info{background:#e8f2fc;color:#0054a3}\
pre{background:#f0f2f6;padding:.75rem;border-radius:.4rem;overflow-x:auto}\
table{border-collapse:collapse}td,th{border:1px solid #ddd;padding:.3rem .6rem}\
.caption{color:#808495;font-size:.85rem}";

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(show_form).post(submit_form))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{state_with, unconfigured_state, ScriptedProvider};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use std::sync::Arc;
    use tower::ServiceExt;

    async fn body_text(app: Router, request: Request<Body>) -> String {
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn submit(question: &str) -> Request<Body> {
        let encoded: String = question
            .bytes()
            .map(|b| match b {
                b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' => (b as char).to_string(),
                b' ' => "+".to_string(),
                other => format!("%{:02X}", other),
            })
            .collect();
        Request::post("/")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from(format!("question={}", encoded)))
            .unwrap()
    }

    #[tokio::test]
    async fn test_get_shows_empty_form() {
        let app = router().with_state(state_with(Arc::new(ScriptedProvider::answering("x"))));
        let html = body_text(app, Request::get("/").body(Body::empty()).unwrap()).await;

        assert!(html.contains("<title>SQL &amp; Excel AI Assistant</title>"));
        assert!(html.contains("Your Question:"));
        assert!(html.contains("Get AI Help"));
        assert!(!html.contains("AI Assistant's Response:"));
        assert!(!html.contains("class=\"notice"));
    }

    #[tokio::test]
    async fn test_submit_renders_answer_and_keeps_question() {
        let provider = Arc::new(ScriptedProvider::answering(
            "```sql\nSELECT * FROM users WHERE active = 1;\n```",
        ));
        let app = router().with_state(state_with(provider.clone()));
        let html = body_text(app, submit("SQL query to find active <users>")).await;

        assert!(html.contains("AI Assistant's Response:"));
        assert!(html.contains(r#"<code class="language-sql">"#));
        assert!(html.contains(">\nSQL query to find active &lt;users&gt;</textarea>"));
        assert!(provider.prompts()[0].contains("User's request: SQL query to find active <users>"));
    }

    #[tokio::test]
    async fn test_submit_empty_warns() {
        let provider = Arc::new(ScriptedProvider::answering("unused"));
        let app = router().with_state(state_with(provider.clone()));
        let html = body_text(app, submit("")).await;

        assert!(html.contains(EMPTY_WARNING));
        assert!(provider.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_submit_failure_shows_error_and_hint() {
        let provider = Arc::new(ScriptedProvider::failing("Request failed: connection refused"));
        let app = router().with_state(state_with(provider));
        let html = body_text(app, submit("Excel VLOOKUP")).await;

        assert!(html.contains("An error occurred: Request failed: connection refused"));
        assert!(html.contains(ERROR_HINT));
        assert!(!html.contains("AI Assistant's Response:"));
    }

    #[tokio::test]
    async fn test_leading_newline_survives_re_render() {
        let provider = Arc::new(ScriptedProvider::answering("ok"));
        let app = router().with_state(state_with(provider.clone()));
        let html = body_text(app, submit("\nSELECT 1")).await;

        // HTML parsers drop one newline right after <textarea>
        assert!(html.contains("\">\n\nSELECT 1</textarea>"));
        assert!(provider.prompts()[0].contains("User's request: \nSELECT 1"));
    }

    #[tokio::test]
    async fn test_validation_error_warns_without_connection_hint() {
        let provider = Arc::new(ScriptedProvider::rejecting("question is not about SQL or Excel"));
        let app = router().with_state(state_with(provider));
        let html = body_text(app, submit("What is the weather")).await;

        assert!(html.contains(
            "<div class=\"notice warning\">Validation error: question is not about SQL or Excel</div>"
        ));
        assert!(!html.contains(ERROR_HINT));
        assert!(!html.contains("An error occurred"));
    }

    #[tokio::test]
    async fn test_submit_without_text_from_model_warns() {
        let provider = Arc::new(ScriptedProvider::answering("   "));
        let app = router().with_state(state_with(provider));
        let html = body_text(app, submit("Excel VLOOKUP")).await;

        assert!(html.contains("I couldn&#39;t generate") || html.contains("I couldn't generate"));
    }

    #[tokio::test]
    async fn test_missing_api_key_hides_form() {
        let app = router().with_state(unconfigured_state());
        let html = body_text(app, Request::get("/").body(Body::empty()).unwrap()).await;

        assert!(html.contains(NOT_CONFIGURED));
        assert!(html.contains("export GEMINI_API_KEY=&#39;YOUR_API_KEY_HERE&#39;")
            || html.contains("export GEMINI_API_KEY='YOUR_API_KEY_HERE'"));
        assert!(!html.contains("<form"));
    }
}
