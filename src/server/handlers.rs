//! HTTP handlers for the label form.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::Html;
use log::{info, warn};
use serde::Deserialize;

use super::state::AppState;

/// Query string of the form.
#[derive(Debug, Default, Deserialize)]
pub struct LabelQuery {
    /// Label text; absent on the first visit
    pub text: Option<String>,
}

/// Result shown above the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

/// Handle GET / - show the form, printing the label if text was submitted.
pub async fn index(State(state): State<Arc<AppState>>, Query(query): Query<LabelQuery>) -> Html<String> {
    let Some(text) = query.text else {
        return Html(render_page(None));
    };
    if text.trim().is_empty() {
        return Html(render_page(Some(Notice::Error(
            "Label has to contain text".to_string(),
        ))));
    }

    info!("printing {:?} from the web form", text);
    let result = tokio::task::spawn_blocking(move || state.print_text(&text)).await;

    let notice = match result {
        Ok(Ok(_)) => Notice::Success("Printed label".to_string()),
        Ok(Err(failure)) => {
            warn!("web job failed: {}", failure);
            let message = match failure.hint() {
                Some(hint) => format!("{}\n\n{}", failure, hint),
                None => failure.to_string(),
            };
            Notice::Error(message)
        }
        Err(e) => Notice::Error(format!("Task error: {}", e)),
    };
    Html(render_page(Some(notice)))
}

/// The form page, with an optional notice.
pub fn render_page(notice: Option<Notice>) -> String {
    let notice = match notice {
        None => String::new(),
        Some(Notice::Success(msg)) => {
            format!("<p class=\"success\">{}</p>", escape_html(&msg))
        }
        Some(Notice::Error(msg)) => {
            format!("<pre class=\"error\">{}</pre>", escape_html(&msg))
        }
    };
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>dymoprint</title>
<style>
body {{ font-family: sans-serif; max-width: 32em; margin: 2em auto; }}
.success {{ color: #2a7a2a; }}
.error {{ color: #b02020; white-space: pre-wrap; }}
</style>
</head>
<body>
<h1>dymoprint</h1>
{notice}
<form method="get" action="/">
<input type="text" name="text" autofocus>
<button type="submit">Print</button>
</form>
</body>
</html>
"#
    )
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::printer::Capability;
    use crate::server::ServerConfig;
    use crate::transport::{HidTransport, MemoryTransport};

    fn state(transport: Box<dyn crate::transport::Transport + Send>) -> Arc<AppState> {
        Arc::new(AppState::new(
            ServerConfig {
                listen_addr: "127.0.0.1:0".to_string(),
                capability: Capability::LABELMANAGER_PNP,
                font: "builtin".to_string(),
                gutter: 4,
            },
            transport,
        ))
    }

    async fn get(state: Arc<AppState>, text: Option<&str>) -> String {
        let query = LabelQuery {
            text: text.map(str::to_string),
        };
        index(State(state), Query(query)).await.0
    }

    #[tokio::test]
    async fn test_first_visit_shows_form() {
        let page = get(state(Box::new(MemoryTransport::new())), None).await;
        assert!(page.contains("<form"));
        assert!(!page.contains("class=\"error\""));
    }

    #[tokio::test]
    async fn test_blank_text_rejected() {
        let page = get(state(Box::new(MemoryTransport::new())), Some("   ")).await;
        assert!(page.contains("Label has to contain text"));
    }

    #[tokio::test]
    async fn test_prints_label() {
        let page = get(state(Box::new(MemoryTransport::new())), Some("Tst")).await;
        assert!(page.contains("Printed label"), "{}", page);
    }

    #[tokio::test]
    async fn test_device_error_is_shown() {
        let dir = tempfile::tempdir().unwrap();
        let transport = HidTransport::new(dir.path().join("hidraw7"), &Capability::LABELMANAGER_PNP);
        let page = get(state(Box::new(transport)), Some("<b>x</b>")).await;
        assert!(page.contains("Printing failed"), "{}", page);
        assert!(page.contains("udev"));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<a href=\"x\">&'"), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }
}
