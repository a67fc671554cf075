//! Server-rendered pages.
//!
//! Every value that reaches the markup goes through [`escape`].

mod admin;
mod public;

use std::fmt::Write;

use axum::response::Html;

pub use admin::{AdminPage, admin_page, login_page};
pub use public::{IndexPage, index_page};

/// HTML-escapes `raw` for use in element content and quoted attributes.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
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

fn layout(title: &str, body: &str) -> Html<String> {
    let mut page = String::with_capacity(body.len() + 512);
    let _ = write!(
        page,
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<link rel="stylesheet" href="/static/style.css">
<link rel="icon" href="/favicon.ico">
</head>
<body>
{body}
</body>
</html>
"#,
        title = escape(title),
    );
    Html(page)
}

pub fn error_page() -> Html<String> {
    layout(
        "Something went wrong",
        r#"<main class="error">
<h1>Something went wrong</h1>
<p>Please try again in a moment.</p>
<p><a href="/">Back to the home page</a></p>
</main>"#,
    )
}
