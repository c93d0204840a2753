//! HTML rendering for the four pages.
//!
//! Pages are plain server-rendered documents sharing one layout with a
//! sidebar navigation. Rendering functions are pure; handlers in
//! `routes::ui` gather the data.

use crate::models::image_url;
use crate::session::{MessageCounts, Role, Turn};
use crate::settings::CredentialStatus;
use pulldown_cmark::{html, Event, Options, Parser};

pub const PAGE_TITLE: &str = "LUNA - Educational Chatbot";
pub const EMPTY_ANALYTICS_MESSAGE: &str =
    "No chat data available yet. Start a conversation in the Chatbot section!";
pub const SETTINGS_SAVED_MESSAGE: &str = "API Key updated successfully!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Home,
    Chatbot,
    Analytics,
    Settings,
}

impl View {
    pub const ALL: [View; 4] = [View::Home, View::Chatbot, View::Analytics, View::Settings];

    pub fn path(&self) -> &'static str {
        match self {
            View::Home => "/",
            View::Chatbot => "/chatbot",
            View::Analytics => "/analytics",
            View::Settings => "/settings",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            View::Home => "Home",
            View::Chatbot => "Chatbot",
            View::Analytics => "Analytics",
            View::Settings => "Settings",
        }
    }
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
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

pub fn render_markdown_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    // Raw HTML from either side of the conversation is shown as text.
    let parser = Parser::new_ext(markdown, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });

    let mut out = String::new();
    html::push_html(&mut out, parser);
    out
}

fn layout(active: View, heading: &str, body: &str) -> String {
    let nav: String = View::ALL
        .iter()
        .map(|view| {
            let class = if *view == active { " class=\"active\"" } else { "" };
            format!(
                "<li><a href=\"{}\"{}>{}</a></li>",
                view.path(),
                class,
                view.name()
            )
        })
        .collect();

    format!(
        r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>{title}</title>
  <style>
    body {{ font-family: Arial, sans-serif; margin: 0; display: flex; color: #1d1d1f; }}
    nav {{ width: 200px; min-height: 100vh; background: #f0f2f6; padding: 1.5rem 1rem; box-sizing: border-box; }}
    nav ul {{ list-style: none; padding: 0; }}
    nav li a {{ display: block; padding: 0.5rem; color: #1d1d1f; text-decoration: none; border-radius: 6px; }}
    nav li a.active {{ background: #ff4b4b; color: white; }}
    main {{ flex: 1; padding: 2rem; max-width: 900px; }}
    .turn {{ border: 1px solid #ddd; border-radius: 8px; padding: 0.75rem 1rem; margin-bottom: 0.75rem; }}
    .turn.user {{ background: #f7f7f9; }}
    .turn .role {{ font-weight: 600; margin-bottom: 0.25rem; }}
    .turn img {{ max-width: 100%; margin-top: 0.5rem; }}
    .metrics {{ display: flex; gap: 2rem; margin-bottom: 1.5rem; }}
    .metric .value {{ font-size: 2rem; }}
    .notice {{ background: #e8f5e9; border-left: 4px solid #2e7d32; padding: 0.75rem 1rem; }}
    input[type=text], input[type=password] {{ width: 100%; padding: 0.5rem; box-sizing: border-box; }}
    button {{ margin-top: 0.75rem; padding: 0.6rem 1rem; }}
  </style>
</head>
<body>
  <nav>
    <h3>Navigation</h3>
    <ul>{nav}</ul>
  </nav>
  <main>
    <h1>{heading}</h1>
{body}
  </main>
</body>
</html>"#,
        title = PAGE_TITLE,
        nav = nav,
        heading = heading,
        body = body,
    )
}

pub fn home_page() -> String {
    let body = r#"    <p>LUNA is an advanced AI-powered chatbot designed to assist students with educational queries. It provides instant responses, helpful explanations, and insightful analytics to enhance your learning experience.</p>
    <h2>✨ About LUNA</h2>
    <ul>
      <li>Uses AI to answer academic questions in real-time.</li>
      <li>Helps students with various subjects by providing quick and accurate explanations.</li>
      <li>Tracks and analyzes user queries for better recommendations.</li>
      <li>Designed for an interactive and engaging learning experience.</li>
    </ul>"#;

    layout(View::Home, "📚 Welcome to LUNA - Your AI Educational Assistant", body)
}

fn render_turn(index: usize, turn: &Turn) -> String {
    let class = match turn.role {
        Role::User => "user",
        Role::Assistant => "assistant",
    };
    // The artifact path is reused, so the index keeps each image fresh.
    let image = turn
        .image_path
        .as_deref()
        .and_then(image_url)
        .map(|url| format!("<img src=\"{}?v={}\" alt=\"Visualization\" />", escape_html(&url), index))
        .unwrap_or_default();

    format!(
        "    <div class=\"turn {}\"><div class=\"role\">{}</div>{}{}</div>\n",
        class,
        turn.role.label(),
        render_markdown_html(&turn.text),
        image
    )
}

pub fn chatbot_page(turns: &[Turn]) -> String {
    let transcript: String = turns
        .iter()
        .enumerate()
        .map(|(i, turn)| render_turn(i, turn))
        .collect();

    let body = format!(
        r#"{transcript}    <form method="post" action="{action}">
      <input type="text" name="message" placeholder="Ask me anything..." autofocus autocomplete="off" />
      <button type="submit">Send</button>
    </form>"#,
        transcript = transcript,
        action = View::Chatbot.path(),
    );

    layout(View::Chatbot, "💬 AI Chatbot", &body)
}

/// `chart_svg` is absent when the chart could not be rendered.
pub fn analytics_page(counts: &MessageCounts, chart_svg: Option<&str>) -> String {
    if counts.total == 0 {
        let body = format!("    <p>{}</p>", EMPTY_ANALYTICS_MESSAGE);
        return layout(View::Analytics, "📊 Analytics Dashboard", &body);
    }

    let chart = chart_svg
        .map(|svg| format!("    <div class=\"chart\">{}</div>", svg))
        .unwrap_or_else(|| "    <p>Chart unavailable.</p>".to_string());

    let body = format!(
        r#"    <div class="metrics">
      <div class="metric"><div>Total Messages</div><div class="value">{total}</div></div>
      <div class="metric"><div>User Messages</div><div class="value">{user}</div></div>
      <div class="metric"><div>Bot Messages</div><div class="value">{bot}</div></div>
    </div>
{chart}"#,
        total = counts.total,
        user = counts.user,
        bot = counts.assistant,
        chart = chart,
    );

    layout(View::Analytics, "📊 Analytics Dashboard", &body)
}

pub fn settings_page(status: &CredentialStatus, saved: bool) -> String {
    let notice = if saved {
        format!("    <p class=\"notice\">{}</p>\n", SETTINGS_SAVED_MESSAGE)
    } else {
        String::new()
    };
    let current = match &status.key_hint {
        Some(hint) => format!("Current key: <code>{}</code>", escape_html(hint)),
        None => "No API key configured.".to_string(),
    };

    let body = format!(
        r#"{notice}    <h2>API Key Configuration</h2>
    <p>{current}</p>
    <form method="post" action="{action}">
      <label for="api_key">Enter your Gemini API Key:</label>
      <input type="password" id="api_key" name="api_key" autocomplete="off" />
      <button type="submit">Save API Key</button>
    </form>"#,
        notice = notice,
        current = current,
        action = View::Settings.path(),
    );

    layout(View::Settings, "⚙️ Settings", &body)
}
