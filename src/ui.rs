use crate::models::{TierCounts, UserProfile};
use crate::stats::Tier;
use serde_json::Value;

pub struct HomeView<'a> {
    pub error: Option<&'a str>,
    pub log: &'a [String],
    pub visitors: usize,
}

pub struct StatsView<'a> {
    pub user: Option<&'a UserProfile>,
    pub stats: Option<&'a TierCounts>,
    pub notices: &'a [String],
    pub visitors: usize,
    pub rendered_at: String,
}

pub fn render_home(view: &HomeView<'_>) -> String {
    let error = view
        .error
        .map(|message| format!(r#"<p class="status" data-type="error">{}</p>"#, escape_html(message)))
        .unwrap_or_default();

    let log = if view.log.is_empty() {
        String::new()
    } else {
        let items: String = view
            .log
            .iter()
            .map(|line| format!("<li>{}</li>", escape_html(line)))
            .collect();
        format!(r#"<details class="log" open><summary>Attempts</summary><ol>{items}</ol></details>"#)
    };

    page("Garapon Stats", HOME_BODY)
        .replace("{{ERROR}}", &error)
        .replace("{{LOG}}", &log)
        .replace("{{VISITORS}}", &view.visitors.to_string())
}

pub fn render_stats(view: &StatsView<'_>) -> String {
    let notices: String = view
        .notices
        .iter()
        .map(|notice| format!(r#"<p class="status" data-type="error">{}</p>"#, escape_html(notice)))
        .collect();

    let user = match view.user {
        Some(user) => render_user(user),
        None => r#"<p class="hint">No profile data.</p>"#.to_string(),
    };

    let (tiers, total) = match view.stats {
        Some(stats) => {
            let cards: String = Tier::ALL
                .iter()
                .map(|tier| {
                    format!(
                        r#"<div class="stat tier-{label}"><span class="label">{label} &middot; {amount}</span><span class="value">{count}</span></div>"#,
                        label = tier.label(),
                        amount = tier.prize_amount(),
                        count = stats.get(*tier),
                    )
                })
                .collect();
            (cards, stats.total().to_string())
        }
        None => (r#"<p class="hint">No coupon data.</p>"#.to_string(), "&ndash;".to_string()),
    };

    page("Garapon Stats", STATS_BODY)
        .replace("{{NOTICES}}", &notices)
        .replace("{{USER}}", &user)
        .replace("{{TIERS}}", &tiers)
        .replace("{{TOTAL}}", &total)
        .replace("{{VISITORS}}", &view.visitors.to_string())
        .replace("{{RENDERED_AT}}", &escape_html(&view.rendered_at))
}

fn render_user(user: &UserProfile) -> String {
    match &user.0 {
        Value::Object(fields) if !fields.is_empty() => {
            let rows: String = fields
                .iter()
                .map(|(key, value)| {
                    let shown = match value {
                        Value::String(text) => text.clone(),
                        other => other.to_string(),
                    };
                    format!(
                        "<tr><th>{}</th><td>{}</td></tr>",
                        escape_html(key),
                        escape_html(&shown)
                    )
                })
                .collect();
            format!(r#"<table class="profile">{rows}</table>"#)
        }
        other => format!("<pre>{}</pre>", escape_html(&other.to_string())),
    }
}

fn page(title: &str, body: &str) -> String {
    LAYOUT_HTML.replace("{{TITLE}}", title).replace("{{BODY}}", body)
}

/// Escapes text for element content. `{` is encoded too so inserted values
/// never form a `{{PLACEHOLDER}}` that a later replacement would pick up.
pub fn escape_html(input: &str) -> String {
    html_escape::encode_text(input).replace('{', "&#123;")
}

const HOME_BODY: &str = r#"<header>
      <h1>Garapon Stats</h1>
      <p class="subtitle">Paste your bearer token to count your coupons by prize tier.</p>
    </header>

    <form class="token-form" method="post" action="/">
      <label class="label" for="bearer">Bearer token</label>
      <input id="bearer" name="bearer" type="password" autocomplete="off" required />
      <button class="btn-primary" type="submit">Show stats</button>
    </form>

    {{ERROR}}
    {{LOG}}

    <footer class="hint">Unique visitors: <span id="visitors">{{VISITORS}}</span></footer>"#;

const STATS_BODY: &str = r#"<header>
      <h1>Your coupons</h1>
      <p class="subtitle">Updated {{RENDERED_AT}} &middot; <a href="/">use another token</a></p>
    </header>

    {{NOTICES}}

    <section class="panel">
      {{TIERS}}
      <div class="stat total"><span class="label">Total</span><span id="total" class="value">{{TOTAL}}</span></div>
    </section>

    <section>
      <h2>Profile</h2>
      {{USER}}
    </section>

    <footer class="hint">Unique visitors: <span id="visitors">{{VISITORS}}</span></footer>"#;

const LAYOUT_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{{TITLE}}</title>
  <style>
    :root {
      --bg: #f4f1ea;
      --ink: #23211f;
      --muted: #7a746d;
      --accent: #d94f30;
      --card: rgba(255, 255, 255, 0.9);
      --shadow: 0 20px 50px rgba(35, 33, 31, 0.14);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: linear-gradient(160deg, var(--bg), #efe3cf);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px;
    }

    .app {
      width: min(780px, 100%);
      background: var(--card);
      border-radius: 24px;
      box-shadow: var(--shadow);
      padding: 32px;
      display: grid;
      gap: 24px;
    }

    h1 {
      font-family: "Georgia", serif;
      margin: 0;
    }

    .subtitle,
    .hint {
      margin: 0;
      color: var(--muted);
    }

    .token-form {
      display: grid;
      gap: 10px;
    }

    input {
      padding: 12px 14px;
      border-radius: 12px;
      border: 1px solid rgba(35, 33, 31, 0.2);
      font-size: 1rem;
    }

    .btn-primary {
      border: none;
      border-radius: 999px;
      padding: 14px 20px;
      font-weight: 600;
      background: var(--accent);
      color: white;
      cursor: pointer;
    }

    .panel {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(140px, 1fr));
      gap: 14px;
    }

    .stat {
      background: white;
      border-radius: 16px;
      padding: 16px;
      display: grid;
      gap: 6px;
      border-top: 6px solid #ccc;
    }

    .stat .label {
      font-size: 0.8rem;
      text-transform: uppercase;
      letter-spacing: 0.1em;
      color: var(--muted);
    }

    .stat .value {
      font-size: 1.8rem;
      font-weight: 600;
    }

    .tier-white { border-top-color: #e8e8e8; }
    .tier-blue { border-top-color: #3a6fd8; }
    .tier-red { border-top-color: #d33a2c; }
    .tier-gold { border-top-color: #d9a521; }
    .total { border-top-color: var(--ink); }

    .profile th {
      text-align: left;
      padding-right: 16px;
      color: var(--muted);
    }

    .status[data-type="error"] {
      margin: 0;
      color: #c63b2b;
    }

    .log ol {
      margin: 8px 0 0;
      color: var(--muted);
      font-size: 0.9rem;
    }
  </style>
</head>
<body>
  <main class="app">
    {{BODY}}
  </main>
</body>
</html>
"#;
