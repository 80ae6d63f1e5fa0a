//! Server-rendered HTML pages. Each page is a static shell plus a small
//! script that talks to `/api/*` on the same origin.

use axum::extract::State;
use axum::response::Html;

use ar_domain::config::AvatarChoice;

use crate::state::AppState;

/// GET /: create an agent and embed its live session.
pub async fn index(State(state): State<AppState>) -> Html<String> {
    let bey = &state.config.bey;
    let avatars_html = avatar_radios(&bey.avatars, &bey.default_avatar_id);

    let body = format!(
        r#"<h1>Bey Avatar Embed (Auto-create)</h1>
<div class="row">
  <input id="roleName" value="Recruiter" placeholder="Role name">
  <input id="candidateName" value="Acme" placeholder="Candidate name">
</div>
<div class="row">
  <input id="roleDescription" class="wide" value="Hiring Senior Java dev" placeholder="Role description">
</div>
<div class="row">
  <label>Choose avatar:</label>
  {avatars_html}
</div>
<div class="row">
  <button id="start">Start Session</button>
  <span id="error" class="error"></span>
</div>
{SESSION_FRAME}"#
    );

    Html(page(
        "Bey Avatar Embed",
        &body,
        &bey.embed_base_url,
        INDEX_SCRIPT,
    ))
}

/// GET /avatar: embed the session of an existing agent.
pub async fn avatar(State(state): State<AppState>) -> Html<String> {
    let body = format!(
        r#"<h1>Use Existing Avatar</h1>
<div class="row">
  <input id="agentId" class="medium" placeholder="Enter Avatar ID">
  <button id="use">Use Avatar</button>
  <span id="error" class="error"></span>
</div>
{SESSION_FRAME}"#
    );
    Html(page(
        "Use Existing Avatar",
        &body,
        &state.config.bey.embed_base_url,
        AVATAR_SCRIPT,
    ))
}

/// GET /fetch-output: fetch and render an agent's latest output.
pub async fn fetch_output(State(state): State<AppState>) -> Html<String> {
    let body = r#"<h1>Fetch Output</h1>
<div class="row">
  <input id="agentId" class="medium" placeholder="Enter Agent ID">
  <button id="fetch">Fetch Output</button>
  <span id="error" class="error"></span>
</div>
<pre id="output" hidden></pre>"#;
    Html(page(
        "Fetch Output",
        body,
        &state.config.bey.embed_base_url,
        FETCH_SCRIPT,
    ))
}

// ── helpers ─────────────────────────────────────────────────────────

fn page(title: &str, body: &str, embed_base: &str, script: &str) -> String {
    let title = escape_html(title);
    let embed_base = script_string(embed_base.trim_end_matches('/'));
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>
  body {{ font-family: Arial, Helvetica, sans-serif; padding: 40px; margin: 0; }}
  nav {{ margin-bottom: 24px; }}
  nav a {{ margin-right: 16px; color: #1f6feb; text-decoration: none; }}
  .row {{ display: flex; gap: 8px; align-items: center; margin-bottom: 12px; }}
  input {{ padding: 8px; width: 220px; }}
  input.medium {{ width: 320px; }}
  input.wide {{ width: 460px; }}
  input[type=radio] {{ width: auto; }}
  button {{ padding: 8px 12px; }}
  .error {{ color: crimson; margin-left: 12px; }}
  .frame {{ width: 100%; height: 600px; border-radius: 8px; overflow: hidden; box-shadow: 0 8px 24px rgba(0,0,0,.12); }}
  .frame iframe {{ width: 100%; height: 100%; border: 0; }}
  pre {{ margin-top: 24px; background: #f6f6f6; padding: 16px; border-radius: 8px; }}
</style>
</head>
<body>
<nav><a href="/">Create</a><a href="/avatar">Existing avatar</a><a href="/fetch-output">Fetch output</a></nav>
<main>
{body}
</main>
<script>const EMBED_BASE = {embed_base};</script>
<script>{script}</script>
</body>
</html>"#
    )
}

fn avatar_radios(avatars: &[AvatarChoice], default_id: &str) -> String {
    avatars
        .iter()
        .map(|a| {
            let checked = if a.id == default_id { " checked" } else { "" };
            format!(
                r#"<label><input type="radio" name="avatar" value="{}"{checked}> {}</label>"#,
                escape_html(&a.id),
                escape_html(&a.label),
            )
        })
        .collect::<Vec<_>>()
        .join("\n  ")
}

/// Escape text for HTML element content and double-quoted attributes.
pub fn escape_html(raw: &str) -> String {
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

/// A JSON string literal that is safe inside an inline `<script>`.
fn script_string(raw: &str) -> String {
    serde_json::Value::String(raw.to_owned())
        .to_string()
        .replace("</", "<\\/")
}

const SESSION_FRAME: &str = r#"<div id="session" hidden>
  <h2>Live Session</h2>
  <div class="frame">
    <iframe id="frame" title="Bey Avatar" allow="camera; microphone; autoplay; encrypted-media; fullscreen" allowfullscreen></iframe>
  </div>
</div>"#;

const INDEX_SCRIPT: &str = r#"
const startBtn = document.getElementById('start');
const errorEl = document.getElementById('error');
startBtn.addEventListener('click', async () => {
  startBtn.disabled = true;
  startBtn.textContent = 'Starting...';
  errorEl.textContent = '';
  try {
    const checked = document.querySelector('input[name=avatar]:checked');
    const resp = await fetch('/api/create-agent', {
      method: 'POST',
      headers: { 'content-type': 'application/json' },
      body: JSON.stringify({
        roleName: document.getElementById('roleName').value,
        roleDescription: document.getElementById('roleDescription').value,
        candidateName: document.getElementById('candidateName').value,
        avatarId: checked ? checked.value : undefined,
      }),
    });
    const data = await resp.json();
    if (!resp.ok) throw new Error(data.error || 'failed');
    document.getElementById('frame').src = `${EMBED_BASE}/${encodeURIComponent(data.agentId)}`;
    document.getElementById('session').hidden = false;
  } catch (e) {
    errorEl.textContent = String(e);
  } finally {
    startBtn.disabled = false;
    startBtn.textContent = 'Start Session';
  }
});
"#;

const AVATAR_SCRIPT: &str = r#"
document.getElementById('use').addEventListener('click', () => {
  const id = document.getElementById('agentId').value.trim();
  const errorEl = document.getElementById('error');
  if (!id) {
    errorEl.textContent = 'Please enter an avatar ID';
    return;
  }
  errorEl.textContent = '';
  document.getElementById('frame').src = `${EMBED_BASE}/${encodeURIComponent(id)}`;
  document.getElementById('session').hidden = false;
});
"#;

const FETCH_SCRIPT: &str = r#"
const fetchBtn = document.getElementById('fetch');
const errorEl = document.getElementById('error');
const outputEl = document.getElementById('output');
fetchBtn.addEventListener('click', async () => {
  errorEl.textContent = '';
  outputEl.hidden = true;
  fetchBtn.disabled = true;
  fetchBtn.textContent = 'Fetching...';
  try {
    const resp = await fetch('/api/fetch-output', {
      method: 'POST',
      headers: { 'content-type': 'application/json' },
      body: JSON.stringify({ agentId: document.getElementById('agentId').value }),
    });
    const data = await resp.json();
    if (!resp.ok) throw new Error(data.error || 'failed');
    outputEl.textContent = JSON.stringify(data.output, null, 2);
    outputEl.hidden = false;
  } catch (e) {
    errorEl.textContent = String(e);
  } finally {
    fetchBtn.disabled = false;
    fetchBtn.textContent = 'Fetch Output';
  }
});
"#;
