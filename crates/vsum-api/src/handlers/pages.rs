//! Server-rendered HTML pages.
//!
//! Thin wrappers over the JSON endpoints: an upload form, a loading page
//! that polls `/results_ready`, and a results page with a seekable player.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use serde::Deserialize;
use tracing::warn;

use crate::error::ApiError;
use crate::handlers::results::{load_results, ResultsQuery, ResultsResponse};
use crate::metrics;
use crate::state::AppState;

const STYLE: &str = r#"
body{margin:0;min-height:100vh;background:linear-gradient(135deg,#5B21B6,#DB2777);
  font-family:'Segoe UI',sans-serif;display:flex;align-items:center;justify-content:center;padding:2rem;box-sizing:border-box}
.card{background:#fff;border-radius:12px;padding:2rem;max-width:880px;width:100%;box-shadow:0 10px 30px rgba(0,0,0,.2)}
h1,h2{color:#4C1D95}
input[type=text]{width:100%;padding:.75rem;border:1px solid #ccc;border-radius:8px;box-sizing:border-box}
button{margin-top:1rem;padding:.75rem 1.5rem;border:0;border-radius:8px;background:#7C3AED;color:#fff;cursor:pointer}
.msg{background:#FEE2E2;color:#991B1B;padding:.75rem;border-radius:8px;margin-bottom:1rem;text-align:center}
pre{white-space:pre-wrap;background:#F9FAFB;padding:1rem;border-radius:8px}
ul.chapters{list-style:none;padding:0}
ul.chapters li{display:flex;justify-content:space-between;align-items:center;padding:.5rem 0;border-bottom:1px solid #eee}
.spinner{width:80px;height:80px;margin:0 auto;border:8px solid rgba(124,58,237,.2);border-top-color:#7C3AED;border-radius:50%;animation:spin 1s linear infinite}
@keyframes spin{to{transform:rotate(360deg)}}
#player{width:100%;aspect-ratio:16/9}
"#;

/// Escape text for HTML element and attribute content.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Encode a string as a JavaScript literal safe inside `<script>`.
fn js_string(input: &str) -> String {
    serde_json::Value::String(input.to_string())
        .to_string()
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026")
}

fn page(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!doctype html>\n<html lang=\"es\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n{body}\n</body>\n</html>\n",
        escape_html(title)
    ))
}

fn loading_location(video_url: &str) -> String {
    format!("/loading?video_url={}", urlencoding::encode(video_url))
}

/// `GET /` sends visitors to the upload form.
pub async fn index() -> Redirect {
    Redirect::to("/upload")
}

fn upload_form(message: Option<&str>, youtube_url: &str) -> Html<String> {
    let message = message
        .map(|m| format!("<div class=\"msg\">{}</div>", escape_html(m)))
        .unwrap_or_default();
    page(
        "Análisis Inteligente de Videos",
        &format!(
            "<div class=\"card\">\n<h1>Análisis Inteligente de Videos</h1>\n{message}\n\
             <form method=\"post\" action=\"/upload\">\n\
             <input type=\"text\" name=\"youtube_url\" placeholder=\"https://www.youtube.com/watch?v=...\" value=\"{}\" required>\n\
             <button type=\"submit\">Subir</button>\n</form>\n</div>",
            escape_html(youtube_url)
        ),
    )
}

/// `GET /upload`
pub async fn upload_page() -> Html<String> {
    upload_form(None, "")
}

#[derive(Debug, Default, Deserialize)]
pub struct UploadForm {
    #[serde(default)]
    pub youtube_url: String,
}

/// `POST /upload`: run the upload, then send the browser to the loading page.
///
/// Failures re-render the form with the error message.
pub async fn upload_submit(State(state): State<AppState>, Form(form): Form<UploadForm>) -> Response {
    let url = form.youtube_url.trim();
    if url.is_empty() {
        return (StatusCode::BAD_REQUEST, upload_form(Some("URL inválida."), "")).into_response();
    }

    match state.uploads.upload(url).await {
        Ok(_) => {
            metrics::record_upload("ok");
            Redirect::to(&loading_location(url)).into_response()
        }
        Err(e) => {
            warn!(video_url = %url, error = %e, "Upload failed");
            metrics::record_upload("error");
            let err = ApiError::from(e);
            let message = format!("❌ {}", err.public_detail(state.config.is_production()));
            (err.status_code(), upload_form(Some(&message), url)).into_response()
        }
    }
}

/// `GET /loading`: spinner that polls readiness, then moves to `/results`.
pub async fn loading_page(
    State(state): State<AppState>,
    Query(query): Query<ResultsQuery>,
) -> Html<String> {
    let body = format!(
        r#"<div class="card" style="text-align:center">
<div class="spinner"></div>
<h2>Procesando, por favor espera…</h2>
</div>
<script>
const videoUrl = {video_url};
const pollMs = {poll_ms};
(function poll() {{
  fetch("/results_ready", {{ cache: "no-store" }})
    .then(r => {{
      if (r.status === 200) {{
        window.location = "/results?video_url=" + encodeURIComponent(videoUrl);
      }} else {{
        setTimeout(poll, pollMs);
      }}
    }})
    .catch(() => setTimeout(poll, pollMs));
}})();
</script>"#,
        video_url = js_string(&query.video_url),
        poll_ms = state.config.poll_interval_ms(),
    );
    page("Procesando…", &body)
}

fn render_results(results: &ResultsResponse) -> String {
    let mut body = String::from("<div class=\"card\">\n");

    if let Some(id) = &results.youtube_id {
        body.push_str(&format!(
            "<div id=\"player\" data-video-id=\"{}\"></div>\n",
            escape_html(id)
        ));
    }

    body.push_str(&format!(
        "<h2>Resumen (ES)</h2>\n<pre>{}</pre>\n<h2>Summary (EN)</h2>\n<pre>{}</pre>\n",
        escape_html(&results.summary_es),
        escape_html(&results.summary_en)
    ));

    body.push_str(&format!("<h2>Chapters ({})</h2>\n", results.chapters.len()));
    if results.chapters.is_empty() {
        body.push_str("<p>No se encontraron capítulos.</p>\n");
    } else {
        body.push_str("<ul class=\"chapters\">\n");
        for chapter in &results.chapters {
            let start = escape_html(&chapter.start);
            let marker = match chapter.start_seconds {
                Some(secs) => format!("<a href=\"#\" class=\"chap-link\" data-secs=\"{secs}\">{start}</a>"),
                None => start,
            };
            body.push_str(&format!(
                "<li><div>{marker}: <em>{}</em><br>{}</div></li>\n",
                escape_html(&chapter.title),
                escape_html(&chapter.description)
            ));
        }
        body.push_str("</ul>\n");
    }

    body.push_str(&format!(
        "<h2>Transcript</h2>\n<pre>{}</pre>\n</div>\n",
        escape_html(&results.transcript)
    ));

    if results.youtube_id.is_some() {
        body.push_str(
            r#"<script src="https://www.youtube.com/iframe_api"></script>
<script>
let player;
function onYouTubeIframeAPIReady() {
  const el = document.getElementById('player');
  player = new YT.Player('player', {
    videoId: el.dataset.videoId,
    playerVars: { autoplay: 0, controls: 1 }
  });
}
document.addEventListener('click', e => {
  if (e.target.matches('.chap-link')) {
    e.preventDefault();
    const sec = parseInt(e.target.dataset.secs, 10);
    if (player && player.seekTo) {
      player.seekTo(sec, true);
      player.playVideo();
    }
  }
});
</script>
"#,
        );
    }

    body
}

/// `GET /results`: rendered results, or back to the loading page if not ready.
pub async fn results_page(
    State(state): State<AppState>,
    Query(query): Query<ResultsQuery>,
) -> Response {
    match load_results(&state, &query.video_url).await {
        Ok(results) => page("Resultados", &render_results(&results)).into_response(),
        Err(ApiError::NotReady { .. }) => {
            Redirect::to(&loading_location(&query.video_url)).into_response()
        }
        Err(err) => {
            let body = format!(
                "<div class=\"card\"><div class=\"msg\">{}</div>\
                 <p><a href=\"{}\">Reintentar</a></p></div>",
                escape_html(&err.public_detail(state.config.is_production())),
                escape_html(&loading_location(&query.video_url))
            );
            (err.status_code(), page("Error", &body)).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::results::ChapterView;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<script>alert("x") & 'y'</script>"#),
            "&lt;script&gt;alert(&quot;x&quot;) &amp; &#x27;y&#x27;&lt;/script&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_js_string_cannot_close_script() {
        let encoded = js_string("</script><script>alert(1)</script>");
        assert!(!encoded.contains("</script>"));
        assert!(encoded.starts_with('"') && encoded.ends_with('"'));
    }

    #[test]
    fn test_loading_location_encodes_url() {
        assert_eq!(
            loading_location("https://youtu.be/abc?t=1"),
            "/loading?video_url=https%3A%2F%2Fyoutu.be%2Fabc%3Ft%3D1"
        );
    }

    #[test]
    fn test_render_results_escapes_and_links_chapters() {
        let results = ResultsResponse {
            summary_es: "<b>Hola</b>".into(),
            summary_en: "Hi".into(),
            chapters: vec![
                ChapterView {
                    start: "00:00:10".into(),
                    start_seconds: Some(10),
                    title: "Intro".into(),
                    description: "d".into(),
                },
                ChapterView {
                    start: "later".into(),
                    start_seconds: None,
                    title: "Outro".into(),
                    description: String::new(),
                },
            ],
            transcript: "full text".into(),
            source_video_url: "https://youtu.be/dQw4w9WgXcQ".into(),
            youtube_id: Some("dQw4w9WgXcQ".into()),
        };

        let html = render_results(&results);
        assert!(html.contains("&lt;b&gt;Hola&lt;/b&gt;"));
        assert!(html.contains("data-secs=\"10\""));
        assert!(html.contains("Chapters (2)"));
        assert!(html.contains("data-video-id=\"dQw4w9WgXcQ\""));
        assert!(!html.contains("data-secs=\"later\""));
    }

    #[test]
    fn test_render_results_without_chapters_or_player() {
        let results = ResultsResponse {
            summary_es: String::new(),
            summary_en: String::new(),
            chapters: vec![],
            transcript: String::new(),
            source_video_url: String::new(),
            youtube_id: None,
        };
        let html = render_results(&results);
        assert!(html.contains("No se encontraron capítulos."));
        assert!(!html.contains("iframe_api"));
    }
}
