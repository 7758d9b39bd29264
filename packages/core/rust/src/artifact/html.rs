/* packages/core/rust/src/artifact/html.rs */

// Browsable index of the route list. Self-contained: inline styles only,
// no scripts, safe to serve as a static file.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::collection::RouteCollection;
use crate::escape::escape_html;

const STYLE: &str = "body{font-family:system-ui,sans-serif;margin:2rem auto;max-width:48rem;\
padding:0 1rem;color:#1f2328}\
h1{display:flex;align-items:center;gap:.5rem;font-size:1.5rem}\
.badge{background:#0969da;color:#fff;border-radius:1rem;padding:.1rem .6rem;font-size:.9rem}\
ul{list-style:none;padding:0}li{border-bottom:1px solid #d0d7de;padding:.4rem 0}\
a{color:#0969da;text-decoration:none;font-family:ui-monospace,monospace}\
footer{color:#656d76;font-size:.85rem;margin-top:1.5rem}";

pub fn render_index_html(
  collection: &RouteCollection,
  data_file: &str,
  generated_at: DateTime<Utc>,
) -> String {
  let count = collection.len();
  let noun = if count == 1 { "route" } else { "routes" };
  let iso = generated_at.to_rfc3339_opts(SecondsFormat::Secs, true);
  let human = generated_at.format("%Y-%m-%d %H:%M:%S UTC");
  let data_file = escape_html(data_file);

  let mut html = String::from(
    "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">\
     <meta name=\"viewport\" content=\"width=device-width,initial-scale=1\">\
     <title>Application routes</title>",
  );
  html.push_str(&format!("<style>{STYLE}</style></head><body>"));
  html.push_str(&format!(
    "<h1>Application routes <span class=\"badge\" title=\"{count} {noun}\">{count}</span></h1>"
  ));
  html.push_str("<ul>");
  for route in collection.iter() {
    let route = escape_html(route);
    html.push_str(&format!("<li><a href=\"{route}\">{route}</a></li>"));
  }
  html.push_str("</ul>");
  html.push_str(&format!(
    "<footer>Generated <time datetime=\"{iso}\">{human}</time> \u{b7} \
     <a href=\"./{data_file}\">{data_file}</a></footer>"
  ));
  html.push_str("</body></html>\n");
  html
}
