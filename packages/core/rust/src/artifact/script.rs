/* packages/core/rust/src/artifact/script.rs */

use crate::collection::RouteCollection;

const HEADER: &str = "// Generated by pages-tree. Do not edit.\n";
const EXPORT_PREFIX: &str = "export const routes = ";

pub fn render_json(collection: &RouteCollection) -> serde_json::Result<String> {
  collection.to_json_pretty()
}

/// ES module exporting the collection as `routes` and as the default export.
pub fn render_script(collection: &RouteCollection) -> serde_json::Result<String> {
  let body = serde_json::to_string_pretty(collection)?;
  Ok(format!("{HEADER}{EXPORT_PREFIX}{body};\n\nexport default routes;\n"))
}

/// Recover the collection from a module written by [`render_script`].
pub fn parse_script(source: &str) -> Result<RouteCollection, String> {
  let start = source
    .find(EXPORT_PREFIX)
    .ok_or_else(|| "missing `export const routes` declaration".to_string())?;
  let rest = &source[start + EXPORT_PREFIX.len()..];
  let mut stream = serde_json::Deserializer::from_str(rest).into_iter::<RouteCollection>();
  match stream.next() {
    Some(Ok(collection)) => Ok(collection),
    Some(Err(e)) => Err(e.to_string()),
    None => Err("empty `routes` export".to_string()),
  }
}
