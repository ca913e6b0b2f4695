//! Panel value codec: one opaque string per panel, `pathname[?query]`.
//!
//! DESIGN
//! ======
//! A panel value is the entire serialized location of one panel. It travels
//! as a single host query parameter, so the panel's own query string is
//! nested inside it and gets escaped a second time by the host serializer.
//! Query strings use `application/x-www-form-urlencoded` (`+` for space) and
//! keep insertion order; path params use component percent-encoding.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::PanelError;

#[cfg(test)]
#[path = "codec_test.rs"]
mod codec_test;

/// Named path parameters substituted into `$name` template tokens.
pub type Params = BTreeMap<String, String>;

/// Insertion-ordered query map with unique keys.
///
/// Re-inserting an existing key replaces its value in place, which matches
/// how an object-backed query map behaves when parsed from `a=1&a=2`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchParams(Vec<(String, String)>);

impl SearchParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a query string, tolerating a leading `?`.
    #[must_use]
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| match pair.split_once('=') {
                Some((key, value)) => (form_decode(key), form_decode(value)),
                None => (form_decode(pair), String::new()),
            })
            .collect()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.0.push((key, value)),
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        let idx = self.0.iter().position(|(k, _)| k == key)?;
        Some(self.0.remove(idx).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Order-insensitive view, for comparing two maps by content.
    #[must_use]
    pub fn to_map(&self) -> BTreeMap<String, String> {
        self.0.iter().cloned().collect()
    }

    /// Serialize without the leading `?`. Empty values are kept here; the
    /// panel value encoder filters them before calling this.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        self.0
            .iter()
            .map(|(k, v)| format!("{}={}", form_encode(k), form_encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SearchParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for SearchParams {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

/// A panel value split at its first `?`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodedValue<'a> {
    pub pathname: &'a str,
    /// Query part including the leading `?`, or empty.
    pub search: &'a str,
}

impl DecodedValue<'_> {
    /// Parsed query map, `None` when the value carried no query.
    #[must_use]
    pub fn search_params(&self) -> Option<SearchParams> {
        if self.search.is_empty() {
            return None;
        }
        Some(SearchParams::parse(self.search))
    }
}

/// Split a panel value into pathname and query. No slash normalization.
#[must_use]
pub fn decode_panel_value(value: &str) -> DecodedValue<'_> {
    match value.find('?') {
        Some(idx) => DecodedValue { pathname: &value[..idx], search: &value[idx..] },
        None => DecodedValue { pathname: value, search: "" },
    }
}

/// Build a panel value from a pathname and optional query map.
///
/// Empty-string values are dropped; when nothing remains the pathname is
/// returned unchanged.
#[must_use]
pub fn encode_panel_value(pathname: &str, search: Option<&SearchParams>) -> String {
    let Some(search) = search else {
        return pathname.to_owned();
    };
    let filtered = search.iter().filter(|(_, v)| !v.is_empty()).collect::<SearchParams>();
    if filtered.is_empty() {
        return pathname.to_owned();
    }
    format!("{pathname}?{}", filtered.to_query_string())
}

/// Substitute `$name` tokens in `template` with percent-encoded params.
///
/// A token runs from `$` to the next `/` or the end of the template.
///
/// # Errors
///
/// Returns [`PanelError::MissingParameter`] when the template references a
/// key that `params` does not supply (including when `params` is `None`).
pub fn resolve_template(template: &str, params: Option<&Params>) -> Result<String, PanelError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(idx) = rest.find('$') {
        out.push_str(&rest[..idx]);
        let after = &rest[idx + 1..];
        let end = after.find('/').unwrap_or(after.len());
        if end == 0 {
            out.push('$');
            rest = after;
            continue;
        }
        let key = &after[..end];
        let Some(value) = params.and_then(|p| p.get(key)) else {
            return Err(PanelError::MissingParameter {
                key: key.to_owned(),
                template: template.to_owned(),
                supplied: params.map_or_else(|| "{}".to_owned(), render_params),
            });
        };
        out.push_str(&urlencoding::encode(value));
        rest = &after[end..];
    }
    out.push_str(rest);
    Ok(out)
}

/// Build `path?k=v&...` from ordered entries, skipping `None` values.
pub fn build_href<'a, I>(path: &str, entries: I) -> String
where
    I: IntoIterator<Item = (&'a str, Option<&'a str>)>,
{
    let query = entries
        .into_iter()
        .filter_map(|(key, value)| value.map(|value| (key, value)))
        .collect::<SearchParams>();
    if query.is_empty() {
        return path.to_owned();
    }
    format!("{path}?{}", query.to_query_string())
}

/// Split an href into its pathname and parsed query. Fragments are dropped.
#[must_use]
pub fn parse_href(href: &str) -> (String, SearchParams) {
    let href = href.split_once('#').map_or(href, |(head, _)| head);
    let decoded = decode_panel_value(href);
    let pathname = if decoded.pathname.is_empty() { "/" } else { decoded.pathname };
    (pathname.to_owned(), SearchParams::parse(decoded.search))
}

/// Percent-encode a full panel value for use as a bare query parameter.
#[must_use]
pub(crate) fn encode_component(value: &str) -> Cow<'_, str> {
    urlencoding::encode(value)
}

fn render_params(params: &Params) -> String {
    serde_json::to_string(params).unwrap_or_else(|_| "{}".to_owned())
}

fn form_encode(raw: &str) -> String {
    urlencoding::encode(raw).replace("%20", "+")
}

fn form_decode(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    String::from_utf8_lossy(&urlencoding::decode_binary(spaced.as_bytes())).into_owned()
}
