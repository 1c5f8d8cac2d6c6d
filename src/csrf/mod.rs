use percent_encoding::percent_decode_str;
use reqwest::Method;
use tracing::debug;

use crate::config::DEFAULT_CSRF_COOKIE;

pub const CSRF_HEADER: &str = "X-CSRFToken";

pub fn cookie_value(cookie_header: &str, name: &str) -> Option<String> {
    if cookie_header.is_empty() || name.is_empty() {
        return None;
    }
    let prefix = format!("{name}=");
    let raw = cookie_header
        .split(';')
        .map(str::trim)
        .find_map(|pair| pair.strip_prefix(prefix.as_str()))?;
    if !escapes_well_formed(raw) {
        debug!("dropping {name} cookie with a malformed escape");
        return None;
    }
    match percent_decode_str(raw).decode_utf8() {
        Ok(value) => Some(value.into_owned()),
        Err(e) => {
            debug!("dropping undecodable {name} cookie: {e}");
            None
        }
    }
}

fn escapes_well_formed(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    bytes.iter().enumerate().all(|(i, &b)| {
        b != b'%'
            || bytes
                .get(i + 1..i + 3)
                .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit))
    })
}

pub fn csrf_token(cookie_header: &str) -> Option<String> {
    cookie_value(cookie_header, DEFAULT_CSRF_COOKIE)
}

pub fn is_safe_method(method: &str) -> bool {
    matches!(method, "HEAD" | "OPTIONS" | "TRACE")
}

pub fn is_same_origin(page_url: &reqwest::Url, target: &str) -> bool {
    match page_url.join(target.trim()) {
        Ok(resolved) => resolved.origin() == page_url.origin(),
        Err(_) => false,
    }
}

pub fn needs_token(method: &str, page_url: &reqwest::Url, target: &str) -> bool {
    !is_safe_method(method) && is_same_origin(page_url, target)
}

#[derive(Clone, Debug, Default)]
pub struct CookieSource {
    header: String,
    token_cookie: String,
}

impl CookieSource {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            token_cookie: DEFAULT_CSRF_COOKIE.to_string(),
        }
    }

    pub fn with_token_cookie(mut self, name: impl Into<String>) -> Self {
        self.token_cookie = name.into();
        self
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn token(&self) -> Option<String> {
        cookie_value(&self.header, &self.token_cookie)
    }
}

pub fn protect(
    builder: reqwest::RequestBuilder,
    method: &Method,
    page_url: &reqwest::Url,
    target: &str,
    cookies: &CookieSource,
) -> reqwest::RequestBuilder {
    if !needs_token(method.as_str(), page_url, target) {
        return builder;
    }
    match cookies.token() {
        Some(token) => builder.header(CSRF_HEADER, token),
        None => {
            debug!("no {} cookie for {method} {target}", cookies.token_cookie);
            builder
        }
    }
}
