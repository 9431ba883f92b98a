//! Page session abstraction
//!
//! This module defines the narrow contract the harvester has with whatever
//! loads pages for it: navigate to a URL, report the URL the navigation
//! actually resolved to, query elements on the current page, inject cookies,
//! and refresh. The harvester never parses HTML itself; it only asks the
//! session for elements by selector.

mod http;

pub use http::HttpSession;

use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use thiserror::Error;

/// Errors raised by session operations
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Navigation timed out for {url}")]
    Timeout { url: String },

    #[error("Request failed for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Element not found: {selector}")]
    ElementNotFound { selector: String },

    #[error("Invalid selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },

    #[error("Invalid cookie '{name}': {message}")]
    InvalidCookie { name: String, message: String },

    #[error("No page loaded")]
    NoPage,

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Result type for session operations
pub type SessionResult<T> = Result<T, SessionError>;

/// A cookie injected into the session
#[derive(Debug, Clone)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub domain: String,
    pub path: String,
    pub secure: bool,
}

/// Contract for loading pages and querying their elements
///
/// One session is a process-wide shared resource: at most one page is loaded
/// at any instant, and navigation blocks until the load settles. All element
/// queries read the most recently loaded page.
#[async_trait]
pub trait Session {
    /// Loads the given URL, following redirects
    async fn navigate(&mut self, url: &str) -> SessionResult<()>;

    /// Reloads the current page
    async fn refresh(&mut self) -> SessionResult<()>;

    /// The URL the last navigation resolved to, if a page is loaded
    fn current_url(&self) -> Option<&str>;

    /// Adds a cookie that will be sent with subsequent requests
    fn add_cookie(&mut self, cookie: &Cookie) -> SessionResult<()>;

    /// Finds the first element matching the selector on the current page
    fn find_element(&self, selector: &str) -> SessionResult<Element>;

    /// Finds all elements matching the selector on the current page
    fn find_elements(&self, selector: &str) -> SessionResult<Vec<Element>>;
}

/// An element detached from the page it was found on
///
/// Holds the element's text, attributes, and inner markup, so nested lookups
/// (`find_element` / `find_elements`) can be answered without going back to
/// the session.
#[derive(Debug, Clone)]
pub struct Element {
    text: String,
    attrs: HashMap<String, String>,
    inner_html: String,
}

impl Element {
    /// The element's text content, trimmed
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The value of the named attribute, if present
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// Finds the first descendant matching the selector
    pub fn find_element(&self, selector: &str) -> Option<Element> {
        self.find_elements(selector).into_iter().next()
    }

    /// Finds all descendants matching the selector
    pub fn find_elements(&self, selector: &str) -> Vec<Element> {
        let parsed = match Selector::parse(selector) {
            Ok(p) => p,
            Err(_) => return Vec::new(),
        };
        let fragment = Html::parse_fragment(&self.inner_html);
        fragment
            .select(&parsed)
            .map(Element::from_element_ref)
            .collect()
    }

    pub(crate) fn from_element_ref(element: ElementRef<'_>) -> Self {
        Self {
            text: element.text().collect::<String>().trim().to_string(),
            attrs: element
                .value()
                .attrs()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
            inner_html: element.inner_html(),
        }
    }
}

/// Runs a selector query over a full HTML document
pub(crate) fn query_document(html: &str, selector: &str) -> SessionResult<Vec<Element>> {
    let parsed = Selector::parse(selector).map_err(|e| SessionError::InvalidSelector {
        selector: selector.to_string(),
        message: e.to_string(),
    })?;
    let document = Html::parse_document(html);
    Ok(document
        .select(&parsed)
        .map(Element::from_element_ref)
        .collect())
}
