//! Per-article extraction
//!
//! One candidate link moves through a fixed sequence: navigate, classify the
//! resolved URL, read the required fields, resolve an illustrative photo,
//! persist. Three outcomes are possible and every candidate reaches exactly
//! one of them: the article was persisted, the link was recorded as a
//! redirect, or extraction failed and the link was skipped.

use crate::harvest::navigate_with_refresh;
use crate::images::ImageStore;
use crate::session::{Session, SessionError};
use crate::storage::{ArticleRecord, Store};
use crate::Result;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Article headline
const TITLE_SELECTOR: &str = ".wiadTit";

/// Lead paragraph
const LEAD_SELECTOR: &str = ".WiadomoscLead";

/// Combined author/date block
const BYLINE_SELECTOR: &str = ".wiadSzczegol";

/// Separates author from date inside the byline block
const BYLINE_DELIMITER: char = '⚫';

/// Primary photo selector, tried first
const ARTICLE_PHOTO_SELECTOR: &str = "img.fotoWiadomosc";

/// Main content container, searched for an image when the primary selector
/// finds nothing
const MAIN_CONTENT_SELECTOR: &str = "#main-1";

/// Photo field value when no image could be located
pub const NO_PHOTO: &str = "No photo";

/// Terminal state of one candidate link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractOutcome {
    /// A new article record was written (or the link was already recorded)
    Persisted,

    /// The navigation resolved to a different URL; a redirect record was
    /// written instead
    Redirected,

    /// A required field was missing; the link was skipped
    Failed,
}

/// Why extraction of a single article was abandoned
///
/// Scoped to the current link: the orchestration loop continues with the
/// next candidate. Session infrastructure failures are kept separate so
/// they can propagate and terminate the run.
#[derive(Debug, Error)]
enum ExtractError {
    #[error("required element missing: {selector}")]
    MissingField { selector: String },

    #[error("byline did not split into author and date: {text:?}")]
    MalformedByline { text: String },

    #[error(transparent)]
    Session(SessionError),
}

/// The required article fields, read before anything is persisted
struct ArticleFields {
    topic: String,
    lead: String,
    author: String,
    date: String,
}

/// Runs the extraction sequence for one candidate link
pub async fn extract_article<S: Session>(
    session: &mut S,
    store: &mut dyn Store,
    images: &ImageStore,
    link: &str,
    tag: &str,
    settle: Duration,
) -> Result<ExtractOutcome> {
    navigate_with_refresh(session, link, settle).await?;

    // Exact string comparison, no normalization: a resolved URL that differs
    // in any way classifies the link as a redirect.
    let current = session.current_url().unwrap_or("");
    if current != link {
        tracing::info!(requested = link, resolved = current, "page was redirected");
        store.insert_redirect(link)?;
        return Ok(ExtractOutcome::Redirected);
    }

    let fields = match read_fields(session) {
        Ok(fields) => fields,
        Err(ExtractError::Session(e)) => return Err(e.into()),
        Err(e) => {
            tracing::warn!(link, error = %e, "extraction failed, skipping link");
            return Ok(ExtractOutcome::Failed);
        }
    };

    let photo = match resolve_photo(session)? {
        PhotoOutcome::Found { url, filename } => {
            if let Err(e) = images.download(&url, &filename).await {
                // Download failure never blocks persistence
                tracing::warn!(link, url = %url, error = %e, "photo download failed");
            }
            filename
        }
        PhotoOutcome::NotFound => {
            tracing::info!(link, "no photo found for this article");
            NO_PHOTO.to_string()
        }
    };

    let record = ArticleRecord {
        link: link.to_string(),
        tag: tag.to_string(),
        date: fields.date,
        topic: fields.topic,
        photo,
        lead: fields.lead,
        author: fields.author,
    };

    tracing::debug!(link, topic = %record.topic, author = %record.author, "persisting article");
    store.insert_article(&record)?;

    Ok(ExtractOutcome::Persisted)
}

/// Reads the required fields from the current page
fn read_fields<S: Session>(session: &S) -> std::result::Result<ArticleFields, ExtractError> {
    let topic = require(session, TITLE_SELECTOR)?.text().to_string();
    let lead = require(session, LEAD_SELECTOR)?.text().to_string();

    let byline = require(session, BYLINE_SELECTOR)?;
    let (author, date) =
        split_byline(byline.text()).ok_or_else(|| ExtractError::MalformedByline {
            text: byline.text().to_string(),
        })?;

    Ok(ArticleFields {
        topic,
        lead,
        author,
        date,
    })
}

fn require<S: Session>(
    session: &S,
    selector: &str,
) -> std::result::Result<crate::session::Element, ExtractError> {
    session.find_element(selector).map_err(|e| match e {
        SessionError::ElementNotFound { selector } => ExtractError::MissingField { selector },
        other => ExtractError::Session(other),
    })
}

/// Splits the byline block into (author, date)
///
/// Only the first two delimiter-separated components count; anything after
/// them is ignored.
fn split_byline(text: &str) -> Option<(String, String)> {
    let mut parts = text.split(BYLINE_DELIMITER).map(str::trim);
    let author = parts.next()?;
    let date = parts.next()?;
    Some((author.to_string(), date.to_string()))
}

/// Where the photo resolution ended up
enum PhotoOutcome {
    Found { url: String, filename: String },
    NotFound,
}

/// One way of locating the article photo
enum PhotoStrategy {
    /// A selector matched anywhere on the page
    Page { selector: &'static str },

    /// An element found inside a containing element
    Within {
        container: &'static str,
        selector: &'static str,
    },
}

/// The fallback chain, in precedence order; the first strategy that finds
/// an image wins and the rest are never consulted
const PHOTO_STRATEGIES: &[PhotoStrategy] = &[
    PhotoStrategy::Page {
        selector: ARTICLE_PHOTO_SELECTOR,
    },
    PhotoStrategy::Within {
        container: MAIN_CONTENT_SELECTOR,
        selector: "img",
    },
];

impl PhotoStrategy {
    fn locate<S: Session>(&self, session: &S) -> std::result::Result<Option<String>, SessionError> {
        match self {
            PhotoStrategy::Page { selector } => match session.find_element(selector) {
                Ok(element) => Ok(element.attr("src").map(str::to_string)),
                Err(SessionError::ElementNotFound { .. }) => Ok(None),
                Err(e) => Err(e),
            },
            PhotoStrategy::Within {
                container,
                selector,
            } => match session.find_element(container) {
                Ok(element) => Ok(element
                    .find_element(selector)
                    .and_then(|img| img.attr("src").map(str::to_string))),
                Err(SessionError::ElementNotFound { .. }) => Ok(None),
                Err(e) => Err(e),
            },
        }
    }
}

/// Resolves the article photo through the fallback chain
fn resolve_photo<S: Session>(session: &S) -> std::result::Result<PhotoOutcome, SessionError> {
    let base = session.current_url().and_then(|url| Url::parse(url).ok());

    for strategy in PHOTO_STRATEGIES {
        if let Some(src) = strategy.locate(session)? {
            let url = resolve_src(base.as_ref(), &src);
            let filename = image_filename(&url);
            return Ok(PhotoOutcome::Found { url, filename });
        }
    }

    Ok(PhotoOutcome::NotFound)
}

fn resolve_src(base: Option<&Url>, src: &str) -> String {
    match base {
        Some(base) => base
            .join(src)
            .map(|url| url.to_string())
            .unwrap_or_else(|_| src.to_string()),
        None => src.to_string(),
    }
}

/// The final path segment of the image URL, used as the stored filename
fn image_filename(url: &str) -> String {
    url.rsplit('/')
        .next()
        .map(str::to_string)
        .unwrap_or_else(|| url.to_string())
}
