//! HTTP-backed session implementation
//!
//! Loads pages with a cookie-jar-enabled reqwest client and answers element
//! queries by running scraper selectors over the fetched body. Redirects are
//! followed by the client, so `current_url` reports the URL the navigation
//! finally resolved to; the harvester compares that against the URL it
//! asked for to classify redirects.

use crate::session::{query_document, Cookie, Element, Session, SessionError, SessionResult};
use async_trait::async_trait;
use reqwest::cookie::Jar;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

const NAVIGATION_TIMEOUT: Duration = Duration::from_secs(30);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// A loaded page: the URL the request resolved to and its body
struct LoadedPage {
    url: String,
    body: String,
}

/// Session backed by plain HTTP fetches
pub struct HttpSession {
    client: Client,
    jar: Arc<Jar>,
    /// Last URL a navigation was asked for, even if the load failed;
    /// refresh retries this, the way a browser reloads its address bar
    requested: Option<String>,
    page: Option<LoadedPage>,
}

impl HttpSession {
    /// Creates a session with the given user agent
    pub fn new(user_agent: &str) -> SessionResult<Self> {
        let jar = Arc::new(Jar::default());
        let client = Client::builder()
            .user_agent(user_agent)
            .cookie_provider(Arc::clone(&jar))
            .timeout(NAVIGATION_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(SessionError::Client)?;

        Ok(Self {
            client,
            jar,
            requested: None,
            page: None,
        })
    }

    async fn load(&mut self, url: &str) -> SessionResult<()> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_request_error(url, e))?;

        let final_url = response.url().to_string();
        let body = response
            .text()
            .await
            .map_err(|e| classify_request_error(url, e))?;

        self.page = Some(LoadedPage {
            url: final_url,
            body,
        });
        Ok(())
    }
}

fn classify_request_error(url: &str, error: reqwest::Error) -> SessionError {
    if error.is_timeout() {
        SessionError::Timeout {
            url: url.to_string(),
        }
    } else {
        SessionError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}

#[async_trait]
impl Session for HttpSession {
    async fn navigate(&mut self, url: &str) -> SessionResult<()> {
        tracing::debug!(url, "navigating");
        self.requested = Some(url.to_string());
        self.load(url).await
    }

    async fn refresh(&mut self) -> SessionResult<()> {
        let url = self.requested.clone().ok_or(SessionError::NoPage)?;
        tracing::debug!(url = %url, "refreshing");
        self.load(&url).await
    }

    fn current_url(&self) -> Option<&str> {
        self.page.as_ref().map(|p| p.url.as_str())
    }

    fn add_cookie(&mut self, cookie: &Cookie) -> SessionResult<()> {
        // The jar needs a request URL to anchor the cookie to; derive one
        // from the cookie's own domain.
        let origin = format!("https://{}/", cookie.domain.trim_start_matches('.'));
        let origin = Url::parse(&origin).map_err(|e| SessionError::InvalidCookie {
            name: cookie.name.clone(),
            message: e.to_string(),
        })?;

        let mut header = format!(
            "{}={}; Domain={}; Path={}",
            cookie.name, cookie.value, cookie.domain, cookie.path
        );
        if cookie.secure {
            header.push_str("; Secure");
        }

        self.jar.add_cookie_str(&header, &origin);
        Ok(())
    }

    fn find_element(&self, selector: &str) -> SessionResult<Element> {
        self.find_elements(selector)?
            .into_iter()
            .next()
            .ok_or_else(|| SessionError::ElementNotFound {
                selector: selector.to_string(),
            })
    }

    fn find_elements(&self, selector: &str) -> SessionResult<Vec<Element>> {
        let page = self.page.as_ref().ok_or(SessionError::NoPage)?;
        query_document(&page.body, selector)
    }
}
