//! End-to-end harvest tests against a mock news site

use semafor::config::{Config, ListingPage, SiteConfig, StorageConfig};
use semafor::harvest::{run_harvest, NO_PHOTO};
use semafor::{ArticleRecord, LinkKind, SqliteStore, Store};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the mock server
fn test_config(base_url: &str, listings: Vec<ListingPage>, dirs: &TestDirs) -> Config {
    Config {
        site: SiteConfig {
            base_url: base_url.to_string(),
            user_agent: "SemaforTest/0.2".to_string(),
            settle_delay_ms: 0,
            cookies: vec![],
        },
        listings,
        storage: StorageConfig {
            database_path: dirs.db_path().to_string_lossy().into_owned(),
            images_dir: dirs.images_dir().to_string_lossy().into_owned(),
            download_timeout_secs: 5,
        },
    }
}

/// Temp locations for one test's database and images
struct TestDirs {
    root: TempDir,
}

impl TestDirs {
    fn new() -> Self {
        Self {
            root: TempDir::new().expect("failed to create temp dir"),
        }
    }

    fn db_path(&self) -> std::path::PathBuf {
        self.root.path().join("messages.db")
    }

    fn images_dir(&self) -> std::path::PathBuf {
        self.root.path().join("images")
    }

    fn open_store(&self) -> SqliteStore {
        SqliteStore::open(&self.db_path()).expect("failed to open store")
    }
}

fn listing(url: &str, tag: &str) -> ListingPage {
    ListingPage {
        url: url.to_string(),
        tag: tag.to_string(),
    }
}

fn listing_html(anchors: &[String]) -> String {
    let body: String = anchors
        .iter()
        .map(|href| format!(r#"<a href="{}">link</a>"#, href))
        .collect();
    format!(r#"<html><body><div class="listaWiadomosciv3">{}</div></body></html>"#, body)
}

fn article_html(photo_markup: &str) -> String {
    format!(
        r#"<html><body><div id="main-1">
            <h1 class="wiadTit">New rolling stock tender announced</h1>
            {photo_markup}
            <div class="WiadomoscLead">The operator has opened a tender.</div>
            <div class="wiadSzczegol">Jan Kowalski ⚫ 18.07.2023</div>
        </div></body></html>"#
    )
}

async fn mount_html(server: &MockServer, at: &str, html: String) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(html)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

fn sample_article(link: &str) -> ArticleRecord {
    ArticleRecord {
        link: link.to_string(),
        tag: "Business".to_string(),
        date: "17.07.2023".to_string(),
        topic: "Old news".to_string(),
        photo: NO_PHOTO.to_string(),
        lead: "Already harvested.".to_string(),
        author: "Anna Nowak".to_string(),
    }
}

#[tokio::test]
async fn test_scenario_known_article_known_redirect_one_new() {
    let server = MockServer::start().await;
    let base = server.uri();
    let dirs = TestDirs::new();

    // Listing: A, B, C, plus a comment-thread anchor that must be ignored
    mount_html(
        &server,
        "/business.html",
        listing_html(&[
            format!("{base}/a.html"),
            format!("{base}/b.html"),
            format!("{base}/c.html"),
            format!("{base}/c.html#disqus_thread"),
        ]),
    )
    .await;

    // C is a real article with a photo
    mount_html(
        &server,
        "/c.html",
        article_html(r#"<img class="fotoWiadomosc" src="/gfx/c.jpg">"#),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/gfx/c.jpg"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(vec![0xFF, 0xD8, 0xFF])
                .insert_header("content-type", "image/jpeg"),
        )
        .mount(&server)
        .await;

    // The store already knows A as an article and B as a redirect
    {
        let mut store = dirs.open_store();
        store
            .insert_article(&sample_article(&format!("{base}/a.html")))
            .unwrap();
        store.insert_redirect(&format!("{base}/b.html")).unwrap();
    }

    let config = test_config(
        &base,
        vec![listing(&format!("{base}/business.html"), "Business")],
        &dirs,
    );
    let report = run_harvest(config).await.expect("harvest failed");

    assert_eq!(report.totals.discovered, 3);
    assert_eq!(report.totals.duplicates, 2);
    assert_eq!(report.totals.persisted, 1);
    assert_eq!(report.totals.redirected, 0);
    assert_eq!(report.totals.failed, 0);

    let store = dirs.open_store();
    assert_eq!(store.count_articles().unwrap(), 2);

    let record = store
        .get_article(&format!("{base}/c.html"))
        .unwrap()
        .expect("article C should be persisted");
    assert_eq!(record.tag, "Business");
    assert_eq!(record.author, "Jan Kowalski");
    assert_eq!(record.photo, "c.jpg");

    // The photo landed in the image store
    let image = std::fs::read(dirs.images_dir().join("c.jpg")).expect("photo not downloaded");
    assert_eq!(image, vec![0xFF, 0xD8, 0xFF]);
}

#[tokio::test]
async fn test_second_run_persists_nothing_new() {
    let server = MockServer::start().await;
    let base = server.uri();
    let dirs = TestDirs::new();

    mount_html(
        &server,
        "/business.html",
        listing_html(&[format!("{base}/c.html")]),
    )
    .await;
    mount_html(&server, "/c.html", article_html("")).await;

    let listings = vec![listing(&format!("{base}/business.html"), "Business")];

    let first = run_harvest(test_config(&base, listings.clone(), &dirs))
        .await
        .expect("first run failed");
    assert_eq!(first.totals.persisted, 1);
    assert_eq!(first.totals.duplicates, 0);

    // Unchanged source, populated store: everything is a duplicate now
    let second = run_harvest(test_config(&base, listings, &dirs))
        .await
        .expect("second run failed");
    assert_eq!(second.totals.discovered, 1);
    assert_eq!(second.totals.duplicates, second.totals.discovered);
    assert_eq!(second.totals.persisted, 0);
    assert_eq!(second.totals.failed, 0);

    assert_eq!(dirs.open_store().count_articles().unwrap(), 1);
}

#[tokio::test]
async fn test_redirect_recorded_and_never_retried() {
    let server = MockServer::start().await;
    let base = server.uri();
    let dirs = TestDirs::new();

    mount_html(
        &server,
        "/business.html",
        listing_html(&[format!("{base}/d.html")]),
    )
    .await;

    // D moved; navigation resolves to the front page
    Mock::given(method("GET"))
        .and(path("/d.html"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/front.html"))
        .mount(&server)
        .await;
    mount_html(
        &server,
        "/front.html",
        "<html><body>front page</body></html>".to_string(),
    )
    .await;

    let listings = vec![listing(&format!("{base}/business.html"), "Business")];

    let first = run_harvest(test_config(&base, listings.clone(), &dirs))
        .await
        .expect("first run failed");
    assert_eq!(first.totals.redirected, 1);
    assert_eq!(first.totals.persisted, 0);

    let store = dirs.open_store();
    let redirects = store.fetch_links(LinkKind::Redirect).unwrap();
    assert!(redirects.contains(&format!("{base}/d.html")));
    assert_eq!(store.count_articles().unwrap(), 0);
    drop(store);

    // On the next run D is already known and never navigated again
    let second = run_harvest(test_config(&base, listings, &dirs))
        .await
        .expect("second run failed");
    assert_eq!(second.totals.duplicates, 1);
    assert_eq!(second.totals.redirected, 0);
    assert_eq!(dirs.open_store().count_redirects().unwrap(), 1);
}

#[tokio::test]
async fn test_photo_resolution_prefers_primary_selector() {
    let server = MockServer::start().await;
    let base = server.uri();
    let dirs = TestDirs::new();

    mount_html(
        &server,
        "/business.html",
        listing_html(&[format!("{base}/c.html")]),
    )
    .await;

    // Both the dedicated photo selector and a plain image inside the main
    // container are present; the dedicated selector must win
    mount_html(
        &server,
        "/c.html",
        article_html(
            r#"<img src="/gfx/secondary.jpg">
               <img class="fotoWiadomosc" src="/gfx/primary.jpg">"#,
        ),
    )
    .await;

    for image in ["/gfx/primary.jpg", "/gfx/secondary.jpg"] {
        Mock::given(method("GET"))
            .and(path(image))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0x01]))
            .mount(&server)
            .await;
    }

    let config = test_config(
        &base,
        vec![listing(&format!("{base}/business.html"), "Business")],
        &dirs,
    );
    run_harvest(config).await.expect("harvest failed");

    let record = dirs
        .open_store()
        .get_article(&format!("{base}/c.html"))
        .unwrap()
        .expect("article should be persisted");
    assert_eq!(record.photo, "primary.jpg");
}

#[tokio::test]
async fn test_missing_field_skips_link_and_run_continues() {
    let server = MockServer::start().await;
    let base = server.uri();
    let dirs = TestDirs::new();

    mount_html(
        &server,
        "/business.html",
        listing_html(&[format!("{base}/broken.html"), format!("{base}/good.html")]),
    )
    .await;

    // The broken article has no lead paragraph
    mount_html(
        &server,
        "/broken.html",
        r#"<html><body>
            <h1 class="wiadTit">Headline</h1>
            <div class="wiadSzczegol">Jan Kowalski ⚫ 18.07.2023</div>
        </body></html>"#
            .to_string(),
    )
    .await;
    mount_html(&server, "/good.html", article_html("")).await;

    let config = test_config(
        &base,
        vec![listing(&format!("{base}/business.html"), "Business")],
        &dirs,
    );
    let report = run_harvest(config).await.expect("harvest failed");

    assert_eq!(report.totals.discovered, 2);
    assert_eq!(report.totals.failed, 1);
    assert_eq!(report.totals.persisted, 1);

    let store = dirs.open_store();
    assert!(store
        .get_article(&format!("{base}/good.html"))
        .unwrap()
        .is_some());
    assert!(store
        .get_article(&format!("{base}/broken.html"))
        .unwrap()
        .is_none());

    // The failed link was skipped, not recorded anywhere
    assert!(!store
        .fetch_links(LinkKind::Redirect)
        .unwrap()
        .contains(&format!("{base}/broken.html")));
}

#[tokio::test]
async fn test_listing_without_container_yields_empty_pass() {
    let server = MockServer::start().await;
    let base = server.uri();
    let dirs = TestDirs::new();

    mount_html(
        &server,
        "/business.html",
        "<html><body>site maintenance</body></html>".to_string(),
    )
    .await;

    let config = test_config(
        &base,
        vec![listing(&format!("{base}/business.html"), "Business")],
        &dirs,
    );
    let report = run_harvest(config).await.expect("harvest failed");

    assert_eq!(report.totals.discovered, 0);
    assert_eq!(report.totals.persisted, 0);
    assert_eq!(report.listings.len(), 1);
    assert_eq!(dirs.open_store().count_articles().unwrap(), 0);
}
