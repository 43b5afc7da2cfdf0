use std::sync::Arc;
use sitecheck::config::CrawlerConfig;
use sitecheck::{Crawler, HttpCrawler};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/html")
}

pub fn crawler() -> Option<Arc<dyn Crawler>> {
    Some(Arc::new(HttpCrawler::new(CrawlerConfig {
        timeout_secs: 5,
        ..CrawlerConfig::default()
    })))
}

/// Mounts a site whose root links to /200, /301 (redirecting to /200) and /404
pub async fn mount_status_site(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            r#"<html><body>
                <a href="/200">ok</a>
                <a href="/301">moved</a>
                <a href="/404">missing</a>
                <a href="/200#again">ok again</a>
            </body></html>"#,
        ))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/200"))
        .respond_with(ResponseTemplate::new(200).set_body_string("plain text"))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/301"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/200"))
        .mount(server)
        .await;
}
