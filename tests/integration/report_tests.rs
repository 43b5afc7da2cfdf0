use crate::support::{crawler, html, mount_status_site};
use futures::StreamExt;
use sitecheck::config::{load_config, CrawlerConfig};
use sitecheck::output::Ink;
use sitecheck::report::StatusClass;
use sitecheck::{HttpCrawler, Printer, PrinterOptions, Report, Site, SiteError};
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer};

fn render(sites: &[Site], options: PrinterOptions) -> String {
    let mut printer = Printer::with_writer(Vec::new(), options);
    printer.print(sites).unwrap();
    String::from_utf8(printer.into_inner()).unwrap()
}

#[tokio::test]
async fn test_status_site_end_to_end() {
    let server = MockServer::start().await;
    mount_status_site(&server).await;
    let base = server.uri();

    let mut report = Report::new(crawler()).for_urls([format!("{}/", base)]);
    report.fill().await;

    let site = &report.sites()[0];
    assert!(site.error().is_none(), "unexpected error: {:?}", site.error());
    assert_eq!(site.pages().len(), 1);

    let page = &site.pages()[0];
    assert_eq!(page.location(), format!("{}/", base));
    assert_eq!(page.link.status_code, 200);

    let mut codes: Vec<u16> = page.links.iter().map(|l| l.status_code).collect();
    codes.sort_unstable();
    assert_eq!(codes, vec![200, 301, 404]);

    let moved = page.links.iter().find(|l| l.status_code == 301).unwrap();
    assert!(moved.redirect.as_deref().is_some_and(|r| !r.is_empty()));
    assert!(page.links.iter().all(|l| l.internal));

    let missing = page.links.iter().find(|l| l.status_code == 404).unwrap();
    assert_eq!(missing.class(), StatusClass::Danger);
    assert_eq!(Ink::for_link(missing), Ink::Danger);
    let ok = page.links.iter().find(|l| l.status_code == 200).unwrap();
    assert_eq!(ok.class(), StatusClass::Success);

    let output = render(report.sites(), PrinterOptions::default());
    let expected = format!(
        "[200] {base}/\n    ├───[200] {base}/200\n    ├───[301] {base}/301 -> (Moved Permanently) -> /200\n    └───[404] {base}/404 -> (Not Found)\n"
    );
    assert_eq!(output, expected);

    let colored = render(
        report.sites(),
        PrinterOptions {
            colorize: true,
            ..PrinterOptions::default()
        },
    );
    let lines: Vec<&str> = colored.lines().collect();
    assert_eq!(lines.len(), 4);
    // same-host 2xx links use the shaded variant of success
    assert_eq!(lines[1], format!("\x1b[90m    ├───[200] {base}/200\x1b[0m"));
    assert!(lines[2].starts_with("\x1b[33m    ├───[301]"));
    assert_eq!(
        lines[3],
        format!("\x1b[1;31m    └───[404] {base}/404 -> (Not Found)\x1b[0m")
    );
}

#[tokio::test]
async fn test_malformed_entry_does_not_affect_other_sites() {
    let server = MockServer::start().await;
    mount_status_site(&server).await;
    let valid = format!("{}/", server.uri());

    let mut report = Report::new(crawler()).for_urls([valid.as_str(), "http://[::1"]);
    report.fill().await;

    let sites = report.sites();
    assert_eq!(sites.len(), 2);

    assert!(sites[0].error().is_none());
    assert_eq!(sites[0].pages().len(), 1);
    assert_eq!(sites[0].pages()[0].links.len(), 3);

    assert_eq!(sites[1].name(), "http://[::1");
    assert!(matches!(sites[1].error(), Some(SiteError::Parse { .. })));
    assert!(sites[1].pages().is_empty());

    let output = render(sites, PrinterOptions::default());
    let last = output.lines().last().unwrap();
    assert!(last.starts_with("report \"http://[::1\" has error"));
}

#[tokio::test]
async fn test_unreachable_entry_yields_empty_site() {
    let mut report = Report::new(crawler()).for_urls(["http://127.0.0.1:9/"]);
    report.fill().await;

    let site = &report.sites()[0];
    assert!(site.error().is_none());
    assert!(site.pages().is_empty());
}

#[tokio::test]
async fn test_pages_across_the_site() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(r#"<a href="/docs/">docs</a><a href="/blog">blog</a>"#))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/docs/"))
        .respond_with(html(r#"<a href="install">install</a><a href="/">home</a>"#))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/docs/install"))
        .respond_with(html(r#"<a href="/docs/">docs</a>"#))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/blog"))
        .respond_with(html("<p>no links</p>"))
        .mount(&server)
        .await;

    let base = server.uri();
    let mut report = Report::new(crawler()).for_urls([format!("{}/", base)]);
    report.fill().await;

    let site = &report.sites()[0];
    assert!(site.error().is_none());
    let mut pages: Vec<&str> = site.pages().iter().map(|p| p.location()).collect();
    pages.sort_unstable();
    assert_eq!(
        pages,
        vec![
            format!("{}/", base),
            format!("{}/docs/", base),
            format!("{}/docs/install", base),
        ]
    );

    let summary = report.summary();
    assert_eq!(summary.pages, 3);
    assert_eq!(summary.links, 5);
    assert_eq!(summary.success, 5);
}

#[tokio::test]
async fn test_stream_yields_every_site_once() {
    let first = MockServer::start().await;
    mount_status_site(&first).await;
    let second = MockServer::start().await;
    mount_status_site(&second).await;

    let urls = vec![
        format!("{}/", first.uri()),
        ":bad".to_string(),
        format!("{}/", second.uri()),
    ];
    let report = Report::new(crawler()).for_urls(urls.clone());

    let sites: Vec<Site> = report.stream().collect().await;
    assert_eq!(sites.len(), 3);

    let mut entries: Vec<&str> = sites.iter().map(|s| s.entry()).collect();
    entries.sort_unstable();
    let mut expected: Vec<&str> = urls.iter().map(String::as_str).collect();
    expected.sort_unstable();
    assert_eq!(entries, expected);
}

#[tokio::test]
async fn test_configured_user_agent_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("user-agent", "IntegrationBot/2.0"))
        .and(header("x-click-options", "anonymously"))
        .respond_with(html(r#"<a href="/">self</a>"#))
        .expect(1)
        .mount(&server)
        .await;

    let mut file = NamedTempFile::new().unwrap();
    file.write_all(
        br#"
[crawler]
user-agent = "IntegrationBot/2.0"
concurrency = 2
"#,
    )
    .unwrap();
    file.flush().unwrap();
    let config = load_config(file.path()).unwrap();
    assert_eq!(config.crawler.concurrency, 2);

    let crawler = HttpCrawler::new(CrawlerConfig {
        timeout_secs: 5,
        ..config.crawler
    });
    let mut report = Report::new(Some(Arc::new(crawler))).for_urls([format!("{}/", server.uri())]);
    report.fill().await;

    let site = &report.sites()[0];
    assert!(site.error().is_none());
    assert_eq!(site.pages().len(), 1);
    assert_eq!(site.pages()[0].link.status_code, 200);
}
