use std::collections::HashSet;
use std::fs;
use std::path::Path;

use log::info;
use reqwest::{Client, Url};
use scraper::{Html, Selector};

use crate::error::{Error, Result};

pub const DEFAULT_URL_FILE: &str = "urls";

fn scan_error(url: &str, message: impl ToString) -> Error {
    Error::Scan {
        url: url.to_string(),
        message: message.to_string(),
    }
}

pub async fn fetch_html(client: &Client, url: &str) -> Result<String> {
    let response = client
        .get(url)
        .send()
        .await
        .and_then(|response| response.error_for_status())
        .map_err(|e| scan_error(url, format!("failed to send request: {}", e)))?;
    response
        .text()
        .await
        .map_err(|e| scan_error(url, format!("failed to get response text: {}", e)))
}

/// Links in `html` that point at pages on the same host as `base`, resolved
/// to absolute URLs without fragments. `base` comes first and the remaining
/// links keep their document order with duplicates removed.
pub fn extract_page_urls(html: &str, base: &Url) -> Vec<String> {
    let document = Html::parse_document(html);
    let link_selector = Selector::parse("a[href]").expect("static selector is valid");

    let mut base = base.clone();
    base.set_fragment(None);

    let mut seen = HashSet::new();
    let mut urls = Vec::new();
    seen.insert(base.to_string());
    urls.push(base.to_string());

    for element in document.select(&link_selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let Ok(mut link) = base.join(href.trim()) else {
            continue;
        };
        if !matches!(link.scheme(), "http" | "https") || link.host_str() != base.host_str() {
            continue;
        }
        link.set_fragment(None);

        let link = link.to_string();
        if seen.insert(link.clone()) {
            urls.push(link);
        }
    }

    urls
}

/// Build a URL file for `base_url` by collecting the pages it links to.
pub async fn scan_url(base_url: &str, output: &Path) -> Result<Vec<String>> {
    info!("Scanning for page URLs on '{}'.", base_url);

    let base = Url::parse(base_url).map_err(|e| scan_error(base_url, e))?;
    let client = Client::new();
    let html = fetch_html(&client, base.as_str()).await?;
    let urls = extract_page_urls(&html, &base);

    let mut contents = urls.join("\n");
    contents.push('\n');
    fs::write(output, contents).map_err(|source| Error::Output {
        path: output.to_path_buf(),
        source,
    })?;

    info!(
        "Scan complete. {} URLs logged to file: '{}'.",
        urls.len(),
        output.display()
    );
    Ok(urls)
}
