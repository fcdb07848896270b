//! Shared test helpers for creating TiebaArchiver instances in tests.

use crate::archiver::{PageSource, TiebaArchiver};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::events::MemorySink;
use async_trait::async_trait;
use rand::Rng;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use url::Url;

/// Build the HTML of one floor container
pub(crate) fn floor_html(label: &str, author: &str, body: &str) -> String {
    format!(
        r#"<div class="l_post j_l_post">
             <div class="d_author"><a class="p_author_name j_user_card">{author}</a></div>
             <div class="d_post_content j_d_post_content">{body}</div>
             <div class="post-tail-wrap">
               <span class="tail-info">{label}</span>
               <span class="tail-info">2019-12-31 23:59</span>
             </div>
           </div>"#
    )
}

/// Build a thread page from floor containers
pub(crate) fn page_html(floors: &[String]) -> String {
    format!(
        "<!DOCTYPE html><html><body><div id=\"j_p_postlist\">{}</div></body></html>",
        floors.concat()
    )
}

/// Page `page` of a thread with `floors_per_page` floors, each authored by `page-{page}`
pub(crate) fn numbered_page(page: u32, floors_per_page: u32) -> String {
    let floors: Vec<String> = (1..=floors_per_page)
        .map(|i| {
            let label = format!("{}楼", (page - 1) * floors_per_page + i);
            floor_html(&label, &format!("page-{page}"), &format!("floor {i} of page {page}"))
        })
        .collect();
    page_html(&floors)
}

/// In-memory page source keyed by the `pn` query parameter
///
/// Optionally sleeps a random amount before answering so concurrent fetches
/// complete out of order.
pub(crate) struct StubPageSource {
    pages: HashMap<u32, String>,
    max_delay_ms: u64,
    in_flight: AtomicUsize,
    pub(crate) max_in_flight: AtomicUsize,
    pub(crate) fetches: AtomicUsize,
}

impl StubPageSource {
    pub(crate) fn new(pages: HashMap<u32, String>) -> Self {
        Self {
            pages,
            max_delay_ms: 0,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            fetches: AtomicUsize::new(0),
        }
    }

    pub(crate) fn with_random_delay(mut self, max_delay_ms: u64) -> Self {
        self.max_delay_ms = max_delay_ms;
        self
    }
}

fn page_number(url: &Url) -> Option<u32> {
    url.query_pairs()
        .find(|(key, _)| key == "pn")
        .and_then(|(_, value)| value.parse().ok())
}

#[async_trait]
impl PageSource for StubPageSource {
    async fn fetch(&self, url: &Url) -> Result<String> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if self.max_delay_ms > 0 {
            let delay = rand::thread_rng().gen_range(0..=self.max_delay_ms);
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        page_number(url)
            .and_then(|page| self.pages.get(&page).cloned())
            .ok_or_else(|| Error::FetchFailed {
                url: url.to_string(),
                reason: "HTTP 404".to_string(),
            })
    }
}

/// Archiver over a stub page source, recording events in memory
pub(crate) fn create_test_archiver(
    config: Config,
    pages: Arc<StubPageSource>,
) -> (TiebaArchiver, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::new());
    let archiver = TiebaArchiver::new(config)
        .unwrap()
        .with_page_source(pages)
        .with_event_sink(sink.clone());
    (archiver, sink)
}

/// Config whose content photos are fetched from `image_host`
pub(crate) fn config_with_image_host(image_host: &str) -> Config {
    let mut config = Config::default();
    config.site.image_host = format!("{}/forum/pic/item/", image_host.trim_end_matches('/'));
    config
}
