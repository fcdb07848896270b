//! Page parsing and batched thread crawling.

use futures::future::join_all;
use url::Url;

use crate::error::{Error, Result};
use crate::parser::{ParseContext, parse_page_html};
use crate::types::{Event, Floor};

use super::TiebaArchiver;

/// URL of page `page` of a thread
///
/// Any existing `param` pair is replaced; other query pairs are kept.
///
/// # Examples
///
/// ```
/// use tieba_archive::archiver::page_url;
/// use url::Url;
///
/// let thread = Url::parse("https://tieba.baidu.com/p/100?see_lz=1").unwrap();
/// assert_eq!(
///     page_url(&thread, "pn", 2).as_str(),
///     "https://tieba.baidu.com/p/100?see_lz=1&pn=2"
/// );
/// ```
pub fn page_url(thread_url: &Url, param: &str, page: u32) -> Url {
    let kept: Vec<(String, String)> = thread_url
        .query_pairs()
        .filter(|(key, _)| key != param)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut url = thread_url.clone();
    url.query_pairs_mut()
        .clear()
        .extend_pairs(kept)
        .append_pair(param, &page.to_string());
    url
}

impl TiebaArchiver {
    /// Fetch and parse one thread page
    ///
    /// # Errors
    ///
    /// - [`Error::MalformedUrl`] if `page_url` does not parse
    /// - [`Error::FetchFailed`] if the page cannot be fetched
    /// - [`Error::MissingField`] if any floor lacks required metadata
    pub async fn parse_page(&self, page_url: &str) -> Result<Vec<Floor>> {
        let url = Url::parse(page_url).map_err(|e| Error::malformed_url(page_url, e))?;
        self.parse_page_url(&url).await
    }

    pub(crate) async fn parse_page_url(&self, url: &Url) -> Result<Vec<Floor>> {
        let html = self.pages.fetch(url).await?;
        self.emit(Event::PageCrawled {
            url: url.to_string(),
        });

        let ctx = ParseContext {
            page_url: url,
            base_url: &self.base_url,
            site: &self.config.site,
            sink: self.sink.as_ref(),
        };
        let floors = parse_page_html(&html, &ctx)?;

        self.emit(Event::PageProcessed {
            url: url.to_string(),
            floors: floors.len(),
        });
        Ok(floors)
    }

    /// Crawl pages `from_page..=to_page` of a thread
    ///
    /// Pages are fetched in batches of `crawl.page_batch_size`: pages within a
    /// batch run concurrently, batches run one after another. Floors come back
    /// in page order then document order, whatever order the fetches finish in.
    ///
    /// Returns an empty list when `from_page > to_page`.
    ///
    /// # Errors
    ///
    /// The first failing page (in page order) fails the crawl. Pages already
    /// dispatched in the same batch still run to completion.
    pub async fn crawl_thread(
        &self,
        thread_url: &str,
        from_page: u32,
        to_page: u32,
    ) -> Result<Vec<Floor>> {
        let thread = Url::parse(thread_url).map_err(|e| Error::malformed_url(thread_url, e))?;
        let pages: Vec<u32> = (from_page..=to_page).collect();
        let batch_size = self.config.crawl.page_batch_size.max(1);

        let mut floors = Vec::new();
        for batch in pages.chunks(batch_size) {
            let urls: Vec<Url> = batch
                .iter()
                .map(|&page| page_url(&thread, &self.config.site.page_param, page))
                .collect();
            tracing::debug!(pages = ?batch, "dispatching page batch");

            let results = join_all(urls.iter().map(|url| self.parse_page_url(url))).await;
            for page_floors in results {
                floors.extend(page_floors?);
            }
        }

        self.emit(Event::ThreadCrawled {
            url: thread_url.to_string(),
            floors: floors.len(),
        });
        Ok(floors)
    }
}
