//! Page source: the I/O boundary the page parser reads through

use crate::error::{Error, Result};
use async_trait::async_trait;
use url::Url;

/// Something that can fetch the HTML of a thread page
///
/// [`HttpPageSource`] is the production implementation; tests substitute
/// in-memory sources to control content and timing.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch the HTML document at `url`
    ///
    /// # Errors
    ///
    /// Returns [`Error::FetchFailed`] on transport errors or non-2xx responses.
    async fn fetch(&self, url: &Url) -> Result<String>;
}

/// Fetches pages over HTTP with reqwest
#[derive(Clone, Debug)]
pub struct HttpPageSource {
    client: reqwest::Client,
}

impl HttpPageSource {
    /// Wrap an existing client
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn fetch(&self, url: &Url) -> Result<String> {
        let fetch_failed = |reason: String| Error::FetchFailed {
            url: url.to_string(),
            reason,
        };

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| fetch_failed(e.to_string()))?;

        // Check HTTP status before trying to read the response body
        let status = response.status();
        if !status.is_success() {
            return Err(fetch_failed(format!("HTTP {}", status.as_u16())));
        }

        response
            .text()
            .await
            .map_err(|e| fetch_failed(format!("failed to read body: {e}")))
    }
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn fetches_page_body() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/p/7"))
            .and(query_param("pn", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
            .mount(&mock_server)
            .await;

        let source = HttpPageSource::new(reqwest::Client::new());
        let url = Url::parse(&format!("{}/p/7?pn=2", mock_server.uri())).unwrap();
        assert_eq!(source.fetch(&url).await.unwrap(), "<html>ok</html>");
    }

    #[tokio::test]
    async fn non_success_status_is_fetch_failure() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/p/404"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let source = HttpPageSource::new(reqwest::Client::new());
        let url = Url::parse(&format!("{}/p/404", mock_server.uri())).unwrap();
        let err = source.fetch(&url).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FetchFailed);
        assert!(err.to_string().contains("HTTP 404"));
    }

    #[tokio::test]
    async fn connection_refused_is_fetch_failure() {
        // Bind and drop a listener to get a port nothing is serving on
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let source = HttpPageSource::new(reqwest::Client::new());
        let url = Url::parse(&format!("http://127.0.0.1:{port}/p/1")).unwrap();
        let err = source.fetch(&url).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FetchFailed);
    }
}
