use super::*;

fn thread_pages(count: u32, floors_per_page: u32) -> HashMap<u32, String> {
    (1..=count)
        .map(|page| (page, numbered_page(page, floors_per_page)))
        .collect()
}

#[tokio::test]
async fn test_parse_page_returns_floors_in_document_order() {
    let pages = Arc::new(StubPageSource::new(thread_pages(1, 3)));
    let (archiver, sink) = create_test_archiver(Config::default(), pages);

    let floors = archiver
        .parse_page("https://tieba.baidu.com/p/100?pn=1")
        .await
        .unwrap();

    let labels: Vec<_> = floors.iter().map(|f| f.label.as_str()).collect();
    assert_eq!(labels, vec!["1楼", "2楼", "3楼"]);
    assert_eq!(floors[0].author, "page-1");

    let events = sink.events();
    assert!(matches!(events[0], Event::PageCrawled { .. }));
    assert!(matches!(events[1], Event::PageProcessed { floors: 3, .. }));
}

#[tokio::test]
async fn test_parse_page_rejects_malformed_url() {
    let pages = Arc::new(StubPageSource::new(HashMap::new()));
    let (archiver, _sink) = create_test_archiver(Config::default(), pages.clone());

    let err = archiver.parse_page("not a url").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedUrl);
    assert_eq!(pages.fetches.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_crawl_order_is_stable_under_random_delays() {
    let expected: Vec<Floor> = {
        let pages = Arc::new(StubPageSource::new(thread_pages(9, 2)));
        let (archiver, _sink) = create_test_archiver(Config::default(), pages);
        let mut floors = Vec::new();
        for page in 1..=9 {
            let url = format!("https://tieba.baidu.com/p/100?pn={page}");
            floors.extend(archiver.parse_page(&url).await.unwrap());
        }
        floors
    };
    assert_eq!(expected.len(), 18);

    for _ in 0..5 {
        let pages = Arc::new(StubPageSource::new(thread_pages(9, 2)).with_random_delay(30));
        let (archiver, _sink) = create_test_archiver(Config::default(), pages);

        let floors = archiver
            .crawl_thread("https://tieba.baidu.com/p/100", 1, 9)
            .await
            .unwrap();
        assert_eq!(floors, expected);
    }
}

#[tokio::test]
async fn test_crawl_bounds_in_flight_pages_to_batch_size() {
    let pages = Arc::new(StubPageSource::new(thread_pages(7, 1)).with_random_delay(20));
    let (archiver, _sink) = create_test_archiver(Config::default(), pages.clone());

    let floors = archiver
        .crawl_thread("https://tieba.baidu.com/p/100", 1, 7)
        .await
        .unwrap();

    assert_eq!(floors.len(), 7);
    assert_eq!(pages.fetches.load(Ordering::SeqCst), 7);
    assert!(pages.max_in_flight.load(Ordering::SeqCst) <= 3);
}

#[tokio::test]
async fn test_crawl_batch_size_is_configurable() {
    let pages = Arc::new(StubPageSource::new(thread_pages(6, 1)).with_random_delay(20));
    let mut config = Config::default();
    config.crawl.page_batch_size = 1;
    let (archiver, _sink) = create_test_archiver(config, pages.clone());

    archiver
        .crawl_thread("https://tieba.baidu.com/p/100", 1, 6)
        .await
        .unwrap();

    assert_eq!(pages.max_in_flight.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_crawl_empty_range_fetches_nothing() {
    let pages = Arc::new(StubPageSource::new(thread_pages(3, 1)));
    let (archiver, sink) = create_test_archiver(Config::default(), pages.clone());

    let floors = archiver
        .crawl_thread("https://tieba.baidu.com/p/100", 5, 4)
        .await
        .unwrap();

    assert!(floors.is_empty());
    assert_eq!(pages.fetches.load(Ordering::SeqCst), 0);
    assert!(matches!(
        sink.events().last(),
        Some(Event::ThreadCrawled { floors: 0, .. })
    ));
}

#[tokio::test]
async fn test_crawl_fails_when_a_page_is_missing_author() {
    let mut pages = thread_pages(4, 2);
    let broken = floor_html("1楼", "x", "body").replace("p_author_name", "anonymous");
    pages.insert(3, page_html(&[broken]));
    let pages = Arc::new(StubPageSource::new(pages).with_random_delay(10));
    let (archiver, sink) = create_test_archiver(Config::default(), pages);

    let err = archiver
        .crawl_thread("https://tieba.baidu.com/p/100", 1, 4)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::MissingField);
    assert!(
        !sink
            .events()
            .iter()
            .any(|e| matches!(e, Event::ThreadCrawled { .. }))
    );
}

#[tokio::test]
async fn test_crawl_fails_when_a_page_cannot_be_fetched() {
    let pages = Arc::new(StubPageSource::new(thread_pages(2, 1)));
    let (archiver, _sink) = create_test_archiver(Config::default(), pages.clone());

    let err = archiver
        .crawl_thread("https://tieba.baidu.com/p/100", 1, 4)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::FetchFailed);
    // The whole second batch (page 4) was never dispatched
    assert_eq!(pages.fetches.load(Ordering::SeqCst), 3);
}

#[test]
fn test_page_url_appends_page_parameter() {
    let thread = Url::parse("https://tieba.baidu.com/p/100").unwrap();
    assert_eq!(
        page_url(&thread, "pn", 3).as_str(),
        "https://tieba.baidu.com/p/100?pn=3"
    );
}

#[test]
fn test_page_url_replaces_existing_page_parameter() {
    let thread = Url::parse("https://tieba.baidu.com/p/100?pn=9&see_lz=1").unwrap();
    assert_eq!(
        page_url(&thread, "pn", 2).as_str(),
        "https://tieba.baidu.com/p/100?see_lz=1&pn=2"
    );
}

#[tokio::test]
async fn test_crawl_against_http_server() {
    use wiremock::matchers::query_param;

    let mock_server = MockServer::start().await;
    for page in 1..=2u32 {
        Mock::given(method("GET"))
            .and(path("/p/555"))
            .and(query_param("pn", page.to_string()))
            .respond_with(ResponseTemplate::new(200).set_body_string(numbered_page(page, 2)))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let archiver = TiebaArchiver::new(Config::default())
        .unwrap()
        .with_event_sink(Arc::new(MemorySink::new()));
    let floors = archiver
        .crawl_thread(&format!("{}/p/555", mock_server.uri()), 1, 2)
        .await
        .unwrap();

    let authors: Vec<_> = floors.iter().map(|f| f.author.as_str()).collect();
    assert_eq!(authors, vec!["page-1", "page-1", "page-2", "page-2"]);
}
