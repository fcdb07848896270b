//! Mock forum server built on wiremock

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Serve `html` as page `page` of thread `thread_path`
pub async fn mount_page(server: &MockServer, thread_path: &str, page: u32, html: String) {
    Mock::given(method("GET"))
        .and(path(thread_path))
        .and(query_param("pn", page.to_string()))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "text/html; charset=utf-8")
                .set_body_string(html),
        )
        .expect(1)
        .mount(server)
        .await;
}

/// Serve `bytes` at `image_path`, expecting exactly `times` requests
pub async fn mount_image(server: &MockServer, image_path: &str, bytes: &[u8], times: u64) {
    Mock::given(method("GET"))
        .and(path(image_path))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(bytes.to_vec()))
        .expect(times)
        .mount(server)
        .await;
}
