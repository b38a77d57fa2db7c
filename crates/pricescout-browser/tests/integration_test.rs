use pricescout_browser::{ChromiumLauncher, ElementProperty, SessionProvider};
use pricescout_core::BrowserConfig;
use std::time::Duration;

#[tokio::test]
#[ignore] // Requires Chrome/Chromium installed
async fn test_session_lifecycle() {
    let launcher = ChromiumLauncher::new(BrowserConfig::default());
    let mut session = launcher.open().await.expect("launch chromium");

    let page = session.new_page().await.expect("open page");
    page.close().await.expect("close page");

    session.close().await.expect("close session");
    // Closing twice is a no-op
    session.close().await.expect("close session again");
}

#[tokio::test]
#[ignore] // Requires Chrome/Chromium installed
async fn test_extract_from_data_url() {
    let launcher = ChromiumLauncher::new(BrowserConfig::default());
    let mut session = launcher.open().await.expect("launch chromium");
    let page = session.new_page().await.expect("open page");

    page.navigate(concat!(
        "data:text/html,",
        "<div class='card'><a href='https://example.com/a'><span>First</span></a></div>",
        "<div class='card'><a href='https://example.com/b'><span>Second</span></a></div>",
    ))
    .await
    .expect("navigate");
    page.wait_for(".card", Duration::from_secs(5))
        .await
        .expect("cards present");

    let cards = page.query_all(".card").await.expect("query cards");
    assert_eq!(cards.len(), 2);

    let title = page
        .eval_on_element(&cards[1], "a span", ElementProperty::TextContent)
        .await
        .expect("title");
    assert_eq!(title, "Second");

    let href = page
        .eval_on_element(&cards[0], "a", ElementProperty::Href)
        .await
        .expect("href");
    assert_eq!(href, "https://example.com/a");

    assert!(page
        .eval_on_element(&cards[0], "img", ElementProperty::Src)
        .await
        .is_err());

    page.close().await.expect("close page");
    session.close().await.expect("close session");
}

#[tokio::test]
#[ignore] // Requires Chrome/Chromium installed
async fn test_handles_follow_nodes_after_rerender() {
    let launcher = ChromiumLauncher::new(BrowserConfig::default());
    let mut session = launcher.open().await.expect("launch chromium");
    let page = session.new_page().await.expect("open page");

    // Moves the second card to the top shortly after load
    page.navigate(concat!(
        "data:text/html,",
        "<div class='card'><span>First</span></div>",
        "<div class='card'><span>Second</span></div>",
        "<script>setTimeout(() => document.body.prepend(",
        "document.querySelectorAll('.card')[1]), 300)</script>",
    ))
    .await
    .expect("navigate");

    let cards = page.query_all(".card").await.expect("query cards");
    tokio::time::sleep(Duration::from_millis(800)).await;

    let first = page
        .eval_on_element(&cards[0], "span", ElementProperty::TextContent)
        .await
        .expect("first title");
    assert_eq!(first, "First");

    page.close().await.expect("close page");
    session.close().await.expect("close session");
}
