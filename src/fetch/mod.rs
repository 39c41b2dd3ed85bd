// src/fetch/mod.rs
use anyhow::{Context, Result};
use reqwest::Client;

/// Fetch `url` and return the response body as text.
///
/// One attempt only: a connection error or a non-2xx status is an error,
/// never retried. There is no request timeout either, so a stalled
/// upstream stalls the caller with it.
pub async fn page_text(client: &Client, url: &str) -> Result<String> {
    let resp = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("requesting {}", url))?
        .error_for_status()
        .with_context(|| format!("fetching {}", url))?;
    let body = resp
        .text()
        .await
        .with_context(|| format!("reading body of {}", url))?;
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use warp::Filter;

    #[tokio::test]
    async fn returns_body_text() {
        let stub = warp::any().map(|| "<html>hello</html>");
        let (addr, server) = warp::serve(stub).bind_ephemeral(([127, 0, 0, 1], 0));
        tokio::spawn(server);

        let client = Client::new();
        let body = page_text(&client, &format!("http://{}/page", addr))
            .await
            .unwrap();
        assert_eq!(body, "<html>hello</html>");
    }

    #[tokio::test]
    async fn non_2xx_is_an_error() {
        let stub = warp::any().map(|| {
            warp::reply::with_status("gone", warp::http::StatusCode::INTERNAL_SERVER_ERROR)
        });
        let (addr, server) = warp::serve(stub).bind_ephemeral(([127, 0, 0, 1], 0));
        tokio::spawn(server);

        let client = Client::new();
        let result = page_text(&client, &format!("http://{}/page", addr)).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn unreachable_host_is_an_error() {
        // Bind a port, note it, and release it again so the connect fails.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = Client::new();
        let result = page_text(&client, &format!("http://{}/page", addr)).await;
        assert!(result.is_err());
    }
}
