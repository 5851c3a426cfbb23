use crate::config::AppConfig;
use crate::fetcher::TimeSeriesFetcher;
use crate::model::{AppError, FetchError, Series, Timeframe};
use crate::parser::{ChartParser, Parser};

use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Daily candles from the Yahoo Finance chart endpoint.
pub struct YahooFetcher {
    client: Client,
    base_url: String,
    parser: ChartParser,
}

impl YahooFetcher {
    pub fn new(config: &AppConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self::with_client(client, &config.base_url))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            parser: ChartParser::new(),
        }
    }

    fn build_url(&self, ticker: &str, timeframe: Timeframe) -> String {
        format!(
            "{}/{}?range={}&interval=1d",
            self.base_url,
            ticker,
            timeframe.as_str()
        )
    }
}

#[async_trait::async_trait]
impl TimeSeriesFetcher for YahooFetcher {
    async fn fetch(&self, ticker: &str, timeframe: Timeframe) -> Result<Series, FetchError> {
        let url = self.build_url(ticker, timeframe);
        debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Transport(format!(
                "received status code {}",
                status.as_u16()
            )));
        }

        let body = response.text().await?;
        self.parser.parse(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    /// Serves one canned HTTP response on a local port. Yields the base URL
    /// and the request line the client sent.
    async fn serve_once(status: &str, body: &str) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let text = String::from_utf8_lossy(&request);
            let _ = tx.send(text.lines().next().unwrap_or_default().to_string());
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });

        (format!("http://{}/chart", addr), rx)
    }

    fn local_fetcher(base_url: &str) -> YahooFetcher {
        let client = Client::builder().no_proxy().build().unwrap();
        YahooFetcher::with_client(client, base_url)
    }

    #[tokio::test]
    async fn fetch_decodes_chart_body() {
        let body = r#"{"chart":{"result":[{"meta":{"gmtoffset":-18000},"timestamp":[1704205800,1704292200],"indicators":{"quote":[{"open":[187.15,184.22],"close":[185.64,184.25]}]}}],"error":null}}"#;
        let (base_url, request_line) = serve_once("200 OK", body).await;

        let series = local_fetcher(&base_url)
            .fetch("NVDA", Timeframe::OneYear)
            .await
            .unwrap();

        assert_eq!(series.timestamps, vec![1704205800, 1704292200]);
        assert_eq!(series.opens, vec![187.15, 184.22]);
        assert_eq!(series.closes, vec![185.64, 184.25]);
        assert_eq!(series.utc_offset_secs, -18000);
        assert!(
            request_line
                .await
                .unwrap()
                .starts_with("GET /chart/NVDA?range=1y&interval=1d ")
        );
    }

    #[tokio::test]
    async fn non_success_status_is_transport_error() {
        let (base_url, _) = serve_once("404 Not Found", r#"{"chart":{"result":null}}"#).await;

        match local_fetcher(&base_url).fetch("NOPE", Timeframe::YearToDate).await {
            Err(FetchError::Transport(msg)) => assert!(msg.contains("404"), "{}", msg),
            other => panic!("expected transport error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn malformed_body_is_decode_error() {
        let (base_url, _) = serve_once("200 OK", "<html>Too Many Requests</html>").await;

        assert!(matches!(
            local_fetcher(&base_url).fetch("SPY", Timeframe::FiveYears).await,
            Err(FetchError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn unreachable_host_is_transport_error() {
        // Bind then drop to get a port with nothing listening.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        assert!(matches!(
            local_fetcher(&format!("http://{}/chart", addr))
                .fetch("SPY", Timeframe::OneYear)
                .await,
            Err(FetchError::Transport(_))
        ));
    }

    #[test]
    fn builds_daily_range_url() {
        let fetcher = YahooFetcher::with_client(
            Client::new(),
            "https://query1.finance.yahoo.com/v8/finance/chart/",
        );
        let url = fetcher.build_url("NVDA", Timeframe::ThreeYears);

        assert_eq!(
            url,
            "https://query1.finance.yahoo.com/v8/finance/chart/NVDA?range=3y&interval=1d"
        );
    }

    #[test]
    fn uses_range_keyword_per_timeframe() {
        let fetcher = YahooFetcher::with_client(Client::new(), "http://localhost");
        assert!(fetcher.build_url("BRK-B", Timeframe::YearToDate).ends_with("BRK-B?range=ytd&interval=1d"));
        assert!(fetcher.build_url("MSFT", Timeframe::TenYears).contains("range=10y"));
    }

    #[test]
    fn builds_from_config() {
        let fetcher = YahooFetcher::new(&AppConfig::default()).unwrap();
        assert!(fetcher.base_url.contains("yahoo"));
    }
}
