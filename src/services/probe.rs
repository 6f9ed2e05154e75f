//! Ad-hoc API probe: performs a single outbound HTTP request and captures
//! the exchange.
//!
//! The probe never fails: transport errors are folded into the response
//! shape with the elapsed time measured regardless of outcome.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method};

use crate::models::{ApiProbeRequest, ApiProbeResponse};

/// Stateless HTTP probe around a shared client.
#[derive(Clone)]
pub struct ApiProbe {
    client: Client,
    timeout: Option<Duration>,
}

impl ApiProbe {
    pub fn new(client: Client, timeout: Option<Duration>) -> Self {
        ApiProbe { client, timeout }
    }

    /// Execute one request. Only active params/headers are applied; GET
    /// requests carry no body even if one was supplied.
    pub async fn execute(&self, request: &ApiProbeRequest) -> ApiProbeResponse {
        let start = Instant::now();

        let method = match Method::from_bytes(request.method.to_uppercase().as_bytes()) {
            Ok(m) => m,
            Err(e) => return Self::failure(start, format!("invalid HTTP method: {}", e)),
        };

        let headers = match Self::build_headers(request) {
            Ok(h) => h,
            Err(message) => return Self::failure(start, message),
        };

        let params: Vec<(&str, &str)> = request.active_params().collect();

        let mut builder = self
            .client
            .request(method.clone(), &request.url)
            .headers(headers);
        if !params.is_empty() {
            builder = builder.query(&params);
        }
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if method != Method::GET
            && let Some(ref body) = request.body
        {
            builder = builder.body(body.clone());
        }

        match builder.send().await {
            Ok(response) => {
                let status_code = response.status().as_u16();
                let headers = Self::collect_headers(response.headers());
                match response.text().await {
                    Ok(body) => ApiProbeResponse {
                        status_code,
                        headers,
                        body: Some(body),
                        time: start.elapsed().as_millis() as i64,
                        error: None,
                    },
                    Err(e) => ApiProbeResponse {
                        status_code,
                        headers,
                        body: None,
                        time: start.elapsed().as_millis() as i64,
                        error: Some(format!("failed to read response body: {}", e)),
                    },
                }
            }
            Err(e) => {
                // A failure that still carries an HTTP status keeps it;
                // everything else is reported as 500.
                let status_code = e.status().map(|s| s.as_u16()).unwrap_or(500);
                ApiProbeResponse {
                    status_code,
                    headers: HashMap::new(),
                    body: None,
                    time: start.elapsed().as_millis() as i64,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    fn build_headers(request: &ApiProbeRequest) -> Result<HeaderMap, String> {
        let mut headers = HeaderMap::new();
        for (key, value) in request.active_headers() {
            let name = HeaderName::from_bytes(key.as_bytes())
                .map_err(|e| format!("invalid header name `{}`: {}", key, e))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| format!("invalid header value for `{}`: {}", key, e))?;
            headers.append(name, value);
        }
        Ok(headers)
    }

    /// Response headers as a map; multi-value headers joined with `;`.
    fn collect_headers(headers: &HeaderMap) -> HashMap<String, String> {
        let mut collected: HashMap<String, String> = HashMap::new();
        for name in headers.keys() {
            let joined = headers
                .get_all(name)
                .iter()
                .filter_map(|v| v.to_str().ok())
                .collect::<Vec<_>>()
                .join(";");
            collected.insert(name.to_string(), joined);
        }
        collected
    }

    fn failure(start: Instant, message: String) -> ApiProbeResponse {
        ApiProbeResponse {
            status_code: 500,
            headers: HashMap::new(),
            body: None,
            time: start.elapsed().as_millis() as i64,
            error: Some(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProbeParam;
    use std::io::{Read, Write};
    use std::net::TcpListener;

    fn probe() -> ApiProbe {
        ApiProbe::new(Client::new(), Some(Duration::from_secs(10)))
    }

    /// One-shot HTTP server returning a canned response on a random port.
    fn serve_once(response: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 4096];
                let _ = stream.read(&mut buf);
                let _ = stream.write_all(response.as_bytes());
            }
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_non_2xx_exchange_is_not_an_error() {
        let url = serve_once(
            "HTTP/1.1 404 Not Found\r\nContent-Type: application/json\r\nContent-Length: 12\r\nConnection: close\r\n\r\n{\"msg\":\"no\"}",
        );

        let request = ApiProbeRequest {
            method: "GET".to_string(),
            url,
            params: vec![],
            headers: vec![],
            body: None,
        };

        let response = probe().execute(&request).await;
        assert_eq!(response.status_code, 404);
        assert_eq!(response.body.as_deref(), Some("{\"msg\":\"no\"}"));
        assert!(response.error.is_none());
        assert_eq!(
            response.headers.get("content-type").map(String::as_str),
            Some("application/json")
        );
    }

    #[tokio::test]
    async fn test_transport_failure_reports_500_and_elapsed_time() {
        // Bind then drop to get a port with nothing listening
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let request = ApiProbeRequest {
            method: "GET".to_string(),
            url: format!("http://127.0.0.1:{}/", port),
            params: vec![],
            headers: vec![],
            body: None,
        };

        let response = probe().execute(&request).await;
        assert_eq!(response.status_code, 500);
        assert!(response.error.is_some());
        assert!(response.body.is_none());
    }

    #[tokio::test]
    async fn test_invalid_method_is_captured() {
        let request = ApiProbeRequest {
            method: "NOT A METHOD".to_string(),
            url: "http://localhost/".to_string(),
            params: vec![],
            headers: vec![],
            body: None,
        };

        let response = probe().execute(&request).await;
        assert_eq!(response.status_code, 500);
        assert!(response.error.unwrap().contains("invalid HTTP method"));
    }

    #[tokio::test]
    async fn test_inactive_headers_are_dropped() {
        let request = ApiProbeRequest {
            method: "GET".to_string(),
            url: "http://localhost/".to_string(),
            params: vec![],
            headers: vec![
                ProbeParam {
                    key: "X-One".to_string(),
                    value: "1".to_string(),
                    active: true,
                },
                ProbeParam {
                    key: "X-Two".to_string(),
                    value: "2".to_string(),
                    active: false,
                },
            ],
            body: None,
        };

        let headers = ApiProbe::build_headers(&request).unwrap();
        assert!(headers.contains_key("x-one"));
        assert!(!headers.contains_key("x-two"));
    }
}
