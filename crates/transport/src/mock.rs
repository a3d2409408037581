//! Scripted in-memory transport for testing.

use crate::error::{ErrorKind, Result};
use crate::models::{Headers, Method, Request, Response};
use crate::Transport;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use tokio::sync::Mutex;

type Reply = std::result::Result<Response, ErrorKind>;

/// Scripted in-memory transport for testing.
///
/// Replies are queued per `(method, url)` and handed out in order. The final
/// queued reply is sticky: it keeps being returned once the rest of the
/// queue is used up. Requests without any scripted reply fail with
/// [`ErrorKind::Unscripted`]. Every request is recorded.
///
/// # Examples
///
/// ```
/// use lrkit_transport::{Headers, Method, MockTransport, Response, Transport};
/// use lrkit_transport::error::ErrorKind;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let transport = MockTransport::default()
///     .fail(Method::Get, "https://example.test/items", ErrorKind::Timeout)
///     .reply(Method::Get, "https://example.test/items", Response::ok("[]"));
///
/// let headers = Headers::new();
/// assert!(transport.get("https://example.test/items", &headers).await.is_err());
/// let response = transport.get("https://example.test/items", &headers).await.unwrap();
/// assert_eq!(response.text().unwrap(), "[]");
/// assert_eq!(transport.requests().await.len(), 2);
/// # }
/// ```
#[derive(Default)]
pub struct MockTransport {
    name: String,
    script: Mutex<HashMap<(Method, String), VecDeque<Reply>>>,
    requests: Mutex<Vec<Request>>,
}
impl MockTransport {
    /// Change the name of the mock transport.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Queue a response for `method` requests to `url`.
    pub fn reply(self, method: Method, url: impl Into<String>, response: Response) -> Self {
        self.push(method, url.into(), Ok(response))
    }

    /// Queue a transport failure for `method` requests to `url`.
    pub fn fail(self, method: Method, url: impl Into<String>, error: ErrorKind) -> Self {
        self.push(method, url.into(), Err(error))
    }

    fn push(mut self, method: Method, url: String, reply: Reply) -> Self {
        self.script.get_mut().entry((method, url)).or_default().push_back(reply);
        self
    }

    /// Every request received so far, oldest first.
    pub async fn requests(&self) -> Vec<Request> {
        self.requests.lock().await.clone()
    }

    /// Requests received for a specific method.
    pub async fn requests_for(&self, method: Method) -> Vec<Request> {
        self.requests.lock().await.iter().filter(|r| r.method == method).cloned().collect()
    }

    async fn respond(&self, request: Request) -> Result<Response> {
        let key = (request.method, request.url.clone());
        tracing::debug!(transport = %self.name, method = %key.0, url = %key.1, "Mock request");
        self.requests.lock().await.push(request);
        let mut script = self.script.lock().await;
        let reply = match script.get_mut(&key) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        };
        match reply {
            Some(Ok(response)) => Ok(response),
            Some(Err(kind)) => exn::bail!(kind),
            None => {
                tracing::warn!(transport = %self.name, method = %key.0, url = %key.1, "No scripted reply");
                exn::bail!(ErrorKind::Unscripted(format!("{} {}", key.0, key.1)))
            },
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get(&self, url: &str, headers: &Headers) -> Result<Response> {
        self.respond(Request {
            method: Method::Get,
            url: url.to_string(),
            headers: headers.clone(),
            body: Vec::new(),
        })
        .await
    }

    async fn post(&self, url: &str, body: &[u8], headers: &Headers, method: Method) -> Result<Response> {
        self.respond(Request {
            method,
            url: url.to_string(),
            headers: headers.clone(),
            body: body.to_vec(),
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://example.test/items";

    #[tokio::test]
    async fn unscripted_request_fails() {
        let transport = MockTransport::default();
        let err = transport.get(URL, &Headers::new()).await.unwrap_err();
        assert_eq!(*err, ErrorKind::Unscripted(format!("GET {URL}")));
        assert_eq!(transport.requests().await.len(), 1);
    }

    #[tokio::test]
    async fn last_reply_is_sticky() {
        let transport = MockTransport::default()
            .reply(Method::Get, URL, Response::new(503, ""))
            .reply(Method::Get, URL, Response::ok("done"));
        let headers = Headers::new();
        assert_eq!(transport.get(URL, &headers).await.unwrap().status, 503);
        assert_eq!(transport.get(URL, &headers).await.unwrap().status, 200);
        assert_eq!(transport.get(URL, &headers).await.unwrap().status, 200);
    }

    #[tokio::test]
    async fn methods_are_scripted_separately() {
        let transport = MockTransport::default()
            .reply(Method::Get, URL, Response::ok("get"))
            .reply(Method::Put, URL, Response::ok("put"));
        let headers = Headers::from([("Authorization".to_string(), "Bearer t".to_string())]);
        let put = transport.post(URL, b"{}", &headers, Method::Put).await.unwrap();
        assert_eq!(put.text().unwrap(), "put");
        assert!(transport.post(URL, b"{}", &headers, Method::Post).await.is_err());

        let recorded = transport.requests_for(Method::Put).await;
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].body, b"{}");
        assert_eq!(recorded[0].headers.get("Authorization").map(String::as_str), Some("Bearer t"));
    }
}
