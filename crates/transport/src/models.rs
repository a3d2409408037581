//! Request and response types exchanged with a [`Transport`](crate::Transport).

use crate::error::{ErrorKind, Result};
use derive_more::Display;
use exn::ResultExt;
use std::collections::BTreeMap;

/// Request headers, kept sorted so logs and recorded requests are stable.
pub type Headers = BTreeMap<String, String>;

/// HTTP request methods.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Method {
    #[display("GET")]
    Get,
    #[display("POST")]
    Post,
    #[display("PUT")]
    Put,
    #[display("PATCH")]
    Patch,
    #[display("DELETE")]
    Delete,
}

/// A response as handed back by the transport, regardless of status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: Vec<u8>,
}
impl Response {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Shorthand for a `200 OK` response.
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self::new(200, body)
    }

    /// `true` for any 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Body as UTF-8 text.
    pub fn text(&self) -> Result<&str> {
        std::str::from_utf8(&self.body).or_raise(|| ErrorKind::InvalidBody)
    }
}

/// A request as seen by the transport. Recorded by the mock transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    pub url: String,
    pub headers: Headers,
    pub body: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(199, false)]
    #[case(200, true)]
    #[case(204, true)]
    #[case(299, true)]
    #[case(301, false)]
    #[case(404, false)]
    #[case(503, false)]
    fn success_statuses(#[case] status: u16, #[case] expected: bool) {
        assert_eq!(Response::new(status, "").is_success(), expected);
    }

    #[test]
    fn text_body() {
        assert_eq!(Response::ok("[]").text().unwrap(), "[]");
        let err = Response::ok(vec![0xff, 0xfe]).text().unwrap_err();
        assert_eq!(*err, ErrorKind::InvalidBody);
    }

    #[test]
    fn method_display() {
        assert_eq!(Method::Get.to_string(), "GET");
        assert_eq!(Method::Patch.to_string(), "PATCH");
    }
}
