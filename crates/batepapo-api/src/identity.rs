use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::sanitize::sanitize;

pub const USER_HEADER: &str = "user";

/// Self-asserted identity from the `user` header, sanitized.
///
/// A missing header yields an empty name, which never matches a participant:
/// handlers then answer with their usual unknown-user status.
#[derive(Debug, Clone)]
pub struct Requester(pub String);

impl<S> FromRequestParts<S> for Requester
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let name = parts
            .headers
            .get(USER_HEADER)
            .map(|v| sanitize(&decode_header(v.as_bytes())))
            .unwrap_or_default();
        Ok(Requester(name))
    }
}

/// Header bytes as text: UTF-8 when valid, otherwise Latin-1 (one byte per char),
/// which is what browsers send for names like `João` in a plain header.
fn decode_header(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| char::from(b)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_utf8_and_latin1() {
        assert_eq!(decode_header("João".as_bytes()), "João");
        assert_eq!(decode_header(b"Jo\xe3o"), "João");
        assert_eq!(decode_header(b"ana"), "ana");
    }
}
