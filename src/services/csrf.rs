use percent_encoding::percent_decode_str;

/// Session token attached to every API request.
///
/// Read once from the cookie jar when the page boots and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsrfToken {
    header_name: String,
    value: Option<String>,
}

impl CsrfToken {
    pub fn new(header_name: impl Into<String>, value: Option<String>) -> Self {
        Self {
            header_name: header_name.into(),
            value,
        }
    }

    /// Picks `cookie_name` out of a `document.cookie` style string.
    pub fn from_cookie_header(cookies: &str, cookie_name: &str, header_name: &str) -> Self {
        let value = cookies
            .split(';')
            .map(str::trim)
            .find_map(|pair| {
                let (name, value) = pair.split_once('=')?;
                (name == cookie_name).then_some(value)
            })
            .map(|raw| percent_decode_str(raw).decode_utf8_lossy().into_owned());

        if value.is_none() {
            tracing::warn!(
                "Cookie {} not found, requests will be sent without {}",
                cookie_name,
                header_name
            );
        }

        Self::new(header_name, value)
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// The header pair to send, if a token is known.
    pub fn header(&self) -> Option<(String, String)> {
        self.value
            .as_ref()
            .map(|value| (self.header_name.clone(), value.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_exact_cookie_name() {
        let token = CsrfToken::from_cookie_header(
            "sessionid=abc; csrftoken2=wrong; csrftoken=t0k3n",
            "csrftoken",
            "X-CSRFToken",
        );

        assert_eq!(token.value(), Some("t0k3n"));
        assert_eq!(
            token.header(),
            Some(("X-CSRFToken".to_string(), "t0k3n".to_string()))
        );
    }

    #[test]
    fn decodes_percent_escapes() {
        let token = CsrfToken::from_cookie_header("csrftoken=a%2Bb%3Dc", "csrftoken", "X-CSRFToken");
        assert_eq!(token.value(), Some("a+b=c"));
    }

    #[test]
    fn value_may_contain_equals_signs() {
        let token = CsrfToken::from_cookie_header("csrftoken=abc==", "csrftoken", "X-CSRFToken");
        assert_eq!(token.value(), Some("abc=="));
    }

    #[test]
    fn missing_cookie_yields_no_header() {
        let token = CsrfToken::from_cookie_header("", "csrftoken", "X-CSRFToken");
        assert_eq!(token.value(), None);
        assert_eq!(token.header(), None);
    }
}
