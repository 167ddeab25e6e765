//! Incoming page request.

use indexmap::IndexMap;

/// Name of the header carrying the user's language preferences.
pub const ACCEPT_LANGUAGE: &str = "accept-language";

/// Headers of the request that loaded the page.
///
/// Header names are case-insensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    /// Header values keyed by lower-cased name.
    headers: IndexMap<String, String>,
}

impl Request {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a header, replacing any previous value.
    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    /// The raw `Accept-Language` header, if sent.
    #[must_use]
    pub fn accept_language(&self) -> Option<&str> {
        self.header(ACCEPT_LANGUAGE)
    }
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;

    use super::*;

    #[googletest::test]
    fn headers_are_case_insensitive() {
        let request = Request::new().with_header("Accept-Language", "fr-FR,fr;q=0.9");

        expect_that!(request.header("ACCEPT-LANGUAGE"), some(eq("fr-FR,fr;q=0.9")));
        expect_that!(request.accept_language(), some(eq("fr-FR,fr;q=0.9")));
        expect_that!(request.header("Cookie"), none());
    }
}
