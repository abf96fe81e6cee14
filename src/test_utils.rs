//! Shared proptest strategies.

use proptest::prelude::*;

/// Well-formed `http://` or `https://` URLs.
pub(crate) fn arb_http_url() -> impl Strategy<Value = String> {
    prop::string::string_regex("https?://[a-z][a-z0-9]{0,12}\\.example(/[a-z0-9_@-]{0,10}){0,3}")
        .unwrap()
}

/// Text that cannot start with a recognized protocol.
pub(crate) fn arb_schemeless_text() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z0-9. -]{0,30}").unwrap()
}
