//! Map curl errors onto transport failure categories.

use super::TransportKind;

/// Classify a curl error for probe diagnostics.
pub fn classify_curl_error(e: &curl::Error) -> TransportKind {
    if e.is_operation_timedout() {
        return TransportKind::Timeout;
    }
    if e.is_couldnt_resolve_host() || e.is_couldnt_resolve_proxy() {
        return TransportKind::Dns;
    }
    if e.is_couldnt_connect()
        || e.is_ssl_connect_error()
        || e.is_send_error()
        || e.is_recv_error()
        || e.is_read_error()
    {
        return TransportKind::Connection;
    }
    if e.is_got_nothing()
        || e.code() == 8 // CURLE_WEIRD_SERVER_REPLY
        || e.is_partial_file()
        || e.is_bad_content_encoding()
        || e.is_too_many_redirects()
        || e.is_url_malformed()
        || e.is_unsupported_protocol()
    {
        return TransportKind::Malformed;
    }
    TransportKind::Other
}
