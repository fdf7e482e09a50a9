//! Easy2 handler for one probe request.
//! Keeps the header block of the final response; never consumes a body.

use std::str;

use super::ProbeMethod;

/// Handler state for one probe transfer. Implements curl's Handler for Easy2.
pub struct ProbeHandler {
    pub(super) method: ProbeMethod,
    pub(super) response_headers: Vec<String>,
    /// Set when the body was refused after the headers of a GET arrived.
    pub(super) body_refused: bool,
}

impl ProbeHandler {
    pub fn new(method: ProbeMethod) -> Self {
        Self {
            method,
            response_headers: Vec::new(),
            body_refused: false,
        }
    }

    /// Content type declared by the final response, if any.
    pub fn content_type(&self) -> Option<String> {
        parse_content_type(&self.response_headers)
    }
}

impl curl::easy::Handler for ProbeHandler {
    fn header(&mut self, data: &[u8]) -> bool {
        if let Ok(s) = str::from_utf8(data) {
            let line = s.trim_end();
            // Each redirect hop starts a new header block.
            if line.starts_with("HTTP/") {
                self.response_headers.clear();
            }
            self.response_headers.push(line.to_string());
        }
        true
    }

    fn write(&mut self, _data: &[u8]) -> Result<usize, curl::easy::WriteError> {
        // Headers are all a probe needs; refusing the first chunk aborts the
        // transfer with a write error that the caller recognises.
        self.body_refused = true;
        Ok(0)
    }
}

/// Content-Type value from collected header lines (last one wins).
pub fn parse_content_type(lines: &[String]) -> Option<String> {
    let mut content_type = None;
    for line in lines {
        if let Some((name, value)) = line.trim().split_once(':') {
            if name.trim().eq_ignore_ascii_case("content-type") {
                let value = value.trim();
                if !value.is_empty() {
                    content_type = Some(value.to_string());
                }
            }
        }
    }
    content_type
}
