//! Curl multi prober: one multi handle per validation run, shared by every
//! batch so connections to the CDN are reused.
//!
//! A batch adds one HEAD handle per URL, then loops perform / messages / wait
//! until no handle is left. A HEAD that answers without proving an image is
//! replaced in the same loop by a GET handle for the same slot, so the batch
//! barrier also covers fallbacks.

use anyhow::Result;
use std::time::Duration;

use super::classify::classify_curl_error;
use super::handler::ProbeHandler;
use super::{judge_response, ProbeBackend, ProbeMethod, ProbeOptions, ProbeOutcome, TransportKind};

/// Upper bound on a single `multi.wait` call.
const WAIT_SLICE: Duration = Duration::from_millis(100);

/// Redirect hops followed before giving up.
const MAX_REDIRECTS: u32 = 10;

/// In-flight probe: handle + slot in the batch.
type ActiveProbe = (curl::multi::Easy2Handle<ProbeHandler>, usize);

/// Probe backend driving all requests through one `curl::multi::Multi`.
///
/// The multi handle (and its connection cache) lives as long as the prober;
/// dropping the prober closes every pooled connection.
pub struct CurlProber {
    multi: curl::multi::Multi,
    opts: ProbeOptions,
}

impl CurlProber {
    pub fn new(opts: ProbeOptions) -> Self {
        Self {
            multi: curl::multi::Multi::new(),
            opts,
        }
    }

    pub fn options(&self) -> &ProbeOptions {
        &self.opts
    }

    /// Start one probe stage for batch slot `index`. Setup failures (e.g. a URL
    /// libcurl refuses) become the slot's outcome instead of an error.
    fn start(
        &self,
        url: &str,
        index: usize,
        method: ProbeMethod,
        active: &mut Vec<ActiveProbe>,
        outcomes: &mut [Option<ProbeOutcome>],
    ) {
        match add_probe_to_multi(&self.multi, url, method, &self.opts) {
            Ok(handle) => active.push((handle, index)),
            Err(e) => {
                tracing::debug!(url, error = %e, "probe setup failed");
                let kind = e
                    .downcast_ref::<curl::Error>()
                    .map(classify_curl_error)
                    .unwrap_or(TransportKind::Other);
                outcomes[index] = Some(ProbeOutcome::transport(kind, format!("{e:#}")));
            }
        }
    }
}

impl ProbeBackend for CurlProber {
    fn probe_batch(&mut self, urls: &[&str]) -> Result<Vec<ProbeOutcome>> {
        let mut outcomes: Vec<Option<ProbeOutcome>> = vec![None; urls.len()];
        let mut active: Vec<ActiveProbe> = Vec::with_capacity(urls.len());

        for (index, url) in urls.iter().enumerate() {
            self.start(url, index, ProbeMethod::Head, &mut active, &mut outcomes);
        }

        while !active.is_empty() {
            let running = self
                .multi
                .perform()
                .map_err(|e| anyhow::anyhow!("curl multi perform: {}", e))?;

            let mut finished: Vec<(usize, Result<(), curl::Error>)> = Vec::new();
            self.multi.messages(|msg| {
                for (pos, (handle, _)) in active.iter().enumerate() {
                    if let Some(result) = msg.result_for2(handle) {
                        finished.push((pos, result));
                        break;
                    }
                }
            });
            // Remove from the back so earlier positions stay valid.
            finished.sort_by(|a, b| b.0.cmp(&a.0));

            for (pos, result) in finished {
                let (handle, index) = active.remove(pos);
                let mut easy = self
                    .multi
                    .remove2(handle)
                    .map_err(|e| anyhow::anyhow!("curl multi remove: {}", e))?;
                let code = easy.response_code().unwrap_or(0);
                let handler = easy.get_ref();
                let outcome = outcome_from_transfer(result, code, handler);
                let method = handler.method;
                tracing::trace!(url = urls[index], ?method, code, ?outcome, "probe stage finished");

                if method == ProbeMethod::Head && outcome.needs_full_fetch() {
                    self.start(urls[index], index, ProbeMethod::Get, &mut active, &mut outcomes);
                } else {
                    outcomes[index] = Some(outcome);
                }
            }

            if running > 0 && !active.is_empty() {
                self.multi
                    .wait(&mut [], WAIT_SLICE)
                    .map_err(|e| anyhow::anyhow!("curl multi wait: {}", e))?;
            }
        }

        Ok(outcomes
            .into_iter()
            .map(|o| {
                o.unwrap_or_else(|| {
                    ProbeOutcome::transport(TransportKind::Other, "probe did not complete")
                })
            })
            .collect())
    }
}

/// Outcome of one finished transfer. A write error caused by the handler
/// refusing the body still counts as a complete response.
pub(super) fn outcome_from_transfer(
    result: Result<(), curl::Error>,
    code: u32,
    handler: &ProbeHandler,
) -> ProbeOutcome {
    match result {
        Err(e) if !(e.is_write_error() && handler.body_refused) => {
            ProbeOutcome::transport(classify_curl_error(&e), e.to_string())
        }
        _ => judge_response(code, handler.content_type().as_deref()),
    }
}

/// Add a new Easy2 handle for one probe stage to the multi handle,
/// configuring method, redirects, timeouts and browser-like headers.
fn add_probe_to_multi(
    multi: &curl::multi::Multi,
    url: &str,
    method: ProbeMethod,
    opts: &ProbeOptions,
) -> Result<curl::multi::Easy2Handle<ProbeHandler>> {
    let mut easy = curl::easy::Easy2::new(ProbeHandler::new(method));
    easy.url(url)?;
    match method {
        ProbeMethod::Head => easy.nobody(true)?,
        ProbeMethod::Get => easy.get(true)?,
    }
    easy.follow_location(true)?;
    easy.max_redirections(MAX_REDIRECTS)?;
    easy.connect_timeout(opts.timeout)?;
    easy.timeout(opts.timeout)?;
    easy.useragent(&opts.user_agent)?;
    // Empty string = every encoding libcurl supports.
    easy.accept_encoding("")?;

    let mut list = curl::easy::List::new();
    list.append("Accept: image/webp,image/apng,image/*,*/*;q=0.8")?;
    list.append("Accept-Language: en-US,en;q=0.9")?;
    list.append(&format!("Referer: {}", opts.referer))?;
    list.append("DNT: 1")?;
    easy.http_headers(list)?;

    multi
        .add2(easy)
        .map_err(|e| anyhow::anyhow!("curl multi add: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::ProbeFailure;
    use curl::easy::Handler;

    fn handler_with(lines: &[&[u8]], method: ProbeMethod) -> ProbeHandler {
        let mut h = ProbeHandler::new(method);
        for line in lines {
            h.header(line);
        }
        h
    }

    #[test]
    fn refused_body_after_headers_is_a_response() {
        let mut h = handler_with(&[b"HTTP/1.1 200 OK\r\n", b"Content-Type: image/png\r\n"], ProbeMethod::Get);
        let _ = h.write(b"png");
        let o = outcome_from_transfer(Err(curl::Error::new(23)), 200, &h);
        assert!(o.is_live());
    }

    #[test]
    fn write_error_without_refusal_is_transport() {
        let h = handler_with(&[b"HTTP/1.1 200 OK\r\n"], ProbeMethod::Get);
        let o = outcome_from_transfer(Err(curl::Error::new(23)), 200, &h);
        assert!(matches!(o, ProbeOutcome::Dead(ProbeFailure::Transport { .. })));
    }

    #[test]
    fn head_html_needs_fallback() {
        let h = handler_with(&[b"HTTP/1.1 200 OK\r\n", b"Content-Type: text/html\r\n"], ProbeMethod::Head);
        let o = outcome_from_transfer(Ok(()), 200, &h);
        assert!(o.needs_full_fetch());
    }

    #[test]
    fn timeout_is_transport_timeout() {
        let h = ProbeHandler::new(ProbeMethod::Head);
        let o = outcome_from_transfer(Err(curl::Error::new(28)), 0, &h);
        assert!(matches!(
            o,
            ProbeOutcome::Dead(ProbeFailure::Transport {
                kind: TransportKind::Timeout,
                ..
            })
        ));
    }

    #[test]
    fn empty_batch_returns_empty() {
        let mut prober = CurlProber::new(ProbeOptions::default());
        assert!(prober.probe_batch(&[]).unwrap().is_empty());
    }
}
