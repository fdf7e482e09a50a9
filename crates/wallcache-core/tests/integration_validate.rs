//! Integration test: probe a local HTTP server through the curl multi backend
//! and run the validation engine end to end.

mod common;

use std::sync::atomic::Ordering;
use std::time::Duration;

use wallcache_core::entry::Entry;
use wallcache_core::probe::{CurlProber, ProbeBackend, ProbeFailure, ProbeOptions, ProbeOutcome, TransportKind};
use wallcache_core::validate::{validate_entries, ValidateOptions};

fn prober(timeout: Duration) -> CurlProber {
    CurlProber::new(ProbeOptions {
        timeout,
        ..ProbeOptions::default()
    })
}

#[test]
fn image_is_live_and_html_is_not() {
    let (base, _) = common::image_server::start();
    let live = format!("{base}/live.jpg");
    let html = format!("{base}/page.html");
    let mut p = prober(Duration::from_secs(5));
    let out = p.probe_batch(&[live.as_str(), html.as_str()]).unwrap();
    assert!(out[0].is_live(), "{:?}", out[0]);
    assert!(matches!(
        &out[1],
        ProbeOutcome::Dead(ProbeFailure::NotImage { status: 200, .. })
    ));
}

#[test]
fn missing_image_reports_http_status() {
    let (base, _) = common::image_server::start();
    let url = format!("{base}/missing.jpg");
    let mut p = prober(Duration::from_secs(5));
    let out = p.probe_batch(&[url.as_str()]).unwrap();
    assert_eq!(out[0], ProbeOutcome::Dead(ProbeFailure::HttpStatus(404)));
}

#[test]
fn get_fallback_rescues_inconclusive_head() {
    let (base, stats) = common::image_server::start();
    let blocked = format!("{base}/head-blocked.png");
    let html_head = format!("{base}/head-html.jpg");
    let mut p = prober(Duration::from_secs(5));
    let out = p.probe_batch(&[blocked.as_str(), html_head.as_str()]).unwrap();
    assert!(out[0].is_live(), "{:?}", out[0]);
    assert!(out[1].is_live(), "{:?}", out[1]);
    // HEAD + GET for each.
    assert_eq!(stats.requests.load(Ordering::SeqCst), 4);
}

#[test]
fn redirects_are_followed() {
    let (base, _) = common::image_server::start();
    let url = format!("{base}/redirect.jpg");
    let mut p = prober(Duration::from_secs(5));
    let out = p.probe_batch(&[url.as_str()]).unwrap();
    assert!(out[0].is_live(), "{:?}", out[0]);
}

#[test]
fn refused_connection_is_dead_not_fatal() {
    let (base, _) = common::image_server::start();
    let refused = common::image_server::refused_url();
    let live = format!("{base}/live.jpg");
    let mut p = prober(Duration::from_secs(5));
    let out = p.probe_batch(&[refused.as_str(), live.as_str()]).unwrap();
    assert!(matches!(
        &out[0],
        ProbeOutcome::Dead(ProbeFailure::Transport {
            kind: TransportKind::Connection,
            ..
        })
    ));
    assert!(out[1].is_live());
}

#[test]
fn slow_server_times_out() {
    let (base, _) = common::image_server::start();
    let url = format!("{base}/slow.jpg");
    let mut p = prober(Duration::from_secs(1));
    let out = p.probe_batch(&[url.as_str()]).unwrap();
    assert!(matches!(
        &out[0],
        ProbeOutcome::Dead(ProbeFailure::Transport {
            kind: TransportKind::Timeout,
            ..
        })
    ));
}

#[test]
fn engine_keeps_live_entries_in_order() {
    let (base, _) = common::image_server::start();
    let entries = vec![
        Entry::new("a", "", format!("{base}/live.jpg")),
        Entry::new("b", "", format!("{base}/missing.jpg")),
        Entry::new("c", "", format!("{base}/head-blocked.png")),
        Entry::new("d", "", common::image_server::refused_url()),
        Entry::new("e", "", format!("{base}/page.html")),
    ];
    let mut p = prober(Duration::from_secs(5));
    let opts = ValidateOptions {
        batch_size: 2,
        batch_delay: Duration::from_millis(10),
    };
    let report = validate_entries(&mut p, entries, &opts, None).unwrap();
    let titles: Vec<&str> = report.valid.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["a", "c"]);
    assert_eq!(report.removed, 3);
    assert_eq!(report.batches, vec![2, 2, 1]);
}

#[test]
fn in_flight_requests_bounded_by_batch_size() {
    let (base, stats) = common::image_server::start();
    let entries: Vec<Entry> = (0..25)
        .map(|i| Entry::new(format!("{i}"), "", format!("{base}/paced.jpg?n={i}")))
        .collect();
    let mut p = prober(Duration::from_secs(5));
    let opts = ValidateOptions {
        batch_size: 10,
        batch_delay: Duration::from_millis(20),
    };
    let report = validate_entries(&mut p, entries, &opts, None).unwrap();
    assert_eq!(report.valid.len(), 25);
    assert_eq!(report.batches, vec![10, 10, 5]);
    assert!(stats.max_in_flight.load(Ordering::SeqCst) <= 10);
    assert_eq!(stats.requests.load(Ordering::SeqCst), 25);
}
