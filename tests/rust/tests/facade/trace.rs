//! Stack breadcrumbs against the real backtrace walker

use tests::CapturedLogger;
use tintlog_core::{Logger, TRACE_DEPTH, TRACE_UNAVAILABLE};

const THIS_FILE: &str = "trace.rs";

#[inline(never)]
fn descend(log: &Logger, depth: usize, skip: usize) -> String {
    if depth == 0 {
        log.trace(skip)
    } else {
        descend(log, depth - 1, skip)
    }
}

/// Lines of the two calls in `descend`
const TRACE_CALL_LINE: u32 = 11;
const RECURSE_CALL_LINE: u32 = 13;

/// Split `"<seq> ::: a:1 > b:2 > ... >"` into its `file:line` pairs
fn pairs(breadcrumb: &str) -> Vec<String> {
    let (_, trail) = breadcrumb
        .split_once(" ::: ")
        .unwrap_or_else(|| panic!("unexpected breadcrumb: {}", breadcrumb));
    trail
        .split(" >")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

#[test]
fn test_trace_has_six_pairs_ending_at_caller() {
    let captured = CapturedLogger::plain();
    captured.logger.set_debug(true);

    let breadcrumb = descend(&captured.logger, 10, 0);
    let pairs = pairs(&breadcrumb);

    assert_eq!(pairs.len(), TRACE_DEPTH, "{}", breadcrumb);
    for pair in &pairs {
        let (file, line) = pair.rsplit_once(':').expect("file:line pair");
        assert_eq!(file, THIS_FILE, "{}", breadcrumb);
        assert!(line.parse::<u32>().is_ok(), "{}", breadcrumb);
    }

    // Outermost first: five recursive calls, then the `trace` call itself
    let recurse = format!("{}:{}", THIS_FILE, RECURSE_CALL_LINE);
    let innermost = format!("{}:{}", THIS_FILE, TRACE_CALL_LINE);
    assert!(pairs[..TRACE_DEPTH - 1].iter().all(|p| *p == recurse), "{}", breadcrumb);
    assert_eq!(pairs[TRACE_DEPTH - 1], innermost, "{}", breadcrumb);
}

#[test]
fn test_trace_skip_moves_window_outward() {
    let captured = CapturedLogger::plain();
    captured.logger.set_debug(true);

    let near = pairs(&descend(&captured.logger, 10, 0));
    let far = pairs(&descend(&captured.logger, 10, 1));

    // The first recursion frame calls `trace`; skipping it leaves only the
    // recursive call line.
    let innermost_near = near.last().expect("frames");
    let innermost_far = far.last().expect("frames");
    assert_ne!(innermost_near, innermost_far);
    assert!(far.iter().all(|p| p == innermost_far));
}

#[test]
fn test_trace_sequence_increments() {
    let captured = CapturedLogger::plain();
    captured.logger.set_debug(true);

    let first = descend(&captured.logger, 7, 0);
    let second = descend(&captured.logger, 7, 0);

    assert!(first.starts_with("0 ::: "), "{}", first);
    assert!(second.starts_with("1 ::: "), "{}", second);
}

#[test]
fn test_trace_disabled_placeholder() {
    let captured = CapturedLogger::plain();
    assert_eq!(descend(&captured.logger, 7, 0), TRACE_UNAVAILABLE);
    assert!(captured.console.is_empty());
}
