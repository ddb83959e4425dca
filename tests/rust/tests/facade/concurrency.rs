//! Line atomicity under concurrent callers

use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::{Arc, Barrier};
use tests::{plain_config, Destination, Logger, SharedBuffer, Sink};
use tintlog_core::{debug, error, info};

const THREADS: usize = 12;
const RECORDS: usize = 250;

fn expected_line(thread: usize, record: usize) -> String {
    let body = format!("t{:02}-r{:03}-{}", thread, record, "#".repeat(100));
    match record % 3 {
        0 => format!("Info:  {}", body),
        1 => format!("Debug: {}", body),
        _ => format!("Error: {}", body),
    }
}

/// Every record from every thread arrives whole, in one shared order, on both
/// destinations.
#[test]
fn test_parallel_callers_never_interleave() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("concurrent.log");
    let console = SharedBuffer::new();
    let sink = Sink::new(Destination::new(console.clone(), false))
        .with_file(Destination::open_file(&path, false).expect("Failed to open log file"));
    let log = Logger::with_sink(plain_config().with_debug(true), sink);

    let barrier = Arc::new(Barrier::new(THREADS));
    let sent = Arc::new(Mutex::new(HashSet::new()));

    let handles: Vec<_> = (0..THREADS)
        .map(|thread| {
            let log = log.clone();
            let barrier = Arc::clone(&barrier);
            let sent = Arc::clone(&sent);
            std::thread::spawn(move || {
                barrier.wait();
                for record in 0..RECORDS {
                    let body = format!("t{:02}-r{:03}-{}", thread, record, "#".repeat(100));
                    match record % 3 {
                        0 => info!(log, "{}", body),
                        1 => debug!(log, "{}", body),
                        _ => error!(log, "{}", body),
                    }
                    sent.lock().insert(expected_line(thread, record));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Logging thread panicked");
    }

    let sent = sent.lock();
    let console_lines: HashSet<String> = console.lines().into_iter().collect();
    let file = std::fs::read_to_string(&path).expect("Failed to read log file");
    let file_lines: HashSet<String> = file.lines().map(str::to_string).collect();

    assert_eq!(console.lines().len(), THREADS * RECORDS);
    assert_eq!(file.lines().count(), THREADS * RECORDS);
    assert_eq!(console_lines, *sent);
    assert_eq!(file_lines, *sent);
    // Same records in the same order on both destinations
    assert!(console.contents() == file, "console and file order diverged");
}

/// Reset racing with emitters: each record lands whole in exactly one sink.
#[test]
fn test_reset_during_logging_keeps_records_whole() {
    let first = SharedBuffer::new();
    let second = SharedBuffer::new();
    let log = Logger::with_sink(plain_config(), Sink::new(Destination::new(first.clone(), false)));

    std::thread::scope(|scope| {
        for thread in 0..4 {
            let log = log.clone();
            scope.spawn(move || {
                for record in 0..500 {
                    info!(log, "t{}-r{}", thread, record);
                }
            });
        }

        let log = log.clone();
        let second = second.clone();
        scope.spawn(move || {
            log.reset_with_sink(plain_config(), Sink::new(Destination::new(second, false)));
        });
    });

    let mut all: Vec<String> = first.lines();
    all.extend(second.lines());
    assert_eq!(all.len(), 4 * 500);
    assert!(all.iter().all(|line| line.starts_with("Info:  t")));
}
