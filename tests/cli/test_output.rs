//! Tests for output formatting helpers

use chunkwise::cli::output::{format_duration, truncate};

#[test]
fn test_format_duration_ranges() {
    assert_eq!(format_duration(0.0), "0ms");
    assert_eq!(format_duration(0.25), "250ms");
    assert_eq!(format_duration(2.0), "2.00s");
    assert_eq!(format_duration(125.0), "2m 5.0s");
}

#[test]
fn test_truncate_heading_preview() {
    let heading = "x".repeat(60);
    let preview = truncate(&heading, 50);
    assert_eq!(preview.len(), 53);
    assert!(preview.ends_with("..."));
    assert_eq!(truncate("Short heading", 50), "Short heading");
}
