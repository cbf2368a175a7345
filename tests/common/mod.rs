// Common test utilities and fixtures

pub mod helpers;

// Re-export commonly used items
// Note: These may appear unused in some test binaries but are used in others
#[allow(unused_imports)]
pub use fixtures::{block, html_document, pdf_block, pdf_document, sample_report, TestInputDir};
#[allow(unused_imports)]
pub use helpers::{
    assert_heading_depth_bounded, chunk_texts, create_test_services, text_chunk, typed_chunk,
};
