// Test helper functions

use chunkwise::core::chunk::{Chunk, HeadingIndex};
use chunkwise::core::config::Config;
use chunkwise::core::services::Services;
use chunkwise::core::types::ChunkType;
use std::sync::Arc;
use tempfile::TempDir;

/// Create test services writing into a temporary output directory
#[allow(dead_code)] // Used in integration tests
pub fn create_test_services(configure: impl FnOnce(&mut Config)) -> (Arc<Services>, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let mut config = Config::default();
    config.output.dir = temp_dir.path().join("chunks");
    configure(&mut config);

    (Arc::new(Services::new(config)), temp_dir)
}

#[allow(dead_code)] // Used in integration tests
pub fn text_chunk(id: usize, text: &str) -> Chunk {
    Chunk::new(id, text, ChunkType::Text)
}

#[allow(dead_code)] // Used in integration tests
pub fn typed_chunk(id: usize, text: &str, chunk_type: ChunkType) -> Chunk {
    Chunk::new(id, text, chunk_type)
}

#[allow(dead_code)] // Used in integration tests
pub fn chunk_texts(chunks: &[Chunk]) -> Vec<&str> {
    chunks.iter().map(|c| c.text.as_str()).collect()
}

/// Assert every heading chain in `chunks` ends within two hops
#[allow(dead_code)] // Used in integration tests
pub fn assert_heading_depth_bounded(chunks: &[Chunk]) {
    let index = HeadingIndex::new(chunks);
    for chunk in chunks {
        let mut hops = 0;
        let mut current = index.resolve(chunk);
        while let Some(heading) = current {
            hops += 1;
            assert!(
                hops <= 2,
                "Heading chain of chunk {} exceeds two hops",
                chunk.id
            );
            current = index.resolve(heading);
        }
    }
}
