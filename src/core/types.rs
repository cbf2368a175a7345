//! Core data types for chunkwise.
//!
//! This module defines the closed set of chunk types, validated
//! bounding boxes, the parser output consumed at the pipeline
//! boundary and the records written back out by the CLI.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::chunk::Chunk;
use crate::core::error::{ChunkwiseError, Result};

/// Semantic role of a chunk, as classified by the upstream parser.
///
/// The serialized names match the parser's block type strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ChunkType {
    #[serde(rename = "Text")]
    Text,
    #[serde(rename = "Title")]
    Title,
    #[serde(rename = "title")]
    TitleLowerCase,
    #[serde(rename = "List")]
    List,
    #[serde(rename = "Table")]
    Table,
    #[serde(rename = "TableCell")]
    TableCell,
    #[serde(rename = "Figure")]
    Figure,
    #[serde(rename = "Inferred from gaps")]
    Inferred,
    #[serde(rename = "Ambiguous")]
    Ambiguous,
    #[serde(rename = "Google Text Block")]
    GoogleBlock,
    #[serde(rename = "pageHeader")]
    PageHeader,
    #[serde(rename = "pageFooter")]
    PageFooter,
    #[serde(rename = "pageNumber")]
    PageNumber,
    #[serde(rename = "sectionHeading")]
    SectionHeading,
    #[serde(rename = "Document Header")]
    DocumentHeader,
    #[serde(rename = "footnote")]
    Footnote,
}

impl ChunkType {
    /// Every known chunk type, in declaration order
    pub const ALL: [ChunkType; 16] = [
        ChunkType::Text,
        ChunkType::Title,
        ChunkType::TitleLowerCase,
        ChunkType::List,
        ChunkType::Table,
        ChunkType::TableCell,
        ChunkType::Figure,
        ChunkType::Inferred,
        ChunkType::Ambiguous,
        ChunkType::GoogleBlock,
        ChunkType::PageHeader,
        ChunkType::PageFooter,
        ChunkType::PageNumber,
        ChunkType::SectionHeading,
        ChunkType::DocumentHeader,
        ChunkType::Footnote,
    ];

    /// The parser's string for this type
    pub fn as_str(&self) -> &'static str {
        match self {
            ChunkType::Text => "Text",
            ChunkType::Title => "Title",
            ChunkType::TitleLowerCase => "title",
            ChunkType::List => "List",
            ChunkType::Table => "Table",
            ChunkType::TableCell => "TableCell",
            ChunkType::Figure => "Figure",
            ChunkType::Inferred => "Inferred from gaps",
            ChunkType::Ambiguous => "Ambiguous",
            ChunkType::GoogleBlock => "Google Text Block",
            ChunkType::PageHeader => "pageHeader",
            ChunkType::PageFooter => "pageFooter",
            ChunkType::PageNumber => "pageNumber",
            ChunkType::SectionHeading => "sectionHeading",
            ChunkType::DocumentHeader => "Document Header",
            ChunkType::Footnote => "footnote",
        }
    }

    /// Parse a list of type names, dropping unknown names with a warning.
    ///
    /// Unknown names in configuration are recoverable: the name is
    /// excluded from the resulting set and the pipeline keeps going.
    /// Duplicates are collapsed, first occurrence wins.
    pub fn parse_known<I, S>(names: I) -> Vec<ChunkType>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut types = Vec::new();
        for name in names {
            match name.as_ref().parse::<ChunkType>() {
                Ok(chunk_type) => {
                    if !types.contains(&chunk_type) {
                        types.push(chunk_type);
                    }
                }
                Err(_) => {
                    tracing::warn!(
                        "Chunk types should be known block types, removing {:?} from the list",
                        name.as_ref()
                    );
                }
            }
        }
        types
    }
}

impl fmt::Display for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChunkType {
    type Err = ChunkwiseError;

    fn from_str(s: &str) -> Result<Self> {
        ChunkType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ChunkwiseError::ConfigError(format!("Unknown chunk type: {s:?}")))
    }
}

/// Axis-aligned rectangle as four points.
///
/// Points follow `[[x1, y1], [x2, y1], [x2, y2], [x1, y2]]` with
/// `x1 < x2` and `y1 < y2`. Only points 0, 1 and 2 are checked;
/// parser polygons are not exactly rectangular in practice.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<[f64; 2]>", into = "Vec<[f64; 2]>")]
pub struct BoundingBox {
    points: [[f64; 2]; 4],
}

impl BoundingBox {
    /// Build a bounding box, validating the point layout.
    ///
    /// # Errors
    ///
    /// Returns `InvalidBoundingBox` if there are not exactly four
    /// points or the min/max coordinates are out of order.
    pub fn new(points: Vec<[f64; 2]>) -> Result<Self> {
        let points: [[f64; 2]; 4] = points.try_into().map_err(|p: Vec<[f64; 2]>| {
            ChunkwiseError::InvalidBoundingBox(format!(
                "Bounding boxes must have exactly 4 points, got {}",
                p.len()
            ))
        })?;

        let (xmin, ymin) = (points[0][0], points[0][1]);
        let xmax = points[1][0];
        let ymax = points[2][1];

        if !(xmin < xmax && ymin < ymax) {
            return Err(ChunkwiseError::InvalidBoundingBox(
                "Minimum and maximum x and y coordinates are not set as expected. \
                 Use the pattern [[xmin, ymin], [xmax, ymin], [xmax, ymax], [xmin, ymax]]"
                    .to_string(),
            ));
        }

        Ok(Self { points })
    }

    /// Build from the rectangle corners
    pub fn from_rect(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Result<Self> {
        Self::new(vec![[xmin, ymin], [xmax, ymin], [xmax, ymax], [xmin, ymax]])
    }

    pub fn points(&self) -> &[[f64; 2]; 4] {
        &self.points
    }
}

impl TryFrom<Vec<[f64; 2]>> for BoundingBox {
    type Error = ChunkwiseError;

    fn try_from(points: Vec<[f64; 2]>) -> Result<Self> {
        Self::new(points)
    }
}

impl From<BoundingBox> for Vec<[f64; 2]> {
    fn from(bbox: BoundingBox) -> Self {
        bbox.points.to_vec()
    }
}

/// A typed text block produced by the upstream parser
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextBlock {
    /// Lines of text in the block
    pub text: Vec<String>,

    #[serde(default)]
    pub text_block_id: String,

    #[serde(default)]
    pub language: Option<String>,

    /// Parser block type string
    #[serde(rename = "type")]
    pub block_type: String,

    #[serde(default)]
    pub type_confidence: Option<f64>,

    /// Polygon coordinates (page-based sources only)
    #[serde(default)]
    pub coords: Option<Vec<[f64; 2]>>,

    /// Page number (page-based sources only)
    #[serde(default)]
    pub page_number: Option<u32>,
}

impl TextBlock {
    /// Render the block as a single string, lines stripped and
    /// joined with spaces.
    pub fn to_text(&self) -> String {
        self.text
            .iter()
            .map(|line| line.trim())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Text blocks of an HTML source
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HtmlData {
    #[serde(default)]
    pub text_blocks: Vec<TextBlock>,
}

/// Text blocks of a page-based (PDF) source
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PdfData {
    #[serde(default)]
    pub text_blocks: Vec<TextBlock>,

    #[serde(default)]
    pub md5sum: Option<String>,
}

/// Where a document's text blocks came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockSource {
    Pdf,
    Html,
}

/// Parsed document as emitted by the upstream parser.
///
/// Only the fields the pipeline needs are modelled; anything else in
/// the JSON is ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParserOutput {
    pub document_id: String,

    #[serde(default)]
    pub document_name: String,

    #[serde(default)]
    pub document_content_type: Option<String>,

    #[serde(default)]
    pub html_data: Option<HtmlData>,

    #[serde(default)]
    pub pdf_data: Option<PdfData>,
}

impl ParserOutput {
    /// The document's text blocks and their source kind.
    ///
    /// PDF data takes precedence over HTML data. Documents without
    /// either have no blocks.
    pub fn text_blocks(&self) -> Option<(BlockSource, &[TextBlock])> {
        if let Some(pdf) = &self.pdf_data {
            return Some((BlockSource::Pdf, pdf.text_blocks.as_slice()));
        }
        self.html_data
            .as_ref()
            .map(|html| (BlockSource::Html, html.text_blocks.as_slice()))
    }

    /// Parse a parser output from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let doc: ParserOutput = serde_json::from_str(json)?;
        if doc.document_id.trim().is_empty() {
            return Err(ChunkwiseError::InvalidDocument(
                "document_id must not be empty".to_string(),
            ));
        }
        Ok(doc)
    }
}

/// A document after chunk normalization, as written by the CLI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessedDocument {
    pub document_id: String,

    pub document_name: String,

    /// Representations of the components that produced the chunks
    pub components: Vec<String>,

    pub chunks: Vec<Chunk>,
}

/// Statistics from a processing run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessStats {
    /// Documents run through the pipeline and written
    pub documents_processed: usize,

    /// Documents skipped because output already existed
    pub documents_skipped: usize,

    /// Documents that failed to parse or process
    pub documents_failed: usize,

    /// Total chunks written
    pub chunks_created: usize,

    /// Run duration in milliseconds
    pub duration_ms: u64,
}
