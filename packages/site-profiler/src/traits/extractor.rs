//! Field extractor capability.

use crate::document::PageDocument;
use crate::types::record::{EcommerceData, ExtractionRecord};

/// Turns one parsed page into structured fields.
///
/// Synchronous on purpose: documents are not `Send`, so extraction happens
/// between awaits, never across them.
pub trait FieldExtractor: Send + Sync {
    /// Extract the general organization fields.
    fn extract(&self, doc: &PageDocument, url: &str) -> ExtractionRecord;

    /// Extract store-specific fields. Only called for e-commerce pages.
    fn extract_ecommerce(&self, doc: &PageDocument, url: &str) -> EcommerceData;
}
