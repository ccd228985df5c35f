//! Source document extraction adapters

pub mod pdf;

pub use pdf::PdfExtractor;
