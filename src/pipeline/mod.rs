pub mod ocr;
pub mod processor;
pub mod upload;

pub use ocr::*;
pub use processor::*;
pub use upload::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Invalid upload payload: {0}")]
    InvalidPayload(String),

    #[error("OCR engine failed: {0}")]
    Engine(String),
}
