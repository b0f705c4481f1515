//! Verdict Normalizer: turns an LLM's fake-news classification into a stable verdict.
//!
//! - [`types`]: raw and normalized verdict models plus the label enums
//! - [`normalize`]: strict parsing of the model content and the deterministic remap
//! - [`cache`]: process-lifetime cache keyed by the stripped input text
//! - [`service`]: the analyze flow tying the pieces to an [`relay_llm::traits::LlmClient`]
//!
//! ```
//! use relay_verdict::{normalize, parse_model_content};
//!
//! let raw = parse_model_content(r#"{"result":"fake","confidence":0.97,"emotion":"emotional"}"#)
//!     .expect("valid verdict json");
//! let verdict = normalize(raw, None);
//! assert_eq!(verdict.confidence, 0.1);
//! assert_eq!(verdict.reasons.len(), 1);
//! ```
pub mod cache;
pub mod error;
pub mod normalize;
pub mod prompt;
pub mod service;
pub mod types;

pub use cache::VerdictCache;
pub use error::{AnalyzeError, VerdictError};
pub use normalize::{normalize, parse_model_content};
pub use service::{MIN_TEXT_CHARS, VerdictService};
pub use types::{AnalyzeResponse, RawVerdict, Tone, VerdictClass};
