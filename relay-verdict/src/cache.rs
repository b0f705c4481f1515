use crate::types::AnalyzeResponse;
use dashmap::DashMap;
use std::sync::Arc;

/// Verdicts keyed by the stripped input text, kept for the life of the process.
///
/// Entry access is safe across tasks, but nothing spans the miss path: two
/// concurrent first requests for the same text both reach the LLM and the
/// later insert wins.
#[derive(Debug, Default)]
pub struct VerdictCache {
    entries: DashMap<String, Arc<AnalyzeResponse>>,
}

impl VerdictCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, text: &str) -> Option<Arc<AnalyzeResponse>> {
        self.entries.get(text).map(|e| Arc::clone(e.value()))
    }

    /// Store a verdict, replacing any earlier one for the same text.
    pub fn insert(&self, text: String, verdict: Arc<AnalyzeResponse>) {
        self.entries.insert(text, verdict);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}
