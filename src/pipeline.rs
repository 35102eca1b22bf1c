use crate::aggregate::Aggregator;
use crate::extract;
use crate::report::Report;
use crate::source;
use std::io::{self, Read};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum AnalyzeError {
    /// The line source broke mid-stream. Nothing from the partial pass is kept.
    #[error("failed to read line {line} of the log: {source}")]
    SourceRead {
        line: u64,
        #[source]
        source: io::Error,
    },
}

/// Result of one complete pass: the report plus the retained raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    pub report: Report,
    /// Every line processed, each followed by `\n`.
    pub corpus: String,
}

/// Drives extraction and aggregation over `lines` until the source is
/// exhausted. Lines are processed strictly in order; the source may block
/// between lines. A read fault abandons the whole pass.
pub fn analyze<S>(lines: S) -> Result<Analysis, AnalyzeError>
where
    S: IntoIterator<Item = io::Result<String>>,
{
    let mut agg = Aggregator::new();
    let mut corpus = String::new();

    for line in lines {
        let line = line.map_err(|source| {
            let line = agg.total() + 1;
            warn!(line, error = %source, "line source failed; discarding partial analysis");
            AnalyzeError::SourceRead { line, source }
        })?;
        corpus.push_str(&line);
        corpus.push('\n');
        agg.observe(&extract::extract(&line));
    }

    let report = Report::from_snapshot(agg.into_snapshot());
    debug!(
        total = report.total(),
        errors = report.errors(),
        corpus_bytes = corpus.len(),
        "analysis finished"
    );
    Ok(Analysis { report, corpus })
}

/// Analyzes a raw byte stream, e.g. the body returned by a blob store.
pub fn analyze_reader<R: Read>(reader: R) -> Result<Analysis, AnalyzeError> {
    analyze(source::lines_from_read(reader))
}
