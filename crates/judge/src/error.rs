use std::io;

use thiserror::Error;

/// Structural failure of a grading run: these abort the whole run, unlike
/// verdicts, which are always values (see the grading core's error design).
#[derive(Debug, Error)]
pub enum GradingError {
  #[error("could not load test suite: {0}")]
  Spec(String),

  #[error("missing reference output for test case {case_name}: {path}")]
  MissingReferenceOutput { case_name: String, path: String },

  #[error("could not spawn solution command {command:?}: {source}")]
  Spawn {
    command: String,
    #[source]
    source: io::Error,
  },

  #[error("malformed grading options: {0}")]
  MalformedOptions(String),

  #[error("i/o error: {0}")]
  Io(#[from] io::Error),
}
