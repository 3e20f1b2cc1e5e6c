use std::{fs, path::Path};

use async_trait::async_trait;

use crate::{error::GradingError, status::VerdictStatus};

/// Compares captured stdout against the reference output.
/// Only `Ac`/`Wa` are meaningful returns; any other status is not part of
/// the comparator contract (an internal malfunction is surfaced as a
/// `GradingError` instead, which the grader turns into `Err`).
#[async_trait]
pub trait Comparator: Send + Sync {
  async fn compare(
    &self,
    expected_path: &Path,
    actual: &[u8],
  ) -> Result<VerdictStatus, GradingError>;
}

/// The conventional judge default when no custom checker is configured:
/// splits both expected and actual output on whitespace and compares the
/// resulting token streams, the classic `wcmp`-style fallback most
/// competitive judges ship. Whitespace placement and line breaks never
/// matter, only the sequence of tokens.
pub struct ExactComparator;

#[async_trait]
impl Comparator for ExactComparator {
  async fn compare(
    &self,
    expected_path: &Path,
    actual: &[u8],
  ) -> Result<VerdictStatus, GradingError> {
    let expected = fs::read(expected_path).map_err(|_| GradingError::MissingReferenceOutput {
      case_name: expected_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default(),
      path: expected_path.display().to_string(),
    })?;

    let expected_tokens = String::from_utf8_lossy(&expected);
    let actual_tokens = String::from_utf8_lossy(actual);

    if expected_tokens.split_whitespace().eq(actual_tokens.split_whitespace()) {
      Ok(VerdictStatus::Ac)
    } else {
      Ok(VerdictStatus::Wa)
    }
  }
}
