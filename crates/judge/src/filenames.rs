use std::path::PathBuf;

use crate::testcase::{MAIN_ID, SAMPLE_ID};

fn case_filename(slug: &str, group_id: i32, case_index: usize, ext: &str) -> String {
  if group_id == SAMPLE_ID {
    format!("{}_sample_{}.{}", slug, case_index, ext)
  } else if group_id == MAIN_ID {
    format!("{}_{}.{}", slug, case_index, ext)
  } else {
    format!("{}_{}_{}.{}", slug, group_id, case_index, ext)
  }
}

fn group_filename(slug: &str, group_id: i32, ext: &str) -> String {
  if group_id == SAMPLE_ID {
    format!("{}_sample.{}", slug, ext)
  } else if group_id == MAIN_ID {
    format!("{}.{}", slug, ext)
  } else {
    format!("{}_{}.{}", slug, group_id, ext)
  }
}

/// Reference output filename for a case, per the single-case filename scheme.
///
/// - `<output_dir>/<slug>_sample_<k>.out` for sample cases.
/// - `<output_dir>/<slug>_<k>.out` for main cases (no subtasks declared).
/// - `<output_dir>/<slug>_<subtask>_<k>.out` for subtasked cases.
pub fn reference_output_path(
  output_dir: &str,
  slug: &str,
  group_id: i32,
  case_index: usize,
) -> PathBuf {
  PathBuf::from(output_dir).join(case_filename(slug, group_id, case_index, "out"))
}

/// Input filename for a case, following the same naming scheme as the
/// reference output but with a `.in` extension.
pub fn input_path(input_dir: &str, slug: &str, group_id: i32, case_index: usize) -> PathBuf {
  PathBuf::from(input_dir).join(case_filename(slug, group_id, case_index, "in"))
}

/// Reference output filename for a synthesized multi-case group, per the
/// multi-case batched filename scheme.
///
/// - `<output_dir>/<slug>_sample.out` for the sample group.
/// - `<output_dir>/<slug>.out` for the main group.
/// - `<output_dir>/<slug>_<subtask>.out` for a subtask group.
pub fn reference_output_path_batched(output_dir: &str, slug: &str, group_id: i32) -> PathBuf {
  PathBuf::from(output_dir).join(group_filename(slug, group_id, "out"))
}

/// Input filename for a synthesized multi-case group, same naming scheme
/// with a `.in` extension.
pub fn input_path_batched(input_dir: &str, slug: &str, group_id: i32) -> PathBuf {
  PathBuf::from(input_dir).join(group_filename(slug, group_id, "in"))
}

/// Base name of the synthesized case for a batched group:
/// `foo_sample` for samples, `foo` for main, `foo_<subtask_id>` for a
/// positive subtask.
pub fn batched_case_name(slug: &str, group_id: i32) -> String {
  if group_id == SAMPLE_ID {
    format!("{}_sample", slug)
  } else if group_id == MAIN_ID {
    slug.to_string()
  } else {
    format!("{}_{}", slug, group_id)
  }
}
