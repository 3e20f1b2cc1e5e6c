use clap::Parser;
use shadow_rs::shadow;

shadow!(build);

/// Command line arguments for the grading CLI.
#[derive(Parser)]
#[clap(version = build::CLAP_LONG_VERSION)]
#[clap(about = "Grades a solution against a declared test suite.", long_about = None)]
pub struct Args {
  /// Path to the suite descriptor (YAML or JSON).
  #[clap(short, long, value_parser)]
  pub suite: String,

  /// Additional config file search paths, layered over the built-in defaults.
  #[clap(short, long, value_parser)]
  pub config_search_path: Vec<String>,
}

lazy_static! {
  /// Parsed command line arguments.
  pub static ref ARGS: Args = Args::parse();
}
