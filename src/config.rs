use tcgrade_judge::GradingOptions;

use crate::args::ARGS;

/// Loads `GradingOptions` from layered config sources: a fixed system-wide
/// file, then the `--config-search-path` files in order, then an
/// environment-variable layer with a fixed prefix.
pub fn load(search_paths: &[String]) -> GradingOptions {
  let mut builder = config::Config::builder()
    .add_source(config::File::with_name("/etc/tcgrade/options").required(false));

  for p in search_paths {
    builder = builder.add_source(config::File::with_name(p.as_str()).required(false));
  }

  builder = builder.add_source(config::Environment::with_prefix("TCGRADE"));

  builder
    .build()
    .unwrap()
    .try_deserialize::<GradingOptions>()
    .unwrap()
}

lazy_static! {
  /// Global grading options, resolved from the CLI's config search paths.
  pub static ref OPTIONS: GradingOptions = load(&ARGS.config_search_path);
}
