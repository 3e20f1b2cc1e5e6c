#[cfg(test)]
pub(crate) fn init_logging() {
  let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
    .is_test(true)
    .try_init();
}
