use once_cell::sync::OnceCell;

static LOGGER: OnceCell<()> = OnceCell::new();

/// Initializes env_logger once per test binary. Honors `RUST_LOG`, defaults to `debug`.
pub fn init_test_logging() {
    LOGGER.get_or_init(|| {
        let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug"))
            .is_test(true)
            .try_init();
    });
}
