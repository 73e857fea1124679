use std::panic;
use std::sync::Once;
use tracing::error;
use tracing_subscriber::EnvFilter;

static PANIC_HOOK: Once = Once::new();

/// Logs go to stderr so stdout only carries widget output
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Process-wide sink for failures nothing else caught. Installed at most once;
/// the previous hook still runs afterwards.
pub fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            let message = info
                .payload()
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| info.payload().downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "<non-string panic payload>".to_string());

            match info.location() {
                Some(location) => error!(
                    file = location.file(),
                    line = location.line(),
                    column = location.column(),
                    "Unhandled error: {}",
                    message
                ),
                None => error!("Unhandled error: {}", message),
            }

            previous(info);
        }));
    });
}
