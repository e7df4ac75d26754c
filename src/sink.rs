/// Receiver of the human-readable messages a container emits
/// (loading banners, override warnings, content listings).
///
/// A container works the same with or without a sink.
pub trait MessageSink: Send + Sync {
    fn info(&self, message: &str);

    fn warn(&self, message: &str);
}

/// Forwards messages to [`tracing`] as `info` and `warn` events
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl MessageSink for TracingSink {
    #[inline]
    fn info(&self, message: &str) {
        tracing::info!("{}", message);
    }

    #[inline]
    fn warn(&self, message: &str) {
        tracing::warn!("{}", message);
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::{MessageSink as _, TracingSink};

    use alloc::{
        format,
        string::{String, ToString as _},
    };
    use tracing_test::traced_test;

    #[test]
    #[traced_test]
    fn test_tracing_sink() {
        TracingSink.info("Loading container:");
        TracingSink.warn("Override register for dependency with name 'a'");

        assert!(logs_contain("Loading container:"));
        assert!(logs_contain("Override register for dependency with name 'a'"));
    }
}
