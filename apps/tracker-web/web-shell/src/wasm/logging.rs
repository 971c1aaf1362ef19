use super::*;

    use std::fmt::Write as _;

    use tracing::field::{Field, Visit};
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::filter::LevelFilter;
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    /// Forwards `tracing` events to the browser console as one line each:
    /// `target: message key=value ...`.
    struct ConsoleLayer;

    impl<S: Subscriber> Layer<S> for ConsoleLayer {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            let metadata = event.metadata();
            let mut visitor = LineVisitor::default();
            event.record(&mut visitor);
            let line = JsValue::from_str(&format!("{}: {}", metadata.target(), visitor.finish()));
            match *metadata.level() {
                Level::ERROR => web_sys::console::error_1(&line),
                Level::WARN => web_sys::console::warn_1(&line),
                _ => web_sys::console::log_1(&line),
            }
        }
    }

    #[derive(Default)]
    struct LineVisitor {
        message: String,
        fields: String,
    }

    impl LineVisitor {
        fn finish(self) -> String {
            if self.fields.is_empty() {
                self.message
            } else {
                format!("{}{}", self.message, self.fields)
            }
        }
    }

    impl Visit for LineVisitor {
        fn record_str(&mut self, field: &Field, value: &str) {
            if field.name() == "message" {
                self.message.push_str(value);
            } else {
                let _ = write!(self.fields, " {}={value}", field.name());
            }
        }

        fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
            if field.name() == "message" {
                let _ = write!(self.message, "{value:?}");
            } else {
                let _ = write!(self.fields, " {}={value:?}", field.name());
            }
        }
    }

    pub(super) fn install_console_logging() {
        let subscriber = tracing_subscriber::registry()
            .with(LevelFilter::INFO)
            .with(ConsoleLayer);
        // A second boot in the same page keeps the first subscriber.
        let _ = tracing::subscriber::set_global_default(subscriber);
    }
