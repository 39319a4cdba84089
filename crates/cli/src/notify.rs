use engine_core::notify::Notifier;

/// Shows notices on stderr, next to the log, so stdout carries only the
/// report. Notices are not logged again; each outcome appears once.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl ConsoleNotifier {
    fn line(ok: bool, message: &str) -> String {
        let mark = if ok { '✔' } else { '✘' };
        format!("{mark} {message}")
    }
}

impl Notifier for ConsoleNotifier {
    fn success(&self, message: &str) {
        eprintln!("{}", Self::line(true, message));
    }

    fn error(&self, message: &str) {
        eprintln!("{}", Self::line(false, message));
    }
}
