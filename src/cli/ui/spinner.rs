//! Progress indicator for network calls

use colored::*;
use is_terminal::IsTerminal;
use std::io::{self, Write};
use std::time::Duration;
use tokio::sync::oneshot;

const FRAMES: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
const FRAME_INTERVAL: Duration = Duration::from_millis(80);

/// Animated spinner on stdout, cleared when dropped
///
/// When stdout is not a terminal nothing is drawn, so piped output stays clean.
pub struct Spinner {
    stop_tx: Option<oneshot::Sender<()>>,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl Spinner {
    pub fn start(message: impl Into<String>) -> Self {
        if !io::stdout().is_terminal() {
            return Self { stop_tx: None, handle: None };
        }

        let (stop_tx, stop_rx) = oneshot::channel();
        let handle = tokio::spawn(Self::animate(message.into(), stop_rx));
        Self {
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        }
    }

    pub fn stop(mut self) {
        self.halt();
    }

    fn halt(&mut self) {
        let drawing = self.handle.is_some();
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
        if drawing {
            clear_line();
        }
    }

    async fn animate(message: String, mut stop_rx: oneshot::Receiver<()>) {
        let mut stdout = io::stdout();
        for frame in FRAMES.iter().cycle() {
            print!("\r{} {}", frame.to_string().bright_cyan(), message);
            let _ = stdout.flush();

            tokio::select! {
                _ = tokio::time::sleep(FRAME_INTERVAL) => {}
                _ = &mut stop_rx => break,
            }
        }
        clear_line();
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.halt();
    }
}

fn clear_line() {
    print!("\r\x1b[K");
    let _ = io::stdout().flush();
}

/// Await `future` with a spinner showing `message`
pub async fn with_spinner<F, T>(message: impl Into<String>, future: F) -> T
where
    F: std::future::Future<Output = T>,
{
    let _spinner = Spinner::start(message);
    future.await
}
