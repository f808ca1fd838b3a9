use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Keyboard poll interval; independent of the monitor's poll interval.
const KEY_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Quit keys: `q`/`Q`, plus Ctrl-C since raw mode keeps the terminal from
/// turning it into SIGINT.
fn is_quit_key(key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => true,
        KeyCode::Char('q') | KeyCode::Char('Q') => true,
        _ => false,
    }
}

/// Watch the keyboard until a quit key arrives, then cancel `token` and
/// await the monitor task.
///
/// Returns only after the monitor has fully stopped, so no log line can be
/// emitted once control is back with the caller. Cancelling an
/// already-cancelled token is a no-op, so a second trigger during shutdown
/// does nothing. If the terminal cannot be polled at all, that is treated
/// as a quit request rather than left to spin on a dead input stream.
pub async fn wait_for_quit(token: CancellationToken, monitor: JoinHandle<()>) {
    let raw_mode = enable_raw_mode();
    if let Err(e) = &raw_mode {
        debug!(error = %e, "raw mode unavailable, quit key may require a newline");
    }

    loop {
        match event::poll(KEY_POLL_INTERVAL) {
            Ok(true) => match event::read() {
                Ok(Event::Key(key)) if is_quit_key(&key) => break,
                Ok(_) => {}
                Err(e) => {
                    warn!(error = %e, "failed to read terminal input, shutting down");
                    break;
                }
            },
            Ok(false) => {}
            Err(e) => {
                warn!(error = %e, "failed to poll terminal input, shutting down");
                break;
            }
        }
    }

    token.cancel();
    if let Err(e) = monitor.await {
        warn!(error = %e, "monitor task did not shut down cleanly");
    }

    if raw_mode.is_ok() {
        let _ = disable_raw_mode();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quit_on_q_either_case() {
        let q = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        let shift_q = KeyEvent::new(KeyCode::Char('Q'), KeyModifiers::SHIFT);
        assert!(is_quit_key(&q));
        assert!(is_quit_key(&shift_q));
    }

    #[test]
    fn test_quit_on_ctrl_c_only_with_modifier() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        let plain_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE);
        assert!(is_quit_key(&ctrl_c));
        assert!(!is_quit_key(&plain_c));
    }

    #[test]
    fn test_other_keys_ignored() {
        let x = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE);
        let enter = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        assert!(!is_quit_key(&x));
        assert!(!is_quit_key(&enter));
    }

    #[tokio::test]
    async fn test_caller_unblocks_only_after_monitor_stops() {
        // Drive the cancel-then-await contract directly, without a terminal.
        let token = CancellationToken::new();
        let inner = token.clone();
        let monitor = tokio::spawn(async move {
            inner.cancelled().await;
            tokio::time::sleep(Duration::from_millis(100)).await;
        });

        let started = tokio::time::Instant::now();
        token.cancel();
        monitor.await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(100));
    }
}
