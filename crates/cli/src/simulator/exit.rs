//! Exit requests raised while the light is animating.
//!
//! Two watchers share one `watch` channel: a thread reading stdin lines
//! for `q`, and a task waiting for Ctrl+C. The tick loop only reads the
//! flag, so it never blocks on input.

use std::io::BufRead;
use std::sync::Arc;

use tokio::sync::watch;

/// Handle to the shared exit flag.
#[derive(Clone)]
pub(crate) struct ExitSignal {
    tx: Arc<watch::Sender<bool>>,
}

impl ExitSignal {
    pub(crate) fn new() -> (Self, watch::Receiver<bool>) {
        let (tx, rx) = watch::channel(false);
        (Self { tx: Arc::new(tx) }, rx)
    }

    pub(crate) fn trigger(&self) {
        self.tx.send_replace(true);
    }

    /// Watch `input` on a plain thread until a line reading `q` arrives
    /// or input ends.
    ///
    /// A runtime task would make shutdown wait on the blocking read.
    pub(crate) fn watch_lines<R>(&self, input: R)
    where
        R: BufRead + Send + 'static,
    {
        let signal = self.clone();
        std::thread::spawn(move || {
            for line in input.lines() {
                match line {
                    Ok(line) if line.trim().eq_ignore_ascii_case("q") => {
                        tracing::debug!("exit requested from keyboard");
                        signal.trigger();
                        return;
                    }
                    Ok(_) => {}
                    Err(_) => return,
                }
            }
        });
    }

    /// Trigger on Ctrl+C. Must be called inside a tokio runtime.
    pub(crate) fn watch_ctrl_c(&self) {
        let signal = self.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::debug!("exit requested by interrupt");
                signal.trigger();
            }
        });
    }
}
