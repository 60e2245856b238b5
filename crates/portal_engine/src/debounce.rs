use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Trailing-edge debouncer.
///
/// Every [`push`](Debouncer::push) restarts the quiet interval; the last value
/// is handed to the settle callback once the interval elapses without further
/// input. There is no upper bound on the total wait. Disposing or dropping the
/// debouncer cancels any pending emission.
pub struct Debouncer<T> {
    tx: mpsc::UnboundedSender<T>,
    cancel: CancellationToken,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Must be called within a tokio runtime.
    pub fn spawn<F>(quiet: Duration, on_settle: F) -> Self
    where
        F: Fn(T) + Send + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<T>();
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        tokio::spawn(async move {
            let mut pending: Option<T> = None;
            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    received = rx.recv() => match received {
                        Some(value) => pending = Some(value),
                        None => break,
                    },
                    _ = tokio::time::sleep(quiet), if pending.is_some() => {
                        if let Some(value) = pending.take() {
                            on_settle(value);
                        }
                    }
                }
            }
        });

        Self { tx, cancel }
    }

    pub fn push(&self, value: T) {
        if self.cancel.is_cancelled() {
            return;
        }
        let _ = self.tx.send(value);
    }

    pub fn dispose(&self) {
        self.cancel.cancel();
    }

    pub fn is_disposed(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn recorder() -> (Arc<Mutex<Vec<String>>>, impl Fn(String) + Send + 'static) {
        let settled = Arc::new(Mutex::new(Vec::new()));
        let sink = settled.clone();
        (settled, move |value: String| sink.lock().unwrap().push(value))
    }

    #[tokio::test(start_paused = true)]
    async fn burst_settles_once_with_last_value() {
        let (settled, on_settle) = recorder();
        let debouncer = Debouncer::spawn(Duration::from_millis(500), on_settle);

        for text in ["p", "pe", "per", "peru"] {
            debouncer.push(text.to_string());
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        assert!(settled.lock().unwrap().is_empty());

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(*settled.lock().unwrap(), vec!["peru".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn steady_input_defers_indefinitely() {
        let (settled, on_settle) = recorder();
        let debouncer = Debouncer::spawn(Duration::from_millis(500), on_settle);

        for round in 0..20 {
            debouncer.push(format!("v{round}"));
            tokio::time::sleep(Duration::from_millis(400)).await;
        }
        assert!(settled.lock().unwrap().is_empty());

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(*settled.lock().unwrap(), vec!["v19".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn dispose_cancels_pending_emission() {
        let (settled, on_settle) = recorder();
        let debouncer = Debouncer::spawn(Duration::from_millis(500), on_settle);

        debouncer.push("lima".to_string());
        tokio::time::sleep(Duration::from_millis(100)).await;
        debouncer.dispose();
        debouncer.push("cusco".to_string());
        tokio::time::sleep(Duration::from_secs(2)).await;

        assert!(debouncer.is_disposed());
        assert!(settled.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn drop_cancels_pending_emission() {
        let (settled, on_settle) = recorder();
        let debouncer = Debouncer::spawn(Duration::from_millis(500), on_settle);
        debouncer.push("arequipa".to_string());
        drop(debouncer);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(settled.lock().unwrap().is_empty());
    }
}
