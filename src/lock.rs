use std::sync::{Mutex, MutexGuard};

/// Lock a pane (or the layout) even if a writer panicked while holding it.
/// The writer's last state is kept and the poison flag cleared, so only the
/// first recovery per lock is reported.
pub(crate) fn lock_or_recover<'a, T>(
    lock: &'a Mutex<T>,
    pane: &'static str,
) -> MutexGuard<'a, T> {
    lock.lock().unwrap_or_else(|poisoned| {
        tracing::warn!(pane, "pane lock poisoned by a panicking writer, keeping its contents");
        lock.clear_poison();
        poisoned.into_inner()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn poisoned_pane_keeps_lines_and_heals() {
        let lines = Arc::new(Mutex::new(vec!["first".to_string()]));
        let writer = Arc::clone(&lines);
        let _ = thread::spawn(move || {
            let mut guard = writer.lock().expect("lock");
            guard.push("half-written".to_string());
            panic!("operation blew up mid-update");
        })
        .join();
        assert!(lines.is_poisoned());

        lock_or_recover(&lines, "log pane").push("after".to_string());
        assert!(!lines.is_poisoned());
        assert_eq!(
            *lock_or_recover(&lines, "log pane"),
            ["first", "half-written", "after"]
        );
    }
}
