use std::panic::{self, AssertUnwindSafe};
use std::sync::{OnceLock, RwLock};

use tracing::error;

/// Process-wide panic hook invoked by [`spawn_guarded`] when a guarded
/// closure panics. Swappable via [`set_panic_hook`] so callers can route
/// crash reporting without touching every call site.
type PanicHook = Box<dyn Fn(&str) + Send + Sync>;

fn panic_hook() -> &'static RwLock<Option<PanicHook>> {
    static HOOK: OnceLock<RwLock<Option<PanicHook>>> = OnceLock::new();
    HOOK.get_or_init(|| RwLock::new(None))
}

/// Install a process-wide hook run after a panic is caught by
/// [`spawn_guarded`]. Replaces any previously installed hook.
pub fn set_panic_hook<F>(hook: F)
where
    F: Fn(&str) + Send + Sync + 'static,
{
    *panic_hook().write().expect("panic hook lock poisoned") = Some(Box::new(hook));
}

/// Run `f` inside `std::thread::spawn`, catching any panic so a single
/// background task (PTY reader pump, resize loop, etc.) cannot take the
/// process down. A caught panic is logged and handed to the installed
/// panic hook, itself run through `catch_unwind` so a panicking hook
/// cannot escape either.
pub fn spawn_guarded<F>(name: &str, f: F) -> std::thread::JoinHandle<()>
where
    F: FnOnce() + Send + 'static,
{
    let name = name.to_string();
    std::thread::Builder::new()
        .name(name.clone())
        .spawn(move || {
            let result = panic::catch_unwind(AssertUnwindSafe(f));
            if let Err(payload) = result {
                let message = panic_message(&payload);
                error!(event = "pty.guard.panic_recovered", task = name.as_str(), payload = %message);

                let hook_guard = panic_hook().read().expect("panic hook lock poisoned");
                if let Some(hook) = hook_guard.as_ref() {
                    let _ = panic::catch_unwind(AssertUnwindSafe(|| hook(&message)));
                }
            }
        })
        .expect("failed to spawn guarded thread")
}

fn panic_message(payload: &Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
