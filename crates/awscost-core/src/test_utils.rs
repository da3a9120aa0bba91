//! Shared helpers for unit tests

use once_cell::sync::Lazy;
use std::env;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Serializes tests that touch process environment variables
pub static ENV_MUTEX: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

/// Take the environment lock, ignoring poisoning from a failed test
pub fn lock_env() -> MutexGuard<'static, ()> {
    ENV_MUTEX.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Restores every variable it touched when dropped, even on panic
#[derive(Default)]
pub struct EnvVarGuard {
    saved: Vec<(String, Option<String>)>,
}

impl EnvVarGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: &str, value: &str) {
        self.saved.push((key.to_string(), env::var(key).ok()));
        // SAFETY: callers hold ENV_MUTEX
        unsafe {
            env::set_var(key, value);
        }
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        for (key, value) in self.saved.iter().rev() {
            unsafe {
                match value {
                    Some(v) => env::set_var(key, v),
                    None => env::remove_var(key),
                }
            }
        }
    }
}
