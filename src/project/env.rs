//! Scoped process environment changes.

use std::ffi::OsString;

/// Sets environment variables and restores their previous values (or
/// removes them) when dropped.
///
/// The environment is process-wide: only one scope should be alive at a
/// time and no other thread may read the environment meanwhile.
#[derive(Debug, Default)]
pub struct EnvScope {
    saved: Vec<(String, Option<OsString>)>,
}

impl EnvScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<OsString>) {
        let key = key.into();
        if !self.saved.iter().any(|(saved, _)| *saved == key) {
            self.saved.push((key.clone(), std::env::var_os(&key)));
        }
        let value = value.into();
        tracing::trace!("{}={}", key, value.to_string_lossy());
        // SAFETY: Kconfig loading is single-threaded and nothing else reads
        // the environment while a scope is alive.
        unsafe { std::env::set_var(&key, value) };
    }
}

impl Drop for EnvScope {
    fn drop(&mut self) {
        for (key, previous) in self.saved.drain(..).rev() {
            // SAFETY: see `set`.
            unsafe {
                match previous {
                    Some(value) => std::env::set_var(&key, value),
                    None => std::env::remove_var(&key),
                }
            }
        }
    }
}
