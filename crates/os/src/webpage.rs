//! Opening URLs in the user's default browser.

use crate::process::{ProcessSpec, Spawner, run_with};

#[cfg(target_os = "windows")]
const URL_HANDLER: &str = "explorer.exe";

#[cfg(target_os = "macos")]
const URL_HANDLER: &str = "open";

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
const URL_HANDLER: &str = "xdg-open";

/// Opens webpages through the platform URL handler and remembers whether
/// one was ever opened.
///
/// Owners keep one opener for as long as they care about that flag, e.g. to
/// avoid opening the same page twice from a menu.
#[derive(Debug, Default)]
pub struct WebpageOpener {
    opened: bool,
}

impl WebpageOpener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if any `open` call was accepted by the OS.
    pub fn was_opened(&self) -> bool {
        self.opened
    }

    /// Opens `url` with the native spawner.
    pub fn open(&mut self, url: &str) -> bool {
        self.open_with(&crate::NativeSpawner, url)
    }

    /// Opens `url` through `spawner`.
    pub fn open_with<S: Spawner>(&mut self, spawner: &S, url: &str) -> bool {
        tracing::info!(url, handler = URL_HANDLER, "opening webpage");
        let launched = run_with(spawner, &ProcessSpec::new(URL_HANDLER).arg(url));
        self.opened |= launched;
        launched
    }
}
