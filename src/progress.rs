use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use colored::*;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use url::Url;

use crate::observer::LoadObserver;

/// Shows one spinner per asset download on stderr.
pub struct ProgressObserver {
    multi: MultiProgress,
    bars: Mutex<HashMap<Url, Vec<ProgressBar>>>,
    style: ProgressStyle,
}

impl ProgressObserver {
    /// Returns `None` when stderr is not a terminal.
    pub fn for_terminal() -> Option<Self> {
        if !console::Term::stderr().is_term() {
            return None;
        }
        Some(Self::with_draw_target(ProgressDrawTarget::stderr()))
    }

    pub fn with_draw_target(target: ProgressDrawTarget) -> Self {
        let style = ProgressStyle::default_spinner()
            .template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());

        Self {
            multi: MultiProgress::with_draw_target(target),
            bars: Mutex::new(HashMap::new()),
            style,
        }
    }

    fn take(&self, url: &Url) -> Option<ProgressBar> {
        let mut bars = self.bars.lock().ok()?;
        let pending = bars.get_mut(url)?;
        let bar = pending.pop();
        if pending.is_empty() {
            bars.remove(url);
        }
        bar
    }
}

impl LoadObserver for ProgressObserver {
    fn asset_fetch_started(&self, url: &Url) {
        let bar = self.multi.add(ProgressBar::new_spinner());
        bar.set_style(self.style.clone());
        bar.set_message(format!("{} is downloading", url));
        bar.enable_steady_tick(Duration::from_millis(100));

        if let Ok(mut bars) = self.bars.lock() {
            bars.entry(url.clone()).or_default().push(bar);
        }
    }

    fn asset_fetch_finished(&self, url: &Url, _bytes: usize) {
        if let Some(bar) = self.take(url) {
            bar.finish_with_message(format!("{} {} downloaded successfully", "✔".green(), url));
        }
    }

    fn asset_fetch_failed(&self, url: &Url, _reason: &str) {
        if let Some(bar) = self.take(url) {
            bar.abandon_with_message(format!("{} {} downloading failed", "✖".red(), url));
        }
    }
}
