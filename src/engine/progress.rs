//! Record counter on stderr for verbose runs.

use kdam::{Animation, Bar, BarExt};

/// Create a counter for unknown total (shows count without percentage)
pub fn create_counter(desc: &'static str) -> Bar {
    kdam::tqdm!(
        total = 0,
        desc = desc,
        animation = Animation::Classic,
        position = 0,
        unit = " records"
    )
}

/// Force a refresh of the bar (e.g. so counter shows "0 records" immediately).
pub fn refresh_bar(bar: &mut Option<Bar>) {
    if let Some(bar) = bar {
        let _ = bar.refresh();
    }
}

/// Advance the counter if one is shown.
pub fn update_counter(bar: &mut Option<Bar>, n: usize) {
    if let Some(bar) = bar {
        let _ = bar.update(n);
    }
}
