use std::time::{Duration, Instant};

pub(crate) fn trace(verbose: bool, l_type: &str, l_step: &str, start: Instant, _elapsed: Duration) -> Duration {
    if verbose {
        log::debug!("{} | Total={:.2?} | {}={:.2?}", l_type, start.elapsed(), l_step, start.elapsed() - _elapsed);
    }
    else {
        log::trace!("{} | Total={:.2?} | {}={:.2?}", l_type, start.elapsed(), l_step, start.elapsed() - _elapsed);
    }
    start.elapsed()
}

pub(crate) fn human_bytes(size: f64) -> String {
    let units = ["B", "KiB", "MiB", "GiB", "TiB"];
    let mut size = size;
    let mut unit_index = 0;
    while size >= 1024.0 && unit_index < units.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }
    format!("{:.1} {}", size, units[unit_index])
}
