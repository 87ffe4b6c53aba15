//! HTTP byte-range header parsing

use peerdrive_store::ByteRange;

/// Parse a `Range` header against a known entity size.
///
/// Returns `None` when the header is not a byte-range header at all, and the
/// surviving specs otherwise. Invalid or unsatisfiable specs are dropped;
/// specs were present but none survived means the request is answerable only
/// with 416.
pub fn parse_range(header: &str, size: u64) -> Option<Vec<ByteRange>> {
    let specs = header.strip_prefix("bytes=")?;
    let mut ranges = Vec::new();
    if size == 0 {
        // no byte of an empty entity is addressable
        return Some(ranges);
    }
    for spec in specs.split(',') {
        let spec = spec.trim();
        let Some((start_s, end_s)) = spec.split_once('-') else {
            continue;
        };
        if start_s.is_empty() {
            // suffix form: the last N bytes
            let Ok(suffix) = end_s.trim().parse::<u64>() else {
                continue;
            };
            if suffix == 0 {
                continue;
            }
            ranges.push(ByteRange {
                start: size.saturating_sub(suffix),
                end: size - 1,
            });
        } else {
            let Ok(start) = start_s.trim().parse::<u64>() else {
                continue;
            };
            if start >= size {
                continue;
            }
            let end = if end_s.is_empty() {
                size - 1
            } else {
                match end_s.trim().parse::<u64>() {
                    Ok(end) => end.min(size - 1),
                    Err(_) => continue,
                }
            };
            if start > end {
                continue;
            }
            ranges.push(ByteRange { start, end });
        }
    }
    Some(ranges)
}
