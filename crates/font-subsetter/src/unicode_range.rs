use std::fmt::Write;

/// Collapses sorted codepoints into CSS `unicode-range` tokens.
///
/// Consecutive runs become `U+START-END`, lone codepoints `U+CP`, with
/// uppercase hex and no zero padding.
pub fn format_unicode_ranges(codepoints: impl IntoIterator<Item = u32>) -> Vec<String> {
    let mut sorted: Vec<u32> = codepoints.into_iter().collect();
    sorted.sort_unstable();
    sorted.dedup();

    let mut chunks = Vec::new();
    let mut iter = sorted.into_iter();
    let Some(first) = iter.next() else {
        return chunks;
    };

    let (mut start, mut end) = (first, first);
    for cp in iter {
        if cp == end + 1 {
            end = cp;
            continue;
        }
        chunks.push(token(start, end));
        start = cp;
        end = cp;
    }
    chunks.push(token(start, end));
    chunks
}

fn token(start: u32, end: u32) -> String {
    let mut s = format!("U+{start:X}");
    if end > start {
        let _ = write!(s, "-{end:X}");
    }
    s
}
