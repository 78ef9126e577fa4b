//! Human-readable byte counts for progress lines.

const UNITS: [&str; 4] = ["B", "K", "M", "G"];

/// Formats `n` as the integer quotient in the largest unit that keeps it below
/// 1024, with a one-letter suffix: `1023 -> "1023B"`, `1536 -> "1K"`.
///
/// Shifting truncates. Anything at or beyond 1024 GiB stays in `G`.
pub fn human_size(n: u64) -> String {
    if n == 0 {
        return format!("0{}", UNITS[0]);
    }
    let index = ((n.ilog2() / 10) as usize).min(UNITS.len() - 1);
    format!("{}{}", n >> (10 * index), UNITS[index])
}
