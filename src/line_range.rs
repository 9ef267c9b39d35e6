/// Inclusive 1-indexed line span used to scope mutation to part of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    pub start: usize,
    pub end: usize,
}

impl LineRange {
    pub fn new(start: usize, end: usize) -> LineRange {
        LineRange { start, end }
    }

    pub fn is_valid(&self, total_lines: usize) -> bool {
        self.start >= 1 && self.end >= self.start && self.end <= total_lines
    }
}

/// Extract the lines covered by `range`. An invalid range is not an error:
/// the whole text is returned with `valid = false` and the caller warns.
pub fn select(source: &str, range: LineRange) -> (String, bool) {
    let lines: Vec<&str> = source.lines().collect();
    if !range.is_valid(lines.len()) {
        return (source.to_string(), false);
    }
    (lines[range.start - 1..range.end].join("\n"), true)
}

/// Splice mutated sub-range lines back into their positions in the original.
/// Sub-range lines beyond the original span length are ignored; original
/// lines beyond the sub-text's length stay untouched. Pure.
pub fn reconstruct(original: &str, mutated_sub: &str, range: LineRange) -> String {
    let mut lines: Vec<String> = original.lines().map(|l| l.to_string()).collect();
    for (offset, sub_line) in mutated_sub.lines().enumerate() {
        let index = range.start - 1 + offset;
        if index >= lines.len() || index > range.end - 1 {
            break;
        }
        lines[index] = sub_line.to_string();
    }
    let mut result = lines.join("\n");
    if original.ends_with('\n') {
        result.push('\n');
    }
    result
}
