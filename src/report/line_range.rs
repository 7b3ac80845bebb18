use serde::Serialize;

/// Inclusive range of source lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct LineRange {
    start: usize,
    end: usize,
}

impl LineRange {
    /// Create a range, ordering the bounds. A zero bound next to a positive
    /// one collapses onto the positive value.
    pub fn new(start: usize, end: usize) -> Self {
        let (start, end) = normalize_pair(start, end);
        LineRange { start, end }
    }

    /// Single-line range.
    pub fn line(line: usize) -> Self {
        LineRange::new(line, line)
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn contains(&self, line: usize) -> bool {
        self.start <= line && line <= self.end
    }
}

/// Clamp a (start, end) pair so that `end >= start`, replacing a missing
/// (zero) side with the other one.
pub(crate) fn normalize_pair(start: usize, end: usize) -> (usize, usize) {
    match (start, end) {
        (0, end) => (end, end),
        (start, 0) => (start, start),
        (start, end) if end < start => (end, start),
        pair => pair,
    }
}

/// Additional line ranges of an issue, kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct LineRangeList {
    ranges: Vec<LineRange>,
}

impl LineRangeList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, range: LineRange) {
        self.ranges.push(range);
    }

    pub fn add_all(&mut self, ranges: impl IntoIterator<Item = LineRange>) {
        self.ranges.extend(ranges);
    }

    pub fn get(&self, index: usize) -> Option<&LineRange> {
        self.ranges.get(index)
    }

    pub fn first(&self) -> Option<&LineRange> {
        self.ranges.first()
    }

    /// Remove and return the range at `index`, if present.
    pub fn remove(&mut self, index: usize) -> Option<LineRange> {
        if index < self.ranges.len() {
            Some(self.ranges.remove(index))
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LineRange> {
        self.ranges.iter()
    }

    /// True if any range covers `line`.
    pub fn contains(&self, line: usize) -> bool {
        self.ranges.iter().any(|r| r.contains(line))
    }

    pub fn as_slice(&self) -> &[LineRange] {
        &self.ranges
    }
}

impl FromIterator<LineRange> for LineRangeList {
    fn from_iter<I: IntoIterator<Item = LineRange>>(iter: I) -> Self {
        LineRangeList {
            ranges: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for LineRangeList {
    type Item = LineRange;
    type IntoIter = std::vec::IntoIter<LineRange>;

    fn into_iter(self) -> Self::IntoIter {
        self.ranges.into_iter()
    }
}

impl<'a> IntoIterator for &'a LineRangeList {
    type Item = &'a LineRange;
    type IntoIter = std::slice::Iter<'a, LineRange>;

    fn into_iter(self) -> Self::IntoIter {
        self.ranges.iter()
    }
}
