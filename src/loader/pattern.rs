//! Immutable matchers for the numeric fields of `v`, `vt` and `vn` lines.
//!
//! A field is a plain decimal: optional `-`, one or more digits, a literal
//! `.`, one or more digits (`-?[0-9]+\.[0-9]+`). No exponent, no leading `+`,
//! no bare integers. A line's payload matches a [`VectorPattern<N>`] when it
//! contains `N` such fields separated by single spaces anywhere in it; the
//! leftmost occurrence wins and anything around it is ignored.
//!
//! The patterns are built once per load ([`FieldPatterns::new`]) and handed
//! to the parser by reference.

/// Matcher for a single `-?[0-9]+\.[0-9]+` field.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecimalPattern;

impl DecimalPattern {
    /// Match a field starting exactly at `start`; returns the end offset.
    pub fn match_at(&self, bytes: &[u8], start: usize) -> Option<usize> {
        let mut i = start;
        if bytes.get(i) == Some(&b'-') {
            i += 1;
        }

        let int_end = Self::digits(bytes, i);
        if int_end == i || bytes.get(int_end) != Some(&b'.') {
            return None;
        }

        let frac_start = int_end + 1;
        let frac_end = Self::digits(bytes, frac_start);
        if frac_end == frac_start {
            return None;
        }
        Some(frac_end)
    }

    fn digits(bytes: &[u8], from: usize) -> usize {
        let run = bytes
            .get(from..)
            .map_or(0, |rest| rest.iter().take_while(|b| b.is_ascii_digit()).count());
        from + run
    }
}

/// Matcher for `N` space-separated decimal fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct VectorPattern<const N: usize> {
    field: DecimalPattern,
}

impl<const N: usize> VectorPattern<N> {
    pub const fn new() -> Self {
        Self {
            field: DecimalPattern,
        }
    }

    /// Find the leftmost match in `text` and return the text of each field.
    ///
    /// Only the start of a digit run (or a `-` right before one) can begin
    /// the leftmost match: a match starting inside a run would also match
    /// from the run's first digit. After a failed attempt the whole run is
    /// skipped, which keeps the scan linear in the payload length.
    pub fn find<'t>(&self, text: &'t str) -> Option<[&'t str; N]> {
        let bytes = text.as_bytes();
        let mut start = 0;
        while let Some(&byte) = bytes.get(start) {
            if byte != b'-' && !byte.is_ascii_digit() {
                start += 1;
                continue;
            }
            if let Some(fields) = self.match_at(text, start) {
                return Some(fields);
            }
            let run_start = if byte == b'-' { start + 1 } else { start };
            start = DecimalPattern::digits(bytes, run_start).max(start + 1);
        }
        None
    }

    /// Find the leftmost match and parse each field.
    pub fn parse(&self, text: &str) -> Option<[f32; N]> {
        let fields = self.find(text)?;
        let mut values = [0.0; N];
        for (value, field) in values.iter_mut().zip(fields) {
            *value = field.parse().ok()?;
        }
        Some(values)
    }

    fn match_at<'t>(&self, text: &'t str, start: usize) -> Option<[&'t str; N]> {
        let bytes = text.as_bytes();
        let mut fields = [""; N];
        let mut pos = start;

        for (i, field) in fields.iter_mut().enumerate() {
            if i > 0 {
                if bytes.get(pos) != Some(&b' ') {
                    return None;
                }
                pos += 1;
            }
            let end = self.field.match_at(bytes, pos)?;
            // Field boundaries are ASCII, so slicing stays on char boundaries.
            *field = text.get(pos..end)?;
            pos = end;
        }
        Some(fields)
    }
}

/// The set of patterns a model parse needs.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldPatterns {
    pub vec2: VectorPattern<2>,
    pub vec3: VectorPattern<3>,
}

impl FieldPatterns {
    pub const fn new() -> Self {
        Self {
            vec2: VectorPattern::new(),
            vec3: VectorPattern::new(),
        }
    }
}
