use serde::{Deserialize, Serialize};

/// Lines of context kept on each side of the first divergence.
pub const CONTEXT_LINES: usize = 2;

/// Line-by-line comparison of a produced text with the expected one.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Comparison {
    /// Identical lines.
    pub equal: usize,
    /// Differing lines.
    pub diff: usize,
    /// Lines that differ but are whitespace-only on both sides.
    pub whitespace: usize,
    /// Index of the first differing line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_diff: Option<usize>,
    /// Produced lines around `first_diff`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub first_diff_region_out: Vec<String>,
    /// Expected lines around `first_diff`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub first_diff_region_exp: Vec<String>,
    /// The run itself failed; no line was compared.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Comparison {
    /// A scenario whose run failed.
    #[must_use]
    pub fn failed(error: String) -> Self {
        Self {
            error: Some(error),
            ..Self::default()
        }
    }

    /// No differing line and no run error.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.diff == 0 && self.error.is_none()
    }
}

/// Compare two texts line by line.
///
/// A line present on one side only is compared against an empty line.
///
/// # Example
/// ```
/// use ac_harness::compare::compare_texts;
/// let c = compare_texts("12\n34\n", "12\n35\n");
/// assert_eq!((c.equal, c.diff), (2, 1));
/// assert_eq!(c.first_diff, Some(1));
/// ```
#[must_use]
pub fn compare_texts(out: &str, expected: &str) -> Comparison {
    let out_lines: Vec<&str> = out.split('\n').collect();
    let exp_lines: Vec<&str> = expected.split('\n').collect();
    let mut result = Comparison::default();

    for lineno in 0..out_lines.len().max(exp_lines.len()) {
        let ol = out_lines.get(lineno).copied().unwrap_or("");
        let el = exp_lines.get(lineno).copied().unwrap_or("");
        if ol == el {
            result.equal += 1;
        } else if ol.trim().is_empty() && el.trim().is_empty() {
            result.whitespace += 1;
        } else {
            if result.diff == 0 {
                result.first_diff = Some(lineno);
            }
            result.diff += 1;
        }
    }

    if let Some(first) = result.first_diff {
        result.first_diff_region_out = region(&out_lines, first);
        result.first_diff_region_exp = region(&exp_lines, first);
    }
    result
}

fn region(lines: &[&str], around: usize) -> Vec<String> {
    let start = around.saturating_sub(CONTEXT_LINES);
    let end = (around + CONTEXT_LINES).min(lines.len());
    lines
        .get(start..end)
        .unwrap_or_default()
        .iter()
        .map(ToString::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_texts_pass() {
        let c = compare_texts("123\n456\n", "123\n456\n");
        assert_eq!(c.equal, 3);
        assert!(c.passed());
        assert!(c.first_diff.is_none());
    }

    #[test]
    fn whitespace_only_lines_are_counted_apart() {
        let c = compare_texts("1\n   \n", "1\n\t\n");
        assert_eq!((c.equal, c.whitespace, c.diff), (2, 1, 0));
        assert!(c.passed());
    }

    #[test]
    fn region_surrounds_first_divergence() {
        let out = "a\nb\nc\nX\ne\nf\nY";
        let exp = "a\nb\nc\nd\ne\nf\ng";
        let c = compare_texts(out, exp);
        assert_eq!(c.diff, 2);
        assert_eq!(c.first_diff, Some(3));
        assert_eq!(c.first_diff_region_out, vec!["b", "c", "X", "e"]);
        assert_eq!(c.first_diff_region_exp, vec!["b", "c", "d", "e"]);
    }

    #[test]
    fn region_is_clamped_at_start() {
        let c = compare_texts("X\nb", "a\nb");
        assert_eq!(c.first_diff_region_out, vec!["X", "b"]);
    }

    #[test]
    fn missing_lines_count_as_empty() {
        let c = compare_texts("1\n", "1\n2\n");
        assert_eq!((c.equal, c.diff, c.whitespace), (2, 1, 0));
        assert_eq!(c.first_diff, Some(1));
        assert_eq!(c.first_diff_region_out, vec!["1", ""]);
    }

    #[test]
    fn serialises_without_empty_fields() {
        let json = serde_json::to_value(compare_texts("a", "a")).unwrap();
        assert_eq!(json, serde_json::json!({"equal": 1, "diff": 0, "whitespace": 0}));
    }
}
