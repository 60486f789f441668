#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffLineKind {
    Same,
    Added,
    Removed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLine {
    pub kind: DiffLineKind,
    pub text: String,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct DiffReport {
    pub lines: Vec<DiffLine>,
    pub added: usize,
    pub removed: usize,
}

impl DiffReport {
    pub fn has_changes(&self) -> bool {
        self.added + self.removed > 0
    }

    fn push(&mut self, kind: DiffLineKind, text: &str) {
        match kind {
            DiffLineKind::Added => self.added += 1,
            DiffLineKind::Removed => self.removed += 1,
            DiffLineKind::Same => {}
        }
        self.lines.push(DiffLine { kind, text: text.to_string() });
    }
}

/// Line-level diff of two texts via longest common subsequence. Removed
/// lines are emitted before added ones at each divergence.
pub fn line_diff(before: &str, after: &str) -> DiffReport {
    let src: Vec<&str> = before.lines().collect();
    let dst: Vec<&str> = after.lines().collect();
    let n = src.len();
    let m = dst.len();

    // dp[i][j] holds the LCS length of src[i..] and dst[j..].
    let mut dp = vec![vec![0usize; m + 1]; n + 1];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            dp[i][j] = if src[i] == dst[j] {
                1 + dp[i + 1][j + 1]
            } else {
                dp[i + 1][j].max(dp[i][j + 1])
            };
        }
    }

    let mut report = DiffReport::default();
    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if src[i] == dst[j] {
            report.push(DiffLineKind::Same, src[i]);
            i += 1;
            j += 1;
        } else if dp[i + 1][j] >= dp[i][j + 1] {
            report.push(DiffLineKind::Removed, src[i]);
            i += 1;
        } else {
            report.push(DiffLineKind::Added, dst[j]);
            j += 1;
        }
    }
    while i < n {
        report.push(DiffLineKind::Removed, src[i]);
        i += 1;
    }
    while j < m {
        report.push(DiffLineKind::Added, dst[j]);
        j += 1;
    }
    report
}

#[cfg(test)]
mod tests {
    use super::{DiffLineKind, line_diff};

    fn kinds(before: &str, after: &str) -> Vec<(DiffLineKind, String)> {
        line_diff(before, after)
            .lines
            .into_iter()
            .map(|l| (l.kind, l.text))
            .collect()
    }

    #[test]
    fn identical_texts_have_no_changes() {
        let report = line_diff("a\nb\nc", "a\nb\nc");
        assert!(!report.has_changes());
        assert_eq!(report.added, 0);
        assert_eq!(report.removed, 0);
        assert!(report.lines.iter().all(|l| l.kind == DiffLineKind::Same));
    }

    #[test]
    fn insertion_keeps_surrounding_lines_common() {
        assert_eq!(
            kinds("a\nb", "a\nx\nb"),
            vec![
                (DiffLineKind::Same, "a".to_string()),
                (DiffLineKind::Added, "x".to_string()),
                (DiffLineKind::Same, "b".to_string()),
            ]
        );
    }

    #[test]
    fn replacement_emits_removed_then_added() {
        assert_eq!(
            kinds("a\nb\nc", "a\nx\nc"),
            vec![
                (DiffLineKind::Same, "a".to_string()),
                (DiffLineKind::Removed, "b".to_string()),
                (DiffLineKind::Added, "x".to_string()),
                (DiffLineKind::Same, "c".to_string()),
            ]
        );
    }

    #[test]
    fn one_sided_inputs_are_all_adds_or_removes() {
        let report = line_diff("", "a\nb");
        assert_eq!(report.added, 2);
        assert_eq!(report.removed, 0);

        let report = line_diff("a\nb", "");
        assert_eq!(report.added, 0);
        assert_eq!(report.removed, 2);
    }

    #[test]
    fn counts_track_emitted_lines() {
        let report = line_diff("a\nb\nc\nd", "a\nc\nx\nd\ny");
        assert_eq!(report.removed, 1);
        assert_eq!(report.added, 2);
    }
}
