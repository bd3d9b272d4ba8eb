//! Line-oriented diff rendering for failed cases.

/// Render a unified-style diff of `expected` against `actual`.
///
/// Lines are aligned by a longest-common-subsequence table; unchanged lines
/// carry a two-space prefix, removals `-` and additions `+`. Control bytes
/// are escaped so NULs and newlines inside a value stay visible.
#[must_use]
pub fn render_diff(expected: &str, actual: &str) -> String {
    let old: Vec<&str> = expected.split('\n').collect();
    let new: Vec<&str> = actual.split('\n').collect();

    // lcs[i][j] = common length of old[i..] and new[j..].
    let mut lcs = vec![vec![0usize; new.len() + 1]; old.len() + 1];
    for i in (0..old.len()).rev() {
        for j in (0..new.len()).rev() {
            lcs[i][j] = if old[i] == new[j] {
                lcs[i + 1][j + 1] + 1
            } else {
                lcs[i + 1][j].max(lcs[i][j + 1])
            };
        }
    }

    let mut out = String::from("--- expected\n+++ actual\n");
    let (mut i, mut j) = (0, 0);
    while i < old.len() || j < new.len() {
        if i < old.len() && j < new.len() && old[i] == new[j] {
            push_line(&mut out, ' ', old[i]);
            i += 1;
            j += 1;
        } else if j < new.len() && (i == old.len() || lcs[i][j + 1] >= lcs[i + 1][j]) {
            push_line(&mut out, '+', new[j]);
            j += 1;
        } else {
            push_line(&mut out, '-', old[i]);
            i += 1;
        }
    }
    out
}

fn push_line(out: &mut String, tag: char, line: &str) {
    out.push(tag);
    out.push(' ');
    out.push_str(&line.escape_debug().to_string());
    out.push('\n');
}
