//! Detection of SQL bodies that contain nothing executable.

/// Returns `true` when `sql` holds only blank lines, `--` line comments and
/// `/* ... */` block comments.
///
/// Block comments may span lines and may open and close several times on a
/// single line. Whatever follows a closing `*/` is evaluated with the same
/// rules, so `/* note */ DROP TABLE t;` is not a no-op.
pub fn is_no_op(sql: &str) -> bool {
    let mut in_block = false;
    for line in sql.lines() {
        match scan_line(line, in_block) {
            Some(still_in_block) => in_block = still_in_block,
            None => return false,
        }
    }
    true
}

/// Scan one line starting in the given block-comment state.
///
/// Returns the block-comment state at the end of the line, or `None` as soon
/// as executable text is found.
fn scan_line(line: &str, mut in_block: bool) -> Option<bool> {
    let mut rest = line;
    loop {
        if in_block {
            match rest.find("*/") {
                Some(end) => {
                    rest = &rest[end + 2..];
                    in_block = false;
                }
                None => return Some(true),
            }
        }

        let trimmed = rest.trim_start();
        if trimmed.is_empty() || trimmed.starts_with("--") {
            return Some(false);
        }
        match trimmed.strip_prefix("/*") {
            Some(after_open) => {
                rest = after_open;
                in_block = true;
            }
            None => return None,
        }
    }
}

#[cfg(test)]
#[path = "noop_test.rs"]
mod tests;
