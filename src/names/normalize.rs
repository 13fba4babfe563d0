/// Characters that are not allowed in a metric name and become `_`.
const ILLEGAL_NAME_CHARS: [char; 11] = [',', '+', '*', '-', '/', '(', ')', '[', ']', '{', '}'];

/// Normalize a raw metric name into its canonical form
///
/// When `captures` is non-empty the canonical name is built from the captured groups joined
/// with `_`, otherwise `raw` is used as-is. The result is then:
///
/// 1. split on dots and CamelCase boundaries (`DiskUsage.total` becomes `Disk_Usage_total`),
/// 2. lower-cased,
/// 3. stripped of characters that are illegal in metric names,
/// 4. collapsed so that no `_` repeats, leads, or trails.
///
/// The function is total and idempotent.
#[must_use]
pub fn normalize_metric_name(raw: &str, captures: &[&str]) -> String {
    let joined;
    let name = if captures.is_empty() {
        raw
    } else {
        joined = captures.join("_");
        joined.as_str()
    };

    let snake = split_camel_case(&name.replace('.', "_")).to_lowercase();

    let replaced: String = snake
        .chars()
        .map(|c| if ILLEGAL_NAME_CHARS.contains(&c) { '_' } else { c })
        .collect();

    let collapsed = collapse_underscores(&replaced);
    let trimmed = collapsed.strip_prefix('_').unwrap_or(&collapsed);
    let trimmed = trimmed.strip_suffix('_').unwrap_or(trimmed);

    trimmed.replace("._", ".").replace("_.", ".")
}

/// Insert `_` in front of every run of ASCII upper-case letters except at the very start
///
/// A run that begins the name keeps its first letter unprefixed; the remainder of such a run is
/// treated as a run of its own (`ABc` becomes `A_Bc`).
fn split_camel_case(name: &str) -> String {
    let mut result = String::with_capacity(name.len() + 8);
    let mut in_run = false;

    for (i, c) in name.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i == 0 {
                in_run = false;
            } else if !in_run {
                result.push('_');
                in_run = true;
            }
        } else {
            in_run = false;
        }

        result.push(c);
    }

    result
}

fn collapse_underscores(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    let mut previous_underscore = false;

    for c in name.chars() {
        if c == '_' {
            if previous_underscore {
                continue;
            }
            previous_underscore = true;
        } else {
            previous_underscore = false;
        }

        result.push(c);
    }

    result
}
