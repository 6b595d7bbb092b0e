use regex::Regex;

/// Expand compact range tokens like "99242-99245" into individual codes.
///
/// The range pattern must sit at the start of the token; anything else passes
/// through unchanged. A reversed range ("99250-99248") expands to nothing.
pub fn expand_service_ranges(service_codes: &[String]) -> Vec<String> {
    let range_pattern = Regex::new(r"^(\d+)\s*-\s*(\d+)").unwrap();
    let mut expanded = Vec::new();

    for code in service_codes {
        match range_pattern.captures(code) {
            Some(caps) => match (caps[1].parse::<u64>(), caps[2].parse::<u64>()) {
                (Ok(start), Ok(end)) => {
                    for num in start..=end {
                        expanded.push(num.to_string());
                    }
                }
                // digits too long to be a real code range
                _ => expanded.push(code.clone()),
            },
            None => expanded.push(code.clone()),
        }
    }

    expanded
}

/// Join values as a comma-separated string; empty input joins to "".
pub fn safe_join<T: std::fmt::Display>(values: &[T]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",")
}
