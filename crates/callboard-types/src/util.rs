/// Render a call duration as `"{m}m {s}s"`, or `"N/A"` when unknown or zero.
pub fn format_duration(seconds: Option<u64>) -> String {
    match seconds {
        None | Some(0) => "N/A".to_string(),
        Some(total) => format!("{}m {}s", total / 60, total % 60),
    }
}

/// Split a comma separated list, trimming entries and dropping empty ones.
pub fn split_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn join_list(items: &[String]) -> String {
    items.join(", ")
}

/// Turn a snake_case backend enum value into a display label ("in_transit_update" -> "In Transit Update").
pub fn humanize(value: &str) -> String {
    value
        .split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(None), "N/A");
        assert_eq!(format_duration(Some(0)), "N/A");
        assert_eq!(format_duration(Some(59)), "0m 59s");
        assert_eq!(format_duration(Some(125)), "2m 5s");
    }

    #[test]
    fn test_split_list_drops_blanks() {
        assert_eq!(split_list(" um, uh ,, hmm "), vec!["um", "uh", "hmm"]);
        assert!(split_list("").is_empty());
    }

    #[test]
    fn test_join_list() {
        let items = vec!["POD".to_string(), "paperwork".to_string()];
        assert_eq!(join_list(&items), "POD, paperwork");
    }

    #[test]
    fn test_humanize() {
        assert_eq!(humanize("in_transit_update"), "In Transit Update");
        assert_eq!(humanize("no_injuries"), "No Injuries");
        assert_eq!(humanize("driving"), "Driving");
    }
}
