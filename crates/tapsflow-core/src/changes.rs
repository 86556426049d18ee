use std::path::PathBuf;

pub const PROPERTIES_DIR: &str = "properties/";

/// Pick the added or modified properties files out of `status path` pairs
/// as reported by a VCS diff. A trailing status without a path is ignored.
pub fn select_changed_files(pairs: &[String]) -> Vec<PathBuf> {
    pairs
        .chunks_exact(2)
        .filter(|pair| is_added_or_modified(&pair[0]) && pair[1].starts_with(PROPERTIES_DIR))
        .map(|pair| PathBuf::from(pair[1].trim()))
        .collect()
}

fn is_added_or_modified(status: &str) -> bool {
    matches!(status.chars().next(), Some('a' | 'A' | 'm' | 'M'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|item| item.to_string()).collect()
    }

    #[test]
    fn selects_added_and_modified_properties() {
        let selected = select_changed_files(&args(&[
            "A",
            "properties/sales.properties",
            "M",
            "properties/hr.properties",
            "D",
            "properties/old.properties",
            "m",
            "docs/readme.md",
            "AM",
            "properties/ptr.properties",
        ]));
        assert_eq!(
            selected,
            vec![
                PathBuf::from("properties/sales.properties"),
                PathBuf::from("properties/hr.properties"),
                PathBuf::from("properties/ptr.properties"),
            ]
        );
    }

    #[test]
    fn unpaired_status_is_ignored() {
        assert!(select_changed_files(&args(&["A"])).is_empty());
        assert_eq!(
            select_changed_files(&args(&["a", "properties/x.properties", "M"])),
            vec![PathBuf::from("properties/x.properties")]
        );
    }
}
