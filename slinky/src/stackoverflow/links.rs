//! StackOverflow question link detection.

use regex::Regex;
use std::sync::LazyLock;

static QUESTION_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"stackoverflow\.com/questions/(\d+)").expect("question link pattern is valid")
});

/// Question ids linked from `text`, in order of first appearance.
pub fn question_ids(text: &str) -> Vec<u64> {
    let mut ids = Vec::new();
    for capture in QUESTION_LINK.captures_iter(text) {
        let Some(id) = capture.get(1).and_then(|m| m.as_str().parse::<u64>().ok()) else {
            continue;
        };
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    ids
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_ids_in_order_without_duplicates() {
        let text = "Tried https://stackoverflow.com/questions/349613/vba-thing and \
                    stackoverflow.com/questions/42 then again \
                    https://stackoverflow.com/questions/349613";
        assert_eq!(question_ids(text), vec![349613, 42]);
    }

    #[test]
    fn ignores_other_links() {
        assert!(question_ids("https://stackoverflow.com/users/1 https://example.com/questions/3").is_empty());
    }
}
