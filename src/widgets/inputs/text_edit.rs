pub fn char_count(value: &str) -> usize {
    value.chars().count()
}

pub fn clamp_cursor(cursor: usize, value: &str) -> usize {
    cursor.min(char_count(value))
}

/// Inserts `text` at character offset `cursor`, returning the offset after it.
pub fn insert_str(value: &mut String, cursor: usize, text: &str) -> usize {
    let pos = clamp_cursor(cursor, value);
    let byte_pos = byte_index_at_char(value, pos);
    value.insert_str(byte_pos, text);
    pos + char_count(text)
}

pub fn remove_char(value: &mut String, char_idx: usize) -> bool {
    if char_idx >= char_count(value) {
        return false;
    }
    let byte_pos = byte_index_at_char(value, char_idx);
    value.remove(byte_pos);
    true
}

/// Prefix of `value` holding its first `chars` characters.
pub fn prefix(value: &str, chars: usize) -> &str {
    &value[..byte_index_at_char(value, chars)]
}

fn byte_index_at_char(value: &str, char_idx: usize) -> usize {
    if char_idx == 0 {
        return 0;
    }
    value
        .char_indices()
        .nth(char_idx)
        .map(|(idx, _)| idx)
        .unwrap_or(value.len())
}

#[cfg(test)]
mod tests {
    use super::{insert_str, prefix, remove_char};

    #[test]
    fn insert_counts_characters_not_bytes() {
        let mut value = "aé".to_string();
        let cursor = insert_str(&mut value, 1, "ßx");
        assert_eq!(value, "aßxé");
        assert_eq!(cursor, 3);
    }

    #[test]
    fn insert_past_end_appends() {
        let mut value = "ab".to_string();
        assert_eq!(insert_str(&mut value, 10, "c"), 3);
        assert_eq!(value, "abc");
    }

    #[test]
    fn remove_out_of_range_is_noop() {
        let mut value = "ab".to_string();
        assert!(!remove_char(&mut value, 2));
        assert!(remove_char(&mut value, 0));
        assert_eq!(value, "b");
    }

    #[test]
    fn prefix_handles_multibyte() {
        assert_eq!(prefix("·12", 2), "·1");
        assert_eq!(prefix("ab", 5), "ab");
    }
}
