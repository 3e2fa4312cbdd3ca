/// 清理账号 id 等输入中不适合出现在存储路径里的字符
pub fn sanitize_path_segment(input: &str) -> String {
    let cleaned: String = input
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | ' ' => '_',
            _ => c,
        })
        .collect();
    if cleaned.is_empty() {
        "unknown".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_replaces_illegal_chars() {
        assert_eq!(sanitize_path_segment("club/12: 3"), "club_12__3");
        assert_eq!(sanitize_path_segment("12345"), "12345");
    }

    #[test]
    fn test_sanitize_empty_falls_back() {
        assert_eq!(sanitize_path_segment("  "), "unknown", "空输入应有占位值");
    }
}
