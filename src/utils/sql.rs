//! LIKE 查询与检索键辅助函数
//!
//! 数据库自带的 `LOWER` 在 SQLite 上只折叠 ASCII，
//! 因此大小写折叠统一在 Rust 中完成：写入时生成 `search_key` 列，查询时折叠搜索词。

/// LIKE 模式使用的转义字符
pub const LIKE_ESCAPE: char = '!';

/// 转义 LIKE 通配符（`%`、`_` 以及转义字符本身）
pub fn escape_like_pattern(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        if ch == LIKE_ESCAPE || ch == '%' || ch == '_' {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(ch);
    }
    escaped
}

/// 检索键字段分隔符，搜索词不会跨越两个字段匹配
pub const KEY_SEPARATOR: char = '\u{1f}';

/// 由若干文本字段生成小写折叠的检索键
pub fn search_key(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|part| fold(part))
        .collect::<Vec<_>>()
        .join(&KEY_SEPARATOR.to_string())
}

fn fold(value: &str) -> String {
    value.trim().to_lowercase()
}

/// 生成不区分大小写的包含匹配模式 `%needle%`；空白搜索词返回 None
pub fn like_pattern(search: &str) -> Option<String> {
    let needle = search.trim();
    if needle.is_empty() {
        return None;
    }
    Some(format!("%{}%", escape_like_pattern(&fold(needle))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_wildcards() {
        assert_eq!(escape_like_pattern("50%_off!"), "50!%!_off!!");
        assert_eq!(escape_like_pattern("plain"), "plain");
    }

    #[test]
    fn test_like_pattern() {
        assert_eq!(like_pattern("  Math "), Some("%math%".to_string()));
        assert_eq!(like_pattern("   "), None);
        assert_eq!(like_pattern("a_b"), Some("%a!_b%".to_string()));
        assert_eq!(like_pattern("ÉDU"), Some("%édu%".to_string()));
    }

    #[test]
    fn test_search_key_folds_unicode() {
        assert_eq!(search_key(&[" Éducation "]), "éducation");
        assert_eq!(search_key(&["Zoë", "ÅNGSTRÖM"]), "zoë\u{1f}ångström");
        assert_eq!(search_key(&["Éducation"]), search_key(&["éDUCATION"]));
    }
}
