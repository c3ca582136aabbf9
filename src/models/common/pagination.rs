use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 分页链接窗口的三种宽度
pub const WINDOW_LG: i64 = 20;
pub const WINDOW_MD: i64 = 10;
pub const WINDOW_SM: i64 = 5;

// 分页查询参数，页大小由服务端配置决定
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/pagination.ts")]
pub struct PaginationQuery {
    #[serde(
        default = "default_page",
        deserialize_with = "deserialize_string_to_i64"
    )]
    pub page: i64,
}

impl PaginationQuery {
    /// 规范化后的页码，小于 1 的值按第 1 页处理
    pub fn page(&self) -> u64 {
        self.page.max(1) as u64
    }
}

// 不同屏幕宽度下的页码链接
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/pagination.ts")]
pub struct PageWindows {
    pub lg: Vec<i64>,
    pub md: Vec<i64>,
    pub sm: Vec<i64>,
}

// 分页响应信息
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/pagination.ts")]
pub struct PaginationInfo {
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub total_pages: i64,
    pub has_prev: bool,
    pub has_next: bool,
    pub windows: PageWindows,
}

impl PaginationInfo {
    /// 根据当前页、总数和页大小计算分页控件状态
    pub fn compute(page: u64, page_size: u64, total: u64) -> Self {
        let page = page.max(1);
        let page_size = page_size.max(1);
        let offset = (page - 1).saturating_mul(page_size);
        let total_pages = to_i64(total.div_ceil(page_size));
        let page = to_i64(page);

        Self {
            page,
            page_size: to_i64(page_size),
            total: to_i64(total),
            total_pages,
            has_prev: offset > 0,
            has_next: offset.saturating_add(page_size) < total,
            windows: PageWindows {
                lg: page_window(page, total_pages, WINDOW_LG),
                md: page_window(page, total_pages, WINDOW_MD),
                sm: page_window(page, total_pages, WINDOW_SM),
            },
        }
    }
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// 计算以当前页为中心、最多 `max_links` 个页码的窗口
///
/// 窗口从 `page - max_links / 2` 开始（不小于 1），在 `total_pages` 处截断；
/// 若因截断导致窗口不足，则向左补齐。
pub fn page_window(page: i64, total_pages: i64, max_links: i64) -> Vec<i64> {
    if total_pages <= 0 || max_links <= 0 {
        return Vec::new();
    }

    let mut start = (page - max_links / 2).max(1);
    let end = start.saturating_add(max_links - 1).min(total_pages);
    if end - start + 1 < max_links {
        start = (end - max_links + 1).max(1);
    }

    (start..=end).collect()
}

// 分页列表响应
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/pagination.ts")]
pub struct PaginatedResponse<T: TS> {
    pub items: Vec<T>,
    pub pagination: PaginationInfo,
}

impl<T: TS> PaginatedResponse<T> {
    pub fn new(items: Vec<T>, page: u64, page_size: u64, total: u64) -> Self {
        Self {
            items,
            pagination: PaginationInfo::compute(page, page_size, total),
        }
    }
}

// 自定义反序列化函数，支持字符串到i64的转换
fn deserialize_string_to_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    deserializer.deserialize_any(I64Visitor)
}

/// 可选 ID 参数的反序列化，兼容查询字符串中的字符串形式
pub(crate) fn deserialize_optional_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{Error, Visitor};
    use std::fmt;

    struct OptionalI64Visitor;

    impl<'de> Visitor<'de> for OptionalI64Visitor {
        type Value = Option<i64>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("an optional integer or a string containing an integer")
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: Error,
        {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: Error,
        {
            Ok(None)
        }

        fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
        where
            D: serde::Deserializer<'de>,
        {
            deserializer.deserialize_any(I64Visitor).map(Some)
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: Error,
        {
            I64Visitor.visit_i64(value).map(Some)
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: Error,
        {
            I64Visitor.visit_u64(value).map(Some)
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: Error,
        {
            // 空字符串视为未提供
            if value.trim().is_empty() {
                return Ok(None);
            }
            I64Visitor.visit_str(value).map(Some)
        }
    }

    deserializer.deserialize_any(OptionalI64Visitor)
}

struct I64Visitor;

impl<'de> serde::de::Visitor<'de> for I64Visitor {
    type Value = i64;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("an integer or a string containing an integer")
    }

    fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(value)
    }

    fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        if value <= i64::MAX as u64 {
            Ok(value as i64)
        } else {
            Err(E::invalid_value(
                serde::de::Unexpected::Unsigned(value),
                &self,
            ))
        }
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        value
            .trim()
            .parse()
            .map_err(|_| E::invalid_value(serde::de::Unexpected::Str(value), &self))
    }
}

fn default_page() -> i64 {
    1
}

impl Default for PaginationQuery {
    fn default() -> Self {
        Self { page: 1 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_of_three_pages() {
        let info = PaginationInfo::compute(1, 10, 25);
        assert_eq!(info.total_pages, 3);
        assert!(!info.has_prev);
        assert!(info.has_next);
    }

    #[test]
    fn test_last_partial_page() {
        let info = PaginationInfo::compute(3, 10, 25);
        assert!(info.has_prev);
        assert!(!info.has_next);
    }

    #[test]
    fn test_exact_multiple_has_no_next_on_last_page() {
        let info = PaginationInfo::compute(2, 10, 20);
        assert_eq!(info.total_pages, 2);
        assert!(!info.has_next);
    }

    #[test]
    fn test_empty_result() {
        let info = PaginationInfo::compute(1, 10, 0);
        assert_eq!(info.total_pages, 0);
        assert!(!info.has_prev);
        assert!(!info.has_next);
        assert!(info.windows.lg.is_empty());
        assert!(info.windows.sm.is_empty());
    }

    #[test]
    fn test_page_below_one_is_clamped() {
        let info = PaginationInfo::compute(0, 10, 25);
        assert_eq!(info.page, 1);
        assert!(!info.has_prev);
    }

    #[test]
    fn test_window_centered() {
        assert_eq!(page_window(10, 30, 5), vec![8, 9, 10, 11, 12]);
    }

    #[test]
    fn test_window_at_start() {
        assert_eq!(page_window(1, 30, 5), vec![1, 2, 3, 4, 5]);
        assert_eq!(page_window(2, 30, 5), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_window_shifts_left_at_end() {
        assert_eq!(page_window(30, 30, 5), vec![26, 27, 28, 29, 30]);
        assert_eq!(page_window(29, 30, 10), (21..=30).collect::<Vec<_>>());
    }

    #[test]
    fn test_window_fewer_pages_than_links() {
        assert_eq!(page_window(2, 3, 20), vec![1, 2, 3]);
    }

    #[test]
    fn test_window_page_beyond_total() {
        assert_eq!(page_window(9, 3, 5), vec![1, 2, 3]);
    }

    #[test]
    fn test_huge_page_saturates() {
        let info = PaginationInfo::compute(u64::MAX, 10, 25);
        assert_eq!(info.page, i64::MAX);
        assert_eq!(info.total_pages, 3);
        assert!(info.has_prev);
        assert!(!info.has_next);
        assert_eq!(info.windows.sm, vec![1, 2, 3]);

        let info = PaginationInfo::compute(i64::MAX as u64, u64::MAX, 25);
        assert_eq!(info.total_pages, 1);
        assert!(!info.has_next);
    }

    #[test]
    fn test_query_page_from_string() {
        let query: PaginationQuery = serde_json::from_str(r#"{"page":"3"}"#).unwrap();
        assert_eq!(query.page(), 3);

        let query: PaginationQuery = serde_json::from_str(r#"{"page":-4}"#).unwrap();
        assert_eq!(query.page(), 1);

        let query: PaginationQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.page(), 1);
    }

    #[test]
    fn test_query_page_rejects_garbage() {
        assert!(serde_json::from_str::<PaginationQuery>(r#"{"page":"abc"}"#).is_err());
    }
}
