//! 表单校验
//!
//! 每个请求体实现 [`Validate`]，把所有字段错误收集到 [`FieldErrors`] 中一次性返回。

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("Invalid username regex"));

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Z|a-z]{2,}$").expect("Invalid email regex")
});

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9 ()-]{3,20}$").expect("Invalid phone regex"));

/// 字段名 -> 错误信息，每个字段只保留第一条错误
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// 必填文本字段（去除首尾空白后非空）
    pub fn require(&mut self, field: &str, value: &str, message: &str) {
        if value.trim().is_empty() {
            self.add(field, message);
        }
    }

    /// 文本长度范围（按字符计）
    pub fn length(&mut self, field: &str, value: &str, min: usize, max: usize) {
        let len = value.trim().chars().count();
        if len < min || len > max {
            self.add(
                field,
                format!("Must be between {min} and {max} characters"),
            );
        }
    }

    /// 合并 `Result<(), &str>` 形式的单字段校验
    pub fn check(&mut self, field: &str, result: Result<(), &'static str>) {
        if let Err(message) = result {
            self.add(field, message);
        }
    }

    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

/// 请求体校验
pub trait Validate {
    fn validate(&self) -> Result<(), FieldErrors>;
}

pub fn validate_username(username: &str) -> Result<(), &'static str> {
    let username = username.trim();
    // 用户名长度校验：3 <= x <= 20
    if username.chars().count() < 3 || username.chars().count() > 20 {
        return Err("Username must be between 3 and 20 characters");
    }
    // 用户名格式校验：只能包含字母、数字、下划线或连字符
    if !USERNAME_RE.is_match(username) {
        return Err("Username must contain only letters, numbers, underscores or hyphens");
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if !EMAIL_RE.is_match(email.trim()) {
        return Err("Invalid email address");
    }
    Ok(())
}

pub fn validate_phone(phone: &str) -> Result<(), &'static str> {
    if !PHONE_RE.is_match(phone.trim()) {
        return Err("Phone number is invalid");
    }
    Ok(())
}

/// 将空白的可选字段归一为 None
pub fn normalize_optional(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_username() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("t_01-x").is_ok());
    }

    #[test]
    fn test_username_length() {
        assert!(validate_username("ab").is_err());
        assert!(validate_username("a".repeat(21).as_str()).is_err());
    }

    #[test]
    fn test_username_charset() {
        assert_eq!(
            validate_username("bad name"),
            Err("Username must contain only letters, numbers, underscores or hyphens")
        );
    }

    #[test]
    fn test_email() {
        assert!(validate_email("a.b@school.edu").is_ok());
        assert!(validate_email("not-an-email").is_err());
    }

    #[test]
    fn test_phone() {
        assert!(validate_phone("+1 (555) 010-2030").is_ok());
        assert!(validate_phone("12").is_err());
        assert!(validate_phone("call me").is_err());
    }

    #[test]
    fn test_first_error_per_field_wins() {
        let mut errors = FieldErrors::new();
        errors.add("name", "first");
        errors.add("name", "second");
        assert_eq!(errors.get("name"), Some("first"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_require_and_length() {
        let mut errors = FieldErrors::new();
        errors.require("name", "   ", "Name is required");
        errors.length("title", "ab", 3, 10);
        assert_eq!(errors.get("name"), Some("Name is required"));
        assert!(errors.get("title").is_some());
        assert!(errors.into_result().is_err());
    }

    #[test]
    fn test_serializes_as_plain_map() {
        let mut errors = FieldErrors::new();
        errors.add("name", "Subject name is required");
        assert_eq!(
            serde_json::to_value(&errors).unwrap(),
            serde_json::json!({"name": "Subject name is required"})
        );
    }

    #[test]
    fn test_normalize_optional() {
        assert_eq!(normalize_optional(&Some("  ".to_string())), None);
        assert_eq!(
            normalize_optional(&Some(" x ".to_string())),
            Some("x".to_string())
        );
        assert_eq!(normalize_optional(&None), None);
    }
}
