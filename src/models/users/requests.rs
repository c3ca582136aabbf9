use serde::Deserialize;
use ts_rs::TS;

use crate::utils::search_key;
use crate::utils::validate::{
    FieldErrors, normalize_optional, validate_email, validate_phone, validate_username,
};

// 教师、学生、家长共用的个人资料字段
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct ProfileInput {
    pub username: String,
    pub name: String,
    pub surname: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: String,
}

impl ProfileInput {
    pub fn collect_errors(&self, errors: &mut FieldErrors) {
        errors.check("username", validate_username(&self.username));
        errors.require("name", &self.name, "First name is required");
        errors.length("name", &self.name, 1, 50);
        errors.require("surname", &self.surname, "Last name is required");
        errors.length("surname", &self.surname, 1, 50);
        errors.require("address", &self.address, "Address is required");
        if let Some(email) = normalize_optional(&self.email) {
            errors.check("email", validate_email(&email));
        }
        if let Some(phone) = normalize_optional(&self.phone) {
            errors.check("phone", validate_phone(&phone));
        }
    }

    pub fn username(&self) -> String {
        self.username.trim().to_string()
    }

    pub fn email(&self) -> Option<String> {
        normalize_optional(&self.email)
    }

    pub fn phone(&self) -> Option<String> {
        normalize_optional(&self.phone)
    }

    /// 姓名检索键
    pub fn search_key(&self) -> String {
        search_key(&[self.name.as_str(), self.surname.as_str()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> ProfileInput {
        ProfileInput {
            username: "jdoe".to_string(),
            name: "John".to_string(),
            surname: "Doe".to_string(),
            email: Some(" ".to_string()),
            phone: None,
            address: "1 Main St".to_string(),
        }
    }

    #[test]
    fn test_blank_email_is_ignored() {
        let mut errors = FieldErrors::new();
        profile().collect_errors(&mut errors);
        assert!(errors.is_empty());
        assert_eq!(profile().email(), None);
    }

    #[test]
    fn test_collects_every_field() {
        let mut input = profile();
        input.username = "x".to_string();
        input.name = String::new();
        input.email = Some("nope".to_string());
        let mut errors = FieldErrors::new();
        input.collect_errors(&mut errors);
        assert!(errors.get("username").is_some());
        assert_eq!(errors.get("name"), Some("First name is required"));
        assert_eq!(errors.get("email"), Some("Invalid email address"));
    }
}
