use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 用户角色，由认证服务在令牌中声明
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub enum UserRole {
    Admin,   // 管理员
    Teacher, // 教师
    Student, // 学生
    Parent,  // 家长
}

impl UserRole {
    pub const ADMIN: &'static str = "admin";
    pub const TEACHER: &'static str = "teacher";
    pub const STUDENT: &'static str = "student";
    pub const PARENT: &'static str = "parent";

    pub fn admin_roles() -> &'static [&'static UserRole] {
        &[&Self::Admin]
    }
    pub fn teacher_roles() -> &'static [&'static UserRole] {
        &[&Self::Teacher, &Self::Admin]
    }
    pub fn all_roles() -> &'static [&'static UserRole] {
        &[&Self::Admin, &Self::Teacher, &Self::Student, &Self::Parent]
    }
}

impl<'de> Deserialize<'de> for UserRole {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<UserRole>().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的用户角色: '{s}'. 支持的角色: admin, teacher, student, parent"
            ))
        })
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Admin => write!(f, "{}", UserRole::ADMIN),
            UserRole::Teacher => write!(f, "{}", UserRole::TEACHER),
            UserRole::Student => write!(f, "{}", UserRole::STUDENT),
            UserRole::Parent => write!(f, "{}", UserRole::PARENT),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            UserRole::ADMIN => Ok(UserRole::Admin),
            UserRole::TEACHER => Ok(UserRole::Teacher),
            UserRole::STUDENT => Ok(UserRole::Student),
            UserRole::PARENT => Ok(UserRole::Parent),
            _ => Err(format!("Invalid user role: {s}")),
        }
    }
}

/// 当前请求的访问者，由 JWT 中间件写入请求扩展
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    pub user_id: String,
    pub role: UserRole,
}

impl Viewer {
    pub fn new(user_id: impl Into<String>, role: UserRole) -> Self {
        Self {
            user_id: user_id.into(),
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

// 性别
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub enum Sex {
    #[default]
    Male,
    Female,
}

impl std::fmt::Display for Sex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sex::Male => write!(f, "male"),
            Sex::Female => write!(f, "female"),
        }
    }
}

impl std::str::FromStr for Sex {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Sex::Male),
            "female" => Ok(Sex::Female),
            _ => Err(format!("Invalid sex: {s}")),
        }
    }
}

/// 下拉框等场景使用的 {id, name} 对
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct NamedRef<Id: TS> {
    pub id: Id,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip_through_str() {
        for role in UserRole::all_roles() {
            assert_eq!(role.to_string().parse::<UserRole>().unwrap(), **role);
        }
    }

    #[test]
    fn test_unknown_role_rejected() {
        assert!("superuser".parse::<UserRole>().is_err());
        assert!(serde_json::from_str::<UserRole>(r#""user""#).is_err());
    }

    #[test]
    fn test_role_deserialize() {
        let role: UserRole = serde_json::from_str(r#""parent""#).unwrap();
        assert_eq!(role, UserRole::Parent);
    }
}
