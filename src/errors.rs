//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。

use std::fmt;

use sea_orm::SqlErr;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_school_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum SchoolError {
            $($variant(String),)*
        }

        impl SchoolError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(SchoolError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(SchoolError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(SchoolError::$variant(msg) => msg,)*
                }
            }
        }

        paste::paste! {
            impl SchoolError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        SchoolError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_school_errors! {
    DatabaseConfig("E001", "Database Configuration Error"),
    DatabaseConnection("E002", "Database Connection Error"),
    DatabaseOperation("E003", "Database Operation Error"),
    Validation("E004", "Validation Error"),
    NotFound("E005", "Resource Not Found"),
    Conflict("E006", "Unique Constraint Conflict"),
    Reference("E007", "Referenced Row Conflict"),
    Serialization("E008", "Serialization Error"),
    DateParse("E009", "Date Parse Error"),
    Authentication("E010", "Authentication Error"),
    Authorization("E011", "Authorization Error"),
}

impl SchoolError {
    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }

    /// 是否为预期内的业务失败（不需要记录为错误日志）
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            SchoolError::Validation(_)
                | SchoolError::NotFound(_)
                | SchoolError::Conflict(_)
                | SchoolError::Reference(_)
                | SchoolError::Authorization(_)
        )
    }
}

impl fmt::Display for SchoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for SchoolError {}

// 唯一约束与外键约束单独识别，其余归为数据库操作错误
impl From<sea_orm::DbErr> for SchoolError {
    fn from(err: sea_orm::DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg)) => SchoolError::Conflict(msg),
            Some(SqlErr::ForeignKeyConstraintViolation(msg)) => SchoolError::Reference(msg),
            _ => SchoolError::DatabaseOperation(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for SchoolError {
    fn from(err: serde_json::Error) -> Self {
        SchoolError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for SchoolError {
    fn from(err: chrono::ParseError) -> Self {
        SchoolError::DateParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SchoolError>;
