use serde::Deserialize;
use ts_rs::TS;

use crate::models::common::PaginationQuery;
use crate::utils::validate::{FieldErrors, Validate};

// 成绩列表查询参数
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub struct ResultListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub search: Option<String>,
    #[serde(default, rename = "studentId", alias = "student_id")]
    pub student_id: Option<String>,
}

// 创建/更新成绩，exam_id 与 assignment_id 必须恰好提供一个
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/result.ts")]
pub struct ResultInput {
    pub score: i32,
    pub exam_id: Option<i64>,
    pub assignment_id: Option<i64>,
    pub student_id: String,
}

/// 成绩来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultSource {
    Exam(i64),
    Assignment(i64),
}

impl ResultInput {
    pub fn source(&self) -> Option<ResultSource> {
        match (self.exam_id, self.assignment_id) {
            (Some(exam_id), None) => Some(ResultSource::Exam(exam_id)),
            (None, Some(assignment_id)) => Some(ResultSource::Assignment(assignment_id)),
            _ => None,
        }
    }
}

impl Validate for ResultInput {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if !(0..=100).contains(&self.score) {
            errors.add("score", "Score must be between 0 and 100");
        }
        errors.require("student_id", &self.student_id, "Student is required");
        match (self.exam_id, self.assignment_id) {
            (Some(_), Some(_)) => errors.add(
                "exam_id",
                "A result must reference either an exam or an assignment, not both",
            ),
            (None, None) => errors.add(
                "exam_id",
                "A result must reference an exam or an assignment",
            ),
            _ => {}
        }
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(exam_id: Option<i64>, assignment_id: Option<i64>) -> ResultInput {
        ResultInput {
            score: 90,
            exam_id,
            assignment_id,
            student_id: "s1".to_string(),
        }
    }

    #[test]
    fn test_exactly_one_source() {
        assert!(input(Some(1), None).validate().is_ok());
        assert!(input(None, Some(2)).validate().is_ok());
        assert!(input(Some(1), Some(2)).validate().is_err());
        assert!(input(None, None).validate().is_err());
    }

    #[test]
    fn test_source() {
        assert_eq!(input(Some(1), None).source(), Some(ResultSource::Exam(1)));
        assert_eq!(
            input(None, Some(2)).source(),
            Some(ResultSource::Assignment(2))
        );
        assert_eq!(input(Some(1), Some(2)).source(), None);
    }

    #[test]
    fn test_score_range() {
        let mut bad = input(Some(1), None);
        bad.score = 101;
        assert!(bad.validate().unwrap_err().get("score").is_some());
    }
}
