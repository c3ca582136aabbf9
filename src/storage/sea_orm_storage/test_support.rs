//! 存储层测试夹具：内存 SQLite + 一所两班的小学校
//!
//! 人员 id 与 `filters::test_support` 中的视角一致（teacher_1、student_1、parent_1）。

use std::str::FromStr;

use sea_orm::sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set, SqlxSqliteConnector};

use super::SeaOrmStorage;
use crate::utils::search_key;
use crate::entity::prelude::*;

/// 单连接内存库，连接不回收以免数据丢失
pub(crate) async fn memory_storage() -> SeaOrmStorage {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("invalid sqlite url")
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .expect("failed to open in-memory sqlite");

    SeaOrmStorage::from_connection(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
        .await
        .expect("migration failed")
}

/// 2025-03-03（周一）08:00 UTC
pub(crate) const MONDAY_8AM: i64 = 1_740_988_800;
pub(crate) const HOUR: i64 = 3_600;
pub(crate) const DAY: i64 = 86_400;

/// 夹具中各记录的 id
pub(crate) struct School {
    pub grade: i64,
    pub class_a: i64,
    pub class_b: i64,
    pub math: i64,
    pub art: i64,
    pub lesson_a: i64,
    pub lesson_b: i64,
    pub exam_a: i64,
    pub exam_b: i64,
    pub assignment_a: i64,
    pub assignment_b: i64,
    pub result_a: i64,
    pub result_b: i64,
    pub attendance_a: i64,
    pub attendance_b: i64,
    pub global_event: i64,
    pub event_a: i64,
    pub event_b: i64,
}

/// 两个班：1A（teacher_1 任教、student_1 就读）与 2B（teacher_2、student_2）
pub(crate) async fn seed_school(db: &DatabaseConnection) -> School {
    let grade = insert_grade(db, 1).await;
    insert_teacher(db, "teacher_1", "Ada", "Lovelace").await;
    insert_teacher(db, "teacher_2", "Bob", "Marley").await;
    insert_parent(db, "parent_1", "Paula").await;
    insert_parent(db, "parent_2", "Peter").await;

    let class_a = insert_class(db, "1A", grade, Some("teacher_1")).await;
    let class_b = insert_class(db, "2B", grade, Some("teacher_2")).await;

    let math = insert_subject(db, "Math", &["teacher_1"]).await;
    let art = insert_subject(db, "Art", &["teacher_2"]).await;

    insert_student(db, "student_1", "Sam", "parent_1", class_a, grade).await;
    insert_student(db, "student_2", "Sue", "parent_2", class_b, grade).await;

    let lesson_a = insert_lesson(db, "Math 1A", math, class_a, "teacher_1", MONDAY_8AM).await;
    let lesson_b = insert_lesson(db, "Art 2B", art, class_b, "teacher_2", MONDAY_8AM + DAY).await;

    let exam_a = insert_exam(db, "Algebra quiz", lesson_a, MONDAY_8AM).await;
    let exam_b = insert_exam(db, "Colour theory", lesson_b, MONDAY_8AM).await;
    let assignment_a = insert_assignment(db, "Fractions sheet", lesson_a).await;
    let assignment_b = insert_assignment(db, "Still life", lesson_b).await;

    let result_a = insert_result(db, "student_1", Some(exam_a), None, 90).await;
    let result_b = insert_result(db, "student_2", Some(exam_b), None, 75).await;
    insert_result(db, "student_1", None, Some(assignment_a), 80).await;
    insert_result(db, "student_2", None, Some(assignment_b), 70).await;

    let attendance_a = insert_attendance(db, "student_1", lesson_a, MONDAY_8AM, true).await;
    let attendance_b = insert_attendance(db, "student_2", lesson_b, MONDAY_8AM, false).await;

    let global_event = insert_event(db, "Sports day", None, MONDAY_8AM).await;
    let event_a = insert_event(db, "1A trip", Some(class_a), MONDAY_8AM + HOUR).await;
    let event_b = insert_event(db, "2B trip", Some(class_b), MONDAY_8AM + DAY).await;

    insert_announcement(db, "Holiday", None).await;
    insert_announcement(db, "1A news", Some(class_a)).await;
    insert_announcement(db, "2B news", Some(class_b)).await;

    School {
        grade,
        class_a,
        class_b,
        math,
        art,
        lesson_a,
        lesson_b,
        exam_a,
        exam_b,
        assignment_a,
        assignment_b,
        result_a,
        result_b,
        attendance_a,
        attendance_b,
        global_event,
        event_a,
        event_b,
    }
}

pub(crate) async fn insert_grade(db: &DatabaseConnection, level: i32) -> i64 {
    GradeActiveModel {
        level: Set(level),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert grade")
    .id
}

pub(crate) async fn insert_teacher(db: &DatabaseConnection, id: &str, name: &str, surname: &str) {
    TeacherActiveModel {
        id: Set(id.to_string()),
        username: Set(id.to_string()),
        name: Set(name.to_string()),
        surname: Set(surname.to_string()),
        search_key: Set(search_key(&[name, surname])),
        email: Set(Some(format!("{id}@school.edu"))),
        phone: Set(None),
        address: Set("1 School Lane".to_string()),
        img: Set(None),
        blood_type: Set("A+".to_string()),
        sex: Set("female".to_string()),
        birthday: Set(0),
        created_at: Set(0),
    }
    .insert(db)
    .await
    .expect("insert teacher");
}

pub(crate) async fn insert_parent(db: &DatabaseConnection, id: &str, name: &str) {
    ParentActiveModel {
        id: Set(id.to_string()),
        username: Set(id.to_string()),
        name: Set(name.to_string()),
        surname: Set("Parent".to_string()),
        search_key: Set(search_key(&[name, "Parent"])),
        email: Set(None),
        phone: Set(None),
        address: Set("2 Home Road".to_string()),
        created_at: Set(0),
    }
    .insert(db)
    .await
    .expect("insert parent");
}

pub(crate) async fn insert_class(
    db: &DatabaseConnection,
    name: &str,
    grade_id: i64,
    supervisor_id: Option<&str>,
) -> i64 {
    ClassActiveModel {
        name: Set(name.to_string()),
        search_key: Set(search_key(&[name])),
        capacity: Set(30),
        supervisor_id: Set(supervisor_id.map(str::to_string)),
        grade_id: Set(grade_id),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert class")
    .id
}

pub(crate) async fn insert_subject(db: &DatabaseConnection, name: &str, teachers: &[&str]) -> i64 {
    let subject = SubjectActiveModel {
        name: Set(name.to_string()),
        search_key: Set(search_key(&[name])),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert subject");

    for teacher_id in teachers {
        TeacherSubjectActiveModel {
            teacher_id: Set(teacher_id.to_string()),
            subject_id: Set(subject.id),
        }
        .insert(db)
        .await
        .expect("insert teacher subject");
    }
    subject.id
}

pub(crate) async fn insert_student(
    db: &DatabaseConnection,
    id: &str,
    name: &str,
    parent_id: &str,
    class_id: i64,
    grade_id: i64,
) {
    StudentActiveModel {
        id: Set(id.to_string()),
        username: Set(id.to_string()),
        name: Set(name.to_string()),
        surname: Set("Student".to_string()),
        search_key: Set(search_key(&[name, "Student"])),
        email: Set(None),
        phone: Set(None),
        address: Set("2 Home Road".to_string()),
        img: Set(None),
        blood_type: Set("O".to_string()),
        sex: Set(if id.ends_with('2') { "female" } else { "male" }.to_string()),
        birthday: Set(0),
        parent_id: Set(parent_id.to_string()),
        class_id: Set(class_id),
        grade_id: Set(grade_id),
        created_at: Set(0),
    }
    .insert(db)
    .await
    .expect("insert student");
}

pub(crate) async fn insert_lesson(
    db: &DatabaseConnection,
    name: &str,
    subject_id: i64,
    class_id: i64,
    teacher_id: &str,
    start: i64,
) -> i64 {
    LessonActiveModel {
        name: Set(name.to_string()),
        search_key: Set(search_key(&[name])),
        day: Set("monday".to_string()),
        start_time: Set(start),
        end_time: Set(start + HOUR),
        subject_id: Set(subject_id),
        class_id: Set(class_id),
        teacher_id: Set(teacher_id.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert lesson")
    .id
}

pub(crate) async fn insert_exam(db: &DatabaseConnection, title: &str, lesson_id: i64, start: i64) -> i64 {
    ExamActiveModel {
        title: Set(title.to_string()),
        search_key: Set(search_key(&[title])),
        start_time: Set(start),
        end_time: Set(start + HOUR),
        lesson_id: Set(lesson_id),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert exam")
    .id
}

pub(crate) async fn insert_assignment(db: &DatabaseConnection, title: &str, lesson_id: i64) -> i64 {
    AssignmentActiveModel {
        title: Set(title.to_string()),
        search_key: Set(search_key(&[title])),
        start_date: Set(MONDAY_8AM),
        due_date: Set(MONDAY_8AM + 7 * DAY),
        lesson_id: Set(lesson_id),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert assignment")
    .id
}

pub(crate) async fn insert_result(
    db: &DatabaseConnection,
    student_id: &str,
    exam_id: Option<i64>,
    assignment_id: Option<i64>,
    score: i32,
) -> i64 {
    ResultActiveModel {
        score: Set(score),
        exam_id: Set(exam_id),
        assignment_id: Set(assignment_id),
        student_id: Set(student_id.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert result")
    .id
}

pub(crate) async fn insert_attendance(
    db: &DatabaseConnection,
    student_id: &str,
    lesson_id: i64,
    date: i64,
    present: bool,
) -> i64 {
    AttendanceActiveModel {
        date: Set(date),
        present: Set(present),
        student_id: Set(student_id.to_string()),
        lesson_id: Set(lesson_id),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert attendance")
    .id
}

pub(crate) async fn insert_event(
    db: &DatabaseConnection,
    title: &str,
    class_id: Option<i64>,
    start: i64,
) -> i64 {
    EventActiveModel {
        title: Set(title.to_string()),
        search_key: Set(search_key(&[title])),
        description: Set(format!("{title} details")),
        start_time: Set(start),
        end_time: Set(start + HOUR),
        class_id: Set(class_id),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert event")
    .id
}

pub(crate) async fn insert_announcement(
    db: &DatabaseConnection,
    title: &str,
    class_id: Option<i64>,
) -> i64 {
    AnnouncementActiveModel {
        title: Set(title.to_string()),
        search_key: Set(search_key(&[title])),
        description: Set(format!("{title} details")),
        date: Set(MONDAY_8AM),
        class_id: Set(class_id),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert announcement")
    .id
}

/// 通过校验的人员资料
pub(crate) fn profile(username: &str, email: Option<&str>) -> crate::models::users::requests::ProfileInput {
    crate::models::users::requests::ProfileInput {
        username: username.to_string(),
        name: "Grace".to_string(),
        surname: "Hopper".to_string(),
        email: email.map(str::to_string),
        phone: None,
        address: "3 Navy Yard".to_string(),
    }
}
