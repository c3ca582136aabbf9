//! 仪表盘统计

use chrono::{DateTime, Datelike, Utc, Weekday};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QuerySelect};

use super::{SeaOrmStorage, from_timestamp, read_err, to_timestamp};
use crate::entity::prelude::*;
use crate::entity::{attendances, students};
use crate::errors::Result;
use crate::models::dashboard::responses::{AttendanceDay, SexCounts, UserCounts};
use crate::models::users::entities::Sex;

const WEEKDAYS: [(Weekday, &str); 5] = [
    (Weekday::Mon, "Mon"),
    (Weekday::Tue, "Tue"),
    (Weekday::Wed, "Wed"),
    (Weekday::Thu, "Thu"),
    (Weekday::Fri, "Fri"),
];

impl SeaOrmStorage {
    /// 各角色用户数量
    pub async fn count_users_impl(&self) -> Result<UserCounts> {
        let admins = Admins::find()
            .count(&self.db)
            .await
            .map_err(|e| read_err("统计管理员失败", e))?;
        let teachers = Teachers::find()
            .count(&self.db)
            .await
            .map_err(|e| read_err("统计教师失败", e))?;
        let students = Students::find()
            .count(&self.db)
            .await
            .map_err(|e| read_err("统计学生失败", e))?;
        let parents = Parents::find()
            .count(&self.db)
            .await
            .map_err(|e| read_err("统计家长失败", e))?;

        Ok(UserCounts {
            admins: admins as i64,
            teachers: teachers as i64,
            students: students as i64,
            parents: parents as i64,
        })
    }

    /// 学生性别分布
    pub async fn count_students_by_sex_impl(&self) -> Result<SexCounts> {
        let count = |sex: Sex| {
            Students::find()
                .filter(students::Column::Sex.eq(sex.to_string()))
                .count(&self.db)
        };

        let male = count(Sex::Male)
            .await
            .map_err(|e| read_err("统计学生性别失败", e))?;
        let female = count(Sex::Female)
            .await
            .map_err(|e| read_err("统计学生性别失败", e))?;

        Ok(SexCounts {
            male: male as i64,
            female: female as i64,
        })
    }

    /// 自 `since` 起每个工作日的出勤/缺勤人次
    pub async fn attendance_since_impl(&self, since: DateTime<Utc>) -> Result<Vec<AttendanceDay>> {
        let records: Vec<(i64, bool)> = Attendances::find()
            .select_only()
            .column(attendances::Column::Date)
            .column(attendances::Column::Present)
            .filter(attendances::Column::Date.gte(to_timestamp(since)))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| read_err("查询考勤统计失败", e))?;

        let mut days: Vec<AttendanceDay> = WEEKDAYS
            .iter()
            .map(|(_, label)| AttendanceDay {
                day: label.to_string(),
                present: 0,
                absent: 0,
            })
            .collect();

        for (date, present) in records {
            let weekday = from_timestamp(date).weekday();
            // 周末的记录不计入
            let Some(slot) = WEEKDAYS.iter().position(|(d, _)| *d == weekday) else {
                continue;
            };
            if present {
                days[slot].present += 1;
            } else {
                days[slot].absent += 1;
            }
        }

        Ok(days)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{DAY, MONDAY_8AM, insert_attendance, memory_storage, seed_school};
    use crate::models::dashboard::responses::SexCounts;
    use crate::storage::Storage;

    #[tokio::test]
    async fn test_counts() {
        let storage = memory_storage().await;
        seed_school(&storage.db).await;
        storage.ensure_admin("admin_1", "admin").await.unwrap();

        let counts = storage.count_users().await.unwrap();
        assert_eq!(
            (counts.admins, counts.teachers, counts.students, counts.parents),
            (1, 2, 2, 2)
        );

        assert_eq!(
            storage.count_students_by_sex().await.unwrap(),
            SexCounts { male: 1, female: 1 }
        );
    }

    #[tokio::test]
    async fn test_attendance_week() {
        let storage = memory_storage().await;
        let school = seed_school(&storage.db).await;
        insert_attendance(&storage.db, "student_1", school.lesson_a, MONDAY_8AM + 2 * DAY, true).await;
        insert_attendance(&storage.db, "student_2", school.lesson_b, MONDAY_8AM + 5 * DAY, true).await;
        // 上周的记录
        insert_attendance(&storage.db, "student_1", school.lesson_a, MONDAY_8AM - 3 * DAY, false).await;

        let since = chrono::DateTime::from_timestamp(MONDAY_8AM - 8 * 3_600, 0).unwrap();
        let week = storage.attendance_since(since).await.unwrap();

        let labels: Vec<_> = week.iter().map(|d| d.day.as_str()).collect();
        assert_eq!(labels, vec!["Mon", "Tue", "Wed", "Thu", "Fri"]);
        assert_eq!((week[0].present, week[0].absent), (1, 1));
        assert_eq!((week[2].present, week[2].absent), (1, 0));
        // 周六的记录被忽略
        assert_eq!(week.iter().map(|d| d.present + d.absent).sum::<i64>(), 3);
    }
}
