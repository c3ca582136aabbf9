//! 预导入模块，方便使用

pub use super::admins::{ActiveModel as AdminActiveModel, Entity as Admins, Model as AdminModel};
pub use super::announcements::{
    ActiveModel as AnnouncementActiveModel, Entity as Announcements, Model as AnnouncementModel,
};
pub use super::assignments::{
    ActiveModel as AssignmentActiveModel, Entity as Assignments, Model as AssignmentModel,
};
pub use super::attendances::{
    ActiveModel as AttendanceActiveModel, Entity as Attendances, Model as AttendanceModel,
};
pub use super::classes::{ActiveModel as ClassActiveModel, Entity as Classes, Model as ClassModel};
pub use super::events::{ActiveModel as EventActiveModel, Entity as Events, Model as EventModel};
pub use super::exams::{ActiveModel as ExamActiveModel, Entity as Exams, Model as ExamModel};
pub use super::grades::{ActiveModel as GradeActiveModel, Entity as Grades, Model as GradeModel};
pub use super::lessons::{
    ActiveModel as LessonActiveModel, Entity as Lessons, Model as LessonModel,
};
pub use super::parents::{
    ActiveModel as ParentActiveModel, Entity as Parents, Model as ParentModel,
};
pub use super::results::{
    ActiveModel as ResultActiveModel, Entity as Results, Model as ResultModel,
};
pub use super::students::{
    ActiveModel as StudentActiveModel, Entity as Students, Model as StudentModel,
};
pub use super::subjects::{
    ActiveModel as SubjectActiveModel, Entity as Subjects, Model as SubjectModel,
};
pub use super::teacher_subjects::{
    ActiveModel as TeacherSubjectActiveModel, Entity as TeacherSubjects,
    Model as TeacherSubjectModel,
};
pub use super::teachers::{
    ActiveModel as TeacherActiveModel, Entity as Teachers, Model as TeacherModel,
};
