#![allow(dead_code)]

/// Headerless users file: one student, one faculty member with no batch.
pub const USERS_CSV: &str = "a@x.com,pw1,Alice,1,CS001,CSE,2024\nb@x.com,pw2,Bob,2,FAC01,CSE,";

/// Users file with a blank line, a short line, an unknown role, and a
/// non-numeric batch mixed in with two good rows.
pub const USERS_CSV_MIXED: &str = "\
a@x.com,pw1,Alice,1,CS001,CSE,2024

c@x.com,pw3,Carol
d@x.com,pw4,Dan,7,X9,EE,2023
e@x.com,pw5,Eve,1,CS005,CSE,twenty
f@x.com,pw6,Frank,2,FAC02,ME,
";

pub const ADVISORS_CSV: &str = "CS001,adv1@x.com\nCS002,adv2@x.com\n";

pub const ENROLLMENTS_CSV: &str = "\
Roll Number,Course Code,Semester ID
CS001,CS101,5
CS002,CS101,5
CS003,CS102,5
";

pub const GRADES_JSON: &str =
    r#"[{"roll_number":"X1","course_code":"C1","semester_id":"3","grade":"A"}]"#;

pub const GRADES_JSON_TWO: &str = r#"[
    {"roll_number":"X1","course_code":"C1","semester_id":3,"grade":"A"},
    {"roll_number":"X2","course_code":"C1","semester_id":3,"grade":"B"}
]"#;

/// Enrollments header without `semester_id`.
pub const ENROLLMENTS_MISSING_COLUMN: &str = "roll_number,course_code\nCS001,CS101\n";

/// A header and nothing else.
pub const GRADES_HEADER_ONLY: &str = "roll_number,course_code,semester_id,grade\n";

/// Users as JSON, naming the role-specific identifier directly. The last
/// entry carries both keys and is faculty.
pub const USERS_JSON: &str = r#"[
    {"email":"a@x.com","password":"pw1","name":"Alice","role_id":1,"roll_number":"CS001","department":"CSE","batch":2024},
    {"email":"b@x.com","password":"pw2","name":"Bob","role_id":2,"employee_id":"FAC01","department":"CSE"},
    {"email":"c@x.com","password":"pw3","name":"Cara","role_id":2,"roll_number":"CS777","employee_id":"FAC02"}
]"#;
