pub mod assignments;

pub mod courses;

pub mod notifications;

pub mod quizzes;

pub use assignments::configure_assignment_routes;
pub use courses::{configure_attendance_routes, configure_course_routes};
pub use notifications::configure_notification_routes;
pub use quizzes::configure_quiz_routes;
