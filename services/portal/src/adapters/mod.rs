pub mod allocation;
pub mod availability;
pub mod envelope;
pub mod http;
pub mod session;
pub mod storage;
pub mod student;
pub mod student_log;
pub mod subject;
pub mod teacher;

pub use allocation::AllocationSheetAdapter;
pub use availability::AvailabilitySheetAdapter;
pub use http::RemoteEndpoint;
pub use session::SessionSheetAdapter;
pub use storage::{FileStore, MemoryStore};
pub use student::StudentSheetAdapter;
pub use student_log::StudentLogSheetAdapter;
pub use subject::SubjectSheetAdapter;
pub use teacher::TeacherSheetAdapter;
