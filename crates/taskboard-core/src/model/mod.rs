pub mod meeting;
pub mod status;
pub mod task;

pub use meeting::{Meeting, MeetingMode, MomStatus, ShowCause};
pub use status::{Priority, Status, BOARD_STATUSES, LIST_STATUSES};
pub use task::{AssigneeDetails, Task};
