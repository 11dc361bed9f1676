//! Task board engine: status grouping, drag reordering, and the
//! search/filter/sort/paginate view over task and meeting-minutes lists.
//!
//! Everything in this crate is a pure function over a snapshot. Persistence
//! lives in `taskboard-store`.

pub mod board;
pub mod error;
pub mod id;
pub mod minutes;
pub mod model;
pub mod reorder;
pub mod report;
pub mod serialize;
pub mod view;

pub use board::{build, BoardIndex, Group};
pub use error::CoreError;
pub use id::TaskId;
pub use model::{Meeting, MeetingMode, MomStatus, Priority, Status, Task};
pub use reorder::{move_task, DropTarget, MoveOutcome, StatusUpdate};
pub use view::{derive, Page, SortDirection, ViewConfig};
