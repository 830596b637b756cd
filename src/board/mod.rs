// Workflow board - drag-and-drop kanban over sample-development cards
//
// Data flows down (store -> lane -> column -> card) for rendering and
// interaction flows up as BoardEvents into the store.

pub mod events;
pub mod store;
pub mod view;

#[cfg(test)]
pub mod mocks;


pub use events::{BoardError, BoardEvent, Notice, NoticeLevel, UpdateStep};
pub use store::{BoardScope, BoardStore, CardUpdate};
pub use view::{progress_percent, render_lane, CardView, ColumnView, LaneView};
