//! Admin components for watching queue snapshots.

mod queue_board_page;
mod queue_row;

pub use queue_board_page::AdminQueueBoardPage;
pub use queue_row::QueueRow;
