//! Thread actions module
//!
//! Pure thread-wide transforms over the message collection, the handler
//! that persists them, and the confirmation capability destructive
//! actions require.

mod confirm;
mod handler;
mod threads;

pub use confirm::{Confirm, Outcome};
pub use handler::{ActionHandler, delete_thread_prompt};
pub use threads::{
    ThreadAction, delete_thread, mark_thread_read, move_to_trash, restore_from_trash, thread_len,
    toggle_archive, toggle_star,
};
