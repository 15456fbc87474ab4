//! User management screens.

mod edit;
mod list;

pub use edit::UserEdit;
pub use list::UserList;
