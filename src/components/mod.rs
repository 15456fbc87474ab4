//! UI components built with Leptos.
//!
//! - [`router`] - Hash routing and session guard (main entry point)
//! - [`frame`] - Header, navigation menu and logout
//! - [`notice`] - Transient notice toasts
//! - [`login`] - Login screen
//! - [`dashboard`] - NameNode and DataNode tables
//! - [`users`] - User list and user edit screens
//! - [`files`] - Path-scoped file browser
//! - [`icons`] - Centralized icon definitions (change theme here)

pub mod dashboard;
pub mod files;
pub mod frame;
pub mod icons;
pub mod login;
pub mod modal;
pub mod notice;
pub mod router;
pub mod users;

pub use notice::NoticeStack;
pub use router::AppRouter;
