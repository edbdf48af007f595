//! Browser middleware
//!
//! Registered in `main` after the logging middleware, in this order:
//! - [`ConfirmCloseAllMiddleware`] vetoes closing every tab unless configured
//! - [`TabsRemovedMiddleware`] picks a new selection when the selected tab goes away

pub mod confirm_close_all;
pub mod tabs_removed;

pub use confirm_close_all::ConfirmCloseAllMiddleware;
pub use tabs_removed::TabsRemovedMiddleware;
