// Spacemarks entity managers
// Each manager borrows the SQLite connection and scopes every call to one user.

pub mod bookmark_manager;
pub mod group_manager;
mod scope;
pub mod space_manager;
pub mod user_manager;
