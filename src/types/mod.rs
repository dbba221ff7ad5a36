// Spacemarks shared type definitions
// Entity shapes, wire helpers, errors and server settings.

pub mod bookmark;
pub mod errors;
pub mod group;
pub mod patch;
pub mod settings;
pub mod space;
pub mod timestamp;
pub mod user;

pub use bookmark::Bookmark;
pub use group::Group;
pub use patch::Patch;
pub use space::Space;
pub use timestamp::Timestamp;
pub use user::User;
