//! Profile lifecycle: config records, on-disk layouts, and the registry tying them together.
pub mod profile;
pub mod registry;
pub mod store;

pub use profile::{validate_profile_name, Profile, ProfileLink, ProfileRoots, RemovalReport};
pub use registry::{ProfileRegistry, PROFILE_MARKER};
pub use store::{default_profile_args, ConfigDocument, ConfigStore, ProfileRecord};
