// Spacemarks services
// Ambient concerns that are not tied to one entity family.

pub mod settings_engine;
