//! Declaration loading
//!
//! Registrations live in TOML manifests under `configurations/` folders.
//! Manifests refer to classes and declaration functions by name; the
//! [`DeclarationCatalog`] supplied by the host resolves those names.

pub mod catalog;
pub mod discovery;
pub mod manifest;

pub use catalog::DeclarationCatalog;
pub use discovery::{discover_manifests, parse_configuration_files, DiscoveredManifest, CONFIGURATIONS_DIR};
pub use manifest::{DeclarationManifest, RegistrationEntry};
