pub mod identity;
pub mod table;

pub use identity::{canonical_name, Color, ColorIdentity, ColorSet, WUBRG};
pub use table::{resolve_identity, CardColorEntry, ColorTable, IdentityResolution};
