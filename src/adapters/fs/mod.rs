//! Filesystem adapters - local-directory implementations of ports.

mod object_catalog;

pub use object_catalog::FsObjectCatalog;
