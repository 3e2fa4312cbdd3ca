pub mod importer;

pub use importer::ImportCoordinator;
