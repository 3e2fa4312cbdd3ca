pub mod config;
pub mod core;
pub mod error;
pub mod gallery;
pub mod logger;
pub mod services;
pub mod token;
pub mod utils;
pub mod vk;
pub mod yandex_disk;

pub use crate::config::AppConfig;
pub use crate::core::ports::{CloudStore, PhotoSource};
pub use crate::core::types::{GalleryItem, ImportOutcome, ImportReport, RemoteImage, StoredFile};
pub use crate::error::{CloudError, SourceError};
pub use crate::gallery::GalleryView;
pub use crate::services::importer::ImportCoordinator;
pub use crate::token::{TokenPrompt, TokenStore};
pub use crate::vk::VkAdapter;
pub use crate::yandex_disk::DiskClient;
