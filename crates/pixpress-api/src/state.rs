//! Application state shared by handlers and the expiry sweeper

use pixpress_core::Config;
use pixpress_processing::{ExtensionValidator, HeifConverter, ImageCompressor};
use pixpress_services::FileRegistry;
use pixpress_storage::Workspace;
use std::sync::Arc;

pub struct AppState {
    pub config: Config,
    pub workspace: Arc<Workspace>,
    pub registry: FileRegistry,
    pub validator: ExtensionValidator,
    pub compressor: ImageCompressor,
}

impl AppState {
    pub fn new(config: Config, workspace: Arc<Workspace>, registry: FileRegistry) -> Self {
        let validator = ExtensionValidator::new(config.allowed_extensions.clone());
        let compressor = ImageCompressor::new(HeifConverter::new(config.heif_convert_path.clone()));

        Self {
            config,
            workspace,
            registry,
            validator,
            compressor,
        }
    }
}
