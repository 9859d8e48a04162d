use crate::{
    data::{Interaction, Pact},
    pact_file::WriteMode,
    pact_storage::{FilePactStorage, PactStorage},
};
use std::{
    env,
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing::debug;

pub const PACT_DIRECTORY_ENV: &str = "PACTWRIGHT_PACT_DIR";
const DEFAULT_PACT_DIRECTORY: &str = "pacts";

#[derive(Debug)]
pub struct PactConfiguration {
    pact: Pact,
    pact_directory: PathBuf,
    write_mode: WriteMode,
    storage: Arc<dyn PactStorage + Send + Sync>,
}

impl PactConfiguration {
    pub fn new<S1: Into<String>, S2: Into<String>>(consumer_name: S1, provider_name: S2) -> Self {
        Self {
            pact: Pact::new(consumer_name, provider_name),
            pact_directory: env::var_os(PACT_DIRECTORY_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_PACT_DIRECTORY)),
            write_mode: WriteMode::default(),
            storage: Arc::new(FilePactStorage::new()),
        }
    }

    pub fn add_interaction(&mut self, interaction: Interaction) {
        debug!(interaction = %interaction.description, "Interaction registered");
        self.pact.add_interaction(interaction);
    }

    pub fn interactions(&self) -> &[Interaction] {
        &self.pact.interactions
    }

    pub fn pact(&self) -> &Pact {
        &self.pact
    }

    pub fn set_pact_directory<P: Into<PathBuf>>(&mut self, pact_directory: P) {
        self.pact_directory = pact_directory.into();
    }

    pub fn pact_directory(&self) -> &Path {
        &self.pact_directory
    }

    pub fn set_write_mode(&mut self, write_mode: WriteMode) {
        self.write_mode = write_mode;
    }

    pub fn write_mode(&self) -> WriteMode {
        self.write_mode
    }

    pub fn set_storage(&mut self, storage: Arc<dyn PactStorage + Send + Sync>) {
        self.storage = storage;
    }

    pub fn storage(&self) -> Arc<dyn PactStorage + Send + Sync> {
        self.storage.clone()
    }
}
