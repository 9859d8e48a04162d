use crate::{
    call_validation::validate_call, error::Error, mock_provider::MockProvider,
    pact_configuration::PactConfiguration, pact_file, runner,
};
use lazy_static::lazy_static;
use std::{
    path::PathBuf,
    sync::{Arc, Condvar, Mutex, PoisonError},
};
use tracing::{info, warn};

lazy_static! {
    static ref PACT_SESSION: PactSession = PactSession::new();
}

/// One consumer test at a time: the mock provider serves a single session's interactions.
pub struct PactSession {
    lock: Arc<(Mutex<bool>, Condvar)>,
    error: Mutex<Option<Error>>,
}

impl PactSession {
    fn new() -> Self {
        Self {
            lock: Arc::new((Mutex::new(false), Condvar::new())),
            error: Mutex::new(None),
        }
    }

    /// Keeps the first error raised while serving calls.
    pub(crate) fn set_error(error: Error) {
        let mut slot = PACT_SESSION
            .error
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if slot.is_none() {
            *slot = Some(error);
        }
    }

    pub fn before_test(configuration: PactConfiguration) -> Result<(), Error> {
        PACT_SESSION.enter_test();

        let result = Self::install(configuration);
        if result.is_err() {
            PACT_SESSION.exit_test();
        }

        result
    }

    fn install(configuration: PactConfiguration) -> Result<(), Error> {
        runner::start_once()?;

        info!(
            consumer = %configuration.pact().consumer_name,
            provider = %configuration.pact().provider_name,
            interactions = configuration.interactions().len(),
            "Pact session started"
        );

        // calls answered between sessions must not fail this one
        PACT_SESSION.error.lock()?.take();

        let mut provider = MockProvider::instance()?;
        provider.calls.clear();
        provider.configuration = Some(configuration);
        provider.release_instance();

        Ok(())
    }

    /// Validates the calls the mock provider answered and writes the pact file.
    /// Nothing is written when the session recorded an error or a call didn't match.
    pub fn after_test() -> Result<PathBuf, Error> {
        let result = Self::finish();
        PACT_SESSION.exit_test();
        result
    }

    /// Ends the session without writing anything, e.g. when the test body panicked.
    pub fn abort_test() {
        if let Ok(mut provider) = MockProvider::instance() {
            provider.reset();
            provider.release_instance();
        }
        PACT_SESSION
            .error
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        warn!("Pact session aborted, no pact file written");

        PACT_SESSION.exit_test();
    }

    fn finish() -> Result<PathBuf, Error> {
        let mut provider = MockProvider::instance()?;
        let configuration = provider.configuration.take();
        let calls = std::mem::take(&mut provider.calls);
        provider.reset();
        provider.release_instance();

        if let Some(error) = PACT_SESSION.error.lock()?.take() {
            return Err(error);
        }

        let configuration = configuration.ok_or(Error::NotConfigured)?;

        for call in &calls {
            validate_call(call)?;
        }

        for interaction in configuration.interactions() {
            if !calls.iter().any(|call| &call.interaction == interaction) {
                warn!(
                    interaction = %interaction.description,
                    "Interaction was never called during the session"
                );
            }
        }

        let storage = configuration.storage();
        let path = pact_file::write_pact(
            configuration.pact(),
            configuration.pact_directory(),
            configuration.write_mode(),
            &*storage,
        )?;

        Ok(path)
    }

    fn enter_test(&self) {
        let (lock, cond) = &*self.lock;
        let mut is_test_running = cond
            .wait_while(
                lock.lock().unwrap_or_else(PoisonError::into_inner),
                |is_test_running| *is_test_running,
            )
            .unwrap_or_else(PoisonError::into_inner);
        *is_test_running = true;
    }

    fn exit_test(&self) {
        let (lock, cond) = &*self.lock;
        let mut is_test_running = lock.lock().unwrap_or_else(PoisonError::into_inner);
        *is_test_running = false;

        cond.notify_one();
    }
}
