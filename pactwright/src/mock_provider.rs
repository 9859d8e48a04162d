use crate::{
    data::{Call, RequestData, ResponseData},
    error::Error,
    pact_configuration::PactConfiguration,
};
use lazy_static::lazy_static;
use std::{
    sync::{Arc, Condvar, Mutex, PoisonError},
    thread::JoinHandle,
};
use tracing::debug;

lazy_static! {
    static ref MOCK_PROVIDER_INSTANCE: Arc<(Mutex<Option<MockProvider>>, Condvar)> =
        Arc::new((Mutex::new(Some(MockProvider::new())), Condvar::new()));
}

/// Serves the interactions of the running session and remembers every call it answered.
#[derive(Debug)]
pub(crate) struct MockProvider {
    pub(crate) configuration: Option<PactConfiguration>,
    pub(crate) join_handle: Option<JoinHandle<()>>,
    pub(crate) calls: Vec<Call>,
}

impl MockProvider {
    fn new() -> Self {
        MockProvider {
            configuration: None,
            join_handle: None,
            calls: Vec::new(),
        }
    }

    pub(crate) fn instance() -> Result<Self, Error> {
        let (mutex, condvar) = &**MOCK_PROVIDER_INSTANCE;
        let mut guard = condvar.wait_while(mutex.lock()?, |option| option.is_none())?;

        let instance = guard.take().ok_or(Error::PoisonedLock)?;
        condvar.notify_one();

        Ok(instance)
    }

    pub(crate) fn release_instance(self) {
        let (mutex, condvar) = &**MOCK_PROVIDER_INSTANCE;
        *mutex.lock().unwrap_or_else(PoisonError::into_inner) = Some(self);
        condvar.notify_one();
    }

    pub(crate) fn handle_request(
        &mut self,
        request_data: RequestData,
    ) -> Result<ResponseData, Error> {
        let configuration = self.configuration.as_ref().ok_or(Error::NotConfigured)?;

        let interaction = configuration
            .interactions()
            .iter()
            .find(|interaction| {
                interaction
                    .request
                    .method
                    .eq_ignore_ascii_case(&request_data.method)
                    && interaction.request.path.without_matchers() == request_data.path
            })
            .cloned()
            .ok_or_else(|| Error::UnexpectedCall {
                method: request_data.method.clone(),
                path: request_data.path.clone(),
            })?;

        let response = interaction.response.without_matchers();
        let body = match &response.body {
            Some(body) => {
                serde_json::to_string(body).map_err(|e| Error::InvalidBody(e.to_string()))?
            }
            None => String::new(),
        };

        debug!(
            method = %request_data.method,
            path = %request_data.path,
            interaction = %interaction.description,
            status = response.status,
            "Mock provider served a call"
        );

        self.calls.push(Call {
            request_data,
            interaction,
        });

        Ok(ResponseData {
            status_code: response.status,
            headers: response.headers.unwrap_or_default(),
            body,
        })
    }

    pub(crate) fn reset(&mut self) {
        self.configuration = None;
        self.calls.clear();
    }
}
