use crate::{
    data::RequestData, error::Error, mock_provider::MockProvider, pact_session::PactSession, util,
};
use hyper::{
    body,
    service::{make_service_fn, service_fn},
    Body, Request, Response, Server, StatusCode,
};
use lazy_static::lazy_static;
use std::{
    convert::Infallible,
    env,
    net::{SocketAddr, TcpListener},
    sync::Once,
    thread,
};
use tokio::runtime::Runtime;
use tracing::{error, info};

pub const MOCK_PORT_ENV: &str = "PACTWRIGHT_MOCK_PORT";
const DEFAULT_MOCK_PORT: u16 = 61417;

static INITIALIZE_MOCK_PROVIDER: Once = Once::new();

lazy_static! {
    static ref MOCK_PROVIDER_ADDRESS: SocketAddr = {
        let port = env::var(MOCK_PORT_ENV)
            .ok()
            .and_then(|port| port.parse().ok())
            .unwrap_or(DEFAULT_MOCK_PORT);
        SocketAddr::from(([127, 0, 0, 1], port))
    };
}

/// Base URL consumers should call instead of the real provider.
pub fn mock_provider_url() -> String {
    format!("http://{}", *MOCK_PROVIDER_ADDRESS)
}

pub(crate) fn start_once() -> Result<(), Error> {
    let mut result = Ok(());
    INITIALIZE_MOCK_PROVIDER.call_once(|| result = start());
    result
}

fn start() -> Result<(), Error> {
    // bound here so the port accepts connections before the first test call
    let listener = TcpListener::bind(*MOCK_PROVIDER_ADDRESS)?;
    listener.set_nonblocking(true)?;
    info!(address = %*MOCK_PROVIDER_ADDRESS, "Mock provider listening");

    let mut provider_instance = MockProvider::instance()?;

    provider_instance.join_handle = Some(thread::spawn(move || {
        let runtime = match Runtime::new() {
            Ok(runtime) => runtime,
            Err(e) => {
                error!("Couldn't start the mock provider runtime: {}", e);
                return;
            }
        };

        runtime.block_on(async move {
            let builder = match Server::from_tcp(listener) {
                Ok(builder) => builder,
                Err(e) => {
                    error!("Mock provider error: {}", e);
                    return;
                }
            };

            let server = builder.serve(make_service_fn(|_| async {
                Ok::<_, Infallible>(service_fn(|req| async move {
                    match handle_request(req).await {
                        Ok(response) => Ok(response),
                        Err(err) => {
                            error!("Mock provider couldn't answer: {}", err);
                            PactSession::set_error(err);
                            Ok::<Response<Body>, Infallible>(internal_error())
                        }
                    }
                }))
            }));

            if let Err(e) = server.await {
                error!("Mock provider error: {}", e);
            }
        });
    }));

    provider_instance.release_instance();

    Ok(())
}

async fn handle_request(mut request: Request<Body>) -> Result<Response<Body>, Error> {
    let request_data = read_request_data(&mut request).await?;

    let mut instance = MockProvider::instance()?;
    let result = instance.handle_request(request_data);
    instance.release_instance();
    let response_data = result?;

    let mut response_builder = Response::builder().status(response_data.status_code);

    util::put_headers(
        response_builder
            .headers_mut()
            .ok_or(Error::InvalidStatusCode(response_data.status_code))?,
        &response_data.headers,
    )?;

    Ok(response_builder.body(response_data.body.into())?)
}

async fn read_request_data(request: &mut Request<Body>) -> Result<RequestData, Error> {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let query = util::parse_query(request.uri().query());
    let headers = util::extract_headers(request.headers());

    let body = body::to_bytes(request.body_mut()).await?;

    let body = if body.is_empty() {
        None
    } else {
        Some(serde_json::from_slice(&body).map_err(|e| Error::InvalidBody(e.to_string()))?)
    };

    Ok(RequestData {
        method,
        path,
        query,
        headers,
        body,
    })
}

fn internal_error() -> Response<Body> {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    response
}
