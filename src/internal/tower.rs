use crate::error::{Error, ErrorContext};
use reqwest::{Request, Response};
use std::fmt::{Debug, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tower_service::Service;

type ResponseFuture = Pin<Box<dyn Future<Output = Result<Response, Error>> + Send>>;

type BoxedService =
    Box<dyn Service<Request, Response = Response, Error = Error, Future = ResponseFuture> + Send>;

/// Type erased [`Service`] every request is sent through instead of the [`reqwest::Client`].
pub(crate) struct Middleware(BoxedService);

/// Boxes the future of `S` and converts its errors into [`Error::Transport`].
struct ErasedService<S> {
    inner: S,
}

impl<S> Service<Request> for ErasedService<S>
where
    S: Service<Request, Response = Response> + Send + 'static,
    S::Error: std::error::Error + Send + Sync + 'static,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = Error;
    type Future = ResponseFuture;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx).map_err(transport_error)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        let future = self.inner.call(req);
        Box::pin(async move { future.await.map_err(transport_error) })
    }
}

fn transport_error<E: std::error::Error>(err: E) -> Error {
    Error::Transport(ErrorContext::new(format!("middleware failed: {}", err)))
}

impl Middleware {
    pub(crate) fn new<S>(service: S) -> Self
    where
        S: Service<Request, Response = Response> + Send + 'static,
        S::Error: std::error::Error + Send + Sync + 'static,
        S::Future: Send + 'static,
    {
        Self(Box::new(ErasedService { inner: service }))
    }

    /// Wait until the service is able to accept a request.
    pub(crate) async fn ready(&mut self) -> Result<(), Error> {
        std::future::poll_fn(|cx| self.0.poll_ready(cx)).await
    }

    pub(crate) fn call(&mut self, request: Request) -> ResponseFuture {
        self.0.call(request)
    }
}

impl Debug for Middleware {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "<middleware>")
    }
}
