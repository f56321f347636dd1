use std::future::poll_fn;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use pin_project_lite::pin_project;
use shopit_model::{
    ChatEvent, ChatProvider, ChatProviderError, ChatRequest, ChatResponse,
};
use tracing::Instrument;

use super::SessionError;

type SendRequestResult = Result<ClientResponse, SessionError>;
type BoxedSendRequestFuture =
    Pin<Box<dyn Future<Output = SendRequestResult> + Send>>;
type HandlerFn = Arc<dyn Fn(ChatRequest) -> BoxedSendRequestFuture + Send + Sync>;

/// A wrapper around a chat provider that provides a type-erased
/// interface for the session.
#[derive(Clone)]
pub(crate) struct ModelClient {
    handler_fn: HandlerFn,
}

impl ModelClient {
    pub fn new<P: ChatProvider + 'static>(provider: P) -> Self {
        let handler_fn: HandlerFn = Arc::new(move |req| {
            let fut = provider.send_request(&req);
            Box::pin(
                async move {
                    trace!("sending {} messages", req.messages.len());
                    match fut.await {
                        Ok(resp) => Ok(ClientResponse::new(resp)),
                        Err(err) => {
                            debug!("request failed: {err}");
                            Err(provider_error(&err))
                        }
                    }
                }
                .instrument(trace_span!("model client req")),
            )
        });
        Self { handler_fn }
    }

    /// Sends a request and returns the streamed response.
    #[inline]
    pub async fn send_request(&self, req: ChatRequest) -> SendRequestResult {
        (self.handler_fn)(req).await
    }
}

trait ResponseObject: Send {
    fn poll_next_event(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Result<Option<ChatEvent>, SessionError>>;
}

pin_project! {
    struct ErasedResponse<R> {
        #[pin]
        inner: R,
    }
}

impl<R: ChatResponse> ResponseObject for ErasedResponse<R> {
    fn poll_next_event(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Result<Option<ChatEvent>, SessionError>> {
        self.project()
            .inner
            .poll_next_event(cx)
            .map_err(|err| provider_error(&err))
    }
}

/// A streamed response whose provider type has been erased.
pub(crate) struct ClientResponse {
    inner: Pin<Box<dyn ResponseObject>>,
}

impl ClientResponse {
    fn new<R: ChatResponse>(resp: R) -> Self {
        Self {
            inner: Box::pin(ErasedResponse { inner: resp }),
        }
    }

    /// Waits for the next event, `None` once the response has completed.
    pub async fn next_event(
        &mut self,
    ) -> Result<Option<ChatEvent>, SessionError> {
        poll_fn(|cx| self.inner.as_mut().poll_next_event(cx)).await
    }
}

fn provider_error<E: ChatProviderError>(err: &E) -> SessionError {
    SessionError::Provider {
        kind: err.kind(),
        message: err.to_string(),
    }
}
