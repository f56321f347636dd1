//! A local scripted chat provider for testing purpose.

mod preset;

use std::collections::VecDeque;
use std::error::Error as StdError;
use std::fmt::{self, Debug, Display, Formatter};
use std::future::ready;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard};
use std::task::{Context, Poll, ready};
use std::time::Duration;

use shopit_model::{
    ChatEvent, ChatProvider, ChatProviderError, ChatRequest, ChatResponse,
    ErrorKind, FinishReason,
};
use tokio::time::{Sleep, sleep};

pub use preset::*;

#[derive(Debug)]
pub struct Error {
    message: &'static str,
    kind: ErrorKind,
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.kind)
    }
}

impl StdError for Error {}

impl ChatProviderError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

pub struct TestChatResponse {
    preset: PresetResponse,
    event_idx: usize,
    delay: Duration,
    sleep: Option<Pin<Box<Sleep>>>,
}

impl ChatResponse for TestChatResponse {
    type Error = crate::Error;

    fn poll_next_event(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Result<Option<ChatEvent>, Self::Error>> {
        let this = self.get_mut();

        if let Some(sleep) = &mut this.sleep {
            ready!(sleep.as_mut().poll(cx));
            this.sleep = None;

            let events = &this.preset.events;
            if this.event_idx < events.len() {
                let event = match &events[this.event_idx] {
                    PresetEvent::TextDelta(text) => {
                        ChatEvent::TextDelta(text.clone())
                    }
                    PresetEvent::ToolCall(call) => {
                        ChatEvent::ToolCall(call.clone())
                    }
                };
                this.event_idx += 1;
                return Poll::Ready(Ok(Some(event)));
            } else if this.event_idx == events.len() {
                this.event_idx += 1;
                let reason = if this.preset.has_tool_call() {
                    FinishReason::ToolCalls
                } else {
                    FinishReason::Stop
                };
                return Poll::Ready(Ok(Some(ChatEvent::Finished(reason))));
            } else {
                // In case this method is called after completion.
                return Poll::Ready(Ok(None));
            }
        }
        this.sleep = Some(Box::pin(sleep(this.delay)));
        Pin::new(this).poll_next_event(cx)
    }
}

/// A local scripted chat provider for testing purpose.
///
/// Each request consumes the next preset response in the script. If the
/// script runs out, an error will be returned. Every request is recorded
/// and can be inspected with [`TestChatProvider::requests`].
///
/// Clones share the same script and request log.
#[derive(Clone, Default)]
pub struct TestChatProvider {
    script: Arc<Mutex<VecDeque<PresetResponse>>>,
    requests: Arc<Mutex<Vec<ChatRequest>>>,
    delay: Option<Duration>,
}

impl TestChatProvider {
    #[inline]
    pub fn add_response(&mut self, preset: PresetResponse) {
        lock(&self.script).push_back(preset);
    }

    #[inline]
    pub fn set_delay(&mut self, duration: Duration) {
        self.delay = Some(duration);
    }

    /// Returns a copy of every request received so far.
    #[inline]
    pub fn requests(&self) -> Vec<ChatRequest> {
        lock(&self.requests).clone()
    }

    fn next_preset(&self) -> Result<PresetResponse, Error> {
        let mut script = lock(&self.script);
        let Some(front) = script.front_mut() else {
            return Err(no_steps());
        };
        let failures = front.failures;
        match failures {
            Some(0) => Err(rate_limited()),
            Some(remaining) => {
                front.failures = (remaining > 1).then(|| remaining - 1);
                Err(rate_limited())
            }
            None => script.pop_front().ok_or_else(no_steps),
        }
    }
}

impl ChatProvider for TestChatProvider {
    type Error = crate::Error;
    type Response = TestChatResponse;

    fn send_request(
        &self,
        req: &ChatRequest,
    ) -> impl Future<Output = Result<Self::Response, Self::Error>> + Send + 'static
    {
        lock(&self.requests).push(req.clone());
        let delay = self.delay.unwrap_or(Duration::from_millis(1));
        let resp = self.next_preset().map(|preset| TestChatResponse {
            preset,
            event_idx: 0,
            delay,
            sleep: None,
        });
        ready(resp)
    }
}

#[inline]
fn no_steps() -> Error {
    Error {
        message: "no enough steps",
        kind: ErrorKind::Other,
    }
}

#[inline]
fn rate_limited() -> Error {
    Error {
        message: "scripted failure",
        kind: ErrorKind::RateLimitExceeded,
    }
}

#[inline]
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use std::future::poll_fn;
    use std::pin::pin;

    use serde_json::json;
    use shopit_model::{Message, ToolCall};

    use super::*;

    async fn collect_response(
        resp: TestChatResponse,
    ) -> (String, Vec<ToolCall>, FinishReason) {
        let mut resp = pin!(resp);
        let mut text = String::new();
        let mut calls = vec![];
        loop {
            let event = poll_fn(|cx| resp.as_mut().poll_next_event(cx))
                .await
                .unwrap()
                .unwrap();
            match event {
                ChatEvent::Finished(reason) => return (text, calls, reason),
                ChatEvent::TextDelta(delta) => text.push_str(&delta),
                ChatEvent::ToolCall(call) => calls.push(call),
            }
        }
    }

    fn request() -> ChatRequest {
        ChatRequest {
            messages: vec![Message::user("msg:0", "Pasta?")],
            tools: vec![],
        }
    }

    #[tokio::test]
    async fn test_send_request() {
        let mut provider = TestChatProvider::default();
        provider.add_response(PresetResponse::with_events([
            PresetEvent::TextDelta("Sure, ".to_owned()),
            PresetEvent::TextDelta("here you go.".to_owned()),
        ]));
        provider.add_response(PresetResponse::with_events([
            PresetEvent::ToolCall(ToolCall {
                id: "call_1".to_owned(),
                name: "displayShoppingCart".to_owned(),
                arguments: json!({}),
            }),
        ]));

        let resp = provider.send_request(&request()).await.unwrap();
        let (text, calls, reason) = collect_response(resp).await;
        assert_eq!(text, "Sure, here you go.");
        assert!(calls.is_empty());
        assert_eq!(reason, FinishReason::Stop);

        let resp = provider.send_request(&request()).await.unwrap();
        let (_, calls, reason) = collect_response(resp).await;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].name, "displayShoppingCart");
        assert_eq!(reason, FinishReason::ToolCalls);

        assert_eq!(provider.requests().len(), 2);
        assert!(provider.send_request(&request()).await.is_err());
    }

    #[tokio::test]
    async fn test_scripted_failures() {
        let mut provider = TestChatProvider::default();
        provider.add_response(PresetResponse::text("ok").with_failures(2));

        for _ in 0..2 {
            let err = provider.send_request(&request()).await.err().unwrap();
            assert_eq!(err.kind(), ErrorKind::RateLimitExceeded);
        }
        assert!(provider.send_request(&request()).await.is_ok());
    }
}
