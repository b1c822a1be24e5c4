//! # Mocks for Client Tests
//!
//! Client wrappers (a cart client translating commands into actions, for instance)
//! can be tested without a real actor. Two styles are offered:
//!
//! | Style | Entry point | Good for |
//! |-------|-------------|----------|
//! | Scripted replies | [`MockClient`] | Checking how callers react to results and errors |
//! | Raw mailbox | [`create_mock_client`] + [`expect_action`] | Asserting the exact request a wrapper sends |
//!
//! ## Scripted replies
//!
//! ```rust
//! use actor_framework::mock::MockClient;
//! use actor_framework::{ActorEntity, FrameworkError};
//! use async_trait::async_trait;
//!
//! #[derive(Clone, Debug)] struct Tab { id: u32 }
//! #[derive(Debug)] struct OpenTab;
//! #[derive(Debug)] struct NoUpdate;
//! #[derive(Debug)] enum NoAction {}
//! #[derive(Debug, thiserror::Error)] #[error("tab error")] struct TabError;
//!
//! #[async_trait]
//! impl ActorEntity for Tab {
//!     type Id = u32; type Create = OpenTab; type Update = NoUpdate; type Action = NoAction;
//!     type ActionResult = (); type Context = (); type Error = TabError;
//!     fn from_create_params(id: u32, _: OpenTab) -> Result<Self, Self::Error> { Ok(Self { id }) }
//!     async fn on_update(&mut self, _: NoUpdate, _: &()) -> Result<(), Self::Error> { Ok(()) }
//!     async fn handle_action(&mut self, a: NoAction, _: &()) -> Result<(), Self::Error> { match a {} }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut mock = MockClient::<Tab>::new();
//!     mock.expect_create().return_ok(7);
//!     mock.expect_get(7).return_err(FrameworkError::ActorClosed);
//!
//!     let client = mock.client();
//!     assert_eq!(client.create(OpenTab).await.unwrap(), 7);
//!     assert!(matches!(client.get(7).await, Err(FrameworkError::ActorClosed)));
//!     mock.verify();
//! }
//! ```
//!
//! Expectations are consumed in order. A request whose kind or target id does not
//! match the next expectation gets no reply (the caller sees [`FrameworkError::ActorDropped`]) and
//! makes [`MockClient::verify`] panic.

use crate::client::ResourceClient;
use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::{ResourceRequest, Response};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

// =============================================================================
// SCRIPTED REPLIES
// =============================================================================

enum Reply<T: ActorEntity> {
    Get(Result<Option<T>, FrameworkError>),
    Create(Result<T::Id, FrameworkError>),
    Update(Result<T, FrameworkError>),
    Delete(Result<(), FrameworkError>),
    Action(Result<T::ActionResult, FrameworkError>),
}

impl<T: ActorEntity> Reply<T> {
    fn kind(&self) -> &'static str {
        match self {
            Reply::Get(_) => "get",
            Reply::Create(_) => "create",
            Reply::Update(_) => "update",
            Reply::Delete(_) => "delete",
            Reply::Action(_) => "action",
        }
    }
}

/// One scripted reply and the instance it is meant for (`None` for Create).
struct Expectation<T: ActorEntity> {
    id: Option<T::Id>,
    reply: Reply<T>,
}

struct Script<T: ActorEntity> {
    pending: VecDeque<Expectation<T>>,
    mismatches: Vec<String>,
}

type SharedScript<T> = Arc<Mutex<Script<T>>>;

/// A `ResourceClient` backed by a queue of canned replies.
pub struct MockClient<T: ActorEntity> {
    client: ResourceClient<T>,
    script: SharedScript<T>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: ActorEntity> Default for MockClient<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ActorEntity> MockClient<T> {
    /// Creates a mock with an empty script. Must be called inside a Tokio runtime.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<ResourceRequest<T>>(100);
        let script: SharedScript<T> = Arc::new(Mutex::new(Script {
            pending: VecDeque::new(),
            mismatches: Vec::new(),
        }));
        let replay = script.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let received = describe(request.kind(), request.id());
                let next = lock(&replay).pending.pop_front();
                if let Err((expected, unanswered)) = reply(request, next) {
                    lock(&replay)
                        .mismatches
                        .push(format!("received {received}, expected {expected}"));
                    drop(unanswered);
                }
            }
        });

        Self {
            client: ResourceClient::new(sender),
            script,
            _handle: handle,
        }
    }

    /// A client whose requests are answered from the script.
    pub fn client(&self) -> ResourceClient<T> {
        self.client.clone()
    }

    pub fn expect_get(&mut self, id: T::Id) -> ExpectationBuilder<T, Option<T>> {
        self.builder(Some(id), Reply::Get)
    }

    pub fn expect_create(&mut self) -> ExpectationBuilder<T, T::Id> {
        self.builder(None, Reply::Create)
    }

    pub fn expect_update(&mut self, id: T::Id) -> ExpectationBuilder<T, T> {
        self.builder(Some(id), Reply::Update)
    }

    pub fn expect_delete(&mut self, id: T::Id) -> ExpectationBuilder<T, ()> {
        self.builder(Some(id), Reply::Delete)
    }

    pub fn expect_action(&mut self, id: T::Id) -> ExpectationBuilder<T, T::ActionResult> {
        self.builder(Some(id), Reply::Action)
    }

    /// Panics if a request went unmatched or a scripted reply was never used.
    pub fn verify(&self) {
        let script = lock(&self.script);
        if !script.mismatches.is_empty() {
            panic!("Unexpected requests: {}", script.mismatches.join("; "));
        }
        if !script.pending.is_empty() {
            panic!(
                "Not all expectations were met. {} remaining",
                script.pending.len()
            );
        }
    }

    fn builder<R>(
        &mut self,
        id: Option<T::Id>,
        wrap: fn(Result<R, FrameworkError>) -> Reply<T>,
    ) -> ExpectationBuilder<T, R> {
        ExpectationBuilder {
            script: self.script.clone(),
            id,
            wrap,
        }
    }
}

/// Completes an expectation with its reply.
pub struct ExpectationBuilder<T: ActorEntity, R> {
    script: SharedScript<T>,
    id: Option<T::Id>,
    wrap: fn(Result<R, FrameworkError>) -> Reply<T>,
}

impl<T: ActorEntity, R> ExpectationBuilder<T, R> {
    pub fn return_ok(self, value: R) {
        self.push(Ok(value));
    }

    pub fn return_err(self, error: FrameworkError) {
        self.push(Err(error));
    }

    fn push(self, result: Result<R, FrameworkError>) {
        let expectation = Expectation {
            id: self.id,
            reply: (self.wrap)(result),
        };
        lock(&self.script).pending.push_back(expectation);
    }
}

fn lock<T: ActorEntity>(script: &SharedScript<T>) -> std::sync::MutexGuard<'_, Script<T>> {
    script.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn describe<I: std::fmt::Display>(kind: &str, id: Option<&I>) -> String {
    match id {
        Some(id) => format!("{kind} on {id}"),
        None => kind.to_string(),
    }
}

/// Answers `request` from `expectation`. On a kind or id mismatch the request is
/// handed back unanswered together with what was expected.
fn reply<T: ActorEntity>(
    request: ResourceRequest<T>,
    expectation: Option<Expectation<T>>,
) -> Result<(), (String, ResourceRequest<T>)> {
    fn send<V, E>(respond_to: Response<V>, value: Result<V, FrameworkError>) -> Result<(), E> {
        let _ = respond_to.send(value);
        Ok(())
    }

    let Some(Expectation { id, reply }) = expectation else {
        return Err(("nothing".to_string(), request));
    };
    let expected = describe(reply.kind(), id.as_ref());
    if id.as_ref() != request.id() {
        return Err((expected, request));
    }

    match (request, reply) {
        (ResourceRequest::Get { respond_to, .. }, Reply::Get(r)) => send(respond_to, r),
        (ResourceRequest::Create { respond_to, .. }, Reply::Create(r)) => send(respond_to, r),
        (ResourceRequest::Update { respond_to, .. }, Reply::Update(r)) => send(respond_to, r),
        (ResourceRequest::Delete { respond_to, .. }, Reply::Delete(r)) => send(respond_to, r),
        (ResourceRequest::Action { respond_to, .. }, Reply::Action(r)) => send(respond_to, r),
        (request, _) => Err((expected, request)),
    }
}

// =============================================================================
// RAW MAILBOX
// =============================================================================

/// A client plus the receiving end of its mailbox.
///
/// The test plays the actor: read the request with one of the `expect_*` helpers,
/// assert on its payload, then answer through the returned sender.
pub fn create_mock_client<T: ActorEntity>(
    buffer_size: usize,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Next message, if it is a Create request.
pub async fn expect_create<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Create, Response<T::Id>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

/// Next message, if it is a Get request.
pub async fn expect_get<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, Response<Option<T>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Next message, if it is an Action request.
pub async fn expect_action<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, T::Action, Response<T::ActionResult>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Action {
            id,
            action,
            respond_to,
        }) => Some((id, action, respond_to)),
        _ => None,
    }
}
