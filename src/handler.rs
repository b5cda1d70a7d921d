//! Handler trait, type erasure and state injection.
//!
//! The router stores handlers of different concrete types side by side, so
//! each one is erased behind `Arc<dyn ErasedHandler>`:
//!
//! ```text
//! async fn get_document(registry, req) -> …     ← written in routes.rs
//!        ↓ with_state(registry, get_document)
//! move |req| get_document(registry.clone(), req) ← Fn(Request) -> Fut
//!        ↓ into_boxed_handler()
//! Arc<FnHandler<_>> as BoxedHandler              ← stored in the router
//!        ↓ handler.call(req)
//! Box::pin(async { fut.await.into_response() })  ← one vtable call per request
//! ```
//!
//! The router's map can only hold one concrete type, hence the trait object.
//! The per-request cost is one `Arc` clone (an atomic increment) plus one
//! virtual call.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::request::Request;
use crate::response::{IntoResponse, Response};

/// A heap-allocated, type-erased future that resolves to a [`Response`].
///
/// `Pin<Box<…>>` because the runtime polls the future in place and must not
/// move it after the first poll. `Send + 'static` lets tokio move it between
/// worker threads.
pub(crate) type BoxFuture = Pin<Box<dyn Future<Output = Response> + Send + 'static>>;

/// Internal dispatch interface.
///
/// `#[doc(hidden)] pub` rather than `pub(crate)` because it appears in the
/// return type of the public `Handler::into_boxed_handler`. External crates
/// cannot usefully implement or call it.
#[doc(hidden)]
pub trait ErasedHandler {
    fn call(&self, req: Request) -> BoxFuture;
}

/// A type-erased handler shared by every connection task.
///
/// `#[doc(hidden)] pub` for the same reason as [`ErasedHandler`].
#[doc(hidden)]
pub type BoxedHandler = Arc<dyn ErasedHandler + Send + Sync + 'static>;

/// Implemented for every valid route handler:
///
/// ```text
/// async fn name(req: Request) -> impl IntoResponse
/// ```
///
/// Sealed; only the blanket impl below satisfies it. Handlers that need
/// shared state get it through [`with_state`].
pub trait Handler: private::Sealed + Send + Sync + 'static {
    #[doc(hidden)]
    fn into_boxed_handler(self) -> BoxedHandler;
}

/// Because `Sealed` is private, other crates cannot name it and so cannot
/// implement `Handler` for their own types.
mod private {
    pub trait Sealed {}
}

// `Fn(Request) -> Fut` covers named `async fn` items, closures returning
// futures (what `with_state` builds) and any type implementing `Fn`.

impl<F, Fut, R> private::Sealed for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
}

impl<F, Fut, R> Handler for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn into_boxed_handler(self) -> BoxedHandler {
        Arc::new(FnHandler(self))
    }
}

/// Binds `state` to a two-argument handler, giving each call its own clone.
///
/// ```rust,no_run
/// use docket::{Method, Registry, Request, Router, with_state};
///
/// async fn count(registry: Registry, _req: Request) -> String {
///     registry.len().to_string()
/// }
///
/// let app = Router::new().on(Method::Get, "/count", with_state(Registry::in_memory(), count));
/// ```
pub fn with_state<S, F, Fut, R>(state: S, handler: F) -> impl Handler
where
    S: Clone + Send + Sync + 'static,
    F: Fn(S, Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    // The closure owns one copy of `state`; each call clones it so the
    // handler's future can own its state and stay `'static`.
    move |req: Request| handler(state.clone(), req)
}

/// Newtype that holds a concrete handler `F` and implements
/// [`ErasedHandler`], bridging the typed world to the trait-object world.
struct FnHandler<F>(F);

impl<F, Fut, R> ErasedHandler for FnHandler<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn call(&self, req: Request) -> BoxFuture {
        // Call the wrapped function to get its concrete future, then map the
        // output through `IntoResponse` and box it to match `BoxFuture`.
        let fut = (self.0)(req);
        Box::pin(async move { fut.await.into_response() })
    }
}
