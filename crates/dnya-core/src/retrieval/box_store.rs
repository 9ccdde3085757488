//! BoxRetrievalStore -- object-safe dynamic dispatch wrapper for RetrievalStore.
//!
//! Same blanket-impl pattern as `BoxLlmProvider`.

use std::future::Future;
use std::pin::Pin;

use dnya_types::error::RetrievalError;
use dnya_types::retrieval::{RetrievalDocument, RetrievalHandle, SimilarSnippet};

use super::store::RetrievalStore;

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, RetrievalError>> + Send + 'a>>;

/// Object-safe version of [`RetrievalStore`] with boxed futures.
pub trait RetrievalStoreDyn: Send + Sync {
    fn attach_boxed<'a>(&'a self, handle: &'a RetrievalHandle) -> BoxFuture<'a, ()>;

    fn search_boxed<'a>(
        &'a self,
        handle: &'a RetrievalHandle,
        query: &'a str,
        k: usize,
    ) -> BoxFuture<'a, Vec<SimilarSnippet>>;

    fn upsert_boxed<'a>(
        &'a self,
        handle: &'a RetrievalHandle,
        document: &'a RetrievalDocument,
    ) -> BoxFuture<'a, ()>;
}

impl<T: RetrievalStore> RetrievalStoreDyn for T {
    fn attach_boxed<'a>(&'a self, handle: &'a RetrievalHandle) -> BoxFuture<'a, ()> {
        Box::pin(self.attach(handle))
    }

    fn search_boxed<'a>(
        &'a self,
        handle: &'a RetrievalHandle,
        query: &'a str,
        k: usize,
    ) -> BoxFuture<'a, Vec<SimilarSnippet>> {
        Box::pin(self.search(handle, query, k))
    }

    fn upsert_boxed<'a>(
        &'a self,
        handle: &'a RetrievalHandle,
        document: &'a RetrievalDocument,
    ) -> BoxFuture<'a, ()> {
        Box::pin(self.upsert(handle, document))
    }
}

/// Type-erased retrieval store.
pub struct BoxRetrievalStore {
    inner: Box<dyn RetrievalStoreDyn + Send + Sync>,
}

impl BoxRetrievalStore {
    pub fn new<T: RetrievalStore + 'static>(store: T) -> Self {
        Self {
            inner: Box::new(store),
        }
    }

    pub async fn attach(&self, handle: &RetrievalHandle) -> Result<(), RetrievalError> {
        self.inner.attach_boxed(handle).await
    }

    pub async fn search(
        &self,
        handle: &RetrievalHandle,
        query: &str,
        k: usize,
    ) -> Result<Vec<SimilarSnippet>, RetrievalError> {
        self.inner.search_boxed(handle, query, k).await
    }

    pub async fn upsert(
        &self,
        handle: &RetrievalHandle,
        document: &RetrievalDocument,
    ) -> Result<(), RetrievalError> {
        self.inner.upsert_boxed(handle, document).await
    }
}
