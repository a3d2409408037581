//! Retried calls to the remote service.

use crate::context::Context;
use crate::error::{ErrorKind, Result};
use crate::models::{RemoteItem, decode_items};
use crate::progress::ProgressScope;
use lrkit_retry::{Retry, RetryOutcome, RetryPolicy};
use lrkit_transport::error::ErrorKind as TransportErrorKind;
use lrkit_transport::{Method, Response, Transport};
use std::ops::Deref;
use tracing::instrument;

pub(crate) enum Fetch {
    Items(Vec<RemoteItem>),
    Cancelled,
}

pub(crate) enum Link {
    Linked,
    Failed(String),
    Cancelled,
}

/// Fetch and decode the remote item list.
///
/// A non-2xx status or an empty body counts as a failed attempt. Exhausting
/// the retry budget raises [`ErrorKind::Unavailable`].
#[instrument(skip_all, fields(endpoint = %ctx.endpoint))]
pub(crate) async fn fetch_items(ctx: &Context, transport: &dyn Transport, scope: &ProgressScope<'_>) -> Result<Fetch> {
    let url = ctx.endpoint.as_str();
    let headers = &ctx.headers;
    let outcome = Retry::new(labelled(&ctx.policy, "fetch items"))
        .validate(|response: &Response| response.is_success() && !response.is_empty())
        .on_failure(|attempt, total, _| relay(ctx, scope, &format!("Fetching items (attempt {attempt} of {total} failed)")))
        .cancel_on(ctx.cancel.clone())
        .run(move || async move { transport.get(url, headers).await.map(Some).map_err(kind) })
        .await;
    match outcome {
        RetryOutcome::Success { value, .. } => Ok(Fetch::Items(decode_items(&value.body)?)),
        RetryOutcome::Cancelled { .. } => Ok(Fetch::Cancelled),
        RetryOutcome::Exhausted { attempts, last } => {
            tracing::error!(attempts, reason = %last, "Could not fetch remote items");
            exn::bail!(ErrorKind::Unavailable)
        },
    }
}

/// Tell the remote service that `item` belongs to the collection in `body`.
///
/// Linking is safe to repeat: the remote stores a single collection per item.
#[instrument(skip_all, fields(id = %item.id, name = %item.name))]
pub(crate) async fn link_item(
    ctx: &Context,
    transport: &dyn Transport,
    scope: &ProgressScope<'_>,
    item: &RemoteItem,
    body: &[u8],
) -> Link {
    let url = ctx.item_url(&item.id);
    let url = url.as_str();
    let mut headers = ctx.headers.clone();
    headers.insert("Content-Type".to_string(), "application/json".to_string());
    let headers = &headers;
    let outcome = Retry::new(labelled(&ctx.policy, "link item"))
        .validate(Response::is_success)
        .on_failure(|attempt, total, _| relay(ctx, scope, &format!("Linking {} (attempt {attempt} of {total} failed)", item.name)))
        .cancel_on(ctx.cancel.clone())
        .run(move || async move { transport.post(url, body, headers, Method::Post).await.map(Some).map_err(kind) })
        .await;
    match outcome {
        RetryOutcome::Success { .. } => Link::Linked,
        RetryOutcome::Cancelled { .. } => Link::Cancelled,
        RetryOutcome::Exhausted { last, .. } => Link::Failed(last.to_string()),
    }
}

/// Update the caption after a failed attempt. Host cancellation can only be
/// polled, so it is forwarded to the context's token here; the retry then
/// stops instead of waiting for the next attempt.
fn relay(ctx: &Context, scope: &ProgressScope<'_>, caption: &str) {
    scope.caption(caption);
    if scope.is_canceled() {
        ctx.cancel.cancel();
    }
}

fn labelled(policy: &RetryPolicy, label: &str) -> RetryPolicy {
    match policy.label() {
        Some(_) => policy.clone(),
        None => policy.clone().with_label(label),
    }
}

fn kind(err: lrkit_transport::error::Error) -> TransportErrorKind {
    err.deref().clone()
}
