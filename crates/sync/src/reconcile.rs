use crate::catalog::Catalog;
use crate::context::Context;
use crate::error::Result;
use crate::models::{ItemOutcome, RemoteItem, Summary, encode_link};
use crate::progress::{Progress, ProgressScope};
use crate::remote::{Fetch, Link, fetch_items, link_item};
use async_stream::stream;
use futures::Stream;
use lrkit_transport::Transport;

/// Progress events emitted by [`reconcile`].
///
/// Events follow a strict ordering:
/// 1. [`Started`](Self::Started): exactly once.
/// 2. [`Fetched`](Self::Fetched): exactly once, with the remote item count.
/// 3. [`Item`](Self::Item): zero or more times, one per remote item.
/// 4. [`Complete`](Self::Complete): exactly once, with the final counts.
///
/// A fatal error (the item list can't be fetched or decoded) ends the stream
/// after yielding `Err`. [`Cancelled`](Self::Cancelled) replaces every later
/// event when the user cancels.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncEvent {
    /// The run has begun; emitted exactly once before any other event.
    Started,
    /// The remote item list was fetched and decoded; carries its length.
    Fetched(u64),
    /// A remote item reached its final state.
    Item(ItemOutcome),
    /// The user cancelled; the stream is finished.
    Cancelled,
    /// Every item was processed; the stream is finished.
    Complete(Summary),
}

enum Step {
    Done(ItemOutcome),
    Cancelled,
}

/// Streams [`SyncEvent`]s while linking every remote item to the catalog
/// collection with the same (or a similar enough) name.
///
/// For each remote item, in order:
/// - names not selected by the context's [`Filter`](lrkit_matching::Filter)
///   are skipped;
/// - an exact catalog name wins, otherwise the context's
///   [`FuzzyMatcher`](lrkit_matching::FuzzyMatcher) picks the closest one;
/// - in dry-run mode the link is only logged, otherwise it is `POST`ed to
///   `{endpoint}/{id}` under the context's retry policy.
///
/// `progress` is polled for cancellation between items and is released
/// (via [`Progress::done`]) however the stream ends, including when the
/// consumer drops it early.
pub fn reconcile<'a, C: Catalog>(
    ctx: &'a Context,
    transport: &'a dyn Transport,
    catalog: &'a C,
    progress: &'a dyn Progress,
) -> impl Stream<Item = Result<SyncEvent>> + 'a {
    // `rustfmt` does not format macros that use braces. Wrap in parentheses!
    stream!({
        let scope = ProgressScope::new(progress, "Fetching items");
        yield Ok(SyncEvent::Started);

        let items = match fetch_items(ctx, transport, &scope).await {
            Ok(Fetch::Items(items)) => items,
            Ok(Fetch::Cancelled) => {
                yield Ok(SyncEvent::Cancelled);
                return;
            },
            Err(e) => {
                yield Err(e);
                return;
            },
        };
        let total = u64::try_from(items.len()).unwrap_or(u64::MAX);
        tracing::info!(total, transport = transport.name(), "Fetched remote items");
        yield Ok(SyncEvent::Fetched(total));

        let mut summary = Summary { total, ..Summary::default() };
        for (done, item) in (1u64..).zip(items) {
            if scope.is_canceled() {
                ctx.cancel.cancel();
            }
            if ctx.cancel.is_cancelled() {
                tracing::info!(processed = summary.processed(), total, "Sync cancelled");
                yield Ok(SyncEvent::Cancelled);
                return;
            }
            scope.caption(&format!("Processing {}", item.name));
            match process_item(ctx, transport, catalog, &scope, item).await {
                Ok(Step::Done(outcome)) => {
                    summary.record(&outcome);
                    yield Ok(SyncEvent::Item(outcome));
                },
                Ok(Step::Cancelled) => {
                    yield Ok(SyncEvent::Cancelled);
                    return;
                },
                Err(e) => yield Err(e),
            }
            scope.portion(done, total);
        }

        tracing::info!(
            linked = summary.linked,
            would_link = summary.would_link,
            unmatched = summary.unmatched,
            filtered = summary.filtered,
            failed = summary.failed,
            "Sync complete"
        );
        yield Ok(SyncEvent::Complete(summary));
    })
}

async fn process_item<C: Catalog>(
    ctx: &Context,
    transport: &dyn Transport,
    catalog: &C,
    scope: &ProgressScope<'_>,
    item: RemoteItem,
) -> Result<Step> {
    if !ctx.filter.matches(&item.name) {
        tracing::debug!(name = %item.name, "Skipping; not selected by filter");
        return Ok(Step::Done(ItemOutcome::Filtered(item)));
    }
    let (collection, score) = match catalog.get(&item.name) {
        Some(_) => (item.name.clone(), 1.0),
        None => match ctx.matcher.best_match(&item.name, catalog.names()) {
            Some(found) => (found.candidate.to_string(), found.score),
            None => {
                tracing::debug!(name = %item.name, "No matching collection");
                return Ok(Step::Done(ItemOutcome::Unmatched(item)));
            },
        },
    };

    if ctx.dry_run {
        tracing::info!(id = %item.id, name = %item.name, %collection, score, "Dry run; would link");
        return Ok(Step::Done(ItemOutcome::WouldLink { item, collection, score }));
    }
    let body = encode_link(&collection)?;
    let outcome = match link_item(ctx, transport, scope, &item, &body).await {
        Link::Linked => ItemOutcome::Linked { item, collection, score },
        Link::Failed(reason) => ItemOutcome::Failed { item, collection, reason },
        Link::Cancelled => return Ok(Step::Cancelled),
    };
    Ok(Step::Done(outcome))
}
