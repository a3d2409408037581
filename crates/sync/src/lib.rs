//! Links remote items to host catalog collections.
//!
//! The host provides three collaborators: a [`Transport`] to reach the
//! remote service, a [`Catalog`] of its collections and a [`Progress`]
//! indicator the user can cancel. [`reconcile`] drives them and reports what
//! happened as a stream of [`SyncEvent`]s.
//!
//! ```no_run
//! use futures::StreamExt;
//! use lrkit_sync::{Context, LogProgress, MemoryCatalog, SyncEvent, reconcile};
//! use lrkit_transport::TransportHandle;
//!
//! # async fn run(transport: TransportHandle) -> lrkit_sync::error::Result<()> {
//! let ctx = Context::new("https://example.test/items").with_dry_run(true);
//! let catalog = MemoryCatalog::from_iter([("Summer Trip", ())]);
//! let progress = LogProgress::new(ctx.cancel.clone());
//!
//! let events = reconcile(&ctx, transport.as_ref(), &catalog, &progress);
//! futures::pin_mut!(events);
//! while let Some(event) = events.next().await {
//!     if let SyncEvent::Complete(summary) = event? {
//!         println!("{} of {} items would be linked", summary.would_link, summary.total);
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! [`Transport`]: lrkit_transport::Transport

mod catalog;
mod context;
pub mod error;
mod models;
mod progress;
mod reconcile;
mod remote;

pub use crate::catalog::{Catalog, MemoryCatalog};
pub use crate::context::Context;
pub use crate::models::{ItemId, ItemOutcome, RemoteItem, Summary};
pub use crate::progress::{LogProgress, Progress, ProgressScope};
pub use crate::reconcile::{SyncEvent, reconcile};
