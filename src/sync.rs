//! Optimistic Sync Controller
//!
//! Owns the menu tree shown on screen. Moves are applied locally first and
//! then persisted; every mutation ends with a full re-fetch, which replaces
//! the local tree. Each remote operation takes a ticket. A fetched tree is
//! installed right away only if its ticket is still the newest; an older one
//! is held back so it cannot overwrite a newer optimistic state, and is
//! installed if the newest operation's own re-fetch fails.

use std::cell::RefCell;

use tracing::{debug, info, warn};

use crate::commands::MenuApi;
use crate::error::{MenuError, MenuResult};
use crate::models::{CreateMenuItem, EditMenuItem, MenuId};
use crate::reorder::{apply_move, DropTarget, MoveOutcome, MoveRequest, NoMoveReason};
use crate::tree::{MenuRow, MenuTree};

/// Notices kept at once; older ones are dropped first
const MAX_NOTICES: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A dismissible message for the user
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub id: u64,
    pub level: NoticeLevel,
    pub message: String,
}

/// Sequence number of a remote operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// First half of a move: the local effect, before any network I/O
#[derive(Debug, Clone, PartialEq)]
pub enum MoveStart {
    /// Applied locally, waiting to be persisted
    Pending { ticket: Ticket, request: MoveRequest },
    /// Nothing to do
    Unchanged(NoMoveReason),
    /// The gesture referenced an id we no longer have
    Stale { ticket: Ticket, error: MenuError },
}

#[derive(Default)]
struct SyncState {
    tree: MenuTree,
    loaded: bool,
    /// Newest ticket handed out
    latest: u64,
    /// Ticket of the tree on screen, if it came from the server
    installed: u64,
    /// Newest ticket whose re-fetch failed
    failed: u64,
    /// Newest server tree that arrived while a newer operation was pending
    superseded: Option<(Ticket, MenuTree)>,
    notices: Vec<Notice>,
    next_notice: u64,
}

impl SyncState {
    fn next_ticket(&mut self) -> Ticket {
        self.latest += 1;
        Ticket(self.latest)
    }

    /// Install a fetched tree, or hold it back while a newer operation
    /// still has its own re-fetch ahead
    fn offer(&mut self, ticket: Ticket, tree: MenuTree) {
        if ticket.0 <= self.installed {
            debug!("[SYNC] dropping menu fetched for request {}, showing {}", ticket.0, self.installed);
            return;
        }
        if ticket.0 < self.latest && self.failed < self.latest {
            debug!("[SYNC] holding menu fetched for request {}, newest is {}", ticket.0, self.latest);
            if !matches!(&self.superseded, Some((held, _)) if *held >= ticket) {
                self.superseded = Some((ticket, tree));
            }
            return;
        }
        self.install(ticket, tree);
    }

    /// After a failed re-fetch for the newest operation, fall back to the
    /// newest server tree that was held back
    fn fetch_failed(&mut self, ticket: Ticket) {
        self.failed = self.failed.max(ticket.0);
        if self.failed < self.latest {
            return;
        }
        if let Some((held, tree)) = self.superseded.take() {
            if held.0 > self.installed {
                debug!("[SYNC] falling back to menu fetched for request {}", held.0);
                self.install(held, tree);
            }
        }
    }

    fn install(&mut self, ticket: Ticket, tree: MenuTree) {
        if tree.is_empty() {
            info!("[SYNC] server menu is empty");
        } else {
            debug!("[SYNC] installed menu with {} items", tree.len());
        }
        self.tree = tree;
        self.loaded = true;
        self.installed = ticket.0;
        if self.superseded.as_ref().is_some_and(|(held, _)| *held <= ticket) {
            self.superseded = None;
        }
    }
}

pub struct SyncController<A> {
    api: A,
    state: RefCell<SyncState>,
}

impl<A: MenuApi> SyncController<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            state: RefCell::new(SyncState::default()),
        }
    }

    #[cfg(test)]
    pub fn tree(&self) -> MenuTree {
        self.state.borrow().tree.clone()
    }

    pub fn rows(&self) -> Vec<MenuRow> {
        self.state.borrow().tree.flatten()
    }

    /// Whether a fetch has ever succeeded
    pub fn is_loaded(&self) -> bool {
        self.state.borrow().loaded
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.state.borrow().notices.clone()
    }

    pub fn dismiss(&self, id: u64) {
        self.state.borrow_mut().notices.retain(|n| n.id != id);
    }

    fn notify(&self, level: NoticeLevel, message: String) -> u64 {
        let mut state = self.state.borrow_mut();
        state.next_notice += 1;
        let id = state.next_notice;
        state.notices.push(Notice { id, level, message });
        let excess = state.notices.len().saturating_sub(MAX_NOTICES);
        state.notices.drain(..excess);
        id
    }

    fn report(&self, error: &MenuError) {
        self.notify(NoticeLevel::Error, error.to_string());
    }

    fn next_ticket(&self) -> Ticket {
        self.state.borrow_mut().next_ticket()
    }

    /// Replace the local tree with the server's
    pub async fn refresh(&self) -> MenuResult<()> {
        let ticket = self.next_ticket();
        self.reconcile(ticket).await
    }

    async fn reconcile(&self, ticket: Ticket) -> MenuResult<()> {
        let fetched = self.api.fetch_menu().await.and_then(MenuTree::from_items);
        match fetched {
            Ok(tree) => {
                self.state.borrow_mut().offer(ticket, tree);
                Ok(())
            }
            Err(e) => {
                warn!("[SYNC] menu fetch failed: {}", e);
                self.state.borrow_mut().fetch_failed(ticket);
                self.report(&e);
                Err(e)
            }
        }
    }

    /// Apply a drop to the local tree. Call [`finish_move`](Self::finish_move)
    /// with the result to persist it.
    pub fn begin_move(&self, source: &MenuId, target: &DropTarget) -> MoveStart {
        let mut state = self.state.borrow_mut();
        match apply_move(&mut state.tree, source, target) {
            Ok(MoveOutcome::Moved(request)) => {
                debug!("[SYNC] moved {} locally: {:?}", source, request);
                MoveStart::Pending {
                    ticket: state.next_ticket(),
                    request,
                }
            }
            Ok(MoveOutcome::Unchanged(reason)) => {
                debug!("[SYNC] drop of {} on {:?} ignored: {:?}", source, target, reason);
                MoveStart::Unchanged(reason)
            }
            Err(error) => MoveStart::Stale {
                ticket: state.next_ticket(),
                error,
            },
        }
    }

    /// Persist a started move, then reconcile with the server
    pub async fn finish_move(&self, start: MoveStart) -> MenuResult<MoveOutcome> {
        match start {
            MoveStart::Unchanged(reason) => Ok(MoveOutcome::Unchanged(reason)),
            MoveStart::Stale { ticket, error } => {
                warn!("[SYNC] stale drop: {}", error);
                self.report(&error);
                let _ = self.reconcile(ticket).await;
                Err(error)
            }
            MoveStart::Pending { ticket, request } => {
                match self.api.move_item(&request.moved_id, &request.body()).await {
                    Ok(()) => {
                        info!("[SYNC] persisted move of {}", request.moved_id);
                        self.reconcile(ticket).await?;
                        Ok(MoveOutcome::Moved(request))
                    }
                    Err(error) => {
                        warn!("[SYNC] move of {} failed: {}", request.moved_id, error);
                        self.report(&error);
                        let _ = self.reconcile(ticket).await;
                        Err(error)
                    }
                }
            }
        }
    }

    #[cfg(test)]
    pub async fn reorder(&self, source: &MenuId, target: &DropTarget) -> MenuResult<MoveOutcome> {
        let start = self.begin_move(source, target);
        self.finish_move(start).await
    }

    pub async fn add_item(&self, text: &str, url: Option<&str>, parent_id: Option<MenuId>) -> MenuResult<()> {
        let item = CreateMenuItem::new(text, url, parent_id).inspect_err(|e| self.report(e))?;
        let ticket = self.next_ticket();
        let result = self.api.create_item(&item).await;
        self.settle(ticket, result, format!("Added \"{}\"", item.text)).await
    }

    pub async fn edit_item(&self, id: &MenuId, text: &str, url: Option<&str>) -> MenuResult<()> {
        let edit = EditMenuItem::new(text, url).inspect_err(|e| self.report(e))?;
        let ticket = self.next_ticket();
        let result = self.api.update_item(id, &edit).await;
        self.settle(ticket, result, format!("Saved \"{}\"", edit.text)).await
    }

    /// Delete an item with its sub-items
    pub async fn delete_item(&self, id: &MenuId) -> MenuResult<()> {
        let label = self
            .state
            .borrow()
            .tree
            .find(id)
            .map(|found| found.node.text.clone())
            .unwrap_or_else(|| id.to_string());
        let ticket = self.next_ticket();
        let result = self.api.delete_item(id).await;
        if result.is_ok() {
            let removed = self.state.borrow_mut().tree.remove_subtree(id);
            debug!("[SYNC] removed {} items locally", removed.len());
        }
        self.settle(ticket, result, format!("Deleted \"{}\"", label)).await
    }

    /// Report the outcome of a mutation and re-fetch either way
    async fn settle(&self, ticket: Ticket, result: MenuResult<()>, done: String) -> MenuResult<()> {
        match result {
            Ok(()) => {
                info!("[SYNC] {}", done);
                self.notify(NoticeLevel::Info, done);
                self.reconcile(ticket).await
            }
            Err(error) => {
                warn!("[SYNC] mutation failed: {}", error);
                self.report(&error);
                let _ = self.reconcile(ticket).await;
                Err(error)
            }
        }
    }
}
