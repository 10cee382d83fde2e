// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::sync::mpsc::Sender;
use std::thread;
use tracing::{debug, info, warn};

use crate::export::{ExportDocument, ExportRange};
use crate::forms::Draft;
use crate::{ListError, RemoteCollection, RemoteError, Resource};

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const PAGE_SIZE_OPTIONS: [usize; 3] = [10, 25, 100];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListStatus {
    Idle,
    Loading,
    Loaded,
    Errored(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

/// Transient message for the user, shown once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEvent {
    StatusChanged(ListStatus),
    Reloaded { total: usize, visible: usize },
    StaleLoadDiscarded { seq: u64 },
    Notice(Notice),
}

/// Identifies one issued load; only the most recent ticket is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    seq: u64,
    filter: Option<String>,
}

impl LoadTicket {
    pub const fn seq(&self) -> u64 {
        self.seq
    }

    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }
}

#[derive(Debug)]
pub struct LoadCompletion<R> {
    pub ticket: LoadTicket,
    pub result: Result<Vec<R>, RemoteError>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PendingEdit<R: Resource> {
    id: R::Id,
    draft: R::Draft,
}

impl<R: Resource> PendingEdit<R> {
    pub fn id(&self) -> &R::Id {
        &self.id
    }

    pub fn draft(&self) -> &R::Draft {
        &self.draft
    }
}

/// Case-insensitive substring match of `query` against the record's search text.
pub fn matches_query<R: Resource>(record: &R, query: &str) -> bool {
    query.is_empty()
        || record
            .search_text()
            .to_lowercase()
            .contains(&query.to_lowercase())
}

pub struct ListController<R: Resource, C> {
    remote: C,
    collection: Vec<R>,
    visible: Vec<usize>,
    query: String,
    scope: R::Scope,
    filter: Option<String>,
    page_index: usize,
    page_size: usize,
    pending: Option<PendingEdit<R>>,
    creation: R::Draft,
    status: ListStatus,
    latest_seq: u64,
    closed: bool,
}

impl<R: Resource, C: RemoteCollection<R>> ListController<R, C> {
    pub fn new(remote: C) -> Self {
        Self {
            remote,
            collection: Vec::new(),
            visible: Vec::new(),
            query: String::new(),
            scope: R::Scope::default(),
            filter: None,
            page_index: 0,
            page_size: DEFAULT_PAGE_SIZE,
            pending: None,
            creation: R::Draft::default(),
            status: ListStatus::Idle,
            latest_seq: 0,
            closed: false,
        }
    }

    pub fn with_scope(mut self, scope: R::Scope) -> Self {
        self.scope = scope;
        self.recompute();
        self
    }

    pub fn status(&self) -> &ListStatus {
        &self.status
    }

    pub fn collection(&self) -> &[R] {
        &self.collection
    }

    pub fn visible(&self) -> Vec<&R> {
        self.visible
            .iter()
            .map(|&index| &self.collection[index])
            .collect()
    }

    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    pub fn page(&self) -> Vec<&R> {
        let start = (self.page_index * self.page_size).min(self.visible.len());
        let end = (start + self.page_size).min(self.visible.len());
        self.visible[start..end]
            .iter()
            .map(|&index| &self.collection[index])
            .collect()
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page_count(&self) -> usize {
        self.visible.len().div_ceil(self.page_size)
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn scope(&self) -> &R::Scope {
        &self.scope
    }

    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    pub fn pending_edit(&self) -> Option<&PendingEdit<R>> {
        self.pending.as_ref()
    }

    pub fn creation_form(&self) -> &R::Draft {
        &self.creation
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn load(&mut self, filter: Option<&str>) -> Result<Vec<ListEvent>, ListError> {
        let ticket = self.begin_load(filter)?;
        let result = self.remote.list(ticket.filter());
        self.apply_load(LoadCompletion { ticket, result })
    }

    /// Reloads with the filter of the most recent load.
    pub fn reload(&mut self) -> Result<Vec<ListEvent>, ListError> {
        let filter = self.filter.clone();
        self.load(filter.as_deref())
    }

    pub fn begin_load(&mut self, filter: Option<&str>) -> Result<LoadTicket, ListError> {
        self.ensure_open()?;
        self.latest_seq += 1;
        self.filter = filter.map(str::to_owned);
        self.status = ListStatus::Loading;
        debug!(
            collection = R::COLLECTION,
            seq = self.latest_seq,
            filter = ?self.filter,
            "issuing load"
        );
        Ok(LoadTicket {
            seq: self.latest_seq,
            filter: self.filter.clone(),
        })
    }

    /// Runs the fetch on a worker thread; the completion arrives on `tx` and must be
    /// handed back to [`Self::apply_load`].
    pub fn spawn_load(
        &mut self,
        filter: Option<&str>,
        tx: Sender<LoadCompletion<R>>,
    ) -> Result<LoadTicket, ListError>
    where
        C: Clone + Send + 'static,
        R: Send + 'static,
    {
        let ticket = self.begin_load(filter)?;
        let mut remote = self.remote.clone();
        let worker_ticket = ticket.clone();
        thread::spawn(move || {
            let result = remote.list(worker_ticket.filter());
            // The receiver is gone once the view closes.
            let _ = tx.send(LoadCompletion {
                ticket: worker_ticket,
                result,
            });
        });
        Ok(ticket)
    }

    pub fn apply_load(
        &mut self,
        completion: LoadCompletion<R>,
    ) -> Result<Vec<ListEvent>, ListError> {
        let seq = completion.ticket.seq;
        if self.closed || seq != self.latest_seq {
            debug!(
                collection = R::COLLECTION,
                seq,
                latest = self.latest_seq,
                "discarding stale load"
            );
            return Ok(vec![ListEvent::StaleLoadDiscarded { seq }]);
        }

        match completion.result {
            Ok(rows) => {
                self.collection = rows;
                self.recompute();
                self.status = ListStatus::Loaded;
                debug!(
                    collection = R::COLLECTION,
                    seq,
                    total = self.collection.len(),
                    "load applied"
                );
                Ok(vec![
                    ListEvent::StatusChanged(ListStatus::Loaded),
                    ListEvent::Reloaded {
                        total: self.collection.len(),
                        visible: self.visible.len(),
                    },
                ])
            }
            Err(error) if error.is_not_found() => {
                self.collection.clear();
                self.recompute();
                self.status = ListStatus::Loaded;
                Ok(vec![
                    ListEvent::StatusChanged(ListStatus::Loaded),
                    ListEvent::Reloaded {
                        total: 0,
                        visible: 0,
                    },
                    ListEvent::Notice(Notice::warning(format!("No {} found", R::PLURAL))),
                ])
            }
            Err(error) => {
                let error = with_fallback_message::<R>(error);
                warn!(collection = R::COLLECTION, seq, %error, "load failed");
                let error = ListError::from(error);
                self.status = ListStatus::Errored(error.to_string());
                Err(error)
            }
        }
    }

    pub fn set_query(&mut self, text: &str) {
        self.query = text.to_owned();
        self.recompute();
    }

    pub fn set_scope(&mut self, scope: R::Scope) {
        self.scope = scope;
        self.recompute();
    }

    /// Moves to `index`, clamped to the last page. Returns the page actually shown.
    pub fn set_page(&mut self, index: usize) -> usize {
        self.page_index = index;
        self.clamp_page();
        self.page_index
    }

    pub fn set_page_size(&mut self, size: usize) -> Result<(), ListError> {
        if size == 0 {
            return Err(crate::ValidationError::new("pageSize", "must be at least 1").into());
        }
        self.page_size = size;
        self.page_index = 0;
        Ok(())
    }

    pub fn begin_edit(&mut self, id: &R::Id) -> Result<&R::Draft, ListError> {
        self.ensure_open()?;
        let record = self
            .find(id)
            .ok_or_else(|| ListError::NotFound(id.to_string()))?;
        let draft = record.to_draft();
        let pending = self.pending.insert(PendingEdit {
            id: id.clone(),
            draft,
        });
        Ok(&pending.draft)
    }

    pub fn update_edit_field(&mut self, name: &str, value: &str) -> Result<(), ListError> {
        let pending = self.pending.as_mut().ok_or(ListError::NoPendingEdit)?;
        pending.draft.set_field(name, value)?;
        Ok(())
    }

    /// Discards the open edit, if any.
    pub fn cancel_edit(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn commit_edit(&mut self) -> Result<Vec<ListEvent>, ListError> {
        self.ensure_open()?;
        let pending = self.pending.as_ref().ok_or(ListError::NoPendingEdit)?;
        pending.draft.validate()?;
        if let Err(error) = self.remote.update(&pending.id, &pending.draft) {
            warn!(collection = R::COLLECTION, id = %pending.id, %error, "update failed");
            return Err(error.into());
        }
        info!(collection = R::COLLECTION, id = %pending.id, "record updated");
        self.pending = None;
        self.refresh_after_write(Notice::success(format!("{} updated successfully", R::LABEL)))
    }

    pub fn remove(&mut self, id: &R::Id) -> Result<Vec<ListEvent>, ListError> {
        self.ensure_open()?;
        let record = self
            .find(id)
            .ok_or_else(|| ListError::NotFound(id.to_string()))?;
        record.check_removable()?;
        if let Err(error) = self.remote.delete(id) {
            warn!(collection = R::COLLECTION, %id, %error, "delete failed");
            return Err(error.into());
        }
        info!(collection = R::COLLECTION, %id, "record deleted");
        if self.pending.as_ref().is_some_and(|pending| &pending.id == id) {
            self.pending = None;
        }
        self.refresh_after_write(Notice::warning(format!("{} deleted successfully", R::LABEL)))
    }

    pub fn update_create_field(&mut self, name: &str, value: &str) -> Result<(), ListError> {
        self.creation.set_field(name, value)?;
        Ok(())
    }

    pub fn create(&mut self, fields: R::Draft) -> Result<Vec<ListEvent>, ListError> {
        self.creation = fields;
        self.submit_create()
    }

    /// Sends the creation form. It is cleared only once the server accepts it.
    pub fn submit_create(&mut self) -> Result<Vec<ListEvent>, ListError> {
        self.ensure_open()?;
        self.creation.validate_new()?;
        if let Err(error) = self.remote.create(&self.creation) {
            warn!(collection = R::COLLECTION, %error, "create failed");
            return Err(error.into());
        }
        info!(collection = R::COLLECTION, "record created");
        self.creation = R::Draft::default();
        self.refresh_after_write(Notice::success(format!("{} created successfully", R::LABEL)))
    }

    pub fn export(&self, title: &str, range: ExportRange) -> ExportDocument {
        match range {
            ExportRange::CurrentPage => {
                ExportDocument::build(title, self.page(), self.page_size.max(1))
            }
            ExportRange::Visible => {
                ExportDocument::build(title, self.visible(), self.page_size.max(1))
            }
        }
    }

    /// Tears the view down. Later load completions are ignored and the list is dropped.
    pub fn close(&mut self) {
        self.closed = true;
        self.latest_seq += 1;
        self.collection = Vec::new();
        self.visible = Vec::new();
        self.pending = None;
        self.page_index = 0;
        self.status = ListStatus::Idle;
    }

    fn refresh_after_write(&mut self, notice: Notice) -> Result<Vec<ListEvent>, ListError> {
        match self.reload() {
            Ok(mut events) => {
                events.push(ListEvent::Notice(notice));
                Ok(events)
            }
            Err(error) => Err(ListError::RefreshFailed(Box::new(error))),
        }
    }

    fn find(&self, id: &R::Id) -> Option<&R> {
        self.collection.iter().find(|record| record.id() == id)
    }

    fn ensure_open(&self) -> Result<(), ListError> {
        if self.closed {
            return Err(ListError::Closed);
        }
        Ok(())
    }

    fn recompute(&mut self) {
        self.visible = self
            .collection
            .iter()
            .enumerate()
            .filter(|(_, record)| {
                record.in_scope(&self.scope) && matches_query(*record, &self.query)
            })
            .map(|(index, _)| index)
            .collect();
        self.clamp_page();
    }

    fn clamp_page(&mut self) {
        if self.visible.is_empty() {
            self.page_index = 0;
            return;
        }
        let last = (self.visible.len() - 1) / self.page_size;
        self.page_index = self.page_index.min(last);
    }
}

fn with_fallback_message<R: Resource>(error: RemoteError) -> RemoteError {
    match error {
        RemoteError::Rejected { status, message } if message.trim().is_empty() => {
            RemoteError::Rejected {
                status,
                message: format!("an error occurred while getting all {}", R::PLURAL),
            }
        }
        other => other,
    }
}
