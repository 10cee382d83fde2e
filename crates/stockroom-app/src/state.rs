// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{ListEvent, Notice, ViewKind};

/// Which management screen is active and what the status line shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub active_view: ViewKind,
    pub status: Option<Notice>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            active_view: ViewKind::Inventory,
            status: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    OpenView(ViewKind),
    ShowNotice(Notice),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    ViewChanged(ViewKind),
    StatusUpdated(Notice),
}

impl AppState {
    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::OpenView(view) => {
                self.active_view = view;
                self.status = None;
                vec![AppEvent::ViewChanged(view)]
            }
            AppCommand::ShowNotice(notice) => {
                self.status = Some(notice.clone());
                vec![AppEvent::StatusUpdated(notice)]
            }
        }
    }

    /// Surfaces the last notice carried by a batch of list events.
    pub fn absorb(&mut self, events: &[ListEvent]) -> Vec<AppEvent> {
        let notice = events.iter().rev().find_map(|event| match event {
            ListEvent::Notice(notice) => Some(notice.clone()),
            _ => None,
        });
        match notice {
            Some(notice) => self.dispatch(AppCommand::ShowNotice(notice)),
            None => Vec::new(),
        }
    }
}
