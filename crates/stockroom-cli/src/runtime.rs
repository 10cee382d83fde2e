// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use stockroom_app::{
    Account, AccountId, AppCommand, AppState, DriverReviewInput, ExportRange, Item, ListController,
    ListEvent, Notice, NoticeLevel, Order, Resource, Supplier, ViewKind,
};
use stockroom_client::{RestClient, RestCollection};
use time::Month;
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    pub filter: Option<String>,
    pub query: Option<String>,
    /// 1-based, as typed on the command line.
    pub page: Option<usize>,
    pub page_size: Option<usize>,
    pub month: Option<Month>,
    pub out: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List {
        view: ViewKind,
        options: ListOptions,
    },
    Export {
        view: ViewKind,
        options: ListOptions,
    },
    Create {
        view: ViewKind,
        fields: Vec<(String, String)>,
    },
    Update {
        view: ViewKind,
        id: String,
        fields: Vec<(String, String)>,
    },
    Delete {
        view: ViewKind,
        id: String,
    },
    Review {
        driver_id: String,
        rate: u8,
    },
}

/// Runs one command against the server through a fresh list controller.
pub struct Runtime {
    client: RestClient,
    page_size: usize,
    state: AppState,
}

impl Runtime {
    pub fn new(client: RestClient, page_size: usize) -> Self {
        Self {
            client,
            page_size,
            state: AppState::default(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn execute(&mut self, command: &Command, out: &mut dyn Write) -> Result<()> {
        let view = match command {
            Command::List { view, .. }
            | Command::Export { view, .. }
            | Command::Create { view, .. }
            | Command::Update { view, .. }
            | Command::Delete { view, .. } => *view,
            Command::Review { driver_id, rate } => {
                return self.review(driver_id, *rate, out);
            }
        };
        self.state.dispatch(AppCommand::OpenView(view));

        match view {
            ViewKind::Inventory => self.run_view::<Item>(view, (), command, out),
            ViewKind::Suppliers => self.run_view::<Supplier>(view, (), command, out),
            ViewKind::Staff | ViewKind::Customers => {
                self.run_view::<Account>(view, view.account_scope(), command, out)
            }
            ViewKind::Orders => {
                let month = match command {
                    Command::List { options, .. } | Command::Export { options, .. } => {
                        options.month
                    }
                    _ => None,
                };
                self.run_view::<Order>(view, month, command, out)
            }
        }
    }

    fn run_view<R>(
        &mut self,
        view: ViewKind,
        scope: R::Scope,
        command: &Command,
        out: &mut dyn Write,
    ) -> Result<()>
    where
        R: Resource,
        R::Id: From<String>,
    {
        let mut controller: ListController<R, RestCollection<R>> =
            ListController::new(self.client.collection::<R>()).with_scope(scope);
        controller.set_page_size(self.page_size)?;

        match command {
            Command::List { options, .. } => {
                self.load_with(&mut controller, options)?;
                let document = controller.export(view.report_title(), ExportRange::CurrentPage);
                out.write_all(document.render_text().as_bytes())?;
                writeln!(
                    out,
                    "\npage {} of {} ({} shown of {} {})",
                    controller.page_index() + 1,
                    controller.page_count().max(1),
                    controller.visible_len(),
                    controller.collection().len(),
                    R::PLURAL,
                )?;
                self.print_status(out)?;
            }
            Command::Export { options, .. } => {
                self.load_with(&mut controller, options)?;
                let mut document = controller.export(view.report_title(), ExportRange::Visible);
                if view == ViewKind::Orders {
                    document = document.with_row_numbers();
                }
                let text = document.render_text();
                match &options.out {
                    Some(path) => {
                        fs::write(path, &text)
                            .with_context(|| format!("write export {}", path.display()))?;
                        info!(path = %path.display(), rows = document.row_count(), "export written");
                        writeln!(
                            out,
                            "wrote {} {} to {}",
                            document.row_count(),
                            R::PLURAL,
                            path.display()
                        )?;
                    }
                    None => out.write_all(text.as_bytes())?,
                }
                self.print_status(out)?;
            }
            Command::Create { fields, .. } => {
                for (name, value) in fields {
                    controller.update_create_field(name, value)?;
                }
                let events = controller
                    .submit_create()
                    .with_context(|| format!("create {}", R::LABEL.to_lowercase()))?;
                self.report(&events, out)?;
            }
            Command::Update { id, fields, .. } => {
                controller.load(None)?;
                let id = R::Id::from(id.clone());
                controller.begin_edit(&id)?;
                for (name, value) in fields {
                    controller.update_edit_field(name, value)?;
                }
                let events = controller
                    .commit_edit()
                    .with_context(|| format!("update {} {id}", R::LABEL.to_lowercase()))?;
                self.report(&events, out)?;
            }
            Command::Delete { id, .. } => {
                controller.load(None)?;
                let id = R::Id::from(id.clone());
                let events = controller
                    .remove(&id)
                    .with_context(|| format!("delete {} {id}", R::LABEL.to_lowercase()))?;
                self.report(&events, out)?;
            }
            Command::Review { .. } => {}
        }

        controller.close();
        Ok(())
    }

    fn load_with<R: Resource>(
        &mut self,
        controller: &mut ListController<R, RestCollection<R>>,
        options: &ListOptions,
    ) -> Result<()> {
        if let Some(page_size) = options.page_size {
            controller.set_page_size(page_size)?;
        }
        let events = controller.load(options.filter.as_deref())?;
        self.state.absorb(&events);
        if let Some(query) = &options.query {
            controller.set_query(query);
        }
        if let Some(page) = options.page {
            controller.set_page(page.saturating_sub(1));
        }
        Ok(())
    }

    fn review(&mut self, driver_id: &str, rate: u8, out: &mut dyn Write) -> Result<()> {
        let review = DriverReviewInput {
            driver_id: AccountId::new(driver_id),
            rate,
        };
        review.validate()?;
        self.client
            .submit_review(&review)
            .with_context(|| format!("review driver {driver_id}"))?;
        self.report(
            &[ListEvent::Notice(Notice::success("Review submitted successfully"))],
            out,
        )
    }

    fn report(&mut self, events: &[ListEvent], out: &mut dyn Write) -> Result<()> {
        self.state.absorb(events);
        self.print_status(out)
    }

    fn print_status(&self, out: &mut dyn Write) -> Result<()> {
        if let Some(notice) = &self.state.status {
            writeln!(out, "{}", render_notice(notice))?;
        }
        Ok(())
    }
}

pub fn render_notice(notice: &Notice) -> String {
    let prefix = match notice.level {
        NoticeLevel::Success => "ok",
        NoticeLevel::Warning => "warning",
        NoticeLevel::Error => "error",
    };
    format!("{prefix}: {}", notice.message)
}
