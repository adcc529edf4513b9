//! Report view state for a presentation layer
//!
//! Each request takes a ticket from the slot. When responses arrive out of
//! order only the newest ticket may apply its result; older ones are dropped.

use crate::report_core::ReportError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

#[derive(Debug, Clone, PartialEq)]
pub enum ReportView<T> {
    Idle,
    Loading,
    Ready(T),
    /// The query succeeded but matched nothing
    NoData,
    Failed(String),
}

impl<T> ReportView<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, ReportView::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            ReportView::Ready(report) => Some(report),
            _ => None,
        }
    }
}

pub struct ReportSlot<T> {
    issued: u64,
    view: ReportView<T>,
}

impl<T> Default for ReportSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ReportSlot<T> {
    pub fn new() -> Self {
        Self {
            issued: 0,
            view: ReportView::Idle,
        }
    }

    /// Start a request; supersedes every ticket issued before
    pub fn begin(&mut self) -> Ticket {
        self.issued += 1;
        self.view = ReportView::Loading;
        Ticket(self.issued)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.issued
    }

    /// Apply a finished request. Returns false when the ticket is stale.
    pub fn complete(&mut self, ticket: Ticket, result: Result<T, ReportError>) -> bool {
        if !self.is_current(ticket) {
            log::debug!("Discarding stale report result (ticket {})", ticket.0);
            return false;
        }

        self.view = match result {
            Ok(report) => ReportView::Ready(report),
            Err(ReportError::NoData) => ReportView::NoData,
            Err(e) => ReportView::Failed(e.to_string()),
        };
        true
    }

    pub fn view(&self) -> &ReportView<T> {
        &self.view
    }
}
