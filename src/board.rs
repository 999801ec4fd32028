use chrono::{DateTime, FixedOffset};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{BoardError, Result};
use crate::model::{MaintenanceRequest, NewRequest, Status, format_timestamp, now_kst};
use crate::store::{Store, Table};

pub struct Board {
    store: Store,
}

fn filter_status(table: Table, status: Status) -> Table {
    table.into_iter().filter(|r| r.status == status).collect()
}

fn position(table: &Table, id: Uuid) -> Result<usize> {
    table
        .iter()
        .position(|r| r.id == id)
        .ok_or(BoardError::NotFound(id))
}

impl Board {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub fn submit(&self, form: NewRequest) -> Result<MaintenanceRequest> {
        self.submit_at(form, now_kst())
    }

    pub fn submit_at(
        &self,
        form: NewRequest,
        at: DateTime<FixedOffset>,
    ) -> Result<MaintenanceRequest> {
        let delete_code = form.validate().inspect_err(|e| warn!(error = %e, "rejected request"))?;
        let request = MaintenanceRequest {
            date: format_timestamp(at),
            applicant: form.applicant,
            contact: form.contact,
            floor: form.floor,
            classroom: form.classroom,
            content: form.content,
            status: Status::Submitted,
            memo: String::new(),
            delete_code,
            id: Uuid::now_v7(),
        };
        self.store.transaction(|table| {
            table.push(request.clone());
            Ok(())
        })?;
        info!(id = %request.id, floor = request.floor, classroom = %request.classroom, "request submitted");
        Ok(request)
    }

    pub fn all(&self) -> Result<Table> {
        self.store.read()
    }

    pub fn list_pending(&self) -> Result<Table> {
        Ok(filter_status(self.store.read()?, Status::Submitted))
    }

    pub fn list_completed(&self) -> Result<Table> {
        Ok(filter_status(self.store.read()?, Status::Resolved))
    }

    /// Pending and completed rows taken from one snapshot.
    pub fn sections(&self) -> Result<(Table, Table)> {
        Ok(self
            .store
            .read()?
            .into_iter()
            .partition(|r| r.status == Status::Submitted))
    }

    pub fn get(&self, id: Uuid) -> Result<MaintenanceRequest> {
        self.store
            .read()?
            .into_iter()
            .find(|r| r.id == id)
            .ok_or(BoardError::NotFound(id))
    }

    pub fn update_status(&self, id: Uuid, status: Status, memo: String) -> Result<MaintenanceRequest> {
        let updated = self.store.transaction(|table| {
            let idx = position(table, id)?;
            let row = &mut table[idx];
            row.status = status;
            row.memo = memo;
            Ok(row.clone())
        })?;
        info!(%id, status = ?status, "status updated");
        Ok(updated)
    }

    /// Removes the request when `code` matches its stored delete code exactly.
    pub fn delete(&self, id: Uuid, code: &str) -> Result<MaintenanceRequest> {
        let removed = self.store.transaction(|table| {
            let idx = position(table, id)?;
            if table[idx].delete_code != code {
                warn!(%id, "delete code mismatch");
                return Err(BoardError::CodeMismatch);
            }
            Ok(table.remove(idx))
        })?;
        info!(%id, "request deleted");
        Ok(removed)
    }
}
