//! Admin panel controller.

use tracing::info;

use super::{Theme, granted_profile};
use crate::domain::ports::SeatRowSource;
use crate::domain::{
    Access, BulkImportReport, BulkReconciliationEngine, DeleteOutcome, Error, Panel, Profile,
    RollNumber, RoomNumber, SeatRecord, SeatRecordDraft, SeatRecordPatchDraft, SeatRecordStore,
    SeatSlot, UpdateOutcome, filter_records, project_room,
};

/// An in-progress edit of one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    pub key: RollNumber,
    pub draft: SeatRecordPatchDraft,
}

/// State and transitions of the admin panel.
pub struct AdminPanel {
    store: SeatRecordStore,
    importer: BulkReconciliationEngine,
    profile: Profile,
    records: Vec<SeatRecord>,
    rooms: Vec<RoomNumber>,
    selected_room: Option<RoomNumber>,
    room_layout: Vec<SeatSlot>,
    search_query: String,
    editing: Option<EditSession>,
    theme: Theme,
}

impl AdminPanel {
    /// Open the panel for a granted admin and load records and rooms.
    pub async fn open(
        access: &Access,
        store: SeatRecordStore,
        importer: BulkReconciliationEngine,
    ) -> Result<Self, Error> {
        let profile = granted_profile(access, Panel::Admin)?;
        let mut panel = Self {
            store,
            importer,
            profile,
            records: Vec::new(),
            rooms: Vec::new(),
            selected_room: None,
            room_layout: Vec::new(),
            search_query: String::new(),
            editing: None,
            theme: Theme::default(),
        };
        panel.refresh().await?;
        Ok(panel)
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn records(&self) -> &[SeatRecord] {
        &self.records
    }

    pub fn rooms(&self) -> &[RoomNumber] {
        &self.rooms
    }

    pub fn selected_room(&self) -> Option<&RoomNumber> {
        self.selected_room.as_ref()
    }

    pub fn room_layout(&self) -> &[SeatSlot] {
        &self.room_layout
    }

    pub fn editing(&self) -> Option<&EditSession> {
        self.editing.as_ref()
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Reload the record list and the room list.
    pub async fn refresh(&mut self) -> Result<(), Error> {
        self.records = self.store.list_all().await?;
        self.rooms = self.store.list_distinct_rooms().await?;
        Ok(())
    }

    /// Records matching the current search query.
    pub fn visible_records(&self) -> Vec<&SeatRecord> {
        filter_records(&self.records, &self.search_query)
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
    }

    /// Validate and insert a single record, then reload.
    pub async fn add_record(&mut self, draft: SeatRecordDraft) -> Result<(), Error> {
        let record =
            SeatRecord::try_from(draft).map_err(|err| Error::invalid_request(err.to_string()))?;
        self.store.insert_one(&record).await?;
        info!(roll_number = %record.roll_number(), "record added");
        self.refresh().await
    }

    /// Start editing a listed record.
    pub fn begin_edit(&mut self, key: &RollNumber) -> Result<(), Error> {
        let record = self
            .records
            .iter()
            .find(|record| record.roll_number() == key)
            .ok_or_else(|| Error::not_found(format!("no listed record for {key}")))?;
        self.editing = Some(EditSession {
            key: key.clone(),
            draft: SeatRecordPatchDraft::from(record),
        });
        Ok(())
    }

    /// Change one field of the record being edited.
    pub fn edit_field(&mut self, field: &str, value: impl Into<String>) -> Result<(), Error> {
        let session = self
            .editing
            .as_mut()
            .ok_or_else(|| Error::invalid_request("no edit in progress"))?;
        session
            .draft
            .set_field(field, value.into())
            .map_err(|err| Error::invalid_request(err.to_string()))
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Persist the edit in progress and reload.
    ///
    /// On failure the edit stays open so it can be corrected or cancelled.
    pub async fn save_edit(&mut self) -> Result<UpdateOutcome, Error> {
        let session = self
            .editing
            .clone()
            .ok_or_else(|| Error::invalid_request("no edit in progress"))?;
        let patch = session
            .draft
            .into_patch(&session.key)
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        let outcome = self.store.update_one(&session.key, &patch).await?;
        self.editing = None;
        self.refresh().await?;
        Ok(outcome)
    }

    /// Remove a record and reload.
    pub async fn delete(&mut self, key: &RollNumber) -> Result<DeleteOutcome, Error> {
        let outcome = self.store.delete_one(key).await?;
        if self.editing.as_ref().is_some_and(|session| session.key == *key) {
            self.editing = None;
        }
        self.refresh().await?;
        Ok(outcome)
    }

    /// Import an upload and reload.
    pub async fn bulk_import(&mut self, source: &dyn SeatRowSource) -> Result<BulkImportReport, Error> {
        let report = self.importer.import_from(source).await?;
        self.refresh().await?;
        Ok(report)
    }

    /// Pick the room whose layout [`AdminPanel::view_layout`] loads.
    pub fn select_room(&mut self, room: RoomNumber) {
        self.selected_room = Some(room);
        self.room_layout.clear();
    }

    /// Load and project the selected room. Does nothing if no room is selected.
    pub async fn view_layout(&mut self) -> Result<&[SeatSlot], Error> {
        if let Some(room) = &self.selected_room {
            let records = self.store.find_by_room_number(room).await?;
            self.room_layout = project_room(&records);
        }
        Ok(&self.room_layout)
    }
}
