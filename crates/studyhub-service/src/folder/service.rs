//! Folder CRUD operations.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use validator::Validate;

use studyhub_core::AppError;
use studyhub_core::result::AppResult;
use studyhub_core::traits::Repository;
use studyhub_core::types::{FolderId, sort_ordered};
use studyhub_database::{CascadeReport, CascadeTarget, StudyStore};
use studyhub_entity::folder::{CreateFolder, Folder};

use crate::ordering::check_permutation;
use crate::validation::{required_text, validate_request};

/// Manages folder records.
#[derive(Debug, Clone)]
pub struct FolderService {
    store: StudyStore,
}

/// Request to create a new folder.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateFolderRequest {
    /// Folder name.
    #[validate(length(min = 1, max = 120, message = "Folder name must be 1-120 characters"))]
    pub name: String,
    /// Display colour as `#rrggbb`; the default colour when absent.
    pub color: Option<String>,
}

/// Request to change a folder. Absent fields are left as they are.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateFolderRequest {
    #[validate(length(min = 1, max = 120, message = "Folder name must be 1-120 characters"))]
    pub name: Option<String>,
    pub color: Option<String>,
}

fn checked_color(color: &str) -> AppResult<String> {
    let color = color.trim().to_lowercase();
    if !Folder::is_valid_color(&color) {
        return Err(AppError::validation(format!(
            "Colour '{color}' must look like #rrggbb"
        )));
    }
    Ok(color)
}

impl FolderService {
    /// Creates a new folder service.
    pub fn new(store: StudyStore) -> Self {
        Self { store }
    }

    /// Gets a folder by ID.
    pub async fn get_folder(&self, folder_id: FolderId) -> AppResult<Folder> {
        self.store
            .folders()
            .get(folder_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Folder {folder_id} not found")))
    }

    /// Lists folders in display order.
    pub async fn list_folders(&self) -> AppResult<Vec<Folder>> {
        let mut folders = self.store.folders().list().await?;
        sort_ordered(&mut folders);
        Ok(folders)
    }

    /// Creates a folder at the end of the list.
    pub async fn create_folder(&self, req: CreateFolderRequest) -> AppResult<Folder> {
        validate_request(&req)?;
        let name = required_text("Folder name", &req.name)?;
        let color = match req.color.as_deref() {
            Some(color) => checked_color(color)?,
            None => Folder::DEFAULT_COLOR.to_string(),
        };
        let order = self.store.folders().count().await? as i64;

        let id = self
            .store
            .folders()
            .add(&CreateFolder {
                name,
                color,
                order: Some(order),
            })
            .await?;
        let folder = self.get_folder(id).await?;

        info!(folder_id = %folder.id, name = %folder.name, order, "Folder created");
        Ok(folder)
    }

    /// Renames or recolours a folder.
    pub async fn update_folder(
        &self,
        folder_id: FolderId,
        req: UpdateFolderRequest,
    ) -> AppResult<Folder> {
        validate_request(&req)?;
        let mut folder = self.get_folder(folder_id).await?;
        if let Some(name) = req.name.as_deref() {
            folder.name = required_text("Folder name", name)?;
        }
        if let Some(color) = req.color.as_deref() {
            folder.color = checked_color(color)?;
        }

        if !self.store.folders().update(&folder).await? {
            return Err(AppError::not_found(format!("Folder {folder_id} not found")));
        }

        info!(folder_id = %folder_id, name = %folder.name, "Folder updated");
        Ok(folder)
    }

    /// Deletes a folder with all its topics, lessons, and files.
    ///
    /// A folder that is already gone yields an empty report. The
    /// remaining folders are renumbered so their order stays dense.
    pub async fn delete_folder(&self, folder_id: FolderId) -> AppResult<CascadeReport> {
        let report = self
            .store
            .cascade()
            .run(CascadeTarget::Folder(folder_id))
            .await?;
        if report.folders > 0 {
            self.compact_order().await?;
        }
        info!(folder_id = %folder_id, removed = report.total(), "Folder deleted");
        Ok(report)
    }

    /// Assigns dense display positions following `ordered_ids`.
    ///
    /// Returns the number of records whose position changed.
    pub async fn reorder_folders(&self, ordered_ids: &[FolderId]) -> AppResult<usize> {
        let folders = self.store.folders().list().await?;
        let current: Vec<FolderId> = folders.iter().map(|f| f.id).collect();
        check_permutation(&current, ordered_ids)?;

        let changed = self.write_order(&folders, ordered_ids).await?;
        info!(changed, "Folders reordered");
        Ok(changed)
    }

    /// Renumbers all folders `0..n` in their current display order.
    async fn compact_order(&self) -> AppResult<usize> {
        let folders = self.list_folders().await?;
        let ids: Vec<FolderId> = folders.iter().map(|f| f.id).collect();
        let changed = self.write_order(&folders, &ids).await?;
        debug!(changed, "Folder order compacted");
        Ok(changed)
    }

    async fn write_order(&self, folders: &[Folder], ordered_ids: &[FolderId]) -> AppResult<usize> {
        let mut changed = 0;
        for (position, id) in ordered_ids.iter().enumerate() {
            let Some(folder) = folders.iter().find(|f| f.id == *id) else {
                continue;
            };
            let order = Some(position as i64);
            if folder.order != order {
                let mut folder = folder.clone();
                folder.order = order;
                self.store.folders().update(&folder).await?;
                changed += 1;
            }
        }
        Ok(changed)
    }
}
