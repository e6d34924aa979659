use crate::db::DnoStore;
use crate::error::Error;
use crate::excel;
use crate::services::classifier::{self, SessionState};
use crate::services::inventory::InventoryTable;
use crate::services::replay::{self, EnigoSink, ReplayPacing, SystemClock};
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tauri::{AppHandle, Manager, State};

pub struct AppState {
    pub store: DnoStore,
    pub inventory: Mutex<InventoryTable>,
    pub session: Mutex<SessionState>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DnoImportOutcome {
    /// True when a raw store copy replaced the local file wholesale.
    pub replaced: bool,
    pub new_articles: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadOutcome {
    pub rows_loaded: usize,
    pub new_groups: Vec<String>,
    pub lights: HashMap<String, bool>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifyOutcome {
    /// Size of the accumulated set after this run, not just this run's finds.
    pub accumulated: usize,
}

/// Import a DNO file: a `.db` file replaces the store wholesale, anything
/// else is read as a workbook and merged with insert-or-ignore semantics.
#[tauri::command]
pub fn import_dno_file(state: State<AppState>, path: String) -> Result<DnoImportOutcome, String> {
    if path.trim().is_empty() {
        return Err(Error::NoFileSelected.to_string());
    }
    let source = PathBuf::from(&path);
    let mut session = state.session.lock().map_err(|e| e.to_string())?;

    let is_store_copy = source
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("db"))
        .unwrap_or(false);
    if is_store_copy {
        state.store.replace_from(&source).map_err(|e| e.to_string())?;
        session.mark_activity();
        Ok(DnoImportOutcome {
            replaced: true,
            new_articles: 0,
        })
    } else {
        let added = state
            .store
            .import_workbook(&source)
            .map_err(|e| e.to_string())?;
        session.record_dno_changes(added);
        Ok(DnoImportOutcome {
            replaced: false,
            new_articles: added,
        })
    }
}

/// Copy the store file out, defaulting to the user's Downloads folder.
/// Returns the destination path.
#[tauri::command]
pub fn export_dno_file(state: State<AppState>, dest_dir: Option<String>) -> Result<String, String> {
    let directory = dest_dir
        .map(PathBuf::from)
        .or_else(dirs::download_dir)
        .ok_or_else(|| "Could not locate a Downloads folder.".to_string())?;
    let dest = state
        .store
        .export_to(&directory)
        .map_err(|e| e.to_string())?;
    Ok(dest.display().to_string())
}

/// Add a single article to the DNO list. The frontend confirms with the user
/// before invoking. Returns whether the article was actually new.
#[tauri::command]
pub fn add_dno_article(state: State<AppState>, article: String) -> Result<bool, String> {
    let article = article.trim();
    if article.is_empty() {
        return Err("No article number entered.".to_string());
    }
    let inserted = state.store.add(article).map_err(|e| e.to_string())?;
    if inserted {
        let mut session = state.session.lock().map_err(|e| e.to_string())?;
        session.record_dno_changes(1);
    }
    Ok(inserted)
}

/// Remove a single article from the DNO list. Returns whether it was present.
#[tauri::command]
pub fn remove_dno_article(state: State<AppState>, article: String) -> Result<bool, String> {
    let article = article.trim();
    if article.is_empty() {
        return Err("No article number entered.".to_string());
    }
    let removed = state.store.remove(article).map_err(|e| e.to_string())?;
    if removed {
        let mut session = state.session.lock().map_err(|e| e.to_string())?;
        session.record_dno_changes(1);
    }
    Ok(removed)
}

/// Parse an inventory workbook on a blocking thread and merge it into the
/// accumulated table.
#[tauri::command]
pub async fn upload_inventory(
    state: State<'_, AppState>,
    path: String,
) -> Result<UploadOutcome, String> {
    if path.trim().is_empty() {
        return Err(Error::NoFileSelected.to_string());
    }
    let records = tauri::async_runtime::spawn_blocking(move || {
        excel::read_inventory_rows(Path::new(&path))
    })
    .await
    .map_err(|e| e.to_string())?
    .map_err(|e| e.to_string())?;

    let rows_loaded = records.len();
    let mut inventory = state.inventory.lock().map_err(|e| e.to_string())?;
    let new_groups = inventory.ingest(records);
    let lights = inventory.lights().clone();

    let mut session = state.session.lock().map_err(|e| e.to_string())?;
    session.mark_activity();

    Ok(UploadOutcome {
        rows_loaded,
        new_groups,
        lights,
    })
}

#[tauri::command]
pub fn find_zero_articles(state: State<AppState>) -> Result<ClassifyOutcome, String> {
    let members = state.store.members().map_err(|e| e.to_string())?;
    let inventory = state.inventory.lock().map_err(|e| e.to_string())?;
    let mut session = state.session.lock().map_err(|e| e.to_string())?;
    let accumulated = classifier::find_zeros(&inventory, &members, &mut session)
        .map_err(|e| e.to_string())?;
    Ok(ClassifyOutcome { accumulated })
}

#[tauri::command]
pub fn find_low_articles(state: State<AppState>) -> Result<ClassifyOutcome, String> {
    let threshold = classifier::low_threshold();
    let inventory = state.inventory.lock().map_err(|e| e.to_string())?;
    let mut session = state.session.lock().map_err(|e| e.to_string())?;
    let accumulated = classifier::find_lows(&inventory, threshold, &mut session)
        .map_err(|e| e.to_string())?;
    Ok(ClassifyOutcome { accumulated })
}

#[tauri::command]
pub fn get_department_lights(state: State<AppState>) -> Result<HashMap<String, bool>, String> {
    let inventory = state.inventory.lock().map_err(|e| e.to_string())?;
    Ok(inventory.lights().clone())
}

/// Replay the accumulated zero set into the external terminal. The frontend
/// confirms first; the replay blocks its thread for the whole fixed-delay
/// sequence and cannot be cancelled.
#[tauri::command]
pub async fn send_zeros_to_sap(state: State<'_, AppState>) -> Result<usize, String> {
    let queue = {
        let session = state.session.lock().map_err(|e| e.to_string())?;
        session.zero_queue()
    };
    if queue.is_empty() {
        return Err("No zero articles to send.".to_string());
    }
    replay_queue(queue).await
}

/// Replay the accumulated low set into the external terminal.
#[tauri::command]
pub async fn send_lows_to_sap(state: State<'_, AppState>) -> Result<usize, String> {
    let queue = {
        let session = state.session.lock().map_err(|e| e.to_string())?;
        session.low_queue()
    };
    if queue.is_empty() {
        return Err("No low articles to send.".to_string());
    }
    replay_queue(queue).await
}

async fn replay_queue(queue: Vec<String>) -> Result<usize, String> {
    tauri::async_runtime::spawn_blocking(move || {
        let mut sink = EnigoSink::new()?;
        let mut clock = SystemClock;
        Ok(replay::replay(
            queue,
            &mut sink,
            &mut clock,
            &ReplayPacing::default(),
        ))
    })
    .await
    .map_err(|e| e.to_string())?
}

#[tauri::command]
pub fn get_app_data_path(app: AppHandle) -> Result<String, String> {
    let path = app.path().app_data_dir().map_err(|e| e.to_string())?;
    path.to_str()
        .map(String::from)
        .ok_or_else(|| "Invalid path".to_string())
}

#[tauri::command]
pub fn open_app_data_folder(app: AppHandle) -> Result<(), String> {
    let path = app.path().app_data_dir().map_err(|e| e.to_string())?;
    opener::open(&path).map_err(|e| e.to_string())
}

#[tauri::command]
pub fn get_app_version(app: AppHandle) -> String {
    app.package_info().version.to_string()
}
