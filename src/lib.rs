pub mod db;
pub mod error;
pub mod excel;
pub mod logging;
pub mod models;
pub mod services;
pub mod types;

#[cfg(feature = "tauri")]
pub mod commands;

#[cfg(feature = "tauri")]
use commands::AppState;
#[cfg(feature = "tauri")]
use std::sync::Mutex;
#[cfg(feature = "tauri")]
use tauri::Manager;

#[cfg(feature = "tauri")]
pub fn run() {
    let app = tauri::Builder::default()
        .plugin(tauri_plugin_dialog::init())
        .plugin(tauri_plugin_opener::init())
        .setup(|app| {
            let app_data_dir = app.path().app_data_dir().map_err(|e| e.to_string())?;
            // Load .env from app data dir so users can override configuration
            // (e.g. LOW_STOCK_THRESHOLD) without rebuilding
            let env_path = app_data_dir.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
            }
            let store = db::DnoStore::new(app_data_dir.join("dno.db"));
            app.manage(AppState {
                store,
                inventory: Mutex::new(services::inventory::InventoryTable::new()),
                session: Mutex::new(services::classifier::SessionState::new()),
            });
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            commands::import_dno_file,
            commands::export_dno_file,
            commands::add_dno_article,
            commands::remove_dno_article,
            commands::upload_inventory,
            commands::find_zero_articles,
            commands::find_low_articles,
            commands::get_department_lights,
            commands::send_zeros_to_sap,
            commands::send_lows_to_sap,
            commands::get_app_data_path,
            commands::open_app_data_folder,
            commands::get_app_version,
        ])
        .build(tauri::generate_context!())
        .expect("error while building tauri application");

    app.run(|app_handle, event| {
        if let tauri::RunEvent::Exit = event {
            write_session_log(app_handle);
        }
    });
}

/// Append the shutdown summary line, but only when something actually
/// happened this session.
#[cfg(feature = "tauri")]
fn write_session_log(app_handle: &tauri::AppHandle) {
    let Ok(app_data_dir) = app_handle.path().app_data_dir() else {
        return;
    };
    let Some(state) = app_handle.try_state::<AppState>() else {
        return;
    };
    let Ok(session) = state.session.lock() else {
        return;
    };
    if !session.has_activity() {
        return;
    }
    let summary = services::session_log::SessionSummary::from_session(&session);
    if let Err(e) = services::session_log::append(&app_data_dir.join("session.log"), &summary) {
        tracing::warn!(error = %e, "could not write session log");
    }
}
