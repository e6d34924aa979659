fn main() {
    // Context codegen only matters for the desktop shell build.
    if std::env::var_os("CARGO_FEATURE_TAURI").is_some() {
        tauri_build::build();
    }
}
