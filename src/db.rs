use crate::error::{Error, Result};
use crate::excel;
use rusqlite::{params, Connection};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::info;

/// The persistent Do-Not-Order list: one SQLite table of unique article
/// numbers. The store is addressed by path and opens a fresh connection per
/// operation, so a raw file-copy import never races a held handle.
pub struct DnoStore {
    path: PathBuf,
}

impl DnoStore {
    pub fn new(path: PathBuf) -> Self {
        DnoStore { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(&self) -> Result<Connection> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(&self.path)?;
        conn.execute_batch("CREATE TABLE IF NOT EXISTS dno (article TEXT UNIQUE)")?;
        Ok(conn)
    }

    /// Current full set of DNO article numbers. Creates the table on first
    /// use; a fresh store yields an empty set.
    pub fn members(&self) -> Result<HashSet<String>> {
        let conn = self.open()?;
        let mut stmt = conn.prepare("SELECT article FROM dno")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut members = HashSet::new();
        for row in rows {
            members.insert(row?);
        }
        Ok(members)
    }

    /// Insert-or-ignore a single article. Returns whether a row was actually
    /// inserted. Caller is responsible for confirming with the user first.
    pub fn add(&self, article: &str) -> Result<bool> {
        let conn = self.open()?;
        let changed = conn.execute(
            "INSERT OR IGNORE INTO dno (article) VALUES (?1)",
            params![article],
        )?;
        Ok(changed > 0)
    }

    /// Delete an article if present. Returns whether a row was actually
    /// removed; removing an absent article is a no-op, not an error.
    pub fn remove(&self, article: &str) -> Result<bool> {
        let conn = self.open()?;
        let changed = conn.execute("DELETE FROM dno WHERE article = ?1", params![article])?;
        Ok(changed > 0)
    }

    /// Bulk-import candidate articles from a workbook: every non-empty cell in
    /// the first ten columns of every sheet, normalized. Duplicates are
    /// silently skipped; returns the count of newly added articles.
    pub fn import_workbook(&self, workbook_path: &Path) -> Result<usize> {
        let candidates = excel::read_dno_candidates(workbook_path)?;
        let mut conn = self.open()?;
        let tx = conn.transaction()?;
        let mut added = 0usize;
        {
            let mut stmt = tx.prepare("INSERT OR IGNORE INTO dno (article) VALUES (?1)")?;
            for article in &candidates {
                added += stmt.execute(params![article])?;
            }
        }
        tx.commit()?;
        info!(
            candidates = candidates.len(),
            added, "imported DNO workbook"
        );
        Ok(added)
    }

    /// Full replace of the store file with a raw copy of another store.
    pub fn replace_from(&self, source: &Path) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::copy(source, &self.path)
            .map_err(|e| Error::Import(format!("Could not copy store file: {}", e)))?;
        info!(source = %source.display(), "replaced DNO store");
        Ok(())
    }

    /// Copy the store file into a destination directory. The destination is
    /// untouched when no store exists yet.
    pub fn export_to(&self, directory: &Path) -> Result<PathBuf> {
        if !self.path.exists() {
            return Err(Error::NotFound(
                "No local dno.db found to export.".to_string(),
            ));
        }
        let file_name = self
            .path
            .file_name()
            .unwrap_or_else(|| std::ffi::OsStr::new("dno.db"));
        let dest = directory.join(file_name);
        std::fs::copy(&self.path, &dest)?;
        info!(dest = %dest.display(), "exported DNO store");
        Ok(dest)
    }
}
