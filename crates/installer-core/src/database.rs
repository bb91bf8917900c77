//! Database configuration for generated applications
//!
//! Applies a fixed set of text substitutions to `.env` and `.env.example`:
//! selecting the connection driver, toggling the five host/port/credential
//! lines the sqlite driver doesn't need, overriding vendor ports, and naming
//! the database after the application. The substitutions rely byte-for-byte
//! on the skeleton's known defaults (`DB_PORT=3306`, `DB_DATABASE=laravel`).

use crate::fs::{FileManager, Result};
use crate::options::Database;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// The connection fields that only apply to server-backed drivers, exactly as
/// the skeleton ships them.
const DEFAULT_CONNECTION_FIELDS: [&str; 5] = [
    "DB_HOST=127.0.0.1",
    "DB_PORT=3306",
    "DB_DATABASE=laravel",
    "DB_USERNAME=root",
    "DB_PASSWORD=",
];

static CONNECTION_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("DB_CONNECTION=.*").expect("valid connection pattern"));

pub struct DatabaseConfigurator<'a, F: FileManager> {
    files: &'a F,
}

impl<'a, F: FileManager> DatabaseConfigurator<'a, F> {
    pub fn new(files: &'a F) -> Self {
        Self { files }
    }

    /// Point the application's `.env` and `.env.example` at the given driver.
    ///
    /// Safe to call repeatedly: the sqlite path checks for already-commented
    /// fields, and the non-sqlite path's uncomment is a no-op once the `# `
    /// prefixes are gone.
    pub fn configure(&self, directory: &Path, database: Database, name: &str) -> Result<()> {
        self.update_connection(directory, database)?;

        if database == Database::Sqlite {
            self.configure_sqlite(directory)
        } else {
            self.configure_server_backed(directory, database, name)
        }
    }

    fn update_connection(&self, directory: &Path, database: Database) -> Result<()> {
        let replacement = format!("DB_CONNECTION={}", database);
        for file in env_files(directory) {
            self.files
                .regex_replace(&file, &CONNECTION_LINE, &replacement)?;
        }
        Ok(())
    }

    fn configure_sqlite(&self, directory: &Path) -> Result<()> {
        let environment = self.files.read(&directory.join(".env"))?;

        // Already commented means a previous run got here; don't double up.
        if !environment.contains("# DB_HOST=127.0.0.1") {
            self.comment_connection_fields(directory)?;
        }
        Ok(())
    }

    fn configure_server_backed(
        &self,
        directory: &Path,
        database: Database,
        name: &str,
    ) -> Result<()> {
        self.uncomment_connection_fields(directory)?;
        self.update_port(directory, database)?;
        self.update_database_name(directory, name)
    }

    fn comment_connection_fields(&self, directory: &Path) -> Result<()> {
        let commented = commented_fields();
        let pairs: Vec<(&str, &str)> = DEFAULT_CONNECTION_FIELDS
            .iter()
            .copied()
            .zip(commented.iter().map(String::as_str))
            .collect();

        for file in env_files(directory) {
            self.files.replace_each(&file, &pairs)?;
        }
        Ok(())
    }

    fn uncomment_connection_fields(&self, directory: &Path) -> Result<()> {
        let commented = commented_fields();
        let pairs: Vec<(&str, &str)> = commented
            .iter()
            .map(String::as_str)
            .zip(DEFAULT_CONNECTION_FIELDS.iter().copied())
            .collect();

        for file in env_files(directory) {
            self.files.replace_each(&file, &pairs)?;
        }
        Ok(())
    }

    fn update_port(&self, directory: &Path, database: Database) -> Result<()> {
        let Some(port) = database.non_default_port() else {
            return Ok(());
        };

        let replacement = format!("DB_PORT={}", port);
        for file in env_files(directory) {
            self.files.replace(&file, "DB_PORT=3306", &replacement)?;
        }
        Ok(())
    }

    fn update_database_name(&self, directory: &Path, name: &str) -> Result<()> {
        let replacement = format!("DB_DATABASE={}", sanitize_database_name(name));
        for file in env_files(directory) {
            self.files
                .replace(&file, "DB_DATABASE=laravel", &replacement)?;
        }
        Ok(())
    }
}

fn commented_fields() -> Vec<String> {
    DEFAULT_CONNECTION_FIELDS
        .iter()
        .map(|field| format!("# {}", field))
        .collect()
}

fn env_files(directory: &Path) -> [PathBuf; 2] {
    [directory.join(".env"), directory.join(".env.example")]
}

/// Application name to database name: lowercase, dashes to underscores.
fn sanitize_database_name(name: &str) -> String {
    name.to_lowercase().replace('-', "_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::DiskFileManager;
    use std::path::PathBuf;

    const SKELETON_ENV: &str = "APP_NAME=Laravel\n\
        APP_URL=http://localhost\n\
        \n\
        DB_CONNECTION=sqlite\n\
        # DB_HOST=127.0.0.1\n\
        # DB_PORT=3306\n\
        # DB_DATABASE=laravel\n\
        # DB_USERNAME=root\n\
        # DB_PASSWORD=\n";

    fn scaffold() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".env"), SKELETON_ENV).unwrap();
        std::fs::write(dir.path().join(".env.example"), SKELETON_ENV).unwrap();
        let path = dir.path().to_path_buf();
        (dir, path)
    }

    fn env(path: &Path) -> String {
        std::fs::read_to_string(path.join(".env")).unwrap()
    }

    fn configure(path: &Path, database: Database, name: &str) {
        let files = DiskFileManager;
        DatabaseConfigurator::new(&files)
            .configure(path, database, name)
            .unwrap();
    }

    #[test]
    fn connection_line_is_rewritten_for_every_driver() {
        for database in Database::ALL {
            let (_guard, path) = scaffold();
            configure(&path, database, "my-app");

            let contents = env(&path);
            let expected = format!("DB_CONNECTION={}", database.as_str());
            assert_eq!(
                contents.matches(&expected).count(),
                1,
                "driver {}",
                database
            );
            assert_eq!(contents.matches("DB_CONNECTION=").count(), 1);
        }
    }

    #[test]
    fn both_env_files_are_updated() {
        let (_guard, path) = scaffold();
        configure(&path, Database::MySql, "my-app");

        let example = std::fs::read_to_string(path.join(".env.example")).unwrap();
        assert!(example.contains("DB_CONNECTION=mysql"));
        assert!(example.contains("DB_DATABASE=my_app"));
    }

    #[test]
    fn server_backed_driver_uncomments_the_connection_fields() {
        let (_guard, path) = scaffold();
        configure(&path, Database::MySql, "my-app");

        let contents = env(&path);
        assert!(contents.contains("\nDB_HOST=127.0.0.1\n"));
        assert!(contents.contains("\nDB_PORT=3306\n"));
        assert!(contents.contains("\nDB_USERNAME=root\n"));
        assert!(!contents.contains("# DB_HOST"));
    }

    #[test]
    fn sqlite_is_idempotent_across_repeated_runs() {
        let (_guard, path) = scaffold();
        configure(&path, Database::Sqlite, "my-app");
        let once = env(&path);

        configure(&path, Database::Sqlite, "my-app");
        let twice = env(&path);

        assert_eq!(once, twice);
        assert!(!twice.contains("# # DB_HOST"));
    }

    #[test]
    fn mysql_then_sqlite_then_pgsql_round_trips() {
        let (_guard, path) = scaffold();

        configure(&path, Database::MySql, "x");
        assert!(env(&path).contains("\nDB_HOST=127.0.0.1\n"));

        configure(&path, Database::Sqlite, "x");
        let contents = env(&path);
        assert!(contents.contains("# DB_HOST=127.0.0.1"));
        assert!(contents.contains("# DB_PORT=3306"));
        assert!(contents.contains("# DB_USERNAME=root"));
        assert!(contents.contains("# DB_PASSWORD="));

        configure(&path, Database::Pgsql, "x");
        let contents = env(&path);
        assert!(contents.contains("\nDB_HOST=127.0.0.1\n"));
        assert!(contents.contains("DB_PORT=5432"));
        assert!(!contents.contains("DB_PORT=3306"));
    }

    #[test]
    fn sqlsrv_gets_its_vendor_port() {
        let (_guard, path) = scaffold();
        configure(&path, Database::Sqlsrv, "my-app");
        assert!(env(&path).contains("DB_PORT=1433"));
    }

    #[test]
    fn database_name_lowercases_and_maps_dashes_to_underscores() {
        let (_guard, path) = scaffold();
        configure(&path, Database::MySql, "My-Cool-App");
        assert!(env(&path).contains("DB_DATABASE=my_cool_app"));
    }

    #[test]
    fn spaces_in_the_name_are_preserved() {
        // Only dashes are mapped; anything else passes through lowercased.
        assert_eq!(sanitize_database_name("My-App Name"), "my_app name");
    }
}
