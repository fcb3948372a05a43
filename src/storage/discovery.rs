//! Finds the silver files of each city.
//!
//! Files are attributed to cities by a case-insensitive substring match of the
//! city name on the file name, and split into daily and hourly files by name.

use crate::storage::error::StorageError;
use crate::types::source::Granularity;
use std::fs;
use std::path::{Path, PathBuf};

/// The silver files of one source directory that belong to one city.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityFiles {
    pub city: String,
    pub files: Vec<PathBuf>,
}

impl CityFiles {
    /// First file of the given granularity.
    pub fn file(&self, granularity: Granularity) -> Option<&Path> {
        self.files
            .iter()
            .find(|path| Granularity::from_file_name(&file_name(path)) == granularity)
            .map(PathBuf::as_path)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn is_parquet(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("parquet"))
}

/// Parquet files directly inside `dir`, sorted by path.
pub fn list_parquet_files(dir: &Path) -> Result<Vec<PathBuf>, StorageError> {
    let entries = fs::read_dir(dir).map_err(|e| StorageError::DirectoryRead(dir.to_path_buf(), e))?;
    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|e| StorageError::DirectoryRead(dir.to_path_buf(), e))?
            .path();
        if path.is_file() && is_parquet(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Names of the subdirectories of `dir`, sorted.
pub fn list_subdirectories(dir: &Path) -> Result<Vec<String>, StorageError> {
    let entries = fs::read_dir(dir).map_err(|e| StorageError::DirectoryRead(dir.to_path_buf(), e))?;
    let mut names = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|e| StorageError::DirectoryRead(dir.to_path_buf(), e))?
            .path();
        if path.is_dir() {
            names.push(file_name(&path));
        }
    }
    names.sort();
    Ok(names)
}

/// Groups `files` by the roster city their name contains. Cities keep roster
/// order and cities without files are left out. A file naming several cities
/// is attributed to each of them.
pub fn group_by_city(files: &[PathBuf], cities: &[String]) -> Vec<CityFiles> {
    let names: Vec<String> = files.iter().map(|path| file_name(path).to_lowercase()).collect();
    cities
        .iter()
        .filter_map(|city| {
            let needle = city.to_lowercase();
            let matched: Vec<PathBuf> = files
                .iter()
                .zip(&names)
                .filter(|(_, name)| name.contains(&needle))
                .map(|(path, _)| path.clone())
                .collect();
            (!matched.is_empty()).then(|| CityFiles {
                city: city.clone(),
                files: matched,
            })
        })
        .collect()
}

/// The first parquet file in `dir` whose name contains `city` (any case).
pub fn find_disaster_file(dir: &Path, city: &str) -> Result<Option<PathBuf>, StorageError> {
    let needle = city.to_lowercase();
    Ok(list_parquet_files(dir)?
        .into_iter()
        .find(|path| file_name(path).to_lowercase().contains(&needle)))
}
