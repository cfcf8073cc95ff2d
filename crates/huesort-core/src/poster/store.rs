//! The posters directory next to the film list.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use super::filename::{poster_file_name, PART_SUFFIX};
use crate::error::{Error, Result};

/// Directory of saved posters, one `<film name>.jpg` per film.
#[derive(Debug, Clone)]
pub struct PosterStore {
    dir: PathBuf,
}

impl PosterStore {
    /// Use `dir` as the posters directory, creating it if missing.
    pub fn open(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            fs::create_dir_all(dir)
                .map_err(|e| Error::io(format!("cannot create {}", dir.display()), e))?;
            tracing::info!(dir = %dir.display(), "posters folder created");
        }
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    /// `<csv dir>/<dir_name>`, created if missing.
    pub fn beside(csv_path: &Path, dir_name: &str) -> Result<Self> {
        let parent = csv_path.parent().unwrap_or_else(|| Path::new("."));
        Self::open(&parent.join(dir_name))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Final path of the poster for `film_name`.
    pub fn path_for(&self, film_name: &str) -> PathBuf {
        self.dir.join(poster_file_name(film_name))
    }

    /// True if a poster for `film_name` was saved by an earlier run.
    pub fn contains(&self, film_name: &str) -> bool {
        self.path_for(film_name).is_file()
    }

    /// Write `jpeg` as the poster for `film_name`.
    ///
    /// Bytes go to a `.part` file that is renamed into place once complete,
    /// so an interrupted write never leaves a truncated poster behind.
    pub fn save(&self, film_name: &str, jpeg: &[u8]) -> Result<PathBuf> {
        let final_path = self.path_for(film_name);
        let mut part_name = final_path.clone().into_os_string();
        part_name.push(PART_SUFFIX);
        let part_path = PathBuf::from(part_name);

        let write = || -> std::io::Result<()> {
            let mut file = File::options()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&part_path)?;
            file.write_all(jpeg)?;
            file.sync_all()?;
            drop(file);
            fs::rename(&part_path, &final_path)
        };
        if let Err(e) = write() {
            let _ = fs::remove_file(&part_path);
            return Err(Error::io(
                format!("cannot write {}", final_path.display()),
                e,
            ));
        }
        tracing::debug!(path = %final_path.display(), bytes = jpeg.len(), "poster saved");
        Ok(final_path)
    }
}
