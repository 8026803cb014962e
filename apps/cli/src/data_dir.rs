use std::path::PathBuf;

const DATA_DIR_NAME: &str = "frostforecast";

#[derive(Debug, Clone)]
pub struct DataDirResolution {
    pub dir: PathBuf,
    pub matched_existing: bool,
}

/// Picks the data dir: the `--data-dir` override, else the platform data dir.
pub fn resolve_data_dir(override_dir: Option<PathBuf>) -> Result<DataDirResolution, String> {
    let dir = match override_dir {
        Some(dir) => dir,
        None => dirs::data_dir()
            .map(|base| base.join(DATA_DIR_NAME))
            .ok_or_else(|| "resolve data dir: no home directory".to_string())?,
    };
    let matched_existing = dir.join(frost_app::DB_FILE_NAME).exists();
    Ok(DataDirResolution {
        dir,
        matched_existing,
    })
}
