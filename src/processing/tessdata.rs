use std::path::Path;

use crate::utils::IdCardError;

const TRAINEDDATA_EXT: &str = "traineddata";

/// Language codes with a `<code>.traineddata` file in `dir`, sorted.
pub fn available_languages<P: AsRef<Path>>(dir: P) -> Result<Vec<String>, IdCardError> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(IdCardError::ConfigError(format!(
            "tessdata directory not found: {:?}",
            dir
        )));
    }

    let mut languages = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some(TRAINEDDATA_EXT) {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            languages.push(stem.to_string());
        }
    }
    languages.sort();
    Ok(languages)
}

/// Languages from a `+`-joined list such as `chi_tra+eng` that have no data
/// file in `dir`.
pub fn missing_languages<P: AsRef<Path>>(dir: P, languages: &str) -> Result<Vec<String>, IdCardError> {
    let available = available_languages(dir)?;
    Ok(languages
        .split('+')
        .map(str::trim)
        .filter(|lang| !lang.is_empty() && !available.iter().any(|a| a == lang))
        .map(str::to_string)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    fn tessdata_with(files: &[&str]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for name in files {
            File::create(dir.path().join(name)).unwrap();
        }
        dir
    }

    #[test]
    fn test_lists_traineddata_only() {
        let dir = tessdata_with(&["eng.traineddata", "chi_tra.traineddata", "README.md", "osd.cube"]);
        assert_eq!(available_languages(dir.path()).unwrap(), vec!["chi_tra", "eng"]);
    }

    #[test]
    fn test_missing_languages() {
        let dir = tessdata_with(&["eng.traineddata"]);
        assert_eq!(
            missing_languages(dir.path(), "chi_tra+eng").unwrap(),
            vec!["chi_tra"]
        );
        assert!(missing_languages(dir.path(), "eng").unwrap().is_empty());
    }

    #[test]
    fn test_missing_directory() {
        let err = available_languages("/nonexistent/tessdata/dir").unwrap_err();
        assert!(matches!(err, IdCardError::ConfigError(_)));
    }
}
