use std::path::{Path, PathBuf};

/// `<dir>/<stem>.<lang>.xlf`, the layout used for per-language documents.
pub fn xlf_path_for(dir: &Path, stem: &str, lang: &str) -> PathBuf {
    dir.join(format!("{stem}.{lang}.xlf"))
}

pub fn is_xlf_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("xlf"))
}

pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".bak");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_per_language_paths() {
        let p = xlf_path_for(Path::new("xlf"), "Strings", "pt-BR");
        assert_eq!(p, Path::new("xlf").join("Strings.pt-BR.xlf"));
        assert_eq!(backup_path(&p), Path::new("xlf").join("Strings.pt-BR.xlf.bak"));
    }
}
