//! Tilde (`~`) expansion for configured paths.

use std::path::{Path, PathBuf};

/// Expand a leading `~` in place.
pub fn expand_tilde(path: &mut PathBuf) {
    *path = expand_tilde_path(path);
}

/// Expand a leading `~` to the home directory. Paths without one, or systems
/// without a home directory, are returned unchanged.
pub fn expand_tilde_path(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_model_cache_path() {
        let Some(home) = dirs::home_dir() else {
            return;
        };
        let mut path = PathBuf::from("~/.memoria/models");
        expand_tilde(&mut path);

        assert!(!path.starts_with("~"));
        assert_eq!(path, home.join(".memoria/models"));
    }

    #[test]
    fn test_bare_tilde_is_home() {
        let Some(home) = dirs::home_dir() else {
            return;
        };
        assert_eq!(expand_tilde_path(Path::new("~")), home);
    }

    #[test]
    fn test_absolute_path_unchanged() {
        let path = Path::new("/var/cache/memoria");
        assert_eq!(expand_tilde_path(path), PathBuf::from("/var/cache/memoria"));
    }

    #[test]
    fn test_tilde_inside_name_unchanged() {
        let path = Path::new("models~backup");
        assert_eq!(expand_tilde_path(path), PathBuf::from("models~backup"));
    }
}
