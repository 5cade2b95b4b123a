//! Path normalization for catalog locations.
//!
//! Catalog locations come from the media server, which may run on a
//! different OS than curator. Both `/` and `\` are treated as separators so a
//! location such as `D:\Movies\Alien\alien.mkv` normalizes the same way a
//! POSIX path does.

use std::path::{Path, PathBuf};

const SEPARATORS: [char; 2] = ['/', '\\'];

/// Split a path into `(head, tail)` at the last separator.
///
/// Trailing separators are stripped from `head` unless it is a root
/// (`/`, `\`, `C:\`). `tail` is empty when the path ends in a separator.
pub fn split(path: &str) -> (&str, &str) {
    let Some(index) = path.rfind(SEPARATORS) else {
        return ("", path);
    };
    let (head, tail) = (&path[..=index], &path[index + 1..]);
    let trimmed = head.trim_end_matches(SEPARATORS);
    if trimmed.is_empty() || trimmed.ends_with(':') {
        (head, tail)
    } else {
        (trimmed, tail)
    }
}

/// Directory that owns a media file for mapping purposes.
///
/// Splits the location once; if that yields an empty tail (the location
/// ended in a separator) the head is split once more. Every conversion of a
/// catalog location into a directory key must go through this function.
pub fn base_directory(location: &Path) -> PathBuf {
    let text = location.to_string_lossy();
    let (mut head, tail) = split(&text);
    if tail.is_empty() {
        head = split(head).0;
    }
    PathBuf::from(head)
}

/// Root directory of a show, given one of its season directories.
pub fn show_root(season_dir: &Path) -> PathBuf {
    base_directory(season_dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split() {
        assert_eq!(split("/lib/Alien/alien.mkv"), ("/lib/Alien", "alien.mkv"));
        assert_eq!(split("/lib/Alien/"), ("/lib/Alien", ""));
        assert_eq!(split("/alien.mkv"), ("/", "alien.mkv"));
        assert_eq!(split("alien.mkv"), ("", "alien.mkv"));
        assert_eq!(split("C:\\Movies\\alien.mkv"), ("C:\\Movies", "alien.mkv"));
        assert_eq!(split("C:\\alien.mkv"), ("C:\\", "alien.mkv"));
        assert_eq!(split("/lib//Alien"), ("/lib", "Alien"));
    }

    #[test]
    fn test_base_directory_of_file() {
        assert_eq!(
            base_directory(Path::new("/lib/Alien/alien.mkv")),
            PathBuf::from("/lib/Alien")
        );
        assert_eq!(
            base_directory(Path::new("D:\\Movies\\Alien\\alien.mkv")),
            PathBuf::from("D:\\Movies\\Alien")
        );
    }

    #[test]
    fn test_base_directory_climbs_on_trailing_separator() {
        assert_eq!(base_directory(Path::new("/lib/Alien/")), PathBuf::from("/lib"));
        assert_eq!(base_directory(Path::new("/lib/Alien")), PathBuf::from("/lib"));
    }

    #[test]
    fn test_files_in_same_directory_share_key() {
        let a = base_directory(Path::new("/lib/Show/Season 01/e01.mkv"));
        let b = base_directory(Path::new("/lib/Show/Season 01/e02.mkv"));
        assert_eq!(a, b);
        assert_eq!(show_root(&a), PathBuf::from("/lib/Show"));
    }
}
