use std::ffi::OsString;
use std::path::PathBuf;

use predicates::function::{function, FnPredicate};
use tempfile::TempDir;

/// Returns the full path and the file name of a file in the temp directory, the file is not created.
pub fn build_temp_file(temp_dir: &TempDir, prefix: &str, extension: &str) -> (PathBuf, OsString) {
    let mut path = PathBuf::from(temp_dir.path());
    path.push(format!("{}.{}", prefix, extension));

    let file_name = path
        .file_name()
        .map(|file_name| file_name.to_os_string())
        .unwrap_or_default();

    (path, file_name)
}

/// Splits each `"--arg value"` into separate args, the way a shell would.
pub fn prepare_args(args: Vec<&str>) -> Vec<String> {
    args.iter()
        .flat_map(|arg| arg.split(' '))
        .filter(|arg| !arg.is_empty())
        .map(str::to_string)
        .collect()
}

/// A predicate that always passes, printing the output it was given.
pub fn print(name: &'static str) -> FnPredicate<impl Fn(&[u8]) -> bool, [u8]> {
    function(move |content: &[u8]| {
        println!("{}:\n{}", name, String::from_utf8_lossy(content));
        true
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_are_split_on_spaces() {
        // when
        let args = prepare_args(vec!["--delivery queued", "-vv", "run", "--script  script.txt"]);

        // then
        assert_eq!(args, vec!["--delivery", "queued", "-vv", "run", "--script", "script.txt"]);
    }

    #[test]
    fn temp_file_is_in_the_temp_dir() {
        // given
        let temp_dir = tempfile::tempdir().unwrap();

        // when
        let (path, file_name) = build_temp_file(&temp_dir, "trace", "log");

        // then
        assert_eq!(file_name, OsString::from("trace.log"));
        assert_eq!(path.parent(), Some(temp_dir.path()));
        assert!(!path.exists());
    }
}
