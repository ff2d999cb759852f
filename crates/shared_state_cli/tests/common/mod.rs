use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use tempfile::{tempdir, TempDir};
use util::test::build_temp_file;

/// A temporary directory for scripts, config and the trace log, removed when dropped.
#[derive(Debug)]
pub struct Context {
    pub temp_dir: TempDir,

    pub trace_log_arg: String,
    pub test_trace_log_path: PathBuf,
}

impl Context {
    pub fn new() -> Self {
        let temp_dir = tempdir().unwrap();

        let (test_trace_log_path, _test_trace_log_file_name) = build_temp_file(&temp_dir, "trace", "log");
        let trace_log_arg = format!("--trace {}", test_trace_log_path.to_str().unwrap());

        Context {
            temp_dir,
            trace_log_arg,
            test_trace_log_path,
        }
    }

    pub fn create_file(&self, name: &str, content: &str) -> PathBuf {
        let mut path = PathBuf::from(self.temp_dir.path());
        path.push(name);

        println!("creating file, path: {:?}", &path);

        let mut file = File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();

        path
    }

    pub fn script_arg(&self, content: &str) -> String {
        let path = self.create_file("script.txt", content);
        format!("--script {}", path.to_str().unwrap())
    }
}
