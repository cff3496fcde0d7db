//! Fake engine binaries
//!
//! A fake engine is a `/bin/sh` script that answers `--version` and otherwise
//! prints canned stdout/stderr and exits with a chosen code. Every invocation
//! appends its arguments (one per line, blank line between runs) to a log so
//! tests can assert on the exact command line that was built.

use std::path::{Path, PathBuf};

/// A fake engine script on disk
#[derive(Debug, Clone)]
pub struct FakeEngine {
    pub path: PathBuf,
    args_log: PathBuf,
}

impl FakeEngine {
    pub fn builder(dir: &Path, name: &str) -> FakeEngineBuilder {
        FakeEngineBuilder {
            dir: dir.to_path_buf(),
            name: name.to_string(),
            version_exit: 0,
            stdout: String::new(),
            stderr: String::new(),
            exit_code: 0,
            sleep_secs: None,
        }
    }

    /// Path as a string, for use as a configured binary
    pub fn binary(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }

    /// Arguments of every non-`--version` invocation, oldest first
    pub fn invocations(&self) -> Vec<Vec<String>> {
        let Ok(log) = std::fs::read_to_string(&self.args_log) else {
            return Vec::new();
        };
        log.split("\n\n")
            .filter(|run| !run.trim().is_empty())
            .map(|run| run.lines().map(str::to_string).collect())
            .collect()
    }
}

pub struct FakeEngineBuilder {
    dir: PathBuf,
    name: String,
    version_exit: i32,
    stdout: String,
    stderr: String,
    exit_code: i32,
    sleep_secs: Option<u32>,
}

impl FakeEngineBuilder {
    /// Make `--version` fail, so probing reports the engine unavailable
    pub fn unavailable(mut self) -> Self {
        self.version_exit = 1;
        self
    }

    pub fn stdout(mut self, stdout: &str) -> Self {
        self.stdout = stdout.to_string();
        self
    }

    pub fn stderr(mut self, stderr: &str) -> Self {
        self.stderr = stderr.to_string();
        self
    }

    pub fn exit_code(mut self, code: i32) -> Self {
        self.exit_code = code;
        self
    }

    /// Sleep before printing, to exercise timeouts
    pub fn sleep(mut self, secs: u32) -> Self {
        self.sleep_secs = Some(secs);
        self
    }

    /// Write the script and its fixture files
    ///
    /// # Panics
    ///
    /// Panics if any file cannot be written.
    #[cfg(unix)]
    pub fn build(self) -> FakeEngine {
        use std::os::unix::fs::PermissionsExt;

        std::fs::create_dir_all(&self.dir).expect("Failed to create fake engine dir");
        let path = self.dir.join(&self.name);
        let stdout_file = self.dir.join(format!("{}.stdout", self.name));
        let stderr_file = self.dir.join(format!("{}.stderr", self.name));
        let args_log = self.dir.join(format!("{}.args", self.name));

        std::fs::write(&stdout_file, &self.stdout).expect("Failed to write stdout fixture");
        std::fs::write(&stderr_file, &self.stderr).expect("Failed to write stderr fixture");

        let sleep = self
            .sleep_secs
            .map(|secs| format!("sleep {}\n", secs))
            .unwrap_or_default();
        let script = format!(
            "#!/bin/sh\n\
             if [ \"$1\" = \"--version\" ]; then\n\
             \x20 echo \"{name} 0.0.0-fake\"\n\
             \x20 exit {version_exit}\n\
             fi\n\
             printf '%s\\n' \"$@\" >> '{args}'\n\
             printf '\\n' >> '{args}'\n\
             {sleep}\
             cat '{stdout}'\n\
             cat '{stderr}' >&2\n\
             exit {exit_code}\n",
            name = self.name,
            version_exit = self.version_exit,
            args = args_log.display(),
            sleep = sleep,
            stdout = stdout_file.display(),
            stderr = stderr_file.display(),
            exit_code = self.exit_code,
        );

        std::fs::write(&path, script).expect("Failed to write fake engine script");
        let mut perms = std::fs::metadata(&path)
            .expect("Failed to stat fake engine")
            .permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).expect("Failed to chmod fake engine");

        FakeEngine { path, args_log }
    }
}
