use crate::env::Environment;
use crate::error::{Result, ShellError};
use crate::executor::Fallback;
use std::borrow::Cow;
use std::ffi::{OsStr, OsString};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};

/// Fallback that runs unknown names as programs found on `PATH`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PathFallback;

impl Fallback for PathFallback {
    fn run(&self, name: &str, args: &[String], piped: &[String], env: &Environment) -> Result<Vec<String>> {
        let search_paths = env.get_var("PATH").unwrap_or_default();
        let executable = find_command_path(OsStr::new(&search_paths), Path::new(name))
            .ok_or_else(|| ShellError::CommandNotFound(name.to_string()))?;
        let output = ExternalCommand::new(
            executable.as_os_str().to_owned(),
            args.iter().map(OsString::from).collect(),
        )
        .run(name, piped, env)?;
        Ok(vec![output])
    }
}

/// Command that is not a builtin.
pub struct ExternalCommand {
    path: OsString,
    args: Vec<OsString>,
}

impl ExternalCommand {
    pub fn new(path: OsString, args: Vec<OsString>) -> Self {
        Self { path, args }
    }

    /// Spawns the program, feeds `piped` on stdin and returns its stdout
    /// followed by its stderr.
    ///
    /// `name` is what the user typed; errors are reported under it.
    pub fn run(&self, name: &str, piped: &[String], env: &Environment) -> Result<String> {
        tracing::debug!(program = ?self.path, args = ?self.args, "spawning external command");
        let mut child = std::process::Command::new(&self.path)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .envs(env.vars.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .current_dir(&env.current_dir)
            .spawn()
            .map_err(|e| ShellError::execution(name, e))?;

        let input = piped.join("\n");
        let stdin = child.stdin.take();
        // stdin is fed from its own thread while stdout and stderr drain here
        let output = std::thread::scope(|scope| {
            if let Some(mut stdin) = stdin {
                scope.spawn(move || {
                    // a program that never reads its input closes the pipe early
                    if let Err(e) = stdin.write_all(input.as_bytes()) {
                        tracing::debug!(error = %e, "child stopped reading stdin");
                    }
                });
            }
            child.wait_with_output()
        })
        .map_err(|e| ShellError::execution(name, e))?;
        let code = exit_code(output.status);
        if code != 0 {
            tracing::debug!(code, "external command failed");
            return Err(ShellError::execution(name, format!("exited with status {code}")));
        }

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));
        Ok(text)
    }
}

fn exit_code(status: ExitStatus) -> i32 {
    match status.code() {
        Some(x) => x,
        None => terminated_by_signal(status),
    }
}

#[cfg(unix)]
fn terminated_by_signal(exit_status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    if let Some(signal) = ExitStatusExt::signal(&exit_status) {
        128 + signal
    } else if ExitStatusExt::core_dumped(&exit_status) {
        255
    } else {
        -1
    }
}

#[cfg(not(unix))]
fn terminated_by_signal(_exit_status: ExitStatus) -> i32 {
    -1
}

/// Resolve a command path the way a typical shell would.
///
/// - Absolute path: returns it if it exists.
/// - Relative with several components (`bin/sh`) or `./`-prefixed: returns it if it exists.
/// - Single component: the first existing match in `search_paths` (PATH syntax).
/// - Empty path: `None`.
pub fn find_command_path<'a>(search_paths: &OsStr, path: &'a Path) -> Option<Cow<'a, Path>> {
    if path.is_absolute() {
        return find_by_path(path).map(Cow::Borrowed);
    }

    let search_in_current_dir = cfg!(not(unix)) || path.starts_with("./");
    if search_in_current_dir && path.exists() {
        return Some(Cow::Borrowed(path));
    }

    let mut components = path.components();
    match (components.next(), components.next()) {
        (None, _) => None,
        (Some(x), None) => find_in_path(search_paths, x.as_os_str()).map(Cow::Owned),
        _ => find_by_path(path).map(Cow::Borrowed),
    }
}

fn find_in_path(search_paths: &OsStr, cmd: &OsStr) -> Option<PathBuf> {
    std::env::split_paths(search_paths)
        .map(|dir| dir.join(cmd))
        .find(|path| path.is_file())
}

fn find_by_path(path: &Path) -> Option<&Path> {
    if path.exists() { Some(path) } else { None }
}
