//! Desktop Actions - the side-effecting end of the pipeline
//!
//! The dispatcher only talks to the [`DesktopActions`] trait. The Hyprland
//! backend drives `hyprctl` and falls back to plain process spawning; the
//! dry-run backend only reports what would happen.

use crate::error::IntentError;
use crate::types::Outcome;
use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;

/// Dispatcher used when no maximize command is configured.
pub const DEFAULT_MAXIMIZE_COMMAND: &str = "fullscreen 1";

/// Operations the intent engine delegates to the desktop
pub trait DesktopActions {
    /// Launch an application from its configured command line.
    fn execute_command(&mut self, command: &str) -> Outcome;

    /// Close the application started by `identifier` (its launch command).
    fn close_app(&mut self, identifier: &str) -> Outcome;

    /// Switch to a virtual desktop.
    fn set_workspace(&mut self, number: u32) -> Outcome;

    /// Maximize the focused window with a window-manager command.
    fn maximize_active_window(&mut self, command: &str) -> Outcome;

    /// Delete `target`, which must live inside `base_dir`.
    fn delete_path(&mut self, target: &Path, base_dir: &Path) -> Outcome;
}

/// Hyprland backend (`hyprctl dispatch ...`)
#[derive(Debug, Clone)]
pub struct HyprlandActions {
    hyprctl: PathBuf,
}

impl Default for HyprlandActions {
    fn default() -> Self {
        Self::new()
    }
}

impl HyprlandActions {
    pub fn new() -> Self {
        Self {
            hyprctl: PathBuf::from("hyprctl"),
        }
    }

    /// Use a specific `hyprctl` binary.
    pub fn with_hyprctl(path: impl Into<PathBuf>) -> Self {
        Self { hyprctl: path.into() }
    }

    fn dispatch(&self, args: &[&str]) -> Result<(), IntentError> {
        log::debug!("hyprctl dispatch {}", args.join(" "));
        let status = Command::new(&self.hyprctl)
            .arg("dispatch")
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| IntentError::Execution(format!("{}: {}", self.hyprctl.display(), e)))?;

        if status.success() {
            Ok(())
        } else {
            Err(IntentError::Execution(format!("hyprctl dispatch {} ({})", args.join(" "), status)))
        }
    }
}

impl DesktopActions for HyprlandActions {
    fn execute_command(&mut self, command: &str) -> Outcome {
        let command = command.trim();
        if command.is_empty() {
            return IntentError::EmptyInput.into();
        }

        match self.dispatch(&["exec", command]) {
            Ok(()) => return Outcome::success(format!("Lancé: {}", command)),
            Err(e) => log::debug!("hyprctl exec unavailable, spawning directly: {}", e),
        }

        match spawn_detached(command) {
            Ok(()) => Outcome::success(format!("Lancé: {}", command)),
            Err(e) => IntentError::Execution(e.to_string()).into(),
        }
    }

    fn close_app(&mut self, identifier: &str) -> Outcome {
        let Some(program) = program_name(identifier) else {
            return IntentError::EmptyInput.into();
        };

        let status = Command::new("pkill")
            .arg("-x")
            .arg(&*program)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        match status {
            Ok(s) if s.success() => Outcome::success(format!("Fermé: {}", program)),
            Ok(s) if s.code() == Some(1) => Outcome::failure(format!("Aucun processus: {}", program)),
            Ok(s) => IntentError::Execution(format!("pkill {} ({})", program, s)).into(),
            Err(e) => IntentError::Execution(e.to_string()).into(),
        }
    }

    fn set_workspace(&mut self, number: u32) -> Outcome {
        let number = number.to_string();
        match self.dispatch(&["workspace", &number]) {
            Ok(()) => Outcome::success(format!("Bureau {}", number)),
            Err(e) => e.into(),
        }
    }

    fn maximize_active_window(&mut self, command: &str) -> Outcome {
        let command = match command.trim() {
            "" => DEFAULT_MAXIMIZE_COMMAND,
            other => other,
        };
        let args: Vec<&str> = command.split_whitespace().collect();

        match self.dispatch(&args) {
            Ok(()) => Outcome::success("Fenêtre maximisée"),
            Err(e) => e.into(),
        }
    }

    fn delete_path(&mut self, target: &Path, base_dir: &Path) -> Outcome {
        match safe_delete(target, base_dir) {
            Ok(path) => Outcome::success(format!("Supprimé: {}", path.display())),
            Err(e) => e.into(),
        }
    }
}

/// Backend that performs nothing and reports what it would have done
#[derive(Debug, Clone, Default)]
pub struct DryRunActions {
    /// Human-readable description of every requested action
    pub log: Vec<String>,
}

impl DryRunActions {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&mut self, action: String) -> Outcome {
        log::info!("[dry-run] {}", action);
        let outcome = Outcome::success(format!("(dry-run) {}", action));
        self.log.push(action);
        outcome
    }
}

impl DesktopActions for DryRunActions {
    fn execute_command(&mut self, command: &str) -> Outcome {
        self.record(format!("exec {}", command))
    }

    fn close_app(&mut self, identifier: &str) -> Outcome {
        self.record(format!("close {}", identifier))
    }

    fn set_workspace(&mut self, number: u32) -> Outcome {
        self.record(format!("workspace {}", number))
    }

    fn maximize_active_window(&mut self, command: &str) -> Outcome {
        let command = if command.trim().is_empty() { DEFAULT_MAXIMIZE_COMMAND } else { command };
        self.record(format!("maximize {}", command))
    }

    fn delete_path(&mut self, target: &Path, base_dir: &Path) -> Outcome {
        // Containment is still checked, nothing is removed
        match check_delete_target(target, base_dir) {
            Ok(path) => self.record(format!("delete {}", path.display())),
            Err(e) => e.into(),
        }
    }
}

/// Start `sh -c <command>` without waiting for it.
///
/// A background thread waits on the child and reaps it.
pub fn spawn_detached(command: &str) -> io::Result<()> {
    let mut child = Command::new("sh")
        .arg("-c")
        .arg(command)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    let label = command.to_string();
    thread::spawn(move || match child.wait() {
        Ok(status) => log::debug!("'{}' exited: {}", label, status),
        Err(e) => log::warn!("Failed to wait for '{}': {}", label, e),
    });
    Ok(())
}

/// Executable name from a launch command: basename of its first word.
pub fn program_name(command: &str) -> Option<Cow<'_, str>> {
    let first = command.split_whitespace().next()?;
    let name = Path::new(first).file_name()?.to_string_lossy();
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// Delete a file or directory only if it lives strictly inside `base_dir`.
///
/// Returns the resolved path that was removed. Directories are removed
/// recursively; a symlink is removed as a link, never followed.
pub fn safe_delete(target: &Path, base_dir: &Path) -> Result<PathBuf, IntentError> {
    let path = check_delete_target(target, base_dir)?;

    let meta = fs::symlink_metadata(&path).map_err(IntentError::DeleteIo)?;
    let result = if meta.is_dir() {
        fs::remove_dir_all(&path)
    } else {
        fs::remove_file(&path)
    };
    result.map_err(IntentError::DeleteIo)?;

    log::info!("Deleted {}", path.display());
    Ok(path)
}

/// Resolve `target` and `base_dir`, then check containment and existence.
pub fn check_delete_target(target: &Path, base_dir: &Path) -> Result<PathBuf, IntentError> {
    let base = resolve_path(base_dir, true);
    let path = resolve_path(target, false);

    if path == base || !path.starts_with(&base) {
        log::warn!("Refusing to delete {} outside of {}", path.display(), base.display());
        return Err(IntentError::DeleteOutsideBase(path));
    }

    match fs::symlink_metadata(&path) {
        Ok(_) => Ok(path),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(IntentError::DeleteNotFound(path)),
        Err(e) => Err(IntentError::DeleteIo(e)),
    }
}

/// Absolute, `..`-free form of a path.
///
/// `~` is expanded and symlinks in the parent directories are resolved. The
/// last component is only followed when `follow_last` is set, so a symlink
/// target stays the link itself.
fn resolve_path(path: &Path, follow_last: bool) -> PathBuf {
    let raw = path.to_string_lossy();
    let expanded = PathBuf::from(shellexpand::tilde(raw.as_ref()).as_ref());
    let absolute = if expanded.is_absolute() {
        expanded
    } else {
        std::env::current_dir().unwrap_or_default().join(expanded)
    };
    let lexical = normalize_lexically(&absolute);

    if follow_last {
        return fs::canonicalize(&lexical).unwrap_or(lexical);
    }

    match (lexical.parent(), lexical.file_name()) {
        (Some(parent), Some(name)) => match fs::canonicalize(parent) {
            Ok(parent) => parent.join(name),
            Err(_) => lexical,
        },
        _ => lexical,
    }
}

fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::ParentDir => {
                out.pop();
            }
            Component::CurDir => {}
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_program_name() {
        assert_eq!(program_name("firefox --new-window").as_deref(), Some("firefox"));
        assert_eq!(program_name("/usr/bin/prusa-slicer").as_deref(), Some("prusa-slicer"));
        assert_eq!(program_name("   ").as_deref(), None);
    }

    #[test]
    fn test_delete_file_inside_base() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("rapport.pdf");
        fs::write(&file, b"x").unwrap();

        let removed = safe_delete(&file, dir.path()).unwrap();

        assert!(!file.exists());
        assert!(removed.ends_with("rapport.pdf"));
    }

    #[test]
    fn test_delete_directory_recursively() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("photos/2023");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("a.jpg"), b"x").unwrap();

        safe_delete(&dir.path().join("photos"), dir.path()).unwrap();

        assert!(!dir.path().join("photos").exists());
        assert!(dir.path().exists());
    }

    #[test]
    fn test_refuses_parent_escape() {
        let root = tempdir().unwrap();
        let base = root.path().join("trash");
        fs::create_dir_all(&base).unwrap();
        let outside = root.path().join("precious.txt");
        fs::write(&outside, b"keep").unwrap();

        let err = safe_delete(&base.join("../precious.txt"), &base).unwrap_err();

        assert!(matches!(err, IntentError::DeleteOutsideBase(_)));
        assert!(outside.exists());
    }

    #[test]
    fn test_refuses_sibling_with_common_prefix() {
        let root = tempdir().unwrap();
        let base = root.path().join("trash");
        let sibling = root.path().join("trash2");
        fs::create_dir_all(&base).unwrap();
        fs::create_dir_all(&sibling).unwrap();

        let err = safe_delete(&sibling, &base).unwrap_err();

        assert!(matches!(err, IntentError::DeleteOutsideBase(_)));
        assert!(sibling.exists());
    }

    #[test]
    fn test_refuses_base_itself() {
        let dir = tempdir().unwrap();

        let err = safe_delete(dir.path(), dir.path()).unwrap_err();

        assert!(matches!(err, IntentError::DeleteOutsideBase(_)));
        assert!(dir.path().exists());
    }

    #[test]
    fn test_missing_target() {
        let dir = tempdir().unwrap();

        let err = safe_delete(&dir.path().join("ghost"), dir.path()).unwrap_err();

        assert!(matches!(err, IntentError::DeleteNotFound(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_removed_not_followed() {
        let root = tempdir().unwrap();
        let base = root.path().join("trash");
        let keep = root.path().join("keep");
        fs::create_dir_all(&base).unwrap();
        fs::create_dir_all(&keep).unwrap();
        fs::write(keep.join("data.txt"), b"x").unwrap();
        let link = base.join("link");
        std::os::unix::fs::symlink(&keep, &link).unwrap();

        safe_delete(&link, &base).unwrap();

        assert!(fs::symlink_metadata(&link).is_err());
        assert!(keep.join("data.txt").exists());
    }

    #[test]
    fn test_dry_run_records_without_side_effects() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("notes.txt");
        fs::write(&file, b"x").unwrap();
        let mut actions = DryRunActions::new();

        let outcome = actions.delete_path(&file, dir.path());
        assert!(outcome.ok);
        assert!(file.exists());

        let outcome = actions.maximize_active_window("");
        assert!(outcome.message.contains(DEFAULT_MAXIMIZE_COMMAND));
        assert_eq!(actions.log.len(), 2);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_detached_child_is_reaped() {
        use std::time::{Duration, Instant};

        let dir = tempdir().unwrap();
        let pid_file = dir.path().join("pid");
        spawn_detached(&format!("echo $$ > {}", pid_file.display())).unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        let pid: u32 = loop {
            if let Some(pid) = fs::read_to_string(&pid_file).ok().and_then(|s| s.trim().parse().ok()) {
                break pid;
            }
            assert!(Instant::now() < deadline, "child never ran");
            thread::sleep(Duration::from_millis(10));
        };

        // an exited but unreaped child keeps its /proc entry as a zombie
        let proc_entry = PathBuf::from(format!("/proc/{}", pid));
        while proc_entry.exists() {
            assert!(Instant::now() < deadline, "child {} was not reaped", pid);
            thread::sleep(Duration::from_millis(10));
        }
    }

    #[test]
    fn test_empty_command_is_refused() {
        let mut actions = HyprlandActions::with_hyprctl("/nonexistent/hyprctl");
        let outcome = actions.execute_command("   ");

        assert!(!outcome.ok);
        assert_eq!(outcome.message, "Commande vide");
    }
}
