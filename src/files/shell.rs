use std::path::Path;
use std::process::Command;
use tracing::warn;

/// Fire-and-forget OS integration: open a path in its native app, reveal it
/// in the file manager, open a URL in the default browser. Best effort only.
pub trait ExternalShell: Send + Sync {
    fn open_path(&self, path: &Path);
    fn reveal(&self, path: &Path);
    fn open_url(&self, url: &str);
}

pub struct SystemShell;

impl SystemShell {
    fn launch(&self, mut cmd: Command) {
        if let Err(e) = cmd.spawn() {
            warn!("external shell launch failed: {e}");
        }
    }
}

impl ExternalShell for SystemShell {
    #[cfg(target_os = "macos")]
    fn open_path(&self, path: &Path) {
        let mut cmd = Command::new("open");
        cmd.arg(path);
        self.launch(cmd);
    }

    #[cfg(not(target_os = "macos"))]
    fn open_path(&self, path: &Path) {
        let mut cmd = Command::new("xdg-open");
        cmd.arg(path);
        self.launch(cmd);
    }

    #[cfg(target_os = "macos")]
    fn reveal(&self, path: &Path) {
        let mut cmd = Command::new("open");
        cmd.arg("-R").arg(path);
        self.launch(cmd);
    }

    #[cfg(not(target_os = "macos"))]
    fn reveal(&self, path: &Path) {
        // No portable "reveal" on other platforms; open the parent directory.
        let target = path.parent().unwrap_or(path);
        let mut cmd = Command::new("xdg-open");
        cmd.arg(target);
        self.launch(cmd);
    }

    #[cfg(target_os = "macos")]
    fn open_url(&self, url: &str) {
        let mut cmd = Command::new("open");
        cmd.arg(url);
        self.launch(cmd);
    }

    #[cfg(not(target_os = "macos"))]
    fn open_url(&self, url: &str) {
        let mut cmd = Command::new("xdg-open");
        cmd.arg(url);
        self.launch(cmd);
    }
}
