//! Cross-process reload broadcast over Unix datagram sockets
//!
//! Every listener binds its own datagram socket inside a shared directory.
//! The notifier sends one empty datagram to each socket it finds there. A
//! listener that is gone leaves a socket nobody reads; such sockets refuse
//! the datagram and are removed.

use crate::error::NotifyError;
use crate::notify::ReloadNotifier;
use std::io;
use std::os::unix::net::UnixDatagram;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

/// Name of the reload signal, used as the socket file prefix
pub const RELOAD_SIGNAL_NAME: &str = "hud-reload";

const SOCKET_EXTENSION: &str = "sock";

/// Broadcasts the reload signal to every bound [`ReloadListener`]
#[derive(Debug, Clone)]
pub struct SocketNotifier {
    dir: PathBuf,
}

impl SocketNotifier {
    /// Broadcast to listeners bound in `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Broadcast to listeners in the well-known runtime directory
    pub fn at_default_location() -> Self {
        Self::new(crate::utils::paths::reload_socket_dir())
    }

    /// Directory scanned for listener sockets
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ReloadNotifier for SocketNotifier {
    fn notify_reload(&self) -> Result<(), NotifyError> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No reload listeners registered in {}", self.dir.display());
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        let sender = UnixDatagram::unbound()?;
        sender.set_nonblocking(true)?;

        let mut delivered = 0usize;
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(SOCKET_EXTENSION) {
                continue;
            }
            match sender.send_to(&[], &path) {
                Ok(_) => delivered += 1,
                Err(e)
                    if matches!(
                        e.kind(),
                        io::ErrorKind::ConnectionRefused | io::ErrorKind::NotFound
                    ) =>
                {
                    debug!("Removing stale reload socket {}", path.display());
                    let _ = std::fs::remove_file(&path);
                }
                // Queue full: a reload is already pending for that listener
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => delivered += 1,
                Err(e) => warn!("Failed to signal reload listener {}: {}", path.display(), e),
            }
        }

        debug!("Reload signal sent to {} listener(s)", delivered);
        Ok(())
    }
}

/// Receiving end of the reload broadcast, used by the renderer
///
/// The socket file is removed when the listener is dropped.
#[derive(Debug)]
pub struct ReloadListener {
    socket: UnixDatagram,
    path: PathBuf,
}

impl ReloadListener {
    /// Bind a new listener socket in `dir`, creating it if needed
    pub fn bind_in(dir: impl AsRef<Path>) -> io::Result<Self> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(dir, std::fs::Permissions::from_mode(0o700))?;
        }

        let name = format!(
            "{RELOAD_SIGNAL_NAME}-{}-{}.{SOCKET_EXTENSION}",
            std::process::id(),
            &Uuid::new_v4().simple().to_string()[..8]
        );
        let path = dir.join(name);
        let socket = UnixDatagram::bind(&path)?;
        debug!("Reload listener bound at {}", path.display());
        Ok(Self { socket, path })
    }

    /// Bind in the well-known runtime directory
    pub fn bind() -> io::Result<Self> {
        Self::bind_in(crate::utils::paths::reload_socket_dir())
    }

    /// Socket file of this listener
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Wait up to `timeout` for a reload
    ///
    /// Returns `true` if at least one signal arrived; signals queued behind
    /// it are drained so a burst of saves triggers a single reload.
    pub fn wait(&self, timeout: Duration) -> io::Result<bool> {
        if timeout.is_zero() {
            return self.try_recv();
        }
        self.socket.set_nonblocking(false)?;
        self.socket.set_read_timeout(Some(timeout))?;
        let mut buf = [0u8; 16];
        match self.socket.recv(&mut buf) {
            Ok(_) => {
                self.drain()?;
                Ok(true)
            }
            Err(e) if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut) => {
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Check for a pending reload without blocking
    pub fn try_recv(&self) -> io::Result<bool> {
        self.socket.set_nonblocking(true)?;
        let mut buf = [0u8; 16];
        match self.socket.recv(&mut buf) {
            Ok(_) => {
                self.drain()?;
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn drain(&self) -> io::Result<()> {
        self.socket.set_nonblocking(true)?;
        let mut buf = [0u8; 16];
        loop {
            match self.socket.recv(&mut buf) {
                Ok(_) => {}
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => return Ok(()),
                Err(e) => return Err(e),
            }
        }
    }
}

impl Drop for ReloadListener {
    fn drop(&mut self) {
        // Clean up socket file
        let _ = std::fs::remove_file(&self.path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::create_test_dir;

    #[test]
    fn test_broadcast_reaches_all_listeners() {
        let dir = create_test_dir();
        let first = ReloadListener::bind_in(dir.path()).unwrap();
        let second = ReloadListener::bind_in(dir.path()).unwrap();

        SocketNotifier::new(dir.path()).notify_reload().unwrap();

        assert!(first.wait(Duration::from_secs(1)).unwrap());
        assert!(second.wait(Duration::from_secs(1)).unwrap());
    }

    #[test]
    fn test_no_signal_times_out() {
        let dir = create_test_dir();
        let listener = ReloadListener::bind_in(dir.path()).unwrap();
        assert!(!listener.wait(Duration::from_millis(50)).unwrap());
        assert!(!listener.try_recv().unwrap());
    }

    #[test]
    fn test_burst_is_coalesced() {
        let dir = create_test_dir();
        let listener = ReloadListener::bind_in(dir.path()).unwrap();
        let notifier = SocketNotifier::new(dir.path());
        for _ in 0..5 {
            notifier.notify_reload().unwrap();
        }

        assert!(listener.try_recv().unwrap());
        assert!(!listener.try_recv().unwrap());
    }

    #[test]
    fn test_missing_directory_is_not_an_error() {
        let dir = create_test_dir();
        let notifier = SocketNotifier::new(dir.path().join("nobody-here"));
        assert!(notifier.notify_reload().is_ok());
    }

    #[test]
    fn test_stale_socket_is_removed() {
        let dir = create_test_dir();
        // Bound then closed without unlinking, as a crashed renderer leaves it
        let stale_path = dir.path().join(format!("{RELOAD_SIGNAL_NAME}-0-dead.sock"));
        drop(UnixDatagram::bind(&stale_path).unwrap());
        assert!(stale_path.exists());

        SocketNotifier::new(dir.path()).notify_reload().unwrap();
        assert!(!stale_path.exists());
    }

    #[test]
    fn test_drop_removes_socket_file() {
        let dir = create_test_dir();
        let listener = ReloadListener::bind_in(dir.path()).unwrap();
        let path = listener.path().to_path_buf();
        drop(listener);
        assert!(!path.exists());
    }
}
