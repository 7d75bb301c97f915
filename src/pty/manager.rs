use anyhow::{Context, Result};
use portable_pty::{native_pty_system, Child, ChildKiller, CommandBuilder, MasterPty, PtySize};
use std::io::{Read, Write};
use std::time::Duration;
#[cfg(unix)]
use std::time::Instant;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::app::Action;
use crate::error::WorkspaceError;

use super::{ProcessHost, SessionHandle, SpawnSpec};

pub struct PtyHandle {
    pub master: Box<dyn MasterPty + Send>,
    pub child_killer: Box<dyn ChildKiller + Send + Sync>,
    pub process_id: Option<u32>,
    pub writer: Box<dyn Write + Send>,
}

impl SessionHandle for PtyHandle {
    fn send_input(&mut self, data: &[u8]) -> Result<()> {
        self.writer.write_all(data)?;
        self.writer.flush()?;
        Ok(())
    }

    fn resize(&self, cols: u16, rows: u16) -> Result<()> {
        self.master.resize(PtySize {
            rows,
            cols,
            pixel_width: 0,
            pixel_height: 0,
        })?;
        Ok(())
    }

    fn kill(&mut self) -> Result<()> {
        self.kill_process_group()
    }

    fn interrupt_then_kill(&mut self, grace: Duration) -> Result<()> {
        #[cfg(unix)]
        {
            if let Some(pgid) = self.process_group_id() {
                // Send SIGINT to the process group for a graceful shutdown.
                if self.signal_process_group(pgid, libc::SIGINT).is_err() {
                    self.child_killer.kill()?;
                    return Ok(());
                }

                let start = Instant::now();
                while start.elapsed() < grace {
                    if !self.process_group_alive(pgid) {
                        return Ok(());
                    }
                    std::thread::sleep(Duration::from_millis(25));
                }

                // Escalate to SIGKILL if the group is still alive.
                let _ = self.signal_process_group(pgid, libc::SIGKILL);
                return Ok(());
            }
        }

        self.child_killer.kill()?;
        Ok(())
    }
}

impl PtyHandle {
    #[cfg(unix)]
    fn process_group_id(&self) -> Option<libc::pid_t> {
        self.process_id
            .filter(|pid| *pid > 0)
            .map(|pid| pid as libc::pid_t)
    }

    #[cfg(unix)]
    fn signal_process_group(&self, pgid: libc::pid_t, signal: i32) -> Result<()> {
        let result = unsafe { libc::kill(-pgid, signal) };
        if result == -1 {
            let err = std::io::Error::last_os_error();
            if err.raw_os_error() == Some(libc::ESRCH) {
                return Ok(());
            }
            return Err(err.into());
        }
        Ok(())
    }

    #[cfg(unix)]
    fn process_group_alive(&self, pgid: libc::pid_t) -> bool {
        let result = unsafe { libc::kill(-pgid, 0) };
        if result == 0 {
            return true;
        }
        let err = std::io::Error::last_os_error();
        err.raw_os_error() != Some(libc::ESRCH)
    }

    #[cfg(not(unix))]
    fn kill_process_group(&mut self) -> Result<()> {
        self.child_killer.kill()?;
        Ok(())
    }

    #[cfg(unix)]
    fn kill_process_group(&mut self) -> Result<()> {
        if let Some(pgid) = self.process_group_id() {
            // portable-pty uses setsid() on spawn, so pid == pgid for the child.
            if self.signal_process_group(pgid, libc::SIGKILL).is_ok() {
                return Ok(());
            }
        }

        self.child_killer.kill()?;
        Ok(())
    }
}

/// The pty system is not `Send`, so it is constructed per spawn instead of
/// stored; the spawner itself stays shareable across threads.
pub struct PtySpawner;

impl PtySpawner {
    pub fn new() -> Self {
        Self
    }

    fn spawn_inner(&self, spec: &SpawnSpec, tx: mpsc::Sender<Action>) -> Result<PtyHandle> {
        let pair = native_pty_system()
            .openpty(PtySize {
                rows: spec.rows,
                cols: spec.cols,
                pixel_width: 0,
                pixel_height: 0,
            })
            .context("Failed to open PTY")?;

        let command = match &spec.command {
            Some(command) => command.clone(),
            None => std::env::var("SHELL").unwrap_or_else(|_| "/bin/bash".to_string()),
        };
        let mut cmd = CommandBuilder::new(command);
        cmd.cwd(&spec.working_dir);
        cmd.env("TERM", "xterm-256color");

        // Explicit size info as a fallback for apps with startup resize issues.
        cmd.env("LINES", spec.rows.to_string());
        cmd.env("COLUMNS", spec.cols.to_string());

        let child = pair
            .slave
            .spawn_command(cmd)
            .context("Failed to spawn session process")?;
        let child_killer = child.clone_killer();
        let process_id = child.process_id();

        let mut reader = pair
            .master
            .try_clone_reader()
            .context("Failed to clone PTY reader")?;
        let writer = pair
            .master
            .take_writer()
            .context("Failed to take PTY writer")?;

        let sid = spec.session_id;
        std::thread::spawn(move || {
            Self::read_output(sid, &mut reader, tx, child);
        });

        Ok(PtyHandle {
            master: pair.master,
            child_killer,
            process_id,
            writer,
        })
    }

    /// Forward output chunks in arrival order until EOF, then report the
    /// real exit status. `blocking_send` applies backpressure instead of
    /// dropping or reordering chunks.
    fn read_output(
        session_id: Uuid,
        reader: &mut Box<dyn Read + Send>,
        tx: mpsc::Sender<Action>,
        mut child: Box<dyn Child + Send + Sync>,
    ) {
        let mut buf = [0u8; 4096];
        loop {
            match reader.read(&mut buf) {
                Ok(0) => {
                    let exit_code = match child.wait() {
                        Ok(status) => status.exit_code() as i32,
                        Err(_) => 1,
                    };
                    let _ = tx.blocking_send(Action::SessionExited(session_id, exit_code));
                    break;
                }
                Ok(n) => {
                    let data = buf[..n].to_vec();
                    if tx.blocking_send(Action::PtyOutput(session_id, data)).is_err() {
                        break;
                    }
                }
                Err(_) => {
                    let _ = tx.blocking_send(Action::SessionExited(session_id, 1));
                    break;
                }
            }
        }
    }
}

impl ProcessHost for PtySpawner {
    fn spawn(
        &self,
        spec: &SpawnSpec,
        tx: mpsc::Sender<Action>,
    ) -> std::result::Result<Box<dyn SessionHandle>, WorkspaceError> {
        self.spawn_inner(spec, tx)
            .map(|handle| Box::new(handle) as Box<dyn SessionHandle>)
            .map_err(|e| WorkspaceError::Spawn(format!("{e:#}")))
    }
}

impl Default for PtySpawner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portable_pty::{Child, ChildKiller, ExitStatus};
    use std::io::{self, Read};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    #[derive(Debug)]
    struct DummyMaster;

    impl MasterPty for DummyMaster {
        fn resize(&self, _size: PtySize) -> std::result::Result<(), anyhow::Error> {
            Err(anyhow::anyhow!("unused"))
        }

        fn get_size(&self) -> std::result::Result<PtySize, anyhow::Error> {
            Err(anyhow::anyhow!("unused"))
        }

        fn try_clone_reader(&self) -> std::result::Result<Box<dyn Read + Send>, anyhow::Error> {
            Err(anyhow::anyhow!("unused"))
        }

        fn take_writer(&self) -> std::result::Result<Box<dyn io::Write + Send>, anyhow::Error> {
            Err(anyhow::anyhow!("unused"))
        }

        #[cfg(unix)]
        fn process_group_leader(&self) -> Option<libc::pid_t> {
            None
        }

        #[cfg(unix)]
        fn as_raw_fd(&self) -> Option<std::os::unix::io::RawFd> {
            None
        }
    }

    #[derive(Debug)]
    struct TestChild {
        exit_status: ExitStatus,
    }

    #[derive(Debug)]
    struct TestChildKiller {
        calls: Arc<AtomicUsize>,
    }

    impl ChildKiller for TestChildKiller {
        fn kill(&mut self) -> io::Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn clone_killer(&self) -> Box<dyn ChildKiller + Send + Sync> {
            Box::new(TestChildKiller {
                calls: self.calls.clone(),
            })
        }
    }

    impl ChildKiller for TestChild {
        fn kill(&mut self) -> io::Result<()> {
            Ok(())
        }

        fn clone_killer(&self) -> Box<dyn ChildKiller + Send + Sync> {
            Box::new(TestChildKiller {
                calls: Arc::new(AtomicUsize::new(0)),
            })
        }
    }

    impl Child for TestChild {
        fn try_wait(&mut self) -> io::Result<Option<ExitStatus>> {
            Ok(Some(self.exit_status.clone()))
        }

        fn wait(&mut self) -> io::Result<ExitStatus> {
            Ok(self.exit_status.clone())
        }

        fn process_id(&self) -> Option<u32> {
            None
        }

        #[cfg(windows)]
        fn as_raw_handle(&self) -> Option<std::os::windows::io::RawHandle> {
            None
        }
    }

    fn test_child(exit_code: u32) -> Box<dyn Child + Send + Sync> {
        Box::new(TestChild {
            exit_status: ExitStatus::with_exit_code(exit_code),
        })
    }

    fn test_handle(counter: Arc<AtomicUsize>) -> PtyHandle {
        PtyHandle {
            master: Box::new(DummyMaster),
            child_killer: Box::new(TestChildKiller { calls: counter }),
            process_id: None,
            writer: Box::new(io::sink()),
        }
    }

    struct ChunkedReader {
        chunks: Vec<Vec<u8>>,
        index: usize,
    }

    impl ChunkedReader {
        fn new(chunks: Vec<Vec<u8>>) -> Self {
            Self { chunks, index: 0 }
        }
    }

    impl Read for ChunkedReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.index >= self.chunks.len() {
                return Ok(0);
            }
            let chunk = &self.chunks[self.index];
            let len = chunk.len().min(buf.len());
            buf[..len].copy_from_slice(&chunk[..len]);
            self.index += 1;
            Ok(len)
        }
    }

    #[test]
    fn reader_emits_output_then_exit() {
        let (tx, mut rx) = mpsc::channel(10);
        let session_id = Uuid::new_v4();
        let reader = ChunkedReader::new(vec![b"hello".to_vec(), b"world".to_vec()]);
        let mut reader: Box<dyn Read + Send> = Box::new(reader);

        PtySpawner::read_output(session_id, &mut reader, tx, test_child(0));

        let mut actions = Vec::new();
        while let Ok(action) = rx.try_recv() {
            actions.push(action);
        }

        assert_eq!(actions.len(), 3);
        assert!(matches!(
            &actions[0],
            Action::PtyOutput(id, data) if *id == session_id && data == b"hello"
        ));
        assert!(matches!(
            &actions[1],
            Action::PtyOutput(id, data) if *id == session_id && data == b"world"
        ));
        assert!(matches!(
            &actions[2],
            Action::SessionExited(id, code) if *id == session_id && *code == 0
        ));
    }

    fn recv_with_timeout(rx: &mut mpsc::Receiver<Action>, timeout: Duration) -> Action {
        let start = Instant::now();
        loop {
            match rx.try_recv() {
                Ok(action) => return action,
                Err(mpsc::error::TryRecvError::Empty) => {
                    if start.elapsed() >= timeout {
                        panic!("timed out waiting for action");
                    }
                    std::thread::sleep(Duration::from_millis(5));
                }
                Err(mpsc::error::TryRecvError::Disconnected) => {
                    panic!("channel closed while waiting for action");
                }
            }
        }
    }

    #[test]
    fn reader_blocks_when_queue_full() {
        let (tx, mut rx) = mpsc::channel(1);
        let session_id = Uuid::new_v4();
        let reader = ChunkedReader::new(vec![b"first".to_vec(), b"second".to_vec()]);
        let mut reader: Box<dyn Read + Send> = Box::new(reader);

        let handle = std::thread::spawn(move || {
            PtySpawner::read_output(session_id, &mut reader, tx, test_child(0));
        });

        std::thread::sleep(Duration::from_millis(50));
        assert!(!handle.is_finished(), "reader should block on full queue");

        let first = recv_with_timeout(&mut rx, Duration::from_millis(100));
        assert!(matches!(
            first,
            Action::PtyOutput(id, data) if id == session_id && data == b"first"
        ));

        let second = recv_with_timeout(&mut rx, Duration::from_millis(100));
        assert!(matches!(
            second,
            Action::PtyOutput(id, data) if id == session_id && data == b"second"
        ));

        let third = recv_with_timeout(&mut rx, Duration::from_millis(100));
        assert!(matches!(
            third,
            Action::SessionExited(id, code) if id == session_id && code == 0
        ));

        handle.join().unwrap();
    }

    #[test]
    fn spawner_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PtySpawner>();
        let _host: Arc<dyn ProcessHost> = Arc::new(PtySpawner::new());
    }

    #[test]
    fn kill_uses_child_killer_when_no_pid() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut handle = test_handle(calls.clone());

        handle.kill().unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn interrupt_then_kill_uses_child_killer_when_no_pid() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut handle = test_handle(calls.clone());

        handle.interrupt_then_kill(Duration::from_millis(0)).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
