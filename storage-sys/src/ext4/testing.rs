// SPDX-License-Identifier: GPL-3.0-only

use std::collections::VecDeque;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use nix::errno::Errno;
use nix::mount::MsFlags;
use storage_types::ToolPaths;

use super::Ext4;
use crate::kernel::MountSyscall;
use crate::process::{ProcessExit, ProcessRunner};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<String>,
}

/// Records every launch and answers with a fixed result
pub struct FakeRunner {
    executable: bool,
    result: Result<ProcessExit, io::ErrorKind>,
    invocations: Mutex<Vec<Invocation>>,
}

impl FakeRunner {
    pub fn exiting(code: i32) -> Arc<Self> {
        Self::answering(Ok(ProcessExit::Exited(code)))
    }

    pub fn answering(result: Result<ProcessExit, io::ErrorKind>) -> Arc<Self> {
        Arc::new(Self {
            executable: true,
            result,
            invocations: Mutex::new(Vec::new()),
        })
    }

    pub fn missing_tools() -> Arc<Self> {
        Arc::new(Self {
            executable: false,
            result: Err(io::ErrorKind::NotFound),
            invocations: Mutex::new(Vec::new()),
        })
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations.lock().expect("poisoned").clone()
    }
}

impl ProcessRunner for FakeRunner {
    fn run(&self, program: &Path, args: &[OsString]) -> io::Result<ProcessExit> {
        self.invocations.lock().expect("poisoned").push(Invocation {
            program: program.to_path_buf(),
            args: args
                .iter()
                .map(|arg| arg.to_string_lossy().to_string())
                .collect(),
        });
        self.result.map_err(io::Error::from)
    }

    fn is_executable(&self, _program: &Path) -> bool {
        self.executable
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountCall {
    pub source: PathBuf,
    pub target: PathBuf,
    pub fs_type: String,
    pub flags: MsFlags,
    pub data: String,
}

/// Captures mount calls; answers from a queue, then succeeds
#[derive(Default)]
pub struct FakeMount {
    responses: Mutex<VecDeque<Errno>>,
    calls: Mutex<Vec<MountCall>>,
}

impl FakeMount {
    pub fn succeeding() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Fail the first calls with `errors`, in order
    pub fn failing_with(errors: &[Errno]) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(errors.iter().copied().collect()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<MountCall> {
        self.calls.lock().expect("poisoned").clone()
    }
}

impl MountSyscall for FakeMount {
    fn mount(
        &self,
        source: &Path,
        target: &Path,
        fs_type: &str,
        flags: MsFlags,
        data: &str,
    ) -> Result<(), Errno> {
        self.calls.lock().expect("poisoned").push(MountCall {
            source: source.to_path_buf(),
            target: target.to_path_buf(),
            fs_type: fs_type.to_string(),
            flags,
            data: data.to_string(),
        });

        match self.responses.lock().expect("poisoned").pop_front() {
            Some(errno) => Err(errno),
            None => Ok(()),
        }
    }
}

#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().expect("poisoned").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Formatted log output emitted on this thread while `f` runs
pub fn capture_logs(f: impl FnOnce()) -> String {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::TRACE)
        .finish();

    tracing::subscriber::with_default(subscriber, f);

    let bytes = buffer.0.lock().expect("poisoned").clone();
    String::from_utf8_lossy(&bytes).to_string()
}

pub fn test_tools() -> ToolPaths {
    ToolPaths::with_prefix("/test/bin")
}

pub fn ext4_with(runner: Arc<FakeRunner>, mounter: Arc<FakeMount>) -> Ext4 {
    Ext4::with_backends(test_tools(), runner, mounter)
}
