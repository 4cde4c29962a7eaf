//! Execution context of one dispatched command
//!
//! A [`Process`] is a cheap handle (clones share state) bound to the
//! console that started it. Command code uses it to write output, read
//! further lines, run nested commands and finish with an exit code.
//! Once [`Process::exit`] has been called every other operation fails
//! with [`ProcessError::NotRunning`].

use std::cell::Cell;
use std::future::Future;
use std::rc::Rc;

use futures::future::{self, FutureExt, LocalBoxFuture};
use tracing::{debug, warn};

use crate::console::Console;
use crate::error::{ProcessError, ProcessResult};

struct ProcessState {
    id: u32,
    name: String,
    exit_code: Cell<i32>,
    running: Cell<bool>,
}

/// Handle to a running (or finished) command invocation
#[derive(Clone)]
pub struct Process {
    state: Rc<ProcessState>,
    console: Console,
}

impl std::fmt::Debug for Process {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Process")
            .field("id", &self.state.id)
            .field("name", &self.state.name)
            .field("exit_code", &self.state.exit_code.get())
            .field("running", &self.state.running.get())
            .finish()
    }
}

impl Process {
    pub(crate) fn new(id: u32, name: &str, console: Console) -> Self {
        Self {
            state: Rc::new(ProcessState {
                id,
                name: name.to_string(),
                exit_code: Cell::new(0),
                running: Cell::new(true),
            }),
            console,
        }
    }

    /// Console-unique id, starting at 1
    pub fn id(&self) -> u32 {
        self.state.id
    }

    /// Name of the command this process runs (empty for blank lines)
    pub fn name(&self) -> &str {
        &self.state.name
    }

    pub fn exit_code(&self) -> i32 {
        self.state.exit_code.get()
    }

    pub fn is_running(&self) -> bool {
        self.state.running.get()
    }

    pub fn console(&self) -> &Console {
        &self.console
    }

    fn ensure_running(&self) -> ProcessResult<()> {
        if self.is_running() {
            Ok(())
        } else {
            Err(ProcessError::NotRunning)
        }
    }

    /// Write a line of output
    pub fn log(&self, text: &str) -> ProcessResult<()> {
        self.ensure_running()?;
        self.console.write(text, true);
        Ok(())
    }

    /// Write a line in the error color and mark the process as failed
    ///
    /// The process keeps running.
    pub fn error(&self, text: &str) -> ProcessResult<()> {
        self.ensure_running()?;
        let color = self.console.scheme().error;
        self.console.write_colored(text, Some(color), true);
        self.state.exit_code.set(1);
        Ok(())
    }

    /// Wait for the next submitted line
    ///
    /// The read is queued immediately, so reads are served in the order
    /// `input` was called, across every process on the console.
    pub fn input(&self) -> LocalBoxFuture<'static, ProcessResult<String>> {
        if let Err(e) = self.ensure_running() {
            return future::ready(Err(e)).boxed_local();
        }
        self.console.request_read_for(Some(self.id())).boxed_local()
    }

    /// Stop the process, optionally overriding the exit code
    ///
    /// Reads this process still has queued are dropped and their futures
    /// resolve with [`ProcessError::ReadAbandoned`].
    pub fn exit(&self, exit_code: Option<i32>) {
        if let Some(code) = exit_code {
            self.state.exit_code.set(code);
        }
        if self.state.running.replace(false) {
            debug!(pid = self.id(), command = %self.name(), code = self.exit_code(), "process exited");
            self.console.abandon_reads(self.id());
        }
    }

    /// Run another command line on the same console and wait for it
    ///
    /// Returns the nested process's exit code.
    pub async fn call(&self, line: &str) -> ProcessResult<i32> {
        self.ensure_running()?;
        let nested = self.console.run(line).await;
        Ok(nested.exit_code())
    }

    /// Feed every submitted line to `callback` until the process exits
    ///
    /// The loop runs as its own task; a failing callback is logged and
    /// the loop keeps reading.
    pub fn respond_input<F, Fut>(&self, mut callback: F) -> ProcessResult<()>
    where
        F: FnMut(String, Process) -> Fut + 'static,
        Fut: Future<Output = anyhow::Result<()>> + 'static,
    {
        self.ensure_running()?;
        let process = self.clone();
        self.console.spawn(async move {
            while process.is_running() {
                match process.input().await {
                    Ok(line) => {
                        if let Err(e) = callback(line, process.clone()).await {
                            warn!(pid = process.id(), command = %process.name(), "input handler failed: {:#}", e);
                        }
                    }
                    Err(_) => break,
                }
            }
        });
        Ok(())
    }
}
