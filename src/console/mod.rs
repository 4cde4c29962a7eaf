//! Interactive console: input line, scrollback and line routing.
//!
//! This module combines the pieces one terminal session needs:
//!
//! - **output**: append-only scrollback of colored spans
//! - [`LineEditor`]: the input line and its history
//! - the pending-read queue that lets running commands wait for lines
//!
//! # Routing
//!
//! Every submitted line is echoed, then:
//!
//! ```text
//! submit_line
//! ├── pending read queued?  → resolve the oldest read with the line
//! └── otherwise             → spawn dispatch of the line as a command
//! ```
//!
//! A command blocked in `input()` therefore always receives the next
//! line, whatever it looks like. A dispatched command runs in place up
//! to its first suspension, so a read it asks for is queued before
//! `submit_line` returns. The rest runs on the console's single-threaded
//! spawner and the console keeps accepting lines meanwhile.

pub mod output;

use std::cell::{Cell, Ref, RefCell};
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

use futures::channel::oneshot;
use futures::executor::LocalSpawner;
use futures::future::LocalBoxFuture;
use futures::task::{noop_waker_ref, LocalSpawnExt};
use futures::FutureExt;
use tracing::{debug, error};

use crate::config::{Color, ColorScheme, Config};
use crate::editor::LineEditor;
use crate::error::{ProcessError, ProcessResult};
use crate::process::Process;
use crate::shell::CommandRegistry;

pub use output::{OutputLine, OutputLog, Span};

/// A queued read waiting for the next submitted line
struct PendingRead {
    /// Process that asked, if any
    owner: Option<u32>,
    sender: oneshot::Sender<String>,
}

/// Future returned by [`Console::request_read`]
pub struct ReadRequest {
    rx: oneshot::Receiver<String>,
}

impl Future for ReadRequest {
    type Output = ProcessResult<String>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.rx
            .poll_unpin(cx)
            .map(|res| res.map_err(|_| ProcessError::ReadAbandoned))
    }
}

struct ConsoleInner {
    editor: RefCell<LineEditor>,
    output: RefCell<OutputLog>,
    pending: RefCell<VecDeque<PendingRead>>,
    registry: Rc<CommandRegistry>,
    spawner: LocalSpawner,
    config: Config,
    scheme: ColorScheme,
    revision: Cell<u64>,
    next_pid: Cell<u32>,
    active: Cell<usize>,
}

/// Handle to one console session (clones share the session)
#[derive(Clone)]
pub struct Console {
    inner: Rc<ConsoleInner>,
}

/// Decrements the active-process count when a dispatch ends or is dropped
pub(crate) struct ActiveGuard(Console);

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        let active = &self.0.inner.active;
        active.set(active.get().saturating_sub(1));
        self.0.touch();
    }
}

impl Console {
    /// Create a console dispatching into `registry`
    ///
    /// Commands run as tasks on `spawner`; the caller drives the owning
    /// `LocalPool`.
    pub fn new(registry: Rc<CommandRegistry>, spawner: LocalSpawner, config: Config) -> Self {
        let scheme = config.get_color_scheme();
        Self {
            inner: Rc::new(ConsoleInner {
                editor: RefCell::new(LineEditor::new()),
                output: RefCell::new(OutputLog::new(config.scrollback)),
                pending: RefCell::new(VecDeque::new()),
                registry,
                spawner,
                config,
                scheme,
                revision: Cell::new(0),
                next_pid: Cell::new(1),
                active: Cell::new(0),
            }),
        }
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    pub fn scheme(&self) -> &ColorScheme {
        &self.inner.scheme
    }

    pub fn registry(&self) -> &Rc<CommandRegistry> {
        &self.inner.registry
    }

    /// Bumped on every visible state change
    pub fn revision(&self) -> u64 {
        self.inner.revision.get()
    }

    fn touch(&self) {
        self.inner.revision.set(self.inner.revision.get().wrapping_add(1));
    }

    pub fn editor(&self) -> Ref<'_, LineEditor> {
        self.inner.editor.borrow()
    }

    /// Apply an operation to the input line
    pub fn edit<R>(&self, f: impl FnOnce(&mut LineEditor) -> R) -> R {
        let result = f(&mut *self.inner.editor.borrow_mut());
        self.touch();
        result
    }

    pub fn output(&self) -> Ref<'_, OutputLog> {
        self.inner.output.borrow()
    }

    /// Output as plain text lines (without the open empty line)
    pub fn output_text(&self) -> Vec<String> {
        self.inner.output.borrow().text_lines()
    }

    pub fn clear_output(&self) {
        self.inner.output.borrow_mut().clear();
        self.touch();
    }

    /// Append text in the default color
    pub fn write(&self, text: &str, newline: bool) {
        self.write_colored(text, None, newline);
    }

    pub fn write_colored(&self, text: &str, color: Option<Color>, newline: bool) {
        self.inner.output.borrow_mut().write(text, color, newline);
        self.touch();
    }

    /// Submit whatever is in the input line
    pub fn submit(&self) -> String {
        let line = self.edit(LineEditor::submit);
        self.submit_line(&line);
        line
    }

    /// Route a submitted line to a waiting read or to a new command
    pub fn submit_line(&self, text: &str) {
        let echo = self.inner.scheme.echo;
        self.write_colored(text, Some(echo), true);

        if let Some(read) = self.pop_pending() {
            debug!(owner = ?read.owner, "line delivered to pending read");
            // Receivers were checked in pop_pending and nothing runs in between
            let _ = read.sender.send(text.to_string());
            return;
        }

        if text.trim().is_empty() {
            return;
        }

        let console = self.clone();
        let line = text.to_string();
        self.spawn(async move {
            console.run(&line).await;
        });
    }

    fn pop_pending(&self) -> Option<PendingRead> {
        let mut pending = self.inner.pending.borrow_mut();
        while let Some(read) = pending.pop_front() {
            if !read.sender.is_canceled() {
                return Some(read);
            }
        }
        None
    }

    /// Queue a read for the next submitted line
    pub fn request_read(&self) -> ReadRequest {
        self.request_read_for(None)
    }

    pub(crate) fn request_read_for(&self, owner: Option<u32>) -> ReadRequest {
        let (sender, rx) = oneshot::channel();
        {
            let mut pending = self.inner.pending.borrow_mut();
            pending.retain(|read| !read.sender.is_canceled());
            pending.push_back(PendingRead { owner, sender });
        }
        self.touch();
        ReadRequest { rx }
    }

    /// Drop every queued read owned by `pid`
    pub(crate) fn abandon_reads(&self, pid: u32) {
        self.inner
            .pending
            .borrow_mut()
            .retain(|read| read.owner != Some(pid));
        self.touch();
    }

    /// Number of reads still waiting for a line
    pub fn pending_reads(&self) -> usize {
        self.inner
            .pending
            .borrow()
            .iter()
            .filter(|read| !read.sender.is_canceled())
            .count()
    }

    /// Number of dispatches whose executor has not finished
    pub fn active_processes(&self) -> usize {
        self.inner.active.get()
    }

    pub(crate) fn begin_active(&self) -> ActiveGuard {
        self.inner.active.set(self.inner.active.get() + 1);
        self.touch();
        ActiveGuard(self.clone())
    }

    /// Create a process bound to this console
    pub fn new_process(&self, name: &str) -> Process {
        let pid = self.inner.next_pid.get();
        self.inner.next_pid.set(pid.wrapping_add(1));
        Process::new(pid, name, self.clone())
    }

    /// Dispatch a line directly, without echo, and wait for the executor
    pub async fn run(&self, line: &str) -> Process {
        let registry = Rc::clone(&self.inner.registry);
        registry.dispatch(line, self).await
    }

    /// Run a task on the console's scheduler
    ///
    /// The task is polled once right away; only if it suspends is it
    /// handed to the spawner, which polls it again with a real waker.
    pub fn spawn<F>(&self, task: F)
    where
        F: Future<Output = ()> + 'static,
    {
        let mut task: LocalBoxFuture<'static, ()> = task.boxed_local();
        let mut cx = Context::from_waker(noop_waker_ref());
        if task.poll_unpin(&mut cx).is_ready() {
            return;
        }
        if let Err(e) = self.inner.spawner.spawn_local(task) {
            error!("Failed to spawn console task: {}", e);
        }
    }
}
