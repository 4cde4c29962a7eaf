//! Command registry and dispatch

use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::rc::Rc;

use futures::future::{FutureExt, LocalBoxFuture};
use tracing::{debug, error};

use super::options::{parse_options, OptionSpec, Options};
use super::tokenizer::tokenize;
use crate::console::Console;
use crate::process::Process;

/// Boxed async command body
pub type Executor =
    Rc<dyn Fn(Process, Vec<String>, Options) -> LocalBoxFuture<'static, anyhow::Result<()>>>;

/// Suggestion hook: partial arguments in, suggestion out
pub type Autocomplete = Rc<dyn Fn(&[String]) -> String>;

/// A registered command
#[derive(Clone)]
pub struct CommandDescriptor {
    name: String,
    executor: Executor,
    docs: Option<String>,
    autocomplete: Option<Autocomplete>,
    options: OptionSpec,
}

impl std::fmt::Debug for CommandDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandDescriptor")
            .field("name", &self.name)
            .field("docs", &self.docs)
            .field("autocomplete", &self.autocomplete.is_some())
            .field("options", &self.options)
            .finish()
    }
}

impl CommandDescriptor {
    pub fn new<F, Fut>(name: &str, executor: F) -> Self
    where
        F: Fn(Process, Vec<String>, Options) -> Fut + 'static,
        Fut: Future<Output = anyhow::Result<()>> + 'static,
    {
        Self {
            name: name.to_string(),
            executor: Rc::new(move |process, args, options| {
                executor(process, args, options).boxed_local()
            }),
            docs: None,
            autocomplete: None,
            options: OptionSpec::default(),
        }
    }

    pub fn docs(mut self, docs: &str) -> Self {
        self.docs = Some(docs.to_string());
        self
    }

    pub fn autocomplete<F>(mut self, hook: F) -> Self
    where
        F: Fn(&[String]) -> String + 'static,
    {
        self.autocomplete = Some(Rc::new(hook));
        self
    }

    pub fn options(mut self, spec: OptionSpec) -> Self {
        self.options = spec;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn documentation(&self) -> Option<&str> {
        self.docs.as_deref()
    }

    pub fn option_spec(&self) -> &OptionSpec {
        &self.options
    }

    /// Ask the autocomplete hook for a suggestion, if one is registered
    pub fn complete(&self, args: &[String]) -> Option<String> {
        self.autocomplete.as_ref().map(|hook| hook(args))
    }

    fn execute(
        &self,
        process: Process,
        args: Vec<String>,
        options: Options,
    ) -> LocalBoxFuture<'static, anyhow::Result<()>> {
        (self.executor)(process, args, options)
    }
}

/// Name → command map shared by every console built from it
#[derive(Default)]
pub struct CommandRegistry {
    commands: RefCell<HashMap<String, Rc<CommandDescriptor>>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with `read`, `echo`, `exit` and `morning`
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        super::builtins::register_all(&registry);
        registry
    }

    /// Store a command; an existing one with the same name is replaced
    pub fn register(&self, descriptor: CommandDescriptor) {
        let name = descriptor.name.clone();
        let replaced = self
            .commands
            .borrow_mut()
            .insert(name.clone(), Rc::new(descriptor))
            .is_some();
        debug!(command = %name, replaced, "command registered");
    }

    pub fn get(&self, name: &str) -> Option<Rc<CommandDescriptor>> {
        self.commands.borrow().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.borrow().contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.commands.borrow().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.commands.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.borrow().is_empty()
    }

    /// Tokenize `line`, resolve the command and run it to completion
    ///
    /// Never fails: unknown commands, parse errors and executor failures
    /// are reported on the console and reflected in the returned
    /// process's exit code.
    pub async fn dispatch(&self, line: &str, console: &Console) -> Process {
        let mut words = match tokenize(line) {
            Ok(words) => words.into_iter(),
            Err(e) => {
                let process = console.new_process("");
                let _ = process.error(&format!("Parse error: {}", e));
                process.exit(Some(1));
                return process;
            }
        };

        let Some(first) = words.next() else {
            let process = console.new_process("");
            process.exit(None);
            return process;
        };

        let prefix = console.config().command_prefix.as_str();
        let name = if prefix.is_empty() {
            first
        } else {
            first.strip_prefix(prefix).map(str::to_string).unwrap_or(first)
        };

        let process = console.new_process(&name);
        let Some(descriptor) = self.get(&name) else {
            debug!(pid = process.id(), command = %name, "command not found");
            let _ = process.error(&format!("Command not found: {}", name));
            process.exit(Some(1));
            return process;
        };

        let rest: Vec<String> = words.collect();
        let (args, options) = parse_options(&rest, descriptor.option_spec());
        debug!(pid = process.id(), command = %name, ?args, "dispatching");

        let outcome = {
            let _active = console.begin_active();
            AssertUnwindSafe(descriptor.execute(process.clone(), args, options))
                .catch_unwind()
                .await
        };

        let failure = match outcome {
            Ok(Ok(())) => None,
            // Once exited, an error (usually an abandoned read) is the normal way out
            Ok(Err(e)) if !process.is_running() => {
                debug!(pid = process.id(), command = %name, "error after exit ignored: {:#}", e);
                None
            }
            Ok(Err(e)) => Some(format!("{:#}", e)),
            Err(panic) => Some(panic_message(panic.as_ref())),
        };

        match failure {
            None => debug!(pid = process.id(), command = %name, code = process.exit_code(), "command finished"),
            Some(message) if !process.is_running() => {
                error!(pid = process.id(), command = %name, "command failed after exit: {}", message);
            }
            Some(message) => {
                error!(pid = process.id(), command = %name, "command failed: {}", message);
                let color = console.scheme().error;
                console.write_colored(&format!("{}: {}", name, message), Some(color), true);
                process.exit(Some(1));
            }
        }
        process
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        format!("panicked: {}", s)
    } else if let Some(s) = panic.downcast_ref::<String>() {
        format!("panicked: {}", s)
    } else {
        "panicked".to_string()
    }
}
