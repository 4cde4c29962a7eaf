//! Commands every registry starts with

use super::options::Options;
use super::registry::{CommandDescriptor, CommandRegistry};
use crate::process::Process;

pub fn register_all(registry: &CommandRegistry) {
    registry.register(CommandDescriptor::new("read", read).docs("Wait for one line of input and discard it"));
    registry.register(CommandDescriptor::new("echo", echo).docs("Print the arguments separated by spaces"));
    registry.register(CommandDescriptor::new("exit", exit).docs("Stop the current process"));
    registry.register(CommandDescriptor::new("morning", morning).docs("Say good morning"));
}

async fn read(process: Process, _args: Vec<String>, _options: Options) -> anyhow::Result<()> {
    process.input().await?;
    Ok(())
}

async fn echo(process: Process, args: Vec<String>, _options: Options) -> anyhow::Result<()> {
    process.log(&args.join(" "))?;
    Ok(())
}

async fn exit(process: Process, _args: Vec<String>, _options: Options) -> anyhow::Result<()> {
    process.exit(None);
    Ok(())
}

async fn morning(process: Process, _args: Vec<String>, _options: Options) -> anyhow::Result<()> {
    process.call("echo Good morning!").await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use futures::executor::LocalPool;

    use crate::config::Config;
    use crate::console::Console;
    use crate::shell::CommandRegistry;

    fn setup() -> (LocalPool, Console) {
        let pool = LocalPool::new();
        let registry = Rc::new(CommandRegistry::with_builtins());
        let console = Console::new(registry, pool.spawner(), Config::default());
        (pool, console)
    }

    #[test]
    fn test_echo_joins_with_single_spaces() {
        let (mut pool, console) = setup();
        let process = pool.run_until(console.run("/echo  hello   world"));
        assert_eq!(process.exit_code(), 0);
        assert_eq!(console.output_text(), vec!["hello world"]);
    }

    #[test]
    fn test_echo_without_args_prints_empty_line() {
        let (mut pool, console) = setup();
        pool.run_until(console.run("echo"));
        assert_eq!(console.output().len(), 2);
    }

    #[test]
    fn test_exit_stops_process() {
        let (mut pool, console) = setup();
        let process = pool.run_until(console.run("exit"));
        assert!(!process.is_running());
        assert_eq!(process.exit_code(), 0);
    }

    #[test]
    fn test_morning_delegates_to_echo() {
        let (mut pool, console) = setup();
        let process = pool.run_until(console.run("morning"));
        assert_eq!(process.exit_code(), 0);
        assert_eq!(console.output_text(), vec!["Good morning!"]);
    }
}
