// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! External command description and the factory that builds one per message.

use crate::errors::ConfigError;

/// A fully specified invocation: program, fixed arguments and the trailing
/// payload argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    program: String,
    args: Vec<String>,
}

impl Command {
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Every argument in order, the payload last.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// The trailing argument carrying the message payload.
    pub fn payload(&self) -> Option<&str> {
        self.args.last().map(String::as_str)
    }

    pub(crate) fn to_process(&self) -> tokio::process::Command {
        let mut process = tokio::process::Command::new(&self.program);
        process.args(&self.args).kill_on_drop(true);
        process
    }
}

/// Builds commands from a fixed program and argument template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandFactory {
    program: String,
    args: Vec<String>,
}

impl CommandFactory {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        CommandFactory {
            program: program.into(),
            args,
        }
    }

    /// Splits a command line such as `php worker.php --env=prod` on whitespace:
    /// the first word is the program, the rest are fixed arguments.
    pub fn from_command_line(line: &str) -> Result<Self, ConfigError> {
        let mut words = line.split_whitespace().map(str::to_owned);
        let program = words.next().ok_or(ConfigError::EmptyExecutable)?;

        Ok(CommandFactory::new(program, words.collect()))
    }

    /// Returns the template with `payload` appended as the last argument.
    pub fn create(&self, payload: &str) -> Command {
        let mut args = Vec::with_capacity(self.args.len() + 1);
        args.extend(self.args.iter().cloned());
        args.push(payload.to_owned());

        Command {
            program: self.program.clone(),
            args,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_payload_after_fixed_args() {
        let factory = CommandFactory::new("test", vec!["aa".to_owned()]);

        let cmd = factory.create("dGhlX2JvZHk=");

        assert_eq!(cmd.program(), "test");
        assert_eq!(cmd.args(), ["aa", "dGhlX2JvZHk="]);
        assert_eq!(cmd.payload(), Some("dGhlX2JvZHk="));
    }

    #[test]
    fn same_payload_builds_identical_commands() {
        let factory = CommandFactory::new("test", vec!["aa".to_owned(), "bb".to_owned()]);

        assert_eq!(factory.create("payload"), factory.create("payload"));
    }

    #[test]
    fn create_does_not_grow_the_template() {
        let factory = CommandFactory::new("test", vec![]);

        factory.create("first");
        let cmd = factory.create("second");

        assert_eq!(cmd.args(), ["second"]);
    }

    #[test]
    fn parses_command_line() {
        let factory = CommandFactory::from_command_line("  php  worker.php --env=prod ").unwrap();

        assert_eq!(
            factory,
            CommandFactory::new(
                "php",
                vec!["worker.php".to_owned(), "--env=prod".to_owned()]
            )
        );
    }

    #[test]
    fn rejects_blank_command_line() {
        assert!(matches!(
            CommandFactory::from_command_line("   "),
            Err(ConfigError::EmptyExecutable)
        ));
    }
}
