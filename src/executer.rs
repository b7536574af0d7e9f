// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Command Execution
//!
//! `Executer` runs a `Command` to completion and reports whether it
//! succeeded. `ProcessExecuter` is the real implementation: it spawns the
//! program, waits for it to exit and logs its combined output.

use crate::command::Command;
use async_trait::async_trait;
use tracing::{error, info};

/// Runs commands to completion.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Executer: Send + Sync {
    /// Returns true when the command launched and exited with status zero.
    async fn execute(&self, cmd: &Command) -> bool;
}

/// Result of one process run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionOutcome {
    pub success: bool,
    /// Stdout followed by stderr, lossily decoded.
    pub output: String,
}

/// Executes commands as child processes.
#[derive(Debug, Clone, Default)]
pub struct ProcessExecuter {
    verbose: bool,
}

impl ProcessExecuter {
    /// With `verbose` set, the output of successful runs is logged too.
    pub fn new(verbose: bool) -> Self {
        ProcessExecuter { verbose }
    }

    /// Spawns the program and waits for it, capturing stdout and stderr.
    pub async fn run(&self, cmd: &Command) -> ExecutionOutcome {
        match cmd.to_process().output().await {
            Ok(output) => {
                let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
                combined.push_str(&String::from_utf8_lossy(&output.stderr));

                ExecutionOutcome {
                    success: output.status.success(),
                    output: combined,
                }
            }
            Err(err) => ExecutionOutcome {
                success: false,
                output: err.to_string(),
            },
        }
    }
}

#[async_trait]
impl Executer for ProcessExecuter {
    async fn execute(&self, cmd: &Command) -> bool {
        info!(program = cmd.program(), "processing message...");

        let outcome = self.run(cmd).await;

        if !outcome.success {
            info!("failed. check error log for details");
            error!(program = cmd.program(), "failed: {}", outcome.output);
            return false;
        }

        if self.verbose {
            info!("output: {}", outcome.output);
        }
        info!("processed!");

        true
    }
}
