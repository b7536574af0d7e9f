#![cfg(unix)]

use async_trait::async_trait;
use rabbitmq_cli_consumer::{
    command::CommandFactory,
    consumer::{Consumer, Disposition},
    delivery::Acknowledger,
    executer::{Executer, ProcessExecuter},
};
use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

struct RecordingDelivery {
    body: Vec<u8>,
    settlements: Mutex<Vec<&'static str>>,
}

impl RecordingDelivery {
    fn new(body: &[u8]) -> Self {
        RecordingDelivery {
            body: body.to_vec(),
            settlements: Mutex::new(vec![]),
        }
    }

    fn settlements(&self) -> Vec<&'static str> {
        self.settlements.lock().unwrap().clone()
    }
}

#[async_trait]
impl Acknowledger for RecordingDelivery {
    fn body(&self) -> &[u8] {
        &self.body
    }

    async fn ack(&self, multiple: bool) -> Result<(), lapin::Error> {
        assert!(multiple);
        self.settlements.lock().unwrap().push("ack");
        Ok(())
    }

    async fn nack(&self, multiple: bool, requeue: bool) -> Result<(), lapin::Error> {
        assert!(multiple && requeue);
        self.settlements.lock().unwrap().push("nack");
        Ok(())
    }
}

// `sh -c <script> <payload>` exposes the payload as $0.
fn shell(script: &str) -> CommandFactory {
    CommandFactory::new("sh", vec!["-c".to_owned(), script.to_owned()])
}

#[tokio::test]
async fn zero_exit_status_is_success() {
    let executer = ProcessExecuter::new(true);

    assert!(executer.execute(&shell("exit 0").create("x")).await);
}

#[tokio::test]
async fn non_zero_exit_status_is_failure() {
    let executer = ProcessExecuter::new(false);

    assert!(!executer.execute(&shell("exit 3").create("x")).await);
}

#[tokio::test]
async fn missing_program_is_failure() {
    let executer = ProcessExecuter::new(false);
    let cmd = CommandFactory::new("/nonexistent/worker", vec![]).create("x");

    let outcome = executer.run(&cmd).await;

    assert!(!outcome.success);
    assert!(!outcome.output.is_empty());
}

#[tokio::test]
async fn output_combines_stdout_and_stderr() {
    let executer = ProcessExecuter::new(false);
    let cmd = shell("printf out; printf err >&2").create("x");

    let outcome = executer.run(&cmd).await;

    assert!(outcome.success);
    assert_eq!(outcome.output, "outerr");
}

#[tokio::test]
async fn command_receives_base64_payload_and_message_is_acked() {
    let consumer = Consumer::new(
        Arc::new(ProcessExecuter::new(false)),
        shell(r#"test "$0" = "dGhlX2JvZHk=""#),
        false,
    );
    let msg = RecordingDelivery::new(b"the_body");

    let disposition = consumer.process_message(&msg).await;

    assert_eq!(disposition, Disposition::Acknowledged);
    assert_eq!(msg.settlements(), vec!["ack"]);
}

#[tokio::test]
async fn failing_command_requeues_message() {
    let consumer = Consumer::new(
        Arc::new(ProcessExecuter::new(false)),
        shell("exit 1"),
        false,
    );
    let msg = RecordingDelivery::new(b"the_body");

    let disposition = consumer.process_message(&msg).await;

    assert_eq!(disposition, Disposition::Requeued);
    assert_eq!(msg.settlements(), vec!["nack"]);
}

#[tokio::test]
async fn abandoned_run_kills_the_child() {
    let dir = tempfile::tempdir().unwrap();
    let marker = dir.path().join("finished");
    let cmd = shell(&format!("sleep 1; touch '{}'", marker.display())).create("");

    let executer = ProcessExecuter::new(false);
    let run = tokio::time::timeout(Duration::from_millis(100), executer.run(&cmd)).await;
    assert!(run.is_err());

    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert!(!marker.exists());
}
