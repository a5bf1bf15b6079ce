use std::io::Write;

use ferry_client_lib::{BackgroundTransfer, ClientInstance};
use ferry_core_lib::{
    data::protocol::{CommandRequest, CommandVerb},
    jobs::{CancelOutcome, JobId, TransferDirection},
    FerryError,
};
use futures::future::join_all;
use tokio::{
    io::{stdin, AsyncBufReadExt, BufReader},
    task::JoinHandle,
};

const PROMPT: &str = "ferry> ";

/// Interactive loop on top of a [`ClientInstance`].
pub struct Prompt {
    client: ClientInstance,
    reporters: Vec<JoinHandle<()>>,
}

enum Flow {
    Continue,
    Quit,
}

impl Prompt {
    pub fn new(client: ClientInstance) -> Prompt {
        Prompt {
            client,
            reporters: vec![],
        }
    }

    pub async fn run(&mut self) {
        let mut lines = BufReader::new(stdin()).lines();

        loop {
            print!("{}", PROMPT);
            if let Err(e) = std::io::stdout().flush() {
                debug!("Could not flush prompt: {}", e);
            }

            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    error!("Could not read input: {}", e);
                    break;
                }
            };

            if line.trim().is_empty() {
                continue;
            }

            match self.handle_line(&line).await {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => break,
                Err(e) if e.is_disconnect() => {
                    eprintln!("Connection to server lost: {}", e);
                    break;
                }
                Err(e) => eprintln!("Error: {}", e),
            }
        }

        if let Err(e) = self.client.quit().await {
            debug!("Quit was not delivered: {}", e);
        }

        if !self.reporters.is_empty() {
            println!("Waiting for {} background transfer(s)...", self.reporters.len());
            join_all(self.reporters.drain(..)).await;
        }
    }

    async fn handle_line(&mut self, line: &str) -> Result<Flow, FerryError> {
        let request = match CommandRequest::parse(line) {
            Ok(request) => request,
            Err(e) => {
                debug!("Rejected input '{}': {}", line, e);
                println!("Unrecognized command format! Please try again.");
                return Ok(Flow::Continue);
            }
        };

        match (&request.verb, request.argument.as_deref()) {
            (CommandVerb::Get, Some(name)) | (CommandVerb::Put, Some(name)) => {
                self.transfer(&request.verb, name, request.background).await?;
            }
            (CommandVerb::Get, None) | (CommandVerb::Put, None) => {
                println!("Usage: {} <file> [&]", request.verb.as_str().to_lowercase());
            }
            (CommandVerb::Ls, _) => {
                for name in self.client.ls().await? {
                    println!("{}", name);
                }
            }
            (CommandVerb::Terminate, Some(id)) => {
                let job_id = JobId::from(id);
                match self.client.terminate(&job_id).await? {
                    CancelOutcome::Requested => println!("Terminating job {}", job_id),
                    CancelOutcome::Unknown => println!("Unknown job ID {}", job_id),
                }
            }
            (CommandVerb::Terminate, None) => println!("Usage: terminate <id>"),
            (CommandVerb::Quit, _) => return Ok(Flow::Quit),
            // CD, MKDIR, PWD, DELETE and anything unknown get one line back.
            _ => {
                let reply = self.client.send_raw(&request.to_line()).await?;
                if !reply.is_empty() {
                    println!("{}", reply);
                }
            }
        }

        Ok(Flow::Continue)
    }

    async fn transfer(
        &mut self,
        verb: &CommandVerb,
        name: &str,
        background: bool,
    ) -> Result<(), FerryError> {
        let direction = match verb {
            CommandVerb::Put => TransferDirection::Put,
            _ => TransferDirection::Get,
        };

        let result = match (direction, background) {
            (TransferDirection::Get, false) => self.client.get(name).await.map(|_| None),
            (TransferDirection::Put, false) => self.client.put(name).await.map(|_| None),
            (TransferDirection::Get, true) => self.client.get_background(name).await.map(Some),
            (TransferDirection::Put, true) => self.client.put_background(name).await.map(Some),
        };

        match result {
            Ok(None) => println!("{}", completion_message(direction, name)),
            Ok(Some(transfer)) => {
                println!("Command ID: {}", transfer.job_id);
                self.reporters.push(report_when_done(transfer));
            }
            Err(FerryError::NotFound(_)) => println!("File not found."),
            Err(e) => return Err(e),
        }

        Ok(())
    }
}

fn completion_message(direction: TransferDirection, name: &str) -> String {
    match direction {
        TransferDirection::Get => format!("File {} retrieving complete.", name),
        TransferDirection::Put => format!("File {} sending complete.", name),
    }
}

fn report_when_done(transfer: BackgroundTransfer) -> JoinHandle<()> {
    tokio::spawn(async move {
        let job_id = transfer.job_id.clone();
        let direction = transfer.direction;
        let name = transfer.file_name.clone();

        match transfer.wait().await {
            Ok(outcome) if outcome.is_complete() => {
                println!("\n{}", completion_message(direction, &name))
            }
            Ok(_) => println!("\nJob {} terminated.", job_id),
            Err(e) => println!("\nJob {} failed: {}", job_id, e),
        }
    })
}
