//! Background loader thread.
//!
//! The dataset fetch is the only blocking operation in the dashboard, so it
//! runs here. Commands and responses travel over `mpsc` channels; a response
//! that arrives after the UI has quit is dropped along with the channel.

use std::io;
use std::sync::mpsc::{Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use rankboard_core::{Dataset, LoadError, SourceSpec, ValidationPolicy};

#[derive(Debug)]
pub enum WorkerCommand {
    Load {
        source: SourceSpec,
        timeout: Duration,
        policy: ValidationPolicy,
    },
    Shutdown,
}

#[derive(Debug)]
pub enum WorkerResponse {
    Loaded {
        dataset: Box<Dataset>,
        source: String,
        elapsed: Duration,
    },
    LoadFailed {
        error: LoadError,
        source: String,
    },
}

pub fn spawn_worker(
    rx: Receiver<WorkerCommand>,
    tx: Sender<WorkerResponse>,
) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("rankboard-loader".into())
        .spawn(move || worker_loop(rx, tx))
}

fn worker_loop(rx: Receiver<WorkerCommand>, tx: Sender<WorkerResponse>) {
    loop {
        match rx.recv() {
            Ok(WorkerCommand::Shutdown) | Err(_) => break,
            Ok(WorkerCommand::Load {
                source,
                timeout,
                policy,
            }) => {
                let response = load(&source, timeout, policy);
                if tx.send(response).is_err() {
                    break;
                }
            }
        }
    }
    tracing::debug!("loader thread exiting");
}

fn load(source: &SourceSpec, timeout: Duration, policy: ValidationPolicy) -> WorkerResponse {
    let started = Instant::now();
    let result = source
        .open(timeout)
        .and_then(|opened| opened.load(policy));
    match result {
        Ok(dataset) => WorkerResponse::Loaded {
            dataset: Box::new(dataset),
            source: source.to_string(),
            elapsed: started.elapsed(),
        },
        Err(error) => {
            tracing::warn!(source = %source, %error, "load failed");
            WorkerResponse::LoadFailed {
                error,
                source: source.to_string(),
            }
        }
    }
}
