use anyhow::Result;
use fitq::config::Config;
use fitq::core::dispatch::{Dispatcher, TaskAssignment};
use fitq::core::job::Job;
use fitq::core::queue::JobQueue;
use fitq::core::wire::WireResource;
use serde::{Deserialize, Serialize};
use std::io::BufRead;
use std::sync::Arc;

/// One command per stdin line, as JSON. Submissions and offers are the two
/// event streams the core consumes; status and clear are administrative.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum Request {
    Submit {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        command: Option<String>,
        /// [min, max] cores
        cpu: (f64, f64),
        /// [min, max] MB
        mem_mb: (u64, u64),
    },
    Offer(Vec<WireResource>),
    Status,
    Clear,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
enum Response {
    Submitted { job_id: u32 },
    Dispatched { tasks: Vec<TaskAssignment> },
    Status { queued: Vec<Job> },
    Cleared,
    Error { message: String },
}

pub async fn run(config: Config) -> Result<()> {
    let queue = Arc::new(config.queue.build_queue());
    let dispatcher = Dispatcher::new(Arc::clone(&queue));
    tracing::info!(
        capacity = ?config.queue.capacity,
        backpressure = %config.queue.backpressure,
        "fitqd ready, reading commands from stdin"
    );

    let reader = tokio::task::spawn_blocking(move || -> Result<()> {
        for line in std::io::stdin().lock().lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let response = handle_line(&dispatcher, &line);
            println!("{}", serde_json::to_string(&response)?);
        }
        Ok(())
    });

    tokio::select! {
        result = reader => {
            queue.close();
            result??;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("ctrl-c received, closing queue");
            queue.close();
        }
    }
    Ok(())
}

fn handle_line(dispatcher: &Dispatcher, line: &str) -> Response {
    let request: Request = match serde_json::from_str(line) {
        Ok(request) => request,
        Err(e) => {
            return Response::Error {
                message: format!("bad request: {e}"),
            }
        }
    };
    match request {
        Request::Submit {
            name,
            command,
            cpu,
            mem_mb,
        } => submit(dispatcher.queue(), name, command, cpu, mem_mb),
        Request::Offer(entries) => match dispatcher.handle_offer(&entries) {
            Ok(tasks) => Response::Dispatched { tasks },
            Err(e) => Response::Error {
                message: e.to_string(),
            },
        },
        Request::Status => Response::Status {
            queued: dispatcher.queue().snapshot(),
        },
        Request::Clear => {
            dispatcher.queue().clear();
            Response::Cleared
        }
    }
}

fn submit(
    queue: &JobQueue,
    name: Option<String>,
    command: Option<String>,
    cpu: (f64, f64),
    mem_mb: (u64, u64),
) -> Response {
    let mut builder = Job::builder().cpu(cpu.0, cpu.1).mem_mb(mem_mb.0, mem_mb.1);
    if let Some(name) = name {
        builder = builder.name(name);
    }
    if let Some(command) = command {
        builder = builder.command(command);
    }
    let mut job = match builder.build() {
        Ok(job) => job,
        Err(e) => {
            return Response::Error {
                message: e.to_string(),
            }
        }
    };
    job.id = queue.issue_job_id();
    let job_id = job.id;
    match queue.push(job) {
        Ok(()) => Response::Submitted { job_id },
        Err(e) => Response::Error {
            message: e.to_string(),
        },
    }
}
