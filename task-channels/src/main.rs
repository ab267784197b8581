use scatter_gather_core::collection::CollectionStrategy;
use scatter_gather_core::config::Config;
use scatter_gather_core::error::ProtocolError;
use scatter_gather_core::master::{run_master, JobOptions};
use scatter_gather_core::transform::Increment;
use scatter_gather_task_channels::channel_transport::{join_workers, spawn_worker_pool, WorkerPool};
use std::sync::Arc;

fn usage() -> String {
    "Usage: scatter-gather [N] [--workers COUNT] [--strategy ordered|size-matched] [--config PATH]"
        .to_string()
}

fn parse_args() -> Result<Config, String> {
    let mut config = Config::default();
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let path = args.next().ok_or_else(|| "--config requires a path".to_string())?;
                config = Config::load(&path).map_err(|e| format!("Failed to load config: {}", e))?;
            }
            "--workers" => {
                let count = args.next().ok_or_else(|| "--workers requires a count".to_string())?;
                config.num_workers = count
                    .parse()
                    .map_err(|_| format!("Invalid worker count '{}'", count))?;
            }
            "--strategy" => {
                let name = args.next().ok_or_else(|| "--strategy requires a name".to_string())?;
                config.strategy = match name.as_str() {
                    "ordered" => CollectionStrategy::Ordered,
                    "size-matched" => CollectionStrategy::SizeMatched,
                    other => return Err(format!("Unknown strategy '{}'", other)),
                };
            }
            "--help" | "-h" => return Err(usage()),
            value => {
                let n: i64 = value
                    .parse()
                    .map_err(|_| format!("Invalid array length '{}'\n{}", value, usage()))?;
                if n < 1 {
                    return Err("Error: Array size must be greater than or equal to 1.".to_string());
                }
                config.array_len = n as usize;
            }
        }
    }

    if config.array_len < 1 {
        return Err("Error: Array size must be greater than or equal to 1.".to_string());
    }

    Ok(config)
}

async fn run(config: Config) -> Result<(), ProtocolError> {
    let mut array: Vec<i64> = (0..config.array_len as i64).collect();
    let transform = Arc::new(Increment);

    let WorkerPool { mut port, handles } =
        spawn_worker_pool(config.num_workers, Arc::clone(&transform), config.strategy);

    let options = JobOptions {
        strategy: config.strategy,
        policy: config.policy,
        seed: config.seed,
    };
    let report = run_master(&mut port, &mut array, transform.as_ref(), options).await?;

    // Dropping the master endpoint closes the remaining channels so every
    // worker task can terminate before we join them.
    drop(port);
    join_workers(handles).await;

    if config.strategy == CollectionStrategy::SizeMatched {
        println!(
            "Total execution time: {} seconds",
            report.elapsed.as_secs_f64()
        );
        let sequence: Vec<String> = report.send_order.iter().map(|w| w.to_string()).collect();
        println!("Sending sequence: {}", sequence.join(" "));
    }

    let rendered: Vec<String> = array.iter().map(|v| v.to_string()).collect();
    println!("Processed array: {}", rendered.join(" "));

    Ok(())
}

#[tokio::main]
async fn main() {
    let config = match parse_args() {
        Ok(config) => config,
        Err(message) => {
            eprintln!("{}", message);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(config).await {
        eprintln!("Job failed: {}", e);
        std::process::exit(1);
    }
}
