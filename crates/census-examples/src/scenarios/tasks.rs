use std::time::Duration;

use census::{InstanceGuard, Tracked, TypeKey};
use tokio::task::JoinSet;
use tracing::debug;

#[derive(Default)]
struct Job {
    id: u32,
    _census: InstanceGuard<Job>,
}

impl Tracked for Job {
    const TYPE_KEY: TypeKey = TypeKey::from_static("demo::Job");
}

#[derive(Clone, Default)]
struct Checkpoint {
    _census: InstanceGuard<Checkpoint>,
}

impl Tracked for Checkpoint {
    const TYPE_KEY: TypeKey = TypeKey::from_static("demo::Checkpoint");
}

pub async fn run(tasks: u32) -> Result<(), String> {
    let mut set = JoinSet::new();
    for id in 0..tasks {
        set.spawn(async move {
            let job = Job {
                id,
                ..Job::default()
            };
            let checkpoint = Checkpoint::default();
            tokio::time::sleep(Duration::from_millis(u64::from(id % 5))).await;
            let resumed = checkpoint.clone();
            drop(checkpoint);
            debug!(job = job.id, "job finished");
            drop(resumed);
            job.id
        });
    }

    let mut finished = 0u32;
    while let Some(joined) = set.join_next().await {
        joined.map_err(|e| format!("job task failed: {e}"))?;
        finished += 1;
    }

    let jobs = census::counts(&Job::TYPE_KEY).unwrap_or_default();
    let checkpoints = census::counts(&Checkpoint::TYPE_KEY).unwrap_or_default();
    println!(
        "{finished} jobs finished: {} created, peak {} in flight; {} checkpoints created",
        jobs.total_created, jobs.peak, checkpoints.total_created
    );
    Ok(())
}
