// THEORY:
// The `parallel_pipeline` spreads independent frames over a pool of tokio workers.
// Frames share no state, so each one can be scanned and clustered by any worker
// using the same synchronous `CardPipeline`. The pool only decides *where* a frame
// runs; the result for a frame is always identical to a sequential run.
//
// A single dispatcher hands tasks to workers round-robin. Each task carries a
// oneshot sender, and `process_frames` awaits the receivers in submission order, so
// results come back in the order the frames went in. Ownership of each frame travels
// to the worker and back inside its `ProcessedFrame`, so callers never keep a copy.

use crate::adapters::CapturedFrame;
use crate::error::{AdapterError, FrameError};
use crate::pipeline::{CardPipeline, CategoryAreas, PipelineConfig};
use futures::future::join_all;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

/// A frame handed back by a worker together with what the pipeline made of it.
#[derive(Debug)]
pub struct ProcessedFrame {
    pub frame: CapturedFrame,
    pub areas: Result<CategoryAreas, FrameError>,
}

type FrameResult = Result<ProcessedFrame, AdapterError>;

pub struct FrameTask {
    pub frame: CapturedFrame,
    pub result_sender: oneshot::Sender<ProcessedFrame>,
}

pub struct WorkerPool {
    task_sender: mpsc::UnboundedSender<FrameTask>,
    workers: Vec<tokio::task::JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawns `worker_count` workers (at least one). Must be called inside a tokio runtime.
    pub fn new(config: PipelineConfig, worker_count: usize) -> Self {
        let worker_count = worker_count.max(1);
        let (task_sender, mut task_receiver) = mpsc::unbounded_channel::<FrameTask>();
        let mut workers = Vec::with_capacity(worker_count);

        let (worker_senders, worker_receivers): (Vec<_>, Vec<_>) = (0..worker_count)
            .map(|_| mpsc::unbounded_channel::<FrameTask>())
            .unzip();

        // Dispatcher
        tokio::spawn(async move {
            let mut worker_idx = 0;
            while let Some(task) = task_receiver.recv().await {
                if worker_senders[worker_idx].send(task).is_err() {
                    warn!(worker = worker_idx, "worker stopped, dropping frame");
                }
                worker_idx = (worker_idx + 1) % worker_count;
            }
        });

        for (worker_id, mut worker_receiver) in worker_receivers.into_iter().enumerate() {
            let pipeline = CardPipeline::new(config);
            let worker = tokio::spawn(async move {
                while let Some(task) = worker_receiver.recv().await {
                    let FrameTask {
                        frame,
                        result_sender,
                    } = task;
                    let areas = pipeline.process_frame(&frame.data, frame.width, frame.height);
                    debug!(worker = worker_id, ok = areas.is_ok(), "processed frame");
                    let _ = result_sender.send(ProcessedFrame { frame, areas });
                }
            });
            workers.push(worker);
        }

        Self {
            task_sender,
            workers,
        }
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    pub async fn process_frame(&self, frame: CapturedFrame) -> FrameResult {
        let (result_sender, result_receiver) = oneshot::channel();
        self.task_sender
            .send(FrameTask {
                frame,
                result_sender,
            })
            .map_err(|_| AdapterError::PoolClosed)?;

        result_receiver.await.map_err(|_| AdapterError::PoolClosed)
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        for worker in &self.workers {
            worker.abort();
        }
    }
}

/// Runs batches of independent frames through a worker pool sized to the machine.
pub struct ParallelPipeline {
    worker_pool: WorkerPool,
}

impl ParallelPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self::with_workers(config, num_cpus::get())
    }

    pub fn with_workers(config: PipelineConfig, worker_count: usize) -> Self {
        Self {
            worker_pool: WorkerPool::new(config, worker_count),
        }
    }

    pub fn worker_count(&self) -> usize {
        self.worker_pool.worker_count()
    }

    /// Processes every frame and returns each one with its areas, in submission order.
    pub async fn process_frames(&self, frames: Vec<CapturedFrame>) -> Vec<FrameResult> {
        join_all(
            frames
                .into_iter()
                .map(|frame| self.worker_pool.process_frame(frame)),
        )
        .await
    }
}
